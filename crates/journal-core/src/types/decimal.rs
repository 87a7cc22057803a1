//! 정밀한 통계 계산을 위한 Decimal 유틸리티.
//!
//! 모든 분모 0 상황은 여기의 함수로 처리하여 리포트에 무한대나 NaN이
//! 들어가지 않도록 합니다.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// 비율 계산용 분모를 보정합니다.
///
/// 절대값이 0이면 1을 사용합니다. Profit Factor와 손익비처럼
/// "손실이 없으면 분자 그대로"가 되어야 하는 지표에 사용합니다.
pub fn guarded_denominator(value: Decimal) -> Decimal {
    let magnitude = value.abs();
    if magnitude.is_zero() {
        Decimal::ONE
    } else {
        magnitude
    }
}

/// 0으로 나누면 0을 반환하는 나눗셈.
pub fn div_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// 백분율 (0~100 스케일). 전체가 0이면 0.
pub fn percentage(part: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) / Decimal::from(total) * dec!(100)
}

/// 0 이하로 강제한 값을 반환합니다 (-|x|).
///
/// `-0`이 직렬화되지 않도록 0은 그대로 0을 반환합니다.
pub fn non_positive(value: Decimal) -> Decimal {
    let magnitude = value.abs();
    if magnitude.is_zero() {
        Decimal::ZERO
    } else {
        -magnitude
    }
}

/// 정수 단위로 반올림합니다 (0.5는 0에서 먼 쪽으로).
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Decimal 타입의 제곱근을 뉴턴 방법으로 계산합니다.
///
/// 초기 추정값은 value / 2 (1 미만이면 1), 10^-10 이내로 수렴하거나
/// 50회 반복하면 종료합니다. 0 이하의 값은 0을 반환합니다.
pub fn decimal_sqrt(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut guess = (value / Decimal::TWO).max(Decimal::ONE);
    let precision = Decimal::new(1, 10);

    for _ in 0..50 {
        let next = (guess + value / guess) / Decimal::TWO;
        if (next - guess).abs() < precision {
            return next;
        }
        guess = next;
    }

    guess
}
