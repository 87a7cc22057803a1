//! 자산 곡선(Equity Curve) 모듈
//!
//! 정규화된 거래의 실현 결과를 시간순으로 누적합니다.
//! 핍 공간과 가치핍 공간의 두 곡선을 항상 함께 만듭니다.
//! 필터링은 하지 않으며 주어진 부분집합을 그대로 사용합니다.

use chrono::{DateTime, Utc};
use journal_core::{NormalizedTrade, PipValue};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 단일 자산 곡선 포인트 (거래당 하나).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// 청산 시각
    pub time: DateTime<Utc>,
    /// 종목 심볼
    pub pair: String,
    /// 롱 여부
    pub is_long: bool,
    /// 이 거래의 실현 결과
    pub result: Decimal,
    /// 이 거래까지의 누적값
    pub cumulative: Decimal,
}

/// 한 공간(핍 또는 가치핍)의 자산 곡선.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityCurve {
    points: Vec<EquityPoint>,
}

impl EquityCurve {
    /// 포인트 목록으로 곡선을 생성합니다.
    pub fn from_points(points: Vec<EquityPoint>) -> Self {
        Self { points }
    }

    /// 모든 데이터 포인트를 반환합니다.
    pub fn points(&self) -> &[EquityPoint] {
        &self.points
    }

    /// 마지막 누적값. 빈 곡선은 0.
    pub fn last_cumulative(&self) -> Decimal {
        self.points
            .last()
            .map(|p| p.cumulative)
            .unwrap_or(Decimal::ZERO)
    }

    /// 데이터 포인트 개수
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 비어있는지 확인
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 핍/가치핍 두 공간의 자산 곡선.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityCurves {
    pub pips: EquityCurve,
    pub value: EquityCurve,
}

impl EquityCurves {
    /// 두 공간의 최종 누적값.
    pub fn final_equity(&self) -> PipValue {
        PipValue::new(self.pips.last_cumulative(), self.value.last_cumulative())
    }
}

/// 자산 곡선 빌더.
///
/// 누적값은 0에서 시작합니다.
#[derive(Debug, Default)]
pub struct EquityCurveBuilder {
    cumulative: PipValue,
    pips: Vec<EquityPoint>,
    value: Vec<EquityPoint>,
}

impl EquityCurveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 거래 결과를 추가합니다.
    pub fn push(&mut self, trade: &NormalizedTrade) -> &mut Self {
        self.cumulative += trade.result;

        let point = |result: Decimal, cumulative: Decimal| EquityPoint {
            time: trade.exit_time,
            pair: trade.pair.clone(),
            is_long: trade.is_long,
            result,
            cumulative,
        };
        self.pips
            .push(point(trade.result.pips, self.cumulative.pips));
        self.value
            .push(point(trade.result.value, self.cumulative.value));
        self
    }

    /// 현재 누적값.
    pub fn cumulative(&self) -> PipValue {
        self.cumulative
    }

    /// 곡선을 완성합니다.
    pub fn build(self) -> EquityCurves {
        EquityCurves {
            pips: EquityCurve::from_points(self.pips),
            value: EquityCurve::from_points(self.value),
        }
    }

    /// 시간순 거래 목록으로 곡선을 한 번에 만듭니다.
    pub fn from_trades<'a>(trades: impl IntoIterator<Item = &'a NormalizedTrade>) -> EquityCurves {
        let mut builder = Self::new();
        for trade in trades {
            builder.push(trade);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::trade_with_result;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cumulative_series() {
        let trades = vec![
            trade_with_result(1, dec!(100), dec!(100)),
            trade_with_result(2, dec!(-40), dec!(-26.8)),
            trade_with_result(3, dec!(25), dec!(25)),
        ];

        let curves = EquityCurveBuilder::from_trades(&trades);
        let cumulative: Vec<Decimal> = curves.pips.points().iter().map(|p| p.cumulative).collect();

        assert_eq!(cumulative, vec![dec!(100), dec!(60), dec!(85)]);
        assert_eq!(curves.value.last_cumulative(), dec!(98.2));
        assert_eq!(curves.final_equity(), PipValue::new(dec!(85), dec!(98.2)));
        assert_eq!(curves.pips.points()[1].result, dec!(-40));
    }

    #[test]
    fn test_empty_curve() {
        let trades: Vec<NormalizedTrade> = Vec::new();
        let curves = EquityCurveBuilder::from_trades(&trades);
        assert!(curves.pips.is_empty());
        assert_eq!(curves.pips.last_cumulative(), Decimal::ZERO);
        assert_eq!(curves.final_equity(), PipValue::ZERO);
    }
}
