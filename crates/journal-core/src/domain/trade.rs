//! 거래 기록.
//!
//! 이 모듈은 분석 엔진의 입력과 정규화 결과 타입을 정의합니다:
//! - `RawTrade` - 검증 계층을 통과한 원시 거래 기록 (불변)
//! - `NormalizedTrade` - 핍/가치핍 결과와 달력 키가 계산된 거래

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::metric::PipValue;

/// 거래 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// 매수 (롱)
    Buy,
    /// 매도 (숏)
    Sell,
}

impl Direction {
    /// 롱 포지션 여부.
    pub fn is_long(&self) -> bool {
        matches!(self, Direction::Buy)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy => write!(f, "Buy"),
            Direction::Sell => write!(f, "Sell"),
        }
    }
}

/// 거래 결과 (익절/손절).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// 익절 도달
    #[serde(rename = "TP", alias = "tp")]
    TakeProfit,
    /// 손절 도달
    #[serde(rename = "SL", alias = "sl")]
    StopLoss,
}

impl Outcome {
    /// 수익 거래 여부.
    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::TakeProfit)
    }
}

/// 원시 거래 기록.
///
/// 파싱/검증 계층이 심볼, 방향, 시각, 결과를 보장한 상태로 전달됩니다.
/// 가격 필드는 누락될 수 있으며, 누락 시 정규화 결과는 0으로 처리됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrade {
    /// 종목 심볼 (예: "EURUSD")
    pub pair: String,
    /// 거래 방향
    pub direction: Direction,
    /// 진입 시각 (UTC)
    pub entry_time: DateTime<Utc>,
    /// 청산 시각 (UTC)
    pub exit_time: DateTime<Utc>,
    /// 진입 가격
    #[serde(default)]
    pub entry_price: Option<Decimal>,
    /// 목표(익절) 가격
    #[serde(default)]
    pub target_price: Option<Decimal>,
    /// 손절 가격
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    /// 결과
    pub outcome: Outcome,
}

impl RawTrade {
    /// 가격 없이 새 원시 거래를 생성합니다.
    pub fn new(
        pair: impl Into<String>,
        direction: Direction,
        outcome: Outcome,
        entry_time: DateTime<Utc>,
        exit_time: DateTime<Utc>,
    ) -> Self {
        Self {
            pair: pair.into(),
            direction,
            entry_time,
            exit_time,
            entry_price: None,
            target_price: None,
            stop_price: None,
            outcome,
        }
    }

    /// 진입/목표/손절 가격을 설정합니다.
    pub fn with_prices(mut self, entry: Decimal, target: Decimal, stop: Decimal) -> Self {
        self.entry_price = Some(entry);
        self.target_price = Some(target);
        self.stop_price = Some(stop);
        self
    }
}

/// 정규화된 거래.
///
/// 생성 후에는 변경되지 않습니다. 익절/손절 양쪽 결과를 항상 모두 계산해 두므로
/// 하위 계산은 재계산 없이 어느 쪽이든 선택할 수 있습니다.
///
/// 불변 조건:
/// - `take_profit.pips >= 0`, `stop_loss.pips <= 0`
/// - 가치핍은 같은 부호를 가짐
/// - `bars_held >= 1`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTrade {
    /// 종목 심볼 (대문자 정규화)
    pub pair: String,
    /// 롱 여부
    pub is_long: bool,
    /// 수익 거래 여부
    pub is_win: bool,
    /// 진입 시각
    pub entry_time: DateTime<Utc>,
    /// 청산 시각
    pub exit_time: DateTime<Utc>,
    /// 월 키 (`YYYY-MM`, 청산 시각 기준)
    pub month_key: String,
    /// 연 키 (`YYYY`, 청산 시각 기준)
    pub year_key: String,
    /// 익절 시 결과 (핍 >= 0)
    pub take_profit: PipValue,
    /// 손절 시 결과 (핍 <= 0)
    pub stop_loss: PipValue,
    /// 실현 결과 (모든 집계가 사용하는 값)
    pub result: PipValue,
    /// 보유 봉 수 (주말 제외, 최소 1)
    pub bars_held: u32,
}

impl NormalizedTrade {
    /// 청산 연도.
    pub fn year(&self) -> i32 {
        self.exit_time.year()
    }
}

/// 청산 시각으로부터 월 키를 만듭니다.
pub fn month_key(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m").to_string()
}

/// 청산 시각으로부터 연 키를 만듭니다.
pub fn year_key(time: &DateTime<Utc>) -> String {
    time.format("%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_raw_trade_deserialize() {
        let json = r#"{
            "pair": "EURUSD",
            "direction": "Buy",
            "entry_time": "2024-03-04T08:00:00Z",
            "exit_time": "2024-03-04T16:00:00Z",
            "entry_price": "1.10000",
            "target_price": "1.10500",
            "stop_price": 1.095,
            "outcome": "TP"
        }"#;

        let trade: RawTrade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.direction, Direction::Buy);
        assert_eq!(trade.outcome, Outcome::TakeProfit);
        assert_eq!(trade.entry_price, Some(dec!(1.10000)));
        assert_eq!(trade.stop_price, Some(dec!(1.095)));
    }

    #[test]
    fn test_raw_trade_missing_prices() {
        let json = r#"{
            "pair": "GBPJPY",
            "direction": "Sell",
            "entry_time": "2024-03-04T08:00:00Z",
            "exit_time": "2024-03-05T08:00:00Z",
            "outcome": "SL"
        }"#;

        let trade: RawTrade = serde_json::from_str(json).unwrap();
        assert!(trade.entry_price.is_none());
        assert!(!trade.outcome.is_win());
        assert!(!trade.direction.is_long());
    }

    #[test]
    fn test_calendar_keys() {
        let time = Utc.with_ymd_and_hms(2024, 1, 31, 23, 0, 0).unwrap();
        assert_eq!(month_key(&time), "2024-01");
        assert_eq!(year_key(&time), "2024");
    }
}
