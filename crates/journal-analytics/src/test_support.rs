//! 단위 테스트용 거래 생성기.

use chrono::{DateTime, Duration, TimeZone, Utc};
use journal_core::{month_key, year_key, NormalizedTrade, PipValue};
use rust_decimal::Decimal;

/// 정규화된 거래 빌더.
pub struct TradeSpec {
    pair: String,
    is_long: bool,
    is_win: Option<bool>,
    exit_time: DateTime<Utc>,
    result: PipValue,
    bars_held: u32,
}

impl TradeSpec {
    pub fn new(pair: &str) -> Self {
        Self {
            pair: pair.to_string(),
            is_long: true,
            is_win: None,
            exit_time: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            result: PipValue::ZERO,
            bars_held: 1,
        }
    }

    pub fn long(mut self, is_long: bool) -> Self {
        self.is_long = is_long;
        self
    }

    /// 지정하지 않으면 결과 핍 부호로 결정합니다.
    pub fn win(mut self, is_win: bool) -> Self {
        self.is_win = Some(is_win);
        self
    }

    pub fn on(mut self, year: i32, month: u32, day: u32) -> Self {
        self.exit_time = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
        self
    }

    pub fn at(mut self, exit_time: DateTime<Utc>) -> Self {
        self.exit_time = exit_time;
        self
    }

    pub fn pips(mut self, pips: Decimal) -> Self {
        self.result = PipValue::new(pips, pips);
        self
    }

    pub fn result(mut self, pips: Decimal, value: Decimal) -> Self {
        self.result = PipValue::new(pips, value);
        self
    }

    pub fn bars(mut self, bars: u32) -> Self {
        self.bars_held = bars;
        self
    }

    pub fn build(self) -> NormalizedTrade {
        let is_win = self.is_win.unwrap_or(self.result.pips > Decimal::ZERO);
        let (take_profit, stop_loss) = if is_win {
            (self.result, -self.result)
        } else {
            (-self.result, self.result)
        };

        NormalizedTrade {
            pair: self.pair,
            is_long: self.is_long,
            is_win,
            entry_time: self.exit_time - Duration::hours(4 * i64::from(self.bars_held)),
            exit_time: self.exit_time,
            month_key: month_key(&self.exit_time),
            year_key: year_key(&self.exit_time),
            take_profit,
            stop_loss,
            result: self.result,
            bars_held: self.bars_held,
        }
    }
}

/// 2024-01-01 00시부터 `hour`시간 뒤 청산한 EURUSD 롱 거래.
pub fn trade_with_result(hour: u32, pips: Decimal, value: Decimal) -> NormalizedTrade {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    TradeSpec::new("EURUSD")
        .at(start + Duration::hours(i64::from(hour)))
        .result(pips, value)
        .build()
}

/// 승패 순서대로 한 시간 간격의 거래를 만듭니다. 승리 +10, 패배 -5.
pub fn outcome_sequence(wins: &[bool]) -> Vec<NormalizedTrade> {
    wins.iter()
        .enumerate()
        .map(|(i, &win)| {
            let pips = if win { Decimal::from(10) } else { Decimal::from(-5) };
            trade_with_result(i as u32 + 1, pips, pips)
        })
        .collect()
}
