//! 거래 정규화.
//!
//! 원시 거래를 핍/가치핍 결과, 방향/승패 플래그, 보유 봉 수, 달력 키가 계산된
//! `NormalizedTrade`로 변환합니다.
//!
//! 필드가 누락된 거래는 오류 대신 0 결과로 처리하여 한 행 때문에 전체 배치가
//! 중단되지 않도록 합니다.

use chrono::{DateTime, Utc};
use journal_core::{
    month_key, non_positive, normalize_symbol, round_half_up, year_key, AnalyticsConfig,
    InstrumentTable, NormalizedTrade, PipValue, RawTrade,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calendar::WeekendWindow;

const SECONDS_PER_HOUR: i64 = 3600;

/// 원시 거래 정규화기.
#[derive(Debug, Clone)]
pub struct TradeNormalizer {
    instruments: InstrumentTable,
    weekend: WeekendWindow,
    bar_hours: u32,
}

impl TradeNormalizer {
    /// 설정으로부터 정규화기를 생성합니다.
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            instruments: config.instruments.clone(),
            weekend: WeekendWindow::from_session(&config.session),
            bar_hours: config.session.bar_hours.max(1),
        }
    }

    /// 모든 거래를 정규화하고 청산 시각 오름차순으로 정렬합니다.
    ///
    /// 청산 시각이 같은 거래는 입력 순서를 유지합니다.
    pub fn normalize_all(&self, trades: &[RawTrade]) -> Vec<NormalizedTrade> {
        let mut normalized: Vec<NormalizedTrade> =
            trades.iter().map(|trade| self.normalize(trade)).collect();
        normalized.sort_by_key(|trade| trade.exit_time);

        debug!(trades = normalized.len(), "Trades normalized");
        normalized
    }

    /// 단일 거래를 정규화합니다.
    pub fn normalize(&self, raw: &RawTrade) -> NormalizedTrade {
        let pair = normalize_symbol(&raw.pair);
        let is_long = raw.direction.is_long();
        let is_win = raw.outcome.is_win();
        let (take_profit, stop_loss) = self.outcomes(&pair, raw);

        NormalizedTrade {
            month_key: month_key(&raw.exit_time),
            year_key: year_key(&raw.exit_time),
            is_long,
            is_win,
            entry_time: raw.entry_time,
            exit_time: raw.exit_time,
            take_profit,
            stop_loss,
            result: if is_win { take_profit } else { stop_loss },
            bars_held: self.bars_held(raw.entry_time, raw.exit_time),
            pair,
        }
    }

    /// 익절/손절 양쪽의 핍/가치핍 결과를 계산합니다.
    fn outcomes(&self, pair: &str, raw: &RawTrade) -> (PipValue, PipValue) {
        let (Some(entry), Some(target), Some(stop)) =
            (raw.entry_price, raw.target_price, raw.stop_price)
        else {
            warn!(
                pair = %pair,
                exit_time = %raw.exit_time,
                "Trade is missing prices, result set to zero"
            );
            return (PipValue::ZERO, PipValue::ZERO);
        };

        let (target_diff, stop_diff) = if raw.direction.is_long() {
            (target - entry, stop - entry)
        } else {
            (entry - target, entry - stop)
        };

        let factor = self.instruments.pip_scale(pair).factor();
        let multiplier = self.instruments.multiplier(pair).unwrap_or_else(|| {
            warn!(pair = %pair, "Unknown instrument, value multiplier set to zero");
            Decimal::ZERO
        });

        let tp_pips = (target_diff * factor).abs();
        let sl_pips = non_positive(stop_diff * factor);

        (
            PipValue::new(tp_pips, tp_pips * multiplier),
            PipValue::new(sl_pips, non_positive(sl_pips * multiplier)),
        )
    }

    /// 주말 구간을 제외한 보유 봉 수 (최소 1).
    pub fn bars_held(&self, entry: DateTime<Utc>, exit: DateTime<Utc>) -> u32 {
        let total = exit.signed_duration_since(entry).num_seconds();
        let weekend = self.weekend.overlap(entry, exit).num_seconds();
        let trading_seconds = (total - weekend).max(0);

        let bar_seconds = Decimal::from(i64::from(self.bar_hours) * SECONDS_PER_HOUR);
        let bars = round_half_up(Decimal::from(trading_seconds) / bar_seconds);

        bars.to_u32().unwrap_or(u32::MAX).max(1)
    }
}
