//! 리포트 불변 조건 속성 테스트

use chrono::{DateTime, Duration, TimeZone, Utc};
use journal_analytics::{FilterState, Report, ReportBuilder};
use journal_core::{AnalyticsConfig, Direction, Outcome, PipScale, RawTrade};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeSet;

const PAIRS: [(&str, Decimal); 4] = [
    ("EURUSD", dec!(1.10000)),
    ("GBPUSD", dec!(1.25000)),
    ("USDJPY", dec!(150.000)),
    ("XAUUSD", dec!(2000.00)),
];

/// (종목, 롱 여부, 익절 여부, 익절 핍, 손절 핍, 보유 시간)
type TradeParams = (usize, bool, bool, u32, u32, i64);

fn trade_params() -> impl Strategy<Value = Vec<TradeParams>> {
    prop::collection::vec(
        (0..PAIRS.len(), any::<bool>(), any::<bool>(), 1u32..500, 1u32..500, 1i64..96),
        0..60,
    )
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap()
}

/// 청산 시각이 엄격히 증가하는 원시 거래 목록.
fn raw_trades(params: &[TradeParams]) -> Vec<RawTrade> {
    params
        .iter()
        .enumerate()
        .map(|(i, &(pair_index, is_long, is_win, tp_pips, sl_pips, hold_hours))| {
            let (pair, entry) = PAIRS[pair_index];
            let factor = PipScale::for_symbol(pair, "XAUUSD").factor();
            let tp = Decimal::from(tp_pips) / factor;
            let sl = Decimal::from(sl_pips) / factor;

            let (direction, target, stop) = if is_long {
                (Direction::Buy, entry + tp, entry - sl)
            } else {
                (Direction::Sell, entry - tp, entry + sl)
            };
            let outcome = if is_win {
                Outcome::TakeProfit
            } else {
                Outcome::StopLoss
            };

            let entry_time = base_time() + Duration::hours(97 * i as i64);
            RawTrade::new(
                pair,
                direction,
                outcome,
                entry_time,
                entry_time + Duration::hours(hold_hours),
            )
            .with_prices(entry, target, stop)
        })
        .collect()
}

fn build(params: &[TradeParams]) -> Report {
    ReportBuilder::new(&AnalyticsConfig::default()).build(&raw_trades(params))
}

proptest! {
    #[test]
    fn prop_take_profit_and_stop_loss_signs(params in trade_params()) {
        let report = build(&params);
        for trade in &report.trades {
            prop_assert!(trade.take_profit.pips >= Decimal::ZERO);
            prop_assert!(trade.take_profit.value >= Decimal::ZERO);
            prop_assert!(trade.stop_loss.pips <= Decimal::ZERO);
            prop_assert!(trade.stop_loss.value <= Decimal::ZERO);
            prop_assert!(trade.bars_held >= 1);
        }
    }

    #[test]
    fn prop_equity_ends_at_sum_of_results(params in trade_params()) {
        let report = build(&params);
        let pips: Decimal = report.trades.iter().map(|t| t.result.pips).sum();
        let value: Decimal = report.trades.iter().map(|t| t.result.value).sum();

        prop_assert_eq!(report.equity.pips.last_cumulative(), pips);
        prop_assert_eq!(report.equity.value.last_cumulative(), value);
        prop_assert_eq!(report.equity.pips.len(), report.trades.len());
    }

    #[test]
    fn prop_streaks_cover_every_trade(params in trade_params()) {
        let report = build(&params);
        let streaks = &report.streaks;

        let covered = streaks.win.covered_trades()
            + streaks.loss.covered_trades()
            + streaks.discarded_trades;
        prop_assert_eq!(covered, report.trades.len());
    }

    #[test]
    fn prop_drawdown_episodes_are_ordered(params in trade_params()) {
        let report = build(&params);
        for summary in [&report.drawdown.pips, &report.drawdown.value] {
            for episode in &summary.episodes {
                prop_assert!(episode.peak_time < episode.trough_time);
                if let Some(recovery) = episode.recovery_time {
                    prop_assert!(episode.trough_time <= recovery);
                }
                prop_assert_eq!(
                    episode.absolute_drawdown,
                    episode.peak_equity - episode.trough_equity
                );
                prop_assert!(episode.absolute_drawdown >= Decimal::ZERO);
            }
            prop_assert!(summary.open_episodes <= 1);
        }
    }

    #[test]
    fn prop_long_and_short_partition_all(params in trade_params()) {
        let groups = build(&params).groups;
        prop_assert_eq!(
            groups.all.total_trades,
            groups.long.total_trades + groups.short.total_trades
        );
        prop_assert_eq!(
            groups.all.net_return,
            groups.long.net_return + groups.short.net_return
        );
    }

    #[test]
    fn prop_build_is_idempotent(params in trade_params()) {
        let builder = ReportBuilder::new(&AnalyticsConfig::default());
        let trades = raw_trades(&params);
        prop_assert_eq!(builder.build(&trades), builder.build(&trades));
    }

    #[test]
    fn prop_narrowing_pairs_never_adds_trades(
        params in trade_params(),
        kept in prop::collection::btree_set(0..PAIRS.len(), 1..PAIRS.len()),
    ) {
        let builder = ReportBuilder::new(&AnalyticsConfig::default());
        let population = builder.normalizer().normalize_all(&raw_trades(&params));

        let wide = FilterState::default();
        let narrow = FilterState {
            included_pairs: kept
                .iter()
                .map(|&i| PAIRS[i].0.to_string())
                .collect::<BTreeSet<_>>(),
            ..FilterState::default()
        };

        let wide_total = builder.build_filtered(&population, &wide).report.groups.all.total_trades;
        let narrow_total = builder.build_filtered(&population, &narrow).report.groups.all.total_trades;
        prop_assert!(narrow_total <= wide_total);
    }
}
