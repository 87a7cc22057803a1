//! 그룹 통계 집계.
//!
//! 한 번의 스캔으로 전체/롱/숏 세 그룹의 누산기를 동시에 갱신하고,
//! 스캔이 끝나면 파생 지표를 계산합니다.
//!
//! 모든 금액 지표는 핍/가치핍 쌍(`PipValue`)으로 표현됩니다.
//! 분모가 0인 경우는 고정 대체값으로 처리하므로 결과에 무한대가 나오지 않습니다.

use journal_core::{
    decimal_sqrt, div_or_zero, guarded_denominator, percentage, Metric, MetricKey,
    NormalizedTrade, PipValue,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 한 그룹의 거래 통계.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    /// 총 거래 횟수
    pub total_trades: usize,
    /// 수익 거래 횟수
    pub winning_trades: usize,
    /// 손실 거래 횟수
    pub losing_trades: usize,
    /// 승률 (백분율, 예: 65.5 = 65.5%)
    pub win_rate_pct: Decimal,
    /// 총 수익 (수익 거래만, 0 이상)
    pub gross_profit: PipValue,
    /// 총 손실 (손실 거래만, 0 이하)
    pub gross_loss: PipValue,
    /// 순손익
    pub net_return: PipValue,
    pub avg_return: PipValue,
    pub median_return: PipValue,
    pub stdev_return: PipValue,
    /// 평균 수익 (수익 거래만)
    pub avg_win: PipValue,
    /// 평균 손실 (손실 거래만, 0 이하)
    pub avg_loss: PipValue,
    /// 최대 수익 거래
    pub max_win: PipValue,
    /// 최대 손실 거래 (가장 작은 값)
    pub max_loss: PipValue,
    /// Profit Factor (총수익 / |총손실|, 손실 없으면 분모 1)
    pub profit_factor: PipValue,
    /// 평균 손익비 (평균수익 / |평균손실|, 손실 없으면 분모 1)
    pub avg_risk_reward: PipValue,
    /// 기대값 (승률×평균수익 + 패률×평균손실)
    pub expectancy: PipValue,
    /// 평균 보유 봉 수
    pub avg_bars_held: Decimal,
    /// 최대 보유 봉 수
    pub max_bars_held: u32,
}

impl GroupStats {
    /// 거래 목록으로부터 통계를 계산합니다.
    pub fn from_trades<'a>(trades: impl IntoIterator<Item = &'a NormalizedTrade>) -> Self {
        let mut acc = Accumulator::default();
        for trade in trades {
            acc.push(trade);
        }
        acc.finish()
    }

    /// 표시 계층을 위한 (지표, 값) 목록.
    pub fn metrics(&self) -> Vec<(MetricKey, Metric)> {
        vec![
            (MetricKey::TotalTrades, Metric::Count(self.total_trades)),
            (MetricKey::WinningTrades, Metric::Count(self.winning_trades)),
            (MetricKey::LosingTrades, Metric::Count(self.losing_trades)),
            (MetricKey::WinRate, Metric::Percent(self.win_rate_pct)),
            (MetricKey::GrossProfit, Metric::Currency(self.gross_profit)),
            (MetricKey::GrossLoss, Metric::Currency(self.gross_loss)),
            (MetricKey::NetReturn, Metric::Currency(self.net_return)),
            (MetricKey::AvgReturn, Metric::Currency(self.avg_return)),
            (MetricKey::MedianReturn, Metric::Currency(self.median_return)),
            (MetricKey::StdevReturn, Metric::Currency(self.stdev_return)),
            (MetricKey::AvgWin, Metric::Currency(self.avg_win)),
            (MetricKey::AvgLoss, Metric::Currency(self.avg_loss)),
            (MetricKey::MaxWin, Metric::Currency(self.max_win)),
            (MetricKey::MaxLoss, Metric::Currency(self.max_loss)),
            (MetricKey::ProfitFactor, Metric::Ratio(self.profit_factor)),
            (MetricKey::AvgRiskReward, Metric::Ratio(self.avg_risk_reward)),
            (MetricKey::Expectancy, Metric::Currency(self.expectancy)),
            (MetricKey::AvgBarsHeld, Metric::Duration(self.avg_bars_held)),
            (
                MetricKey::MaxBarsHeld,
                Metric::Duration(Decimal::from(self.max_bars_held)),
            ),
        ]
    }
}

/// 전체/롱/숏 세그먼트 통계.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentedStats {
    pub all: GroupStats,
    pub long: GroupStats,
    pub short: GroupStats,
}

/// 세그먼트 집계기.
pub struct Aggregator;

impl Aggregator {
    /// 한 번의 스캔으로 세 그룹을 집계합니다.
    pub fn aggregate(trades: &[NormalizedTrade]) -> SegmentedStats {
        let mut all = Accumulator::default();
        let mut long = Accumulator::default();
        let mut short = Accumulator::default();

        for trade in trades {
            all.push(trade);
            if trade.is_long {
                long.push(trade);
            } else {
                short.push(trade);
            }
        }

        SegmentedStats {
            all: all.finish(),
            long: long.finish(),
            short: short.finish(),
        }
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    results: Vec<PipValue>,
    wins: usize,
    losses: usize,
    gross_profit: PipValue,
    gross_loss: PipValue,
    sum: PipValue,
    sum_sq: PipValue,
    max_win: Option<PipValue>,
    max_loss: Option<PipValue>,
    bars_sum: u64,
    bars_max: u32,
}

impl Accumulator {
    fn push(&mut self, trade: &NormalizedTrade) {
        let result = trade.result;

        self.results.push(result);
        self.sum += result;
        self.sum_sq += result.map(|v| v * v);

        if trade.is_win {
            self.wins += 1;
            self.gross_profit += result;
            self.max_win = Some(self.max_win.map_or(result, |m| m.max(result)));
        } else {
            self.losses += 1;
            self.gross_loss += result;
            self.max_loss = Some(self.max_loss.map_or(result, |m| m.min(result)));
        }

        self.bars_sum += u64::from(trade.bars_held);
        self.bars_max = self.bars_max.max(trade.bars_held);
    }

    fn finish(self) -> GroupStats {
        let total = self.results.len();
        if total == 0 {
            return GroupStats::default();
        }

        let n = Decimal::from(total);
        let avg_return = self.sum.map(|v| v / n);
        let variance = self
            .sum_sq
            .map(|v| v / n)
            .zip_with(avg_return, |mean_sq, mean| mean_sq - mean * mean);
        let stdev_return = variance.map(|v| decimal_sqrt(v.max(Decimal::ZERO)));

        let avg_win = self
            .gross_profit
            .map(|v| div_or_zero(v, Decimal::from(self.wins)));
        let avg_loss = self
            .gross_loss
            .map(|v| div_or_zero(v, Decimal::from(self.losses)));

        let win_rate_pct = percentage(self.wins, total);
        let win_fraction = win_rate_pct / dec!(100);
        let expectancy = avg_win.zip_with(avg_loss, |win, loss| {
            win_fraction * win + (Decimal::ONE - win_fraction) * loss
        });

        GroupStats {
            total_trades: total,
            winning_trades: self.wins,
            losing_trades: self.losses,
            win_rate_pct,
            gross_profit: self.gross_profit,
            gross_loss: self.gross_loss,
            net_return: self.sum,
            avg_return,
            median_return: median(&self.results),
            stdev_return,
            avg_win,
            avg_loss,
            max_win: self.max_win.unwrap_or_default(),
            max_loss: self.max_loss.unwrap_or_default(),
            profit_factor: self
                .gross_profit
                .zip_with(self.gross_loss, |profit, loss| profit / guarded_denominator(loss)),
            avg_risk_reward: avg_win
                .zip_with(avg_loss, |win, loss| win / guarded_denominator(loss)),
            expectancy,
            avg_bars_held: Decimal::from(self.bars_sum) / n,
            max_bars_held: self.bars_max,
        }
    }
}

/// 공간별로 정렬한 중앙값. 짝수 개면 가운데 두 값의 평균.
fn median(results: &[PipValue]) -> PipValue {
    let space_median = |mut values: Vec<Decimal>| -> Decimal {
        if values.is_empty() {
            return Decimal::ZERO;
        }
        values.sort();
        let mid = values.len() / 2;
        if values.len() % 2 == 0 {
            (values[mid - 1] + values[mid]) / Decimal::TWO
        } else {
            values[mid]
        }
    };

    PipValue::new(
        space_median(results.iter().map(|r| r.pips).collect()),
        space_median(results.iter().map(|r| r.value).collect()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{trade_with_result, TradeSpec};

    fn pv(pips: Decimal) -> PipValue {
        PipValue::new(pips, pips)
    }

    #[test]
    fn test_all_winning_trades_use_guarded_denominator() {
        let trades = vec![
            trade_with_result(1, dec!(50), dec!(50)),
            trade_with_result(2, dec!(30), dec!(30)),
        ];
        let stats = GroupStats::from_trades(&trades);

        assert_eq!(stats.losing_trades, 0);
        assert_eq!(stats.gross_loss, PipValue::ZERO);
        assert_eq!(stats.profit_factor, pv(dec!(80)));
        assert_eq!(stats.avg_risk_reward, pv(dec!(40)));
        assert_eq!(stats.win_rate_pct, dec!(100));
        assert_eq!(stats.expectancy, pv(dec!(40)));
    }

    #[test]
    fn test_mixed_trades() {
        let trades = vec![
            trade_with_result(1, dec!(100), dec!(100)),
            trade_with_result(2, dec!(-50), dec!(-50)),
            trade_with_result(3, dec!(60), dec!(60)),
            trade_with_result(4, dec!(-30), dec!(-30)),
        ];
        let stats = GroupStats::from_trades(&trades);

        assert_eq!(stats.total_trades, 4);
        assert_eq!(stats.win_rate_pct, dec!(50));
        assert_eq!(stats.gross_profit, pv(dec!(160)));
        assert_eq!(stats.gross_loss, pv(dec!(-80)));
        assert_eq!(stats.net_return, pv(dec!(80)));
        assert_eq!(stats.avg_return, pv(dec!(20)));
        // 정렬: -50, -30, 60, 100
        assert_eq!(stats.median_return, pv(dec!(15)));
        assert_eq!(stats.avg_win, pv(dec!(80)));
        assert_eq!(stats.avg_loss, pv(dec!(-40)));
        assert_eq!(stats.max_win, pv(dec!(100)));
        assert_eq!(stats.max_loss, pv(dec!(-50)));
        assert_eq!(stats.profit_factor, pv(dec!(2)));
        assert_eq!(stats.avg_risk_reward, pv(dec!(2)));
        assert_eq!(stats.expectancy, pv(dec!(20)));
    }

    #[test]
    fn test_stdev() {
        // 2, 4, 6, 8: 평균 5, 분산 5
        let trades: Vec<_> = [2, 4, 6, 8]
            .iter()
            .enumerate()
            .map(|(i, &v)| trade_with_result(i as u32 + 1, Decimal::from(v), Decimal::from(v)))
            .collect();
        let stats = GroupStats::from_trades(&trades);

        let stdev = stats.stdev_return.pips;
        assert!((stdev - decimal_sqrt(dec!(5))).abs() < dec!(0.0000001));
        assert_eq!(stats.median_return, pv(dec!(5)));
    }

    #[test]
    fn test_segmentation() {
        let trades = vec![
            TradeSpec::new("EURUSD").long(true).win(true).pips(dec!(40)).build(),
            TradeSpec::new("EURUSD").long(false).win(false).pips(dec!(-20)).build(),
            TradeSpec::new("GBPUSD").long(false).win(true).pips(dec!(10)).bars(5).build(),
        ];
        let stats = Aggregator::aggregate(&trades);

        assert_eq!(stats.all.total_trades, 3);
        assert_eq!(stats.long.total_trades, 1);
        assert_eq!(stats.short.total_trades, 2);
        assert_eq!(stats.short.net_return.pips, dec!(-10));
        assert_eq!(stats.all.max_bars_held, 5);
    }

    #[test]
    fn test_empty_group_is_zeroed() {
        let stats = Aggregator::aggregate(&[]);
        assert_eq!(stats.all, GroupStats::default());
        assert_eq!(stats.all.profit_factor, PipValue::ZERO);
    }

    #[test]
    fn test_metrics_rows() {
        let stats = GroupStats::from_trades(&[trade_with_result(1, dec!(10), dec!(10))]);
        let rows = stats.metrics();

        assert_eq!(rows.len(), 19);
        assert_eq!(rows[0], (MetricKey::TotalTrades, Metric::Count(1)));
        assert!(rows
            .iter()
            .any(|(key, metric)| *key == MetricKey::ProfitFactor
                && matches!(metric, Metric::Ratio(_))));
    }
}
