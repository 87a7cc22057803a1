//! 연승/연패(Streak) 탐지.
//!
//! 시간순 거래를 한 번 스캔하여 같은 승패가 연속된 구간을 찾습니다.
//! 길이가 `min_length` 미만인 구간은 잡음으로 보고 집계에서 버립니다.
//! 버린 구간의 거래 수는 `discarded_trades`로 따로 남깁니다.

use journal_core::{percentage, NormalizedTrade, PipValue};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// 연속 구간의 승패 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakSide {
    Win,
    Loss,
}

impl StreakSide {
    fn of(trade: &NormalizedTrade) -> Self {
        if trade.is_win {
            StreakSide::Win
        } else {
            StreakSide::Loss
        }
    }
}

/// 기록된 연속 구간.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakRecord {
    pub side: StreakSide,
    pub length: usize,
    /// 리포트 거래 목록에서의 인덱스
    pub trade_indices: Vec<usize>,
    /// 구간 실현 결과 합계
    pub total: PipValue,
}

/// 한 방향(연승 또는 연패)의 집계.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideStreaks {
    /// 길이 → 발생 횟수
    pub counts: BTreeMap<usize, usize>,
    /// 길이 → 이 방향 전체 구간 중 비율 (%)
    pub percentages: BTreeMap<usize, Decimal>,
    /// 기록된 구간 (시간순)
    pub records: Vec<StreakRecord>,
    /// 가장 긴 연속 길이 (임계값 미만 구간 포함)
    pub longest: usize,
}

impl SideStreaks {
    /// 기록된 구간 수.
    pub fn total_streaks(&self) -> usize {
        self.records.len()
    }

    /// 기록된 구간에 포함된 거래 수.
    pub fn covered_trades(&self) -> usize {
        self.counts.iter().map(|(length, count)| length * count).sum()
    }

    fn record(&mut self, record: StreakRecord) {
        *self.counts.entry(record.length).or_insert(0) += 1;
        self.records.push(record);
    }

    fn finish(&mut self) {
        let total = self.records.len();
        self.percentages = self
            .counts
            .iter()
            .map(|(&length, &count)| (length, percentage(count, total)))
            .collect();
    }
}

/// 연승/연패 리포트.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakReport {
    /// 집계 최소 길이
    pub min_length: usize,
    pub win: SideStreaks,
    pub loss: SideStreaks,
    /// 최소 길이 미만이라 버린 구간의 거래 수
    pub discarded_trades: usize,
}

impl StreakReport {
    /// 방향별 집계.
    pub fn side(&self, side: StreakSide) -> &SideStreaks {
        match side {
            StreakSide::Win => &self.win,
            StreakSide::Loss => &self.loss,
        }
    }
}

/// 연속 구간 탐지기.
#[derive(Debug, Clone, Copy)]
pub struct StreakDetector {
    min_length: usize,
}

impl StreakDetector {
    /// 최소 길이는 1 이상으로 보정합니다.
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length: min_length.max(1),
        }
    }

    /// 시간순 거래 목록에서 연속 구간을 탐지합니다.
    pub fn detect(&self, trades: &[NormalizedTrade]) -> StreakReport {
        let mut report = StreakReport {
            min_length: self.min_length,
            ..StreakReport::default()
        };

        let mut run_start = 0;
        for index in 1..=trades.len() {
            let run_ended = index == trades.len()
                || StreakSide::of(&trades[index]) != StreakSide::of(&trades[run_start]);
            if run_ended {
                self.close_run(&mut report, trades, run_start..index);
                run_start = index;
            }
        }

        report.win.finish();
        report.loss.finish();

        debug!(
            win_streaks = report.win.total_streaks(),
            loss_streaks = report.loss.total_streaks(),
            discarded = report.discarded_trades,
            "Streak scan complete"
        );

        report
    }

    fn close_run(
        &self,
        report: &mut StreakReport,
        trades: &[NormalizedTrade],
        run: std::ops::Range<usize>,
    ) {
        let side = StreakSide::of(&trades[run.start]);
        let length = run.len();

        let streaks = match side {
            StreakSide::Win => &mut report.win,
            StreakSide::Loss => &mut report.loss,
        };
        streaks.longest = streaks.longest.max(length);

        if length < self.min_length {
            report.discarded_trades += length;
            return;
        }

        let total = trades[run.clone()].iter().map(|t| t.result).sum();
        streaks.record(StreakRecord {
            side,
            length,
            trade_indices: run.collect(),
            total,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::outcome_sequence;
    use rust_decimal_macros::dec;

    #[test]
    fn test_three_consecutive_wins() {
        let trades = outcome_sequence(&[true, true, true]);
        let report = StreakDetector::new(2).detect(&trades);

        assert_eq!(report.win.counts, BTreeMap::from([(3, 1)]));
        assert!(report.loss.counts.is_empty());
        assert_eq!(report.win.records[0].trade_indices, vec![0, 1, 2]);
        assert_eq!(report.win.percentages.get(&3), Some(&dec!(100)));
    }

    #[test]
    fn test_short_runs_are_discarded() {
        // W W L W W W L L L
        let trades =
            outcome_sequence(&[true, true, false, true, true, true, false, false, false]);
        let report = StreakDetector::new(2).detect(&trades);

        assert_eq!(report.win.counts, BTreeMap::from([(2, 1), (3, 1)]));
        assert_eq!(report.loss.counts, BTreeMap::from([(3, 1)]));
        assert_eq!(report.discarded_trades, 1);
        assert_eq!(report.loss.longest, 3);
        assert_eq!(report.win.percentages.get(&2), Some(&dec!(50)));
        assert_eq!(
            report.win.covered_trades() + report.loss.covered_trades() + report.discarded_trades,
            trades.len()
        );
    }

    #[test]
    fn test_longest_includes_discarded_runs() {
        let trades = outcome_sequence(&[true, false, true]);
        let report = StreakDetector::new(2).detect(&trades);

        assert_eq!(report.win.longest, 1);
        assert_eq!(report.loss.longest, 1);
        assert_eq!(report.discarded_trades, 3);
        assert!(report.win.records.is_empty());
    }

    #[test]
    fn test_run_totals() {
        let trades = outcome_sequence(&[false, false]);
        let report = StreakDetector::new(2).detect(&trades);

        let record = &report.side(StreakSide::Loss).records[0];
        assert_eq!(record.total, trades[0].result + trades[1].result);
        assert_eq!(record.side, StreakSide::Loss);
    }

    #[test]
    fn test_empty_input() {
        let report = StreakDetector::new(2).detect(&[]);
        assert_eq!(report.discarded_trades, 0);
        assert!(report.win.counts.is_empty());
        assert_eq!(report.min_length, 2);
    }
}
