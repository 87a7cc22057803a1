//! 리포트 조립.
//!
//! 정규화 → (자산 곡선, 집계, 연속 구간, 롤업) → 낙폭 순서로 파이프라인을 실행하여
//! 하나의 `Report`를 만듭니다. 모든 결과는 매번 전체를 다시 계산하며,
//! 같은 입력에는 항상 같은 리포트를 반환합니다.

use journal_core::{AnalyticsConfig, DrawdownConfig, NormalizedTrade, RawTrade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{Aggregator, SegmentedStats};
use crate::drawdown::DrawdownReport;
use crate::equity::{EquityCurveBuilder, EquityCurves};
use crate::filter::{FilterOptions, FilterState};
use crate::normalizer::TradeNormalizer;
use crate::rollup::{pair_totals, PairTotal, Rollup, RollupBuilder};
use crate::streak::{StreakDetector, StreakReport};

/// 성과 분석 리포트.
///
/// 연속 구간과 기간 버킷은 `trades`의 인덱스로 거래를 참조합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// 리포트 대상 거래 (청산 시각순)
    pub trades: Vec<NormalizedTrade>,
    /// 핍/가치핍 자산 곡선
    pub equity: EquityCurves,
    /// 종목별 합계
    pub pair_totals: Vec<PairTotal>,
    /// 월별/연도별 롤업
    pub rollup: Rollup,
    /// 낙폭 요약과 구간
    pub drawdown: DrawdownReport,
    /// 연승/연패
    pub streaks: StreakReport,
    /// 전체/롱/숏 통계
    pub groups: SegmentedStats,
}

impl Report {
    /// 리포트 거래 수.
    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    /// 인덱스 목록을 거래 참조로 풉니다.
    pub fn resolve<'a>(
        &'a self,
        indices: &'a [usize],
    ) -> impl Iterator<Item = &'a NormalizedTrade> + 'a {
        indices.iter().filter_map(|&i| self.trades.get(i))
    }
}

/// 필터가 적용된 리포트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredReport {
    pub report: Report,
    /// 적용된 필터
    pub filter: FilterState,
    /// 전체 모집단 기준 선택지
    pub options: FilterOptions,
}

/// 리포트 빌더.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    normalizer: TradeNormalizer,
    drawdown: DrawdownConfig,
    streak_min_length: usize,
    monthly_target_pips: Decimal,
}

impl ReportBuilder {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            normalizer: TradeNormalizer::new(config),
            drawdown: config.drawdown.clone(),
            streak_min_length: config.streak.min_length,
            monthly_target_pips: config.rollup.monthly_target_pips,
        }
    }

    pub fn normalizer(&self) -> &TradeNormalizer {
        &self.normalizer
    }

    /// 원시 거래로부터 리포트를 만듭니다.
    pub fn build(&self, trades: &[RawTrade]) -> Report {
        self.build_normalized(self.normalizer.normalize_all(trades))
    }

    /// 정규화된 거래로부터 리포트를 만듭니다.
    pub fn build_normalized(&self, mut trades: Vec<NormalizedTrade>) -> Report {
        trades.sort_by_key(|t| t.exit_time);

        let equity = EquityCurveBuilder::from_trades(&trades);
        let drawdown = DrawdownReport::detect(&equity, &self.drawdown);
        let streaks = StreakDetector::new(self.streak_min_length).detect(&trades);
        let groups = Aggregator::aggregate(&trades);
        let rollup = RollupBuilder::new(self.monthly_target_pips).build(&trades);
        let pair_totals = pair_totals(&trades);

        debug!(
            trades = trades.len(),
            months = rollup.months.len(),
            drawdown_episodes = drawdown.pips.episode_count,
            "Report built"
        );

        Report {
            trades,
            equity,
            pair_totals,
            rollup,
            drawdown,
            streaks,
            groups,
        }
    }

    /// 필터를 적용해 리포트를 만듭니다.
    pub fn build_filtered(
        &self,
        population: &[NormalizedTrade],
        filter: &FilterState,
    ) -> FilteredReport {
        let _span =
            journal_core::report_span!("build_filtered", population.len(), filter.range).entered();

        let report = self.build_normalized(filter.select(population));
        FilteredReport {
            report,
            filter: filter.clone(),
            options: FilterOptions::from_trades(population),
        }
    }
}
