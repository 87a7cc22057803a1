//! # Journal Analytics
//!
//! 매매일지 성과 분석 엔진.
//!
//! 정규화된 거래 목록으로부터 다음을 계산합니다:
//! - 핍/가치핍 자산 곡선
//! - 낙폭 구간 (고점 → 저점 → 회복)
//! - 연승/연패 통계
//! - 전체/롱/숏 그룹 통계
//! - 월별/연도별 롤업
//!
//! 엔진은 입력 거래와 필터 상태의 순수 함수이며 I/O를 하지 않습니다.
//!
//! # 예제
//!
//! ```no_run
//! use journal_analytics::{AnalyticsSession, DataEvent, FilterPatch, RangeSelector};
//! use journal_core::AnalyticsConfig;
//!
//! let mut session = AnalyticsSession::new(&AnalyticsConfig::default());
//! session.handle(DataEvent::TradesChanged { trades: vec![], has_invalid_rows: false });
//! let filtered = session.apply_filter(FilterPatch::range(RangeSelector::Year(2024)));
//! println!("{}", filtered.report.groups.all.total_trades);
//! ```

pub mod aggregate;
pub mod calendar;
pub mod drawdown;
pub mod equity;
pub mod filter;
pub mod normalizer;
pub mod report;
pub mod rollup;
pub mod session;
pub mod streak;

#[cfg(test)]
mod test_support;

pub use aggregate::{Aggregator, GroupStats, SegmentedStats};
pub use calendar::WeekendWindow;
pub use drawdown::{DrawdownDetector, DrawdownEpisode, DrawdownReport, DrawdownSummary};
pub use equity::{EquityCurve, EquityCurveBuilder, EquityCurves, EquityPoint};
pub use filter::{FilterOptions, FilterPatch, FilterState, PairOption, RangeSelector};
pub use normalizer::TradeNormalizer;
pub use report::{FilteredReport, Report, ReportBuilder};
pub use rollup::{
    pair_totals, PairResult, PairTotal, PeriodBucket, PeriodResult, PeriodSummary, Rollup,
    RollupBuilder, TradeIndex,
};
pub use session::{AnalyticsSession, DataEvent};
pub use streak::{SideStreaks, StreakDetector, StreakRecord, StreakReport, StreakSide};
