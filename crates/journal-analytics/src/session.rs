//! 분석 세션.
//!
//! 원시 데이터를 소유한 쪽의 "데이터 변경" 이벤트와 표시 계층의 필터 변경 요청을
//! 받아 리포트를 다시 만듭니다. 두 진입점 모두 동기 함수 호출입니다.

use journal_core::{AnalyticsConfig, NormalizedTrade, RawTrade};
use tracing::{info, warn};

use crate::filter::{FilterOptions, FilterPatch, FilterState};
use crate::report::{FilteredReport, ReportBuilder};

/// 데이터 소유자가 보내는 이벤트.
#[derive(Debug, Clone, PartialEq)]
pub enum DataEvent {
    /// 거래 모집단이 바뀜
    TradesChanged {
        trades: Vec<RawTrade>,
        /// 검증에 실패한 행이 남아 있는지 여부
        has_invalid_rows: bool,
    },
}

/// 현재 모집단과 필터 상태를 보관하는 세션.
#[derive(Debug, Clone)]
pub struct AnalyticsSession {
    builder: ReportBuilder,
    population: Vec<NormalizedTrade>,
    filter: FilterState,
}

impl AnalyticsSession {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            builder: ReportBuilder::new(config),
            population: Vec::new(),
            filter: FilterState::default(),
        }
    }

    /// 데이터 이벤트를 처리합니다.
    ///
    /// 잘못된 행이 표시된 데이터는 받지 않고 이전 모집단을 유지합니다.
    /// 모집단을 교체했으면 `true`를 반환합니다.
    pub fn handle(&mut self, event: DataEvent) -> bool {
        match event {
            DataEvent::TradesChanged {
                trades,
                has_invalid_rows,
            } => {
                if has_invalid_rows {
                    warn!(
                        incoming = trades.len(),
                        kept = self.population.len(),
                        "Trade data has invalid rows, keeping previous population"
                    );
                    return false;
                }

                self.population = self.builder.normalizer().normalize_all(&trades);
                info!(trades = self.population.len(), "Trade population replaced");
                true
            }
        }
    }

    /// 필터를 부분 갱신하고 리포트를 다시 만듭니다.
    pub fn apply_filter(&mut self, patch: FilterPatch) -> FilteredReport {
        self.filter.apply(patch);
        self.report()
    }

    /// 현재 필터로 리포트를 만듭니다.
    pub fn report(&self) -> FilteredReport {
        self.builder.build_filtered(&self.population, &self.filter)
    }

    /// 전체 모집단 기준 필터 선택지.
    pub fn options(&self) -> FilterOptions {
        FilterOptions::from_trades(&self.population)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// 정규화된 전체 모집단.
    pub fn population(&self) -> &[NormalizedTrade] {
        &self.population
    }
}
