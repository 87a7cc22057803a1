//! 필터 상태와 거래 선택.
//!
//! 필터는 기간 선택자와 포함 종목 집합으로 구성됩니다.
//! 필터 아래의 계산 단계들은 필터를 알지 못하며, 선택된 부분집합만 받습니다.

use chrono::Duration;
use journal_core::{normalize_symbol, JournalError, JournalResult, NormalizedTrade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::rollup::TradeIndex;

/// 기간 선택자.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RangeSelector {
    /// 전체 기간
    #[default]
    AllTime,
    /// 특정 연도 (청산 시각 기준)
    Year(i32),
    /// 전체 모집단의 최신 청산 시각부터 거슬러 N일
    TrailingDays(u32),
}

impl fmt::Display for RangeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeSelector::AllTime => write!(f, "all"),
            RangeSelector::Year(year) => write!(f, "{}", year),
            RangeSelector::TrailingDays(days) => write!(f, "{}d", days),
        }
    }
}

impl FromStr for RangeSelector {
    type Err = JournalError;

    /// `all`, `2024`, `90d`, `last-180` 형식을 지원합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let invalid = || JournalError::InvalidInput(format!("알 수 없는 기간 선택자: {}", s));

        if s == "all" || s == "all-time" {
            return Ok(RangeSelector::AllTime);
        }

        if let Some(days) = s
            .strip_suffix('d')
            .or_else(|| s.strip_prefix("last-"))
        {
            let days: u32 = days.parse().map_err(|_| invalid())?;
            if days == 0 {
                return Err(invalid());
            }
            return Ok(RangeSelector::TrailingDays(days));
        }

        if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
            return s.parse().map(RangeSelector::Year).map_err(|_| invalid());
        }

        Err(invalid())
    }
}

/// 필터 상태 부분 갱신.
///
/// `None`인 필드는 현재 값을 유지합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPatch {
    #[serde(default)]
    pub range: Option<RangeSelector>,
    #[serde(default)]
    pub included_pairs: Option<BTreeSet<String>>,
}

impl FilterPatch {
    pub fn range(range: RangeSelector) -> Self {
        Self {
            range: Some(range),
            ..Self::default()
        }
    }

    pub fn pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            included_pairs: Some(pairs.into_iter().map(|p| p.as_ref().to_string()).collect()),
            ..Self::default()
        }
    }
}

/// 현재 필터 상태.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub range: RangeSelector,
    /// 포함할 종목 (비어 있으면 전체)
    pub included_pairs: BTreeSet<String>,
}

impl FilterState {
    /// 부분 갱신을 적용합니다. 종목 심볼은 대문자로 정규화합니다.
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(range) = patch.range {
            self.range = range;
        }
        if let Some(pairs) = patch.included_pairs {
            self.included_pairs = pairs
                .iter()
                .map(|p| normalize_symbol(p))
                .filter(|p| !p.is_empty())
                .collect();
        }
    }

    /// 거래가 종목 조건을 만족하는지 확인합니다.
    fn includes_pair(&self, pair: &str) -> bool {
        self.included_pairs.is_empty() || self.included_pairs.contains(pair)
    }

    /// 전체 모집단에서 필터를 통과한 거래를 순서대로 복사합니다.
    pub fn select(&self, trades: &[NormalizedTrade]) -> Vec<NormalizedTrade> {
        let earliest_exit = match self.range {
            RangeSelector::TrailingDays(days) => trades
                .iter()
                .map(|t| t.exit_time)
                .max()
                .map(|latest| latest - Duration::days(i64::from(days))),
            _ => None,
        };

        trades
            .iter()
            .filter(|t| match self.range {
                RangeSelector::AllTime => true,
                RangeSelector::Year(year) => t.year() == year,
                RangeSelector::TrailingDays(_) => {
                    earliest_exit.is_some_and(|earliest| t.exit_time >= earliest)
                }
            })
            .filter(|t| self.includes_pair(&t.pair))
            .cloned()
            .collect()
    }
}

/// 선택 가능한 종목과 거래 수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairOption {
    pub pair: String,
    pub trade_count: usize,
}

/// 전체 모집단 기준의 필터 선택지.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// 심볼 순
    pub pairs: Vec<PairOption>,
    /// 오름차순
    pub years: Vec<i32>,
}

impl FilterOptions {
    pub fn from_trades(trades: &[NormalizedTrade]) -> Self {
        let pairs = TradeIndex::by_pair(trades)
            .iter()
            .map(|(pair, indices)| PairOption {
                pair: pair.to_string(),
                trade_count: indices.len(),
            })
            .collect();

        let years: BTreeSet<i32> = trades.iter().map(NormalizedTrade::year).collect();

        Self {
            pairs,
            years: years.into_iter().collect(),
        }
    }
}
