//! 월별/연도별 롤업.
//!
//! 거래를 복사하지 않고 키 → 거래 인덱스 목록(`TradeIndex`)으로 묶은 뒤,
//! 각 구간의 순손익, 승률, 최고/최저 종목을 계산합니다.
//!
//! 최고/최저 종목은 구간 안에서 종목별 자산 곡선을 만들어 최종 누적 핍으로 비교합니다.

use journal_core::{div_or_zero, percentage, NormalizedTrade, PipValue};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::equity::EquityCurveBuilder;

/// 키 → 거래 인덱스 목록.
///
/// 인덱스는 원본 거래 배열의 위치이며, 각 목록은 원본 순서(시간순)를 유지합니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeIndex {
    buckets: BTreeMap<String, Vec<usize>>,
}

impl TradeIndex {
    /// 키 함수로 인덱스를 만듭니다.
    pub fn build<'a, I, F>(trades: I, key: F) -> Self
    where
        I: IntoIterator<Item = (usize, &'a NormalizedTrade)>,
        F: Fn(&NormalizedTrade) -> &str,
    {
        let mut buckets: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (index, trade) in trades {
            let key = key(trade);
            match buckets.get_mut(key) {
                Some(indices) => indices.push(index),
                None => {
                    buckets.insert(key.to_string(), vec![index]);
                }
            }
        }
        Self { buckets }
    }

    pub fn by_month(trades: &[NormalizedTrade]) -> Self {
        Self::build(trades.iter().enumerate(), |t| t.month_key.as_str())
    }

    pub fn by_year(trades: &[NormalizedTrade]) -> Self {
        Self::build(trades.iter().enumerate(), |t| t.year_key.as_str())
    }

    pub fn by_pair(trades: &[NormalizedTrade]) -> Self {
        Self::build(trades.iter().enumerate(), |t| t.pair.as_str())
    }

    /// 키 순서로 (키, 인덱스 목록)을 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.buckets
            .iter()
            .map(|(key, indices)| (key.as_str(), indices.as_slice()))
    }

    pub fn get(&self, key: &str) -> Option<&[usize]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// 종목과 그 누적 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairResult {
    pub pair: String,
    pub net: PipValue,
}

/// 기간(월/연/전체) 버킷.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    /// `YYYY-MM`, `YYYY` 또는 전체 버킷의 `all`
    pub key: String,
    /// 리포트 거래 목록에서의 인덱스
    pub trade_indices: Vec<usize>,
    pub trade_count: usize,
    pub wins: usize,
    /// 순손익
    pub net: PipValue,
    /// 승률 (%)
    pub win_rate_pct: Decimal,
    /// 누적 핍 기준 최고 종목
    pub best_pair: Option<PairResult>,
    /// 누적 핍 기준 최저 종목
    pub worst_pair: Option<PairResult>,
}

impl PeriodBucket {
    fn build(key: &str, indices: &[usize], trades: &[NormalizedTrade]) -> Self {
        let bucket_trades = || indices.iter().map(|&i| &trades[i]);

        let wins = bucket_trades().filter(|t| t.is_win).count();
        let net = bucket_trades().map(|t| t.result).sum();

        let per_pair: Vec<PairResult> =
            TradeIndex::build(indices.iter().map(|&i| (i, &trades[i])), |t| t.pair.as_str())
                .iter()
                .map(|(pair, pair_indices)| PairResult {
                    pair: pair.to_string(),
                    net: EquityCurveBuilder::from_trades(pair_indices.iter().map(|&i| &trades[i]))
                        .final_equity(),
                })
                .collect();

        // 동률이면 심볼 순으로 먼저 나온 종목
        let best_pair = per_pair
            .iter()
            .fold(None::<&PairResult>, |best, candidate| match best {
                Some(b) if b.net.pips >= candidate.net.pips => Some(b),
                _ => Some(candidate),
            })
            .cloned();
        let worst_pair = per_pair
            .iter()
            .fold(None::<&PairResult>, |worst, candidate| match worst {
                Some(w) if w.net.pips <= candidate.net.pips => Some(w),
                _ => Some(candidate),
            })
            .cloned();

        Self {
            key: key.to_string(),
            trade_indices: indices.to_vec(),
            trade_count: indices.len(),
            wins,
            net,
            win_rate_pct: percentage(wins, indices.len()),
            best_pair,
            worst_pair,
        }
    }
}

/// 기간 키와 순손익.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodResult {
    pub key: String,
    pub net: PipValue,
}

/// 월별 버킷 요약.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// 거래가 있는 월 수
    pub months_elapsed: usize,
    /// 월 수 / 12
    pub years_elapsed: Decimal,
    /// 월 평균 거래 수
    pub avg_trades_per_month: Decimal,
    /// 월 목표 핍 이상을 달성한 월 비율 (%)
    pub target_hit_pct: Decimal,
    /// 순손익 핍이 양수인 월 비율 (%)
    pub positive_month_pct: Decimal,
    pub best_month: Option<PeriodResult>,
    pub worst_month: Option<PeriodResult>,
}

/// 월별/연도별/전체 롤업.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rollup {
    pub months: Vec<PeriodBucket>,
    pub years: Vec<PeriodBucket>,
    pub total: PeriodBucket,
    pub summary: PeriodSummary,
}

impl Rollup {
    /// 월 키로 버킷을 찾습니다.
    pub fn month(&self, key: &str) -> Option<&PeriodBucket> {
        self.months.iter().find(|b| b.key == key)
    }

    /// 연 키로 버킷을 찾습니다.
    pub fn year(&self, key: &str) -> Option<&PeriodBucket> {
        self.years.iter().find(|b| b.key == key)
    }
}

/// 롤업 빌더.
#[derive(Debug, Clone, Copy)]
pub struct RollupBuilder {
    monthly_target_pips: Decimal,
}

impl RollupBuilder {
    pub fn new(monthly_target_pips: Decimal) -> Self {
        Self {
            monthly_target_pips,
        }
    }

    pub fn build(&self, trades: &[NormalizedTrade]) -> Rollup {
        let buckets = |index: TradeIndex| -> Vec<PeriodBucket> {
            index
                .iter()
                .map(|(key, indices)| PeriodBucket::build(key, indices, trades))
                .collect()
        };

        let months = buckets(TradeIndex::by_month(trades));
        let years = buckets(TradeIndex::by_year(trades));
        let all_indices: Vec<usize> = (0..trades.len()).collect();
        let total = PeriodBucket::build("all", &all_indices, trades);
        let summary = self.summarize(&months, trades.len());

        Rollup {
            months,
            years,
            total,
            summary,
        }
    }

    fn summarize(&self, months: &[PeriodBucket], trade_count: usize) -> PeriodSummary {
        let months_elapsed = months.len();
        let month_count = Decimal::from(months_elapsed);

        let target_hits = months
            .iter()
            .filter(|m| m.net.pips >= self.monthly_target_pips)
            .count();
        let positive = months.iter().filter(|m| m.net.pips > Decimal::ZERO).count();

        let as_result = |bucket: &PeriodBucket| PeriodResult {
            key: bucket.key.clone(),
            net: bucket.net,
        };
        // 동률이면 이른 월
        let best_month = months
            .iter()
            .fold(None::<&PeriodBucket>, |best, m| match best {
                Some(b) if b.net.pips >= m.net.pips => Some(b),
                _ => Some(m),
            })
            .map(as_result);
        let worst_month = months
            .iter()
            .fold(None::<&PeriodBucket>, |worst, m| match worst {
                Some(w) if w.net.pips <= m.net.pips => Some(w),
                _ => Some(m),
            })
            .map(as_result);

        PeriodSummary {
            months_elapsed,
            years_elapsed: month_count / dec!(12),
            avg_trades_per_month: div_or_zero(Decimal::from(trade_count), month_count),
            target_hit_pct: percentage(target_hits, months_elapsed),
            positive_month_pct: percentage(positive, months_elapsed),
            best_month,
            worst_month,
        }
    }
}

/// 종목별 누적 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairTotal {
    pub pair: String,
    pub trade_count: usize,
    pub wins: usize,
    pub net: PipValue,
}

/// 종목별 합계를 심볼 순으로 계산합니다.
pub fn pair_totals(trades: &[NormalizedTrade]) -> Vec<PairTotal> {
    TradeIndex::by_pair(trades)
        .iter()
        .map(|(pair, indices)| PairTotal {
            pair: pair.to_string(),
            trade_count: indices.len(),
            wins: indices.iter().filter(|&&i| trades[i].is_win).count(),
            net: indices.iter().map(|&i| trades[i].result).sum(),
        })
        .collect()
}
