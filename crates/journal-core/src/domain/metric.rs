//! 핍/가치핍 쌍과 표시용 지표 값 타입.
//!
//! 분석 엔진은 숫자만 만들고, 형식화(통화 기호, 소수점, 시간대)는 표시 계층이 담당합니다.
//! `Metric`은 표시 계층이 지표 종류별로 형식을 고를 수 있도록 붙이는 태그입니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Neg, Sub};

/// 핍 공간과 가치핍 공간의 값 쌍.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipValue {
    /// 핍 값
    pub pips: Decimal,
    /// 가치핍 값
    pub value: Decimal,
}

impl PipValue {
    /// 0 쌍.
    pub const ZERO: PipValue = PipValue {
        pips: Decimal::ZERO,
        value: Decimal::ZERO,
    };

    /// 새 쌍을 생성합니다.
    pub fn new(pips: Decimal, value: Decimal) -> Self {
        Self { pips, value }
    }

    /// 양쪽 값에 같은 함수를 적용합니다.
    pub fn map(self, f: impl Fn(Decimal) -> Decimal) -> Self {
        Self::new(f(self.pips), f(self.value))
    }

    /// 두 쌍의 같은 공간끼리 함수를 적용합니다.
    pub fn zip_with(self, other: PipValue, f: impl Fn(Decimal, Decimal) -> Decimal) -> Self {
        Self::new(f(self.pips, other.pips), f(self.value, other.value))
    }

    /// 공간별 최댓값.
    pub fn max(self, other: PipValue) -> Self {
        self.zip_with(other, Decimal::max)
    }

    /// 공간별 최솟값.
    pub fn min(self, other: PipValue) -> Self {
        self.zip_with(other, Decimal::min)
    }

    /// 양쪽 모두 0인지 확인합니다.
    pub fn is_zero(&self) -> bool {
        self.pips.is_zero() && self.value.is_zero()
    }
}

impl Add for PipValue {
    type Output = PipValue;

    fn add(self, rhs: PipValue) -> PipValue {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl AddAssign for PipValue {
    fn add_assign(&mut self, rhs: PipValue) {
        *self = *self + rhs;
    }
}

impl Sub for PipValue {
    type Output = PipValue;

    fn sub(self, rhs: PipValue) -> PipValue {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Neg for PipValue {
    type Output = PipValue;

    fn neg(self) -> PipValue {
        self.map(|v| -v)
    }
}

impl std::iter::Sum for PipValue {
    fn sum<I: Iterator<Item = PipValue>>(iter: I) -> Self {
        iter.fold(PipValue::ZERO, |acc, v| acc + v)
    }
}

/// 표시 형식을 결정하는 지표 값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Metric {
    /// 개수
    Count(usize),
    /// 무차원 비율 (핍/가치핍 각각)
    Ratio(PipValue),
    /// 핍/가치핍 금액
    Currency(PipValue),
    /// 백분율 (0~100)
    Percent(Decimal),
    /// 보유 기간 (봉 단위)
    Duration(Decimal),
    /// 시각
    Timestamp(DateTime<Utc>),
}

/// 그룹 통계 지표 식별자.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    TotalTrades,
    WinningTrades,
    LosingTrades,
    WinRate,
    GrossProfit,
    GrossLoss,
    NetReturn,
    AvgReturn,
    MedianReturn,
    StdevReturn,
    AvgWin,
    AvgLoss,
    MaxWin,
    MaxLoss,
    ProfitFactor,
    AvgRiskReward,
    Expectancy,
    AvgBarsHeld,
    MaxBarsHeld,
}

impl MetricKey {
    /// 사람이 읽을 수 있는 이름.
    pub fn label(&self) -> &'static str {
        match self {
            MetricKey::TotalTrades => "Total trades",
            MetricKey::WinningTrades => "Winning trades",
            MetricKey::LosingTrades => "Losing trades",
            MetricKey::WinRate => "Win rate",
            MetricKey::GrossProfit => "Gross profit",
            MetricKey::GrossLoss => "Gross loss",
            MetricKey::NetReturn => "Net return",
            MetricKey::AvgReturn => "Average return",
            MetricKey::MedianReturn => "Median return",
            MetricKey::StdevReturn => "Return stdev",
            MetricKey::AvgWin => "Average win",
            MetricKey::AvgLoss => "Average loss",
            MetricKey::MaxWin => "Max win",
            MetricKey::MaxLoss => "Max loss",
            MetricKey::ProfitFactor => "Profit factor",
            MetricKey::AvgRiskReward => "Average risk:reward",
            MetricKey::Expectancy => "Expectancy",
            MetricKey::AvgBarsHeld => "Average bars held",
            MetricKey::MaxBarsHeld => "Max bars held",
        }
    }
}
