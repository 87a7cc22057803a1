//! 낙폭(Drawdown) 구간 탐지.
//!
//! 두 임계값을 사용하는 상태 기계로 자산 곡선을 한 번 스캔합니다:
//! - `start_tracking`: 고점 추적을 시작하는 최소 자산 값
//! - `trigger`: 고점 대비 이 이상 되돌리면 낙폭 구간을 엽니다
//!
//! 상태 전이: 추적 전 → 고점 추적 → 낙폭 중 → (회복 후) 고점 추적

use chrono::{DateTime, Utc};
use journal_core::{div_or_zero, DrawdownConfig, DrawdownThresholds, Metric};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::equity::{EquityCurve, EquityCurves};

/// 단일 낙폭 구간 (고점 → 저점 → 회복).
///
/// `recovery_time`이 `None`이면 시리즈가 끝날 때까지 회복하지 못한 열린 구간입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownEpisode {
    /// 고점 시각
    pub peak_time: DateTime<Utc>,
    /// 고점 자산
    pub peak_equity: Decimal,
    /// 저점 시각
    pub trough_time: DateTime<Utc>,
    /// 저점 자산
    pub trough_equity: Decimal,
    /// 회복 시각 (미회복시 None)
    pub recovery_time: Option<DateTime<Utc>>,
    /// 회복 시점 자산 (미회복시 None)
    pub recovery_equity: Option<Decimal>,
    /// 고점 - 저점
    pub absolute_drawdown: Decimal,
    /// 고점부터 회복까지 시간 (시간 단위, 미회복시 None)
    pub recovery_hours: Option<Decimal>,
}

impl DrawdownEpisode {
    /// 아직 회복하지 못한 구간인지 확인합니다.
    pub fn is_open(&self) -> bool {
        self.recovery_time.is_none()
    }

    /// 고점/저점/회복 시각 행. 열린 구간에는 회복 행이 없습니다.
    pub fn time_marks(&self) -> Vec<(&'static str, Metric)> {
        let mut marks = vec![
            ("Peak", Metric::Timestamp(self.peak_time)),
            ("Trough", Metric::Timestamp(self.trough_time)),
        ];
        if let Some(recovery) = self.recovery_time {
            marks.push(("Recovery", Metric::Timestamp(recovery)));
        }
        marks
    }
}

/// 한 공간의 낙폭 요약.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawdownSummary {
    /// 최대 낙폭
    pub max_drawdown: Decimal,
    /// 평균 낙폭
    pub avg_drawdown: Decimal,
    /// 최대 회복 시간 (닫힌 구간만)
    pub max_recovery_hours: Decimal,
    /// 평균 회복 시간 (닫힌 구간만)
    pub avg_recovery_hours: Decimal,
    /// 구간 수
    pub episode_count: usize,
    /// 열린 구간 수 (0 또는 1)
    pub open_episodes: usize,
    /// 시리즈 끝에서 추적 중인 고점 대비 현재 낙폭
    pub current_drawdown: Decimal,
    /// 전체 구간 목록 (시간순)
    pub episodes: Vec<DrawdownEpisode>,
}

impl DrawdownSummary {
    /// 가장 깊은 구간. 같은 깊이면 먼저 발생한 구간.
    pub fn deepest_episode(&self) -> Option<&DrawdownEpisode> {
        self.episodes.iter().reduce(|deepest, episode| {
            if episode.absolute_drawdown > deepest.absolute_drawdown {
                episode
            } else {
                deepest
            }
        })
    }
}

/// 핍/가치핍 두 공간의 낙폭 요약.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawdownReport {
    pub pips: DrawdownSummary,
    pub value: DrawdownSummary,
}

impl DrawdownReport {
    /// 두 곡선에 각 공간의 임계값으로 탐지를 실행합니다.
    pub fn detect(curves: &EquityCurves, config: &DrawdownConfig) -> Self {
        Self {
            pips: DrawdownDetector::new(config.pips).detect(&curves.pips),
            value: DrawdownDetector::new(config.value).detect(&curves.value),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Mark {
    time: DateTime<Utc>,
    equity: Decimal,
}

#[derive(Debug, Clone, Copy)]
enum State {
    NotTracking,
    TrackingPeak { peak: Mark },
    InDrawdown { peak: Mark, trough: Mark },
}

/// 낙폭 구간 탐지기.
#[derive(Debug, Clone, Copy)]
pub struct DrawdownDetector {
    thresholds: DrawdownThresholds,
}

impl DrawdownDetector {
    pub fn new(thresholds: DrawdownThresholds) -> Self {
        Self { thresholds }
    }

    /// 곡선을 스캔하여 낙폭 요약을 만듭니다.
    pub fn detect(&self, curve: &EquityCurve) -> DrawdownSummary {
        let mut state = State::NotTracking;
        let mut episodes = Vec::new();

        for point in curve.points() {
            let mark = Mark {
                time: point.time,
                equity: point.cumulative,
            };

            state = match state {
                State::NotTracking if mark.equity >= self.thresholds.start_tracking => {
                    State::TrackingPeak { peak: mark }
                }
                State::NotTracking => State::NotTracking,
                State::TrackingPeak { peak } if mark.equity > peak.equity => {
                    State::TrackingPeak { peak: mark }
                }
                State::TrackingPeak { peak }
                    if mark.equity <= peak.equity - self.thresholds.trigger =>
                {
                    State::InDrawdown { peak, trough: mark }
                }
                State::TrackingPeak { peak } => State::TrackingPeak { peak },
                // 회복 판정이 저점 갱신보다 먼저
                State::InDrawdown { peak, trough } if mark.equity > peak.equity => {
                    episodes.push(episode(peak, trough, Some(mark)));
                    State::TrackingPeak { peak: mark }
                }
                State::InDrawdown { peak, trough } if mark.equity < trough.equity => {
                    State::InDrawdown { peak, trough: mark }
                }
                in_drawdown @ State::InDrawdown { .. } => in_drawdown,
            };
        }

        let last_equity = curve.last_cumulative();
        let current_drawdown = match state {
            State::NotTracking => Decimal::ZERO,
            State::TrackingPeak { peak } => (peak.equity - last_equity).max(Decimal::ZERO),
            State::InDrawdown { peak, trough } => {
                episodes.push(episode(peak, trough, None));
                (peak.equity - last_equity).max(Decimal::ZERO)
            }
        };

        debug!(
            points = curve.len(),
            episodes = episodes.len(),
            "Drawdown scan complete"
        );

        summarize(episodes, current_drawdown)
    }
}

fn episode(peak: Mark, trough: Mark, recovery: Option<Mark>) -> DrawdownEpisode {
    DrawdownEpisode {
        peak_time: peak.time,
        peak_equity: peak.equity,
        trough_time: trough.time,
        trough_equity: trough.equity,
        recovery_time: recovery.map(|r| r.time),
        recovery_equity: recovery.map(|r| r.equity),
        absolute_drawdown: peak.equity - trough.equity,
        recovery_hours: recovery.map(|r| hours_between(peak.time, r.time)),
    }
}

fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> Decimal {
    let seconds = to.signed_duration_since(from).num_seconds();
    (Decimal::from(seconds) / dec!(3600)).round_dp(4)
}

fn summarize(episodes: Vec<DrawdownEpisode>, current_drawdown: Decimal) -> DrawdownSummary {
    if episodes.is_empty() {
        return DrawdownSummary {
            current_drawdown,
            ..DrawdownSummary::default()
        };
    }

    let count = Decimal::from(episodes.len());
    let total: Decimal = episodes.iter().map(|e| e.absolute_drawdown).sum();
    let max_drawdown = episodes
        .iter()
        .map(|e| e.absolute_drawdown)
        .max()
        .unwrap_or(Decimal::ZERO);

    let recoveries: Vec<Decimal> = episodes.iter().filter_map(|e| e.recovery_hours).collect();
    let recovery_total: Decimal = recoveries.iter().copied().sum();

    DrawdownSummary {
        max_drawdown,
        avg_drawdown: total / count,
        max_recovery_hours: recoveries.iter().copied().max().unwrap_or(Decimal::ZERO),
        avg_recovery_hours: div_or_zero(recovery_total, Decimal::from(recoveries.len())),
        episode_count: episodes.len(),
        open_episodes: episodes.iter().filter(|e| e.is_open()).count(),
        current_drawdown,
        episodes,
    }
}
