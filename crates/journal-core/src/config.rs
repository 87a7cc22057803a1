//! 설정 관리.
//!
//! 분석 엔진의 수치 기본값(주말 구간, 낙폭 임계값, 연속 기록 최소 길이 등)을
//! TOML 파일과 환경 변수에서 읽습니다. 모든 섹션은 기본값을 가지므로
//! 파일에 섹션이 없어도 동작합니다.

use chrono::Weekday;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{JournalError, JournalResult};
use crate::types::InstrumentTable;

/// 분석 엔진 설정.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AnalyticsConfig {
    /// 거래 세션(주말/봉 크기) 설정
    #[serde(default)]
    pub session: SessionConfig,
    /// 낙폭 탐지 임계값
    #[serde(default)]
    pub drawdown: DrawdownConfig,
    /// 연속 기록 설정
    #[serde(default)]
    pub streak: StreakConfig,
    /// 기간 집계 설정
    #[serde(default)]
    pub rollup: RollupConfig,
    /// 종목 테이블
    #[serde(default)]
    pub instruments: InstrumentTable,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 주 단위 시각 (요일 + 시).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct WeekTime {
    /// 요일
    pub weekday: Weekday,
    /// 시 (0~23)
    pub hour: u32,
}

impl WeekTime {
    /// 새 주 단위 시각을 생성합니다.
    pub fn new(weekday: Weekday, hour: u32) -> Self {
        Self { weekday, hour }
    }

    /// 월요일 00시부터의 경과 시간.
    pub fn hours_from_week_start(&self) -> i64 {
        i64::from(self.weekday.num_days_from_monday()) * 24 + i64::from(self.hour)
    }
}

/// 거래 세션 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionConfig {
    /// 거래 장소 시간대 (IANA 이름)
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    /// 주말 비거래 구간 시작
    #[serde(default = "default_weekend_start")]
    pub weekend_start: WeekTime,
    /// 주말 비거래 구간 종료
    #[serde(default = "default_weekend_end")]
    pub weekend_end: WeekTime,
    /// 봉 크기 (시간)
    #[serde(default = "default_bar_hours")]
    pub bar_hours: u32,
}

fn default_timezone() -> Tz {
    chrono_tz::Asia::Bangkok
}
fn default_weekend_start() -> WeekTime {
    WeekTime::new(Weekday::Sat, 4)
}
fn default_weekend_end() -> WeekTime {
    WeekTime::new(Weekday::Mon, 4)
}
fn default_bar_hours() -> u32 {
    4
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            weekend_start: default_weekend_start(),
            weekend_end: default_weekend_end(),
            bar_hours: default_bar_hours(),
        }
    }
}

/// 낙폭 탐지 임계값 한 쌍.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DrawdownThresholds {
    /// 고점 추적을 시작하는 최소 누적값
    pub start_tracking: Decimal,
    /// 고점 대비 낙폭 에피소드를 여는 절대 하락폭
    pub trigger: Decimal,
}

impl DrawdownThresholds {
    /// 새 임계값을 생성합니다.
    pub fn new(start_tracking: Decimal, trigger: Decimal) -> Self {
        Self {
            start_tracking,
            trigger,
        }
    }
}

impl Default for DrawdownThresholds {
    fn default() -> Self {
        Self::new(Decimal::ZERO, dec!(300))
    }
}

/// 낙폭 탐지 설정 (핍 공간, 가치핍 공간).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DrawdownConfig {
    #[serde(default)]
    pub pips: DrawdownThresholds,
    #[serde(default)]
    pub value: DrawdownThresholds,
}

/// 연속 기록 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StreakConfig {
    /// 기록할 최소 연속 길이 (미만은 잡음으로 버림)
    #[serde(default = "default_min_streak")]
    pub min_length: usize,
}

fn default_min_streak() -> usize {
    2
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_streak(),
        }
    }
}

/// 기간 집계 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RollupConfig {
    /// 월 목표 핍 (달성 월 비율 계산용)
    #[serde(default = "default_monthly_target")]
    pub monthly_target_pips: Decimal,
}

fn default_monthly_target() -> Decimal {
    dec!(100)
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            monthly_target_pips: default_monthly_target(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AnalyticsConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 환경 변수는 `JOURNAL__SECTION__KEY` 형식으로 파일 값을 덮어씁니다.
    pub fn load<P: AsRef<Path>>(path: P) -> JournalResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(Self::env_source());

        let config = builder.build()?;
        let parsed: Self = config.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> JournalResult<Self> {
        Self::load("config/default.toml")
    }

    /// TOML 문자열에서 설정을 로드합니다 (환경 변수 미적용).
    pub fn from_toml_str(toml: &str) -> JournalResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        let parsed: Self = config.try_deserialize()?;
        parsed.validate()?;
        Ok(parsed)
    }

    fn env_source() -> config::Environment {
        config::Environment::with_prefix("JOURNAL")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// 수치 설정의 범위를 검사합니다.
    pub fn validate(&self) -> JournalResult<()> {
        if self.session.bar_hours == 0 {
            return Err(JournalError::Config(
                "session.bar_hours must be at least 1".to_string(),
            ));
        }
        for (name, time) in [
            ("weekend_start", self.session.weekend_start),
            ("weekend_end", self.session.weekend_end),
        ] {
            if time.hour > 23 {
                return Err(JournalError::Config(format!(
                    "session.{}.hour must be within 0..=23, got {}",
                    name, time.hour
                )));
            }
        }
        for (name, thresholds) in [("pips", self.drawdown.pips), ("value", self.drawdown.value)] {
            if thresholds.trigger < Decimal::ZERO {
                return Err(JournalError::Config(format!(
                    "drawdown.{}.trigger must not be negative",
                    name
                )));
            }
        }
        if let Some((symbol, multiplier)) = self
            .instruments
            .multipliers
            .iter()
            .find(|(_, multiplier)| **multiplier < Decimal::ZERO)
        {
            return Err(JournalError::Config(format!(
                "instruments.multipliers.{} must not be negative, got {}",
                symbol, multiplier
            )));
        }
        Ok(())
    }
}
