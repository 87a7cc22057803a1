//! 주말 비거래 구간 계산.
//!
//! 주말 구간은 거래 장소 시간대의 벽시계 기준 주간 반복 구간입니다
//! (기본: 토요일 04:00 ~ 월요일 04:00). 보유 시간에서 이 구간과 겹치는 시간을 제외합니다.
//! 겹침은 시간 단위 반복이 아니라 구간 교집합으로 초 단위까지 정확히 계산합니다.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use journal_core::SessionConfig;

const HOURS_PER_WEEK: i64 = 7 * 24;

/// 주간 반복되는 주말 비거래 구간.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekendWindow {
    timezone: Tz,
    /// 월요일 00시부터 구간 시작까지의 시간
    start_offset: Duration,
    /// 구간 길이 (0보다 크고 1주 이하)
    length: Duration,
}

impl WeekendWindow {
    /// 세션 설정으로부터 생성합니다.
    ///
    /// 종료가 시작보다 앞서면(예: 토요일 → 월요일) 다음 주로 넘어가는 구간으로 봅니다.
    /// 시작과 종료가 같으면 1주 전체가 아니라 길이 0으로 취급합니다.
    pub fn from_session(session: &SessionConfig) -> Self {
        let start = session.weekend_start.hours_from_week_start();
        let end = session.weekend_end.hours_from_week_start();
        let length = (end - start).rem_euclid(HOURS_PER_WEEK);

        Self {
            timezone: session.timezone,
            start_offset: Duration::hours(start),
            length: Duration::hours(length),
        }
    }

    /// 구간 길이.
    pub fn length(&self) -> Duration {
        self.length
    }

    /// `[from, to)` 구간과 주말 구간이 겹치는 총 시간.
    pub fn overlap(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Duration {
        if to <= from || self.length.is_zero() {
            return Duration::zero();
        }

        // 시작 주의 한 주 전부터 살펴야 from 이전에 시작해 걸쳐 있는 구간을 놓치지 않음
        let local_date = from.with_timezone(&self.timezone).date_naive();
        let monday =
            local_date - Duration::days(i64::from(local_date.weekday().num_days_from_monday()));
        let mut window_start =
            monday.and_time(NaiveTime::MIN) - Duration::weeks(1) + self.start_offset;

        let mut total = Duration::zero();
        loop {
            let start_utc = self.to_utc(window_start);
            if start_utc >= to {
                break;
            }
            let end_utc = self.to_utc(window_start + self.length);

            let lo = start_utc.max(from);
            let hi = end_utc.min(to);
            if hi > lo {
                total = total + (hi - lo);
            }

            window_start = window_start + Duration::weeks(1);
        }

        total
    }

    /// 장소 시간대의 벽시계 시각을 UTC로 변환합니다.
    ///
    /// 서머타임 전환으로 존재하지 않는 시각이면 한 시간 뒤로 밀어서 해석합니다.
    fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        self.timezone
            .from_local_datetime(&local)
            .earliest()
            .or_else(|| {
                self.timezone
                    .from_local_datetime(&(local + Duration::hours(1)))
                    .earliest()
            })
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| local.and_utc())
    }
}
