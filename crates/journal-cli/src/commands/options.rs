//! 필터 선택지 조회 명령.

use anyhow::{Context, Result};
use journal_analytics::{AnalyticsSession, DataEvent};
use journal_core::AnalyticsConfig;

use super::input::read_trades;

/// 거래 파일의 종목/연도 선택지를 JSON으로 반환합니다.
pub fn run_options(input: &str, config: &AnalyticsConfig) -> Result<String> {
    let mut session = AnalyticsSession::new(config);
    session.handle(DataEvent::TradesChanged {
        trades: read_trades(input)?,
        has_invalid_rows: false,
    });

    serde_json::to_string_pretty(&session.options()).context("Failed to serialize options")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::input::tests::{write_temp, SAMPLE_TRADES};

    #[test]
    fn test_options_json() {
        let path = write_temp("options", SAMPLE_TRADES);
        let output = run_options(&path.display().to_string(), &AnalyticsConfig::default()).unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["years"], serde_json::json!([2024]));
        assert_eq!(json["pairs"][0]["pair"], "EURUSD");
        assert_eq!(json["pairs"][1]["trade_count"], 1);
        std::fs::remove_file(path).ok();
    }
}
