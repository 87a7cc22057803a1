//! 성과 리포트 명령.

use anyhow::{anyhow, Context, Result};
use journal_analytics::{AnalyticsSession, DataEvent, FilterPatch, FilteredReport, RangeSelector};
use journal_core::AnalyticsConfig;
use tracing::info;

use super::input::read_trades;
use super::summary::SummaryView;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Summary,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "summary" | "text" => Ok(Self::Summary),
            _ => Err(anyhow!("Invalid format: {}. Use: json, summary", s)),
        }
    }
}

/// 리포트 명령 설정.
#[derive(Debug)]
pub struct ReportCommand {
    /// 거래 JSON 파일 경로
    pub input: String,
    /// 기간 선택자 (`all`, `2024`, `90d`, `last-180`)
    pub range: Option<String>,
    /// 쉼표로 구분한 종목 목록
    pub pairs: Option<String>,
    pub format: OutputFormat,
}

/// 쉼표 구분 종목 목록을 나눕니다. 빈 항목은 버립니다.
pub fn parse_pairs(pairs: &str) -> Vec<String> {
    pairs
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// 리포트를 만들어 출력 문자열로 반환합니다.
pub fn run_report(command: &ReportCommand, config: &AnalyticsConfig) -> Result<String> {
    let report = build_report(command, config)?;

    info!(
        trades = report.report.trade_count(),
        range = %report.filter.range,
        "Report ready"
    );

    match command.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&report).context("Failed to serialize report")
        }
        OutputFormat::Summary => Ok(SummaryView(&report).to_string()),
    }
}

/// 파일을 읽고 필터를 적용한 리포트를 만듭니다.
pub fn build_report(command: &ReportCommand, config: &AnalyticsConfig) -> Result<FilteredReport> {
    let trades = read_trades(&command.input)?;

    let mut session = AnalyticsSession::new(config);
    session.handle(DataEvent::TradesChanged {
        trades,
        has_invalid_rows: false,
    });

    let mut patch = FilterPatch::default();
    if let Some(range) = &command.range {
        let range: RangeSelector = range
            .parse()
            .with_context(|| format!("Invalid range: {}", range))?;
        patch.range = Some(range);
    }
    if let Some(pairs) = &command.pairs {
        patch.included_pairs = Some(parse_pairs(pairs).into_iter().collect());
    }

    Ok(session.apply_filter(patch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::input::tests::{write_temp, SAMPLE_TRADES};
    use rust_decimal_macros::dec;

    fn command(path: &std::path::Path, format: OutputFormat) -> ReportCommand {
        ReportCommand {
            input: path.display().to_string(),
            range: None,
            pairs: None,
            format,
        }
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("summary").unwrap(), OutputFormat::Summary);
        assert!(OutputFormat::parse("csv").is_err());
    }

    #[test]
    fn test_parse_pairs() {
        assert_eq!(parse_pairs("eurusd, GBPUSD,,"), vec!["eurusd", "GBPUSD"]);
        assert!(parse_pairs(" , ").is_empty());
    }

    #[test]
    fn test_build_report_with_pair_filter() {
        let path = write_temp("report-filter", SAMPLE_TRADES);
        let mut cmd = command(&path, OutputFormat::Json);
        cmd.pairs = Some("eurusd".to_string());

        let report = build_report(&cmd, &AnalyticsConfig::default()).unwrap();
        assert_eq!(report.report.groups.all.total_trades, 1);
        assert_eq!(report.report.groups.all.net_return.pips, dec!(50));
        assert_eq!(report.options.pairs.len(), 2);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_invalid_range_is_an_error() {
        let path = write_temp("report-range", SAMPLE_TRADES);
        let mut cmd = command(&path, OutputFormat::Json);
        cmd.range = Some("someday".to_string());

        assert!(build_report(&cmd, &AnalyticsConfig::default()).is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_summary_output() {
        let path = write_temp("report-summary", SAMPLE_TRADES);
        let output =
            run_report(&command(&path, OutputFormat::Summary), &AnalyticsConfig::default())
                .unwrap();

        assert!(output.contains("Range: all"));
        assert!(output.contains("Profit factor"));
        assert!(output.contains("2024-03"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_json_output() {
        let path = write_temp("report-json", SAMPLE_TRADES);
        let output =
            run_report(&command(&path, OutputFormat::Json), &AnalyticsConfig::default()).unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["report"]["groups"]["all"]["total_trades"], 2);
        assert_eq!(json["filter"]["range"]["kind"], "all_time");
        std::fs::remove_file(path).ok();
    }
}
