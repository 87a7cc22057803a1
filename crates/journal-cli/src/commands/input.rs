//! 입력 파일과 설정 로딩.

use anyhow::{Context, Result};
use journal_core::{AnalyticsConfig, RawTrade};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 검증된 원시 거래 JSON 배열을 읽습니다.
pub fn read_trades<P: AsRef<Path>>(path: P) -> Result<Vec<RawTrade>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open trade file: {}", path.display()))?;

    let trades: Vec<RawTrade> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse trade file: {}", path.display()))?;

    info!(path = %path.display(), trades = trades.len(), "Trades loaded");
    Ok(trades)
}

/// 설정을 로드합니다.
///
/// 경로가 주어지면 그 파일을, 없으면 `config/default.toml`이 있을 때 그 파일을,
/// 둘 다 없으면 내장 기본값을 사용합니다.
pub fn load_config(path: Option<&str>) -> Result<AnalyticsConfig> {
    match path {
        Some(path) => AnalyticsConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path)),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => AnalyticsConfig::load_default()
            .with_context(|| format!("Failed to load config: {}", DEFAULT_CONFIG_PATH)),
        None => {
            debug!("No config file found, using built-in defaults");
            Ok(AnalyticsConfig::default())
        }
    }
}
