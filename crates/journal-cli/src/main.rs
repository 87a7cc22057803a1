//! 매매일지 성과 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 전체 기간 요약
//! journal report --input trades.json --format summary
//!
//! # 2024년, EURUSD/GBPUSD만 JSON으로
//! journal report --input trades.json --range 2024 --pairs EURUSD,GBPUSD
//!
//! # 최근 90일
//! journal report --input trades.json --range 90d --format summary
//!
//! # 필터 선택지 (종목, 연도)
//! journal options --input trades.json
//! ```

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use journal_cli::commands::input::load_config;
use journal_cli::commands::options::run_options;
use journal_cli::commands::report::{run_report, OutputFormat, ReportCommand};
use journal_core::{init_logging, LogConfig};
use tracing::error;

#[derive(Parser)]
#[command(name = "journal")]
#[command(about = "Trading journal CLI - 매매일지 성과 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로 (기본: config/default.toml, 없으면 내장 기본값)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 성과 리포트 생성
    Report {
        /// 거래 JSON 파일
        #[arg(short, long)]
        input: String,

        /// 기간 (all, 2024, 90d, last-180)
        #[arg(short, long)]
        range: Option<String>,

        /// 포함할 종목 (쉼표 구분, 예: EURUSD,GBPUSD)
        #[arg(short, long)]
        pairs: Option<String>,

        /// 출력 형식 (json, summary)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// 필터 선택지 조회 (종목별 거래 수, 연도)
    Options {
        /// 거래 JSON 파일
        #[arg(short, long)]
        input: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    // 환경 변수가 설정 파일보다 우선
    let log_config = if std::env::var_os("JOURNAL_LOG_FORMAT").is_some() {
        LogConfig::from_env()
    } else {
        LogConfig::from_section(&config.logging)
    };
    init_logging(log_config)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    let output = match cli.command {
        Commands::Report {
            input,
            range,
            pairs,
            format,
        } => {
            let command = ReportCommand {
                input,
                range,
                pairs,
                format: OutputFormat::parse(&format)?,
            };
            run_report(&command, &config)
        }
        Commands::Options { input } => run_options(&input, &config),
    };

    match output {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            Err(e)
        }
    }
}
