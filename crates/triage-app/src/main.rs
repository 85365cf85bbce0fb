//! # triage-app
//!
//! TRIAGE 바이너리 진입점.
//! 설정 로드, 어댑터 와이어링, CLI 명령 디스패치.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use triage_analysis::classifier::ErrorClassifier;
use triage_analysis::components;
use triage_analysis::pipeline::Analyzer;
use triage_analysis::severity::default_severity;
use triage_core::config::AppConfig;
use triage_core::config_manager::{apply_env_overrides, ConfigManager, CONFIG_FILE_NAME};
use triage_core::models::classification::ErrorType;
use triage_core::models::report::ErrorReport;
use triage_core::ports::text_generator::TextGenerator;
use triage_network::ai_llm_client::RemoteTextGenerator;

/// 프로덕션 에러 분류 및 수정 조언
#[derive(Parser, Debug)]
#[command(name = "triage")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "warn", global = true)]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼별 설정 디렉토리)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 에러 리포트 전체 분석
    Analyze {
        /// 에러 메시지
        #[arg(long, short = 'm')]
        message: String,

        /// 스택 트레이스
        #[arg(long)]
        stack_trace: Option<String>,

        /// 에러가 발생한 파일 경로
        #[arg(long)]
        file: Option<String>,

        #[arg(long)]
        line: Option<u32>,

        #[arg(long)]
        column: Option<u32>,

        /// 실행 환경 (production, staging 등)
        #[arg(long)]
        environment: Option<String>,

        /// 진행 이벤트를 한 줄씩 출력
        #[arg(long)]
        stream: bool,

        /// 외부 LLM 호출 없이 템플릿 조언만 사용
        #[arg(long, short = 'o')]
        offline: bool,
    },
    /// 에러 타입만 분류
    Classify {
        #[arg(long, short = 'm')]
        message: String,

        #[arg(long)]
        stack_trace: Option<String>,
    },
    /// 에러 타입별 추천 UI 컴포넌트
    Components {
        /// 에러 타입 (예: null-reference)
        error_type: String,
    },
}

/// 설정 파일 경로 결정 (CLI 인자 또는 플랫폼별 기본 경로)
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/com.triage.triage/config.json`
/// - Windows: `%APPDATA%\triage\triage\config\config.json`
/// - Linux: `~/.config/triage/config.json`
fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| {
            ProjectDirs::from("com", "triage", "triage")
                .map(|p| p.config_dir().join(CONFIG_FILE_NAME))
        })
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// 설정 로드 — 파일 실패 시 기본값, 이후 환경변수 오버라이드
fn load_config(path: PathBuf) -> AppConfig {
    let mut config = match ConfigManager::with_path(path) {
        Ok(manager) => {
            info!("설정 로드: {}", manager.config_path().display());
            manager.into_config()
        }
        Err(e) => {
            warn!("설정 파일 사용 불가, 기본 설정 사용: {e}");
            AppConfig::default_config()
        }
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// 텍스트 생성기 생성 (자격증명이 있고 온라인일 때만)
fn build_generator(config: &AppConfig, offline: bool) -> Option<Arc<dyn TextGenerator>> {
    if offline {
        info!("오프라인 모드: 템플릿 조언만 사용");
        return None;
    }
    if !config.delegation_enabled() {
        return None;
    }
    let llm = config.llm.as_ref()?;
    match RemoteTextGenerator::new(llm) {
        Ok(generator) => Some(Arc::new(generator)),
        Err(e) => {
            warn!("LLM 클라이언트 생성 실패, 템플릿 조언 사용: {e}");
            None
        }
    }
}

/// CLI 인자 → 에러 리포트
fn build_report(
    message: String,
    stack_trace: Option<String>,
    file: Option<String>,
    line: Option<u32>,
    column: Option<u32>,
    environment: Option<String>,
) -> ErrorReport {
    let mut report = ErrorReport::new(message);
    if let Some(trace) = stack_trace {
        report = report.with_stack_trace(trace);
    }
    if let Some(path) = file {
        report = report.with_file_path(path);
    }
    if let Some(line) = line {
        report = report.with_position(line, column);
    }
    if let Some(env) = environment {
        report = report.with_environment(env);
    }
    report
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "triage={},triage_app={},triage_core={},triage_analysis={},triage_network={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    match args.command {
        Command::Analyze {
            message,
            stack_trace,
            file,
            line,
            column,
            environment,
            stream,
            offline,
        } => {
            let config = load_config(resolve_config_path(args.config));
            let generator = build_generator(&config, offline);
            let analyzer = Analyzer::from_config(&config, generator);
            let report = build_report(message, stack_trace, file, line, column, environment);

            if stream {
                let mut events = Arc::new(analyzer).analyze_stream(report);
                while let Some(event) = events.recv().await {
                    println!("{}", serde_json::to_string(&event)?);
                }
            } else {
                let result = analyzer.analyze(&report).await;
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
        Command::Classify {
            message,
            stack_trace,
        } => {
            let error_type = ErrorClassifier::new().classify(&message, stack_trace.as_deref());
            let output = serde_json::json!({
                "errorType": error_type,
                "category": error_type.category(),
                "defaultSeverity": default_severity(error_type),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Components { error_type } => {
            let error_type: ErrorType = error_type.parse()?;
            let output = serde_json::json!({
                "errorType": error_type,
                "components": components::recommended_components(error_type),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
