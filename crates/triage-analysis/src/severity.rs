//! 심각도 결정기.
//!
//! 2단계 정책: 파일 경로에 민감 마커가 있으면 유형과 무관하게 Critical,
//! 아니면 유형별 기본값.

use tracing::debug;

use triage_core::config::AnalysisConfig;
use triage_core::models::classification::{ErrorType, Severity};
use triage_core::models::report::ErrorReport;

/// 유형별 기본 심각도
pub fn default_severity(error_type: ErrorType) -> Severity {
    match error_type {
        ErrorType::AuthFailure | ErrorType::DatabaseError => Severity::Critical,
        ErrorType::NullReference
        | ErrorType::ApiTimeout
        | ErrorType::MemoryLeak
        | ErrorType::ThirdPartyFailure
        | ErrorType::ConfigError => Severity::High,
        ErrorType::CorsError | ErrorType::RateLimit | ErrorType::WebsocketError => {
            Severity::Medium
        }
        ErrorType::Unknown => Severity::Low,
    }
}

/// 심각도 결정기
#[derive(Debug, Clone)]
pub struct SeverityResolver {
    /// 소문자로 정규화된 민감 경로 마커
    sensitive_markers: Vec<String>,
}

impl SeverityResolver {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sensitive_markers = markers
            .into_iter()
            .map(|m| m.as_ref().trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();
        Self { sensitive_markers }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(&config.sensitive_path_markers)
    }

    /// 심각도 결정 — 경로 기반 승격이 항상 우선
    pub fn resolve(&self, error_type: ErrorType, report: &ErrorReport) -> Severity {
        if let Some(marker) = self.sensitive_marker_in(report.file_path.as_deref()) {
            debug!(marker, error_type = %error_type, "민감 경로 — Critical 승격");
            return Severity::Critical;
        }
        default_severity(error_type)
    }

    fn sensitive_marker_in(&self, path: Option<&str>) -> Option<&str> {
        let path = path?.to_lowercase();
        self.sensitive_markers
            .iter()
            .find(|marker| path.contains(marker.as_str()))
            .map(String::as_str)
    }
}

impl Default for SeverityResolver {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}
