//! 애플리케이션 설정 구조체.
//!
//! 분석 정책(민감 경로 마커, 스트리밍 페이싱)과 외부 텍스트 생성 서비스
//! 연결 정보를 정의한다. JSON 파일([`crate::config_manager`])과 환경변수에서 로드.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 분석 파이프라인 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// 외부 LLM API (없으면 템플릿 조언만 사용)
    #[serde(default)]
    pub llm: Option<ExternalApiEndpoint>,
}

// ============================================================
// 분석 설정
// ============================================================

/// 분석 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// 파일 경로에 포함되면 심각도를 Critical로 올리는 마커 (소문자 비교)
    #[serde(default = "default_sensitive_path_markers")]
    pub sensitive_path_markers: Vec<String>,
    /// 스트리밍 분석의 단계 간 간격 (밀리초, 0이면 즉시)
    #[serde(default = "default_stream_step_interval_ms")]
    pub stream_step_interval_ms: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sensitive_path_markers: default_sensitive_path_markers(),
            stream_step_interval_ms: default_stream_step_interval_ms(),
        }
    }
}

// ============================================================
// 외부 API 설정
// ============================================================

/// AI 제공자 타입 — 요청/응답 형식 및 인증 헤더 결정에 사용
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AiProviderType {
    /// Anthropic Messages API (`x-api-key` 헤더)
    Anthropic,
    /// OpenAI Chat Completions 호환
    OpenAi,
    /// 범용 — OpenAI 형식 요청, Bearer 토큰 인증
    #[default]
    Generic,
}

/// 외부 API 엔드포인트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalApiEndpoint {
    /// API URL (예: "https://api.anthropic.com/v1/messages")
    pub endpoint: String,
    /// API 키 (비어 있으면 위임 전략 비활성화)
    #[serde(default)]
    pub api_key: String,
    /// 모델 이름
    #[serde(default)]
    pub model: Option<String>,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
    /// AI 제공자 타입
    #[serde(default)]
    pub provider_type: AiProviderType,
}

impl ExternalApiEndpoint {
    /// 요청 타임아웃을 Duration으로 반환 (최소 1초)
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(MIN_API_TIMEOUT_SECS))
    }
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 위임(LLM) 전략 사용 여부 — 자격증명이 설정된 경우에만 true
    pub fn delegation_enabled(&self) -> bool {
        self.llm
            .as_ref()
            .map(|llm| !llm.api_key.trim().is_empty())
            .unwrap_or(false)
    }

    /// 스트리밍 단계 간격을 Duration으로 반환
    pub fn stream_step_interval(&self) -> Duration {
        Duration::from_millis(self.analysis.stream_step_interval_ms)
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_sensitive_path_markers() -> Vec<String> {
    vec![
        "checkout".to_string(),
        "payment".to_string(),
        "auth".to_string(),
    ]
}

fn default_stream_step_interval_ms() -> u64 {
    300
}

/// 외부 API 타임아웃 하한 (초)
const MIN_API_TIMEOUT_SECS: u64 = 1;

fn default_api_timeout_secs() -> u64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.analysis.sensitive_path_markers.len(), 3);
        assert_eq!(config.stream_step_interval(), Duration::from_millis(300));
        assert!(config.llm.is_none());
    }

    #[test]
    fn llm_endpoint_defaults() {
        let json = r#"{"llm": {"endpoint": "https://api.example.com/v1/messages"}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        let llm = config.llm.as_ref().unwrap();
        assert_eq!(llm.timeout_secs, 20);
        assert_eq!(llm.provider_type, AiProviderType::Generic);
        assert!(llm.model.is_none());
        // 키가 없으면 위임 비활성화
        assert!(!config.delegation_enabled());
    }

    #[test]
    fn zero_timeout_is_raised_to_floor() {
        let json = r#"{"endpoint": "http://localhost", "api_key": "k", "timeout_secs": 0}"#;
        let llm: ExternalApiEndpoint = serde_json::from_str(json).unwrap();
        assert_eq!(llm.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn delegation_requires_non_blank_key() {
        let mut config = AppConfig::default_config();
        config.llm = Some(ExternalApiEndpoint {
            endpoint: "http://localhost".to_string(),
            api_key: "   ".to_string(),
            model: None,
            timeout_secs: 5,
            provider_type: AiProviderType::Anthropic,
        });
        assert!(!config.delegation_enabled());

        if let Some(llm) = config.llm.as_mut() {
            llm.api_key = "sk-test".to_string();
        }
        assert!(config.delegation_enabled());
        assert_eq!(
            config.llm.as_ref().unwrap().timeout(),
            Duration::from_secs(5)
        );
    }
}
