//! 외부 AI LLM 클라이언트.
//!
//! 위임 조언 전략이 사용하는 텍스트 생성기. 프롬프트를 보내고 응답 텍스트만 돌려준다.
//! 조언 구조 파싱은 분석 crate가 담당한다.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use triage_core::config::{AiProviderType, ExternalApiEndpoint};
use triage_core::error::CoreError;
use triage_core::ports::text_generator::TextGenerator;

/// Anthropic 기본 모델
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5-20250929";
/// OpenAI 호환 기본 모델
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
/// Anthropic API 버전 헤더
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// 응답 최대 토큰
const MAX_TOKENS: u32 = 1024;
/// 에러 본문 미리보기 길이
const ERROR_BODY_PREVIEW: usize = 200;

/// 시스템 프롬프트
const SYSTEM_PROMPT: &str = "You are an assistant that diagnoses production errors for web \
applications. Answer with a single JSON object and nothing else.";

// ============================================================
// RemoteTextGenerator
// ============================================================

/// 외부 AI LLM 텍스트 생성기
///
/// 지원 API:
/// - Claude (Anthropic): `POST /v1/messages`
/// - OpenAI 호환: `POST /v1/chat/completions`
#[derive(Debug)]
pub struct RemoteTextGenerator {
    http_client: reqwest::Client,
    endpoint: String,
    /// API 키 (메모리에만 유지)
    api_key: String,
    model: String,
    provider_type: AiProviderType,
    timeout: Duration,
}

impl RemoteTextGenerator {
    pub fn new(config: &ExternalApiEndpoint) -> Result<Self, CoreError> {
        if config.api_key.trim().is_empty() {
            return Err(CoreError::Config("LLM API 키 미설정".into()));
        }
        if config.endpoint.trim().is_empty() {
            return Err(CoreError::Config("LLM 엔드포인트 미설정".into()));
        }

        let timeout = config.timeout();
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        let model = config.model.clone().unwrap_or_else(|| {
            match config.provider_type {
                AiProviderType::Anthropic => DEFAULT_ANTHROPIC_MODEL,
                AiProviderType::OpenAi | AiProviderType::Generic => DEFAULT_OPENAI_MODEL,
            }
            .to_string()
        });

        debug!(
            endpoint = %config.endpoint,
            model = %model,
            provider = ?config.provider_type,
            timeout_ms = timeout.as_millis() as u64,
            "RemoteTextGenerator 초기화"
        );

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model,
            provider_type: config.provider_type,
            timeout,
        })
    }

    fn is_anthropic(&self) -> bool {
        self.provider_type == AiProviderType::Anthropic
    }

    /// 제공자별 요청 본문
    fn request_body(&self, prompt: &str) -> serde_json::Value {
        if self.is_anthropic() {
            serde_json::json!({
                "model": self.model,
                "max_tokens": MAX_TOKENS,
                "system": SYSTEM_PROMPT,
                "messages": [{
                    "role": "user",
                    "content": prompt
                }]
            })
        } else {
            serde_json::json!({
                "model": self.model,
                "max_tokens": MAX_TOKENS,
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": prompt }
                ]
            })
        }
    }

    /// Claude 응답: `content[*].text` 블록을 이어 붙인다
    fn parse_claude_response(body: &str) -> Result<String, CoreError> {
        let response: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| CoreError::ResponseParse(format!("LLM 응답 JSON 파싱 실패: {}", e)))?;

        let text: String = response
            .get("content")
            .and_then(|c| c.as_array())
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(CoreError::ResponseParse(
                "LLM 응답에서 텍스트를 찾을 수 없음".to_string(),
            ));
        }
        Ok(text)
    }

    /// OpenAI 응답: `choices[0].message.content`
    fn parse_openai_response(body: &str) -> Result<String, CoreError> {
        let response: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| CoreError::ResponseParse(format!("LLM 응답 JSON 파싱 실패: {}", e)))?;

        response
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(|t| t.as_str())
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                CoreError::ResponseParse("OpenAI 응답에서 텍스트를 찾을 수 없음".to_string())
            })
    }

    fn map_send_error(&self, e: reqwest::Error) -> CoreError {
        if e.is_timeout() {
            CoreError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            CoreError::Network(format!("LLM API 호출 실패: {}", e))
        }
    }
}

#[async_trait]
impl TextGenerator for RemoteTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, CoreError> {
        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            prompt_len = prompt.len(),
            "외부 LLM API 호출"
        );

        let mut builder = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt));

        if self.is_anthropic() {
            builder = builder
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION);
        } else {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            warn!(status = %status, "LLM API 오류 응답");
            return Err(CoreError::ServiceUnavailable(format!(
                "LLM API 오류 ({}): {}",
                status,
                body.chars().take(ERROR_BODY_PREVIEW).collect::<String>()
            )));
        }

        let text = if self.is_anthropic() {
            Self::parse_claude_response(&body)?
        } else {
            Self::parse_openai_response(&body)?
        };

        debug!(text_len = text.len(), "LLM 응답 수신");
        Ok(text)
    }

    fn provider_name(&self) -> &str {
        &self.model
    }
}

// ============================================================
// 테스트
// ============================================================
