//! 에러 리포트 모델.
//!
//! 수집기(브라우저 SDK, 서버 미들웨어)가 보낸 원시 에러 한 건.
//! 요청당 한 번 생성되며 이후 변경하지 않는다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 메타데이터에서 에러 ID를 찾는 키
pub const ERROR_ID_KEY: &str = "error_id";

/// 인바운드 에러 리포트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// 에러 메시지 (필수)
    pub message: String,
    /// 스택 트레이스
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    /// 발생 파일 경로
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// 발생 줄 번호
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 발생 열 번호
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// 환경 태그 (production, staging 등)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// 임의 메타데이터
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ErrorReport {
    /// 메시지만으로 리포트 생성
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack_trace: None,
            file_path: None,
            line: None,
            column: None,
            environment: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    pub fn with_file_path(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    pub fn with_position(mut self, line: u32, column: Option<u32>) -> Self {
        self.line = Some(line);
        self.column = column;
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// 메시지가 비어 있거나 공백뿐인지
    pub fn is_blank(&self) -> bool {
        self.message.trim().is_empty()
    }

    /// 수집기가 지정한 에러 ID (`metadata.error_id`, 문자열만 인정)
    pub fn error_id(&self) -> Option<&str> {
        self.metadata
            .get(ERROR_ID_KEY)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// 메시지 첫 줄 (템플릿 보간용)
    pub fn headline(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }

    /// `path:line:column` 형식 위치 문자열
    pub fn location(&self) -> Option<String> {
        let path = self.file_path.as_deref()?;
        Some(match (self.line, self.column) {
            (Some(line), Some(col)) => format!("{path}:{line}:{col}"),
            (Some(line), None) => format!("{path}:{line}"),
            _ => path.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let report = ErrorReport::new("boom")
            .with_stack_trace("at foo (a.ts:1:2)")
            .with_file_path("src/a.ts")
            .with_position(12, Some(4))
            .with_environment("production");
        assert_eq!(report.stack_trace.as_deref(), Some("at foo (a.ts:1:2)"));
        assert_eq!(report.location().as_deref(), Some("src/a.ts:12:4"));
        assert_eq!(report.environment.as_deref(), Some("production"));
    }

    #[test]
    fn location_variants() {
        assert_eq!(ErrorReport::new("x").location(), None);
        let report = ErrorReport::new("x").with_file_path("a.ts");
        assert_eq!(report.location().as_deref(), Some("a.ts"));
        let report = report.with_position(3, None);
        assert_eq!(report.location().as_deref(), Some("a.ts:3"));
    }

    #[test]
    fn blank_messages() {
        assert!(ErrorReport::new("").is_blank());
        assert!(ErrorReport::new("  \n\t").is_blank());
        assert!(!ErrorReport::new("x").is_blank());
    }

    #[test]
    fn error_id_from_metadata() {
        let report = ErrorReport::new("x").with_metadata(ERROR_ID_KEY, serde_json::json!("err_42"));
        assert_eq!(report.error_id(), Some("err_42"));

        let numeric = ErrorReport::new("x").with_metadata(ERROR_ID_KEY, serde_json::json!(42));
        assert_eq!(numeric.error_id(), None);
    }

    #[test]
    fn headline_is_first_line() {
        let report = ErrorReport::new("TypeError: boom\n    at main.js:1");
        assert_eq!(report.headline(), "TypeError: boom");
    }

    #[test]
    fn deserialize_minimal_report() {
        let report: ErrorReport = serde_json::from_str(r#"{"message": "oops"}"#).unwrap();
        assert_eq!(report.message, "oops");
        assert!(report.metadata.is_empty());
        assert!(report.file_path.is_none());
    }
}
