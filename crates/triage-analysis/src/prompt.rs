//! 위임 전략용 프롬프트 구성.
//!
//! 리포트 문맥과 응답 JSON 필드 이름을 한 개의 텍스트 프롬프트에 담는다.
//! 필드 이름은 [`crate::extraction`]이 읽는 이름과 같아야 한다.

use triage_core::models::classification::ErrorType;
use triage_core::models::report::ErrorReport;

/// 프롬프트에 넣는 스택 트레이스 최대 길이 (문자)
const MAX_STACK_CHARS: usize = 2_000;

/// 응답 스키마 설명
const RESPONSE_SCHEMA: &str = r#"{
  "rootCause": "one sentence naming the root cause",
  "explanation": "two or three sentences for a developer",
  "suggestedFix": {
    "code": "a minimal code snippet that fixes the problem",
    "description": "what the snippet changes",
    "confidence": 0-100
  },
  "preventionTips": ["tip", "tip"],
  "similarPatterns": ["related error message", "related error message"]
}"#;

/// 프롬프트 생성
pub fn build_prompt(error_type: ErrorType, report: &ErrorReport) -> String {
    let mut prompt = String::new();
    prompt.push_str("You are a senior engineer triaging a production error.\n");
    prompt.push_str(&format!(
        "The error was classified as \"{}\" (category: {:?}).\n\n",
        error_type,
        error_type.category()
    ));

    prompt.push_str(&format!("Error message:\n{}\n", report.message.trim()));

    if let Some(trace) = report.stack_trace.as_deref().filter(|t| !t.trim().is_empty()) {
        let trimmed: String = trace.chars().take(MAX_STACK_CHARS).collect();
        prompt.push_str(&format!("\nStack trace:\n{}\n", trimmed));
    }
    if let Some(location) = report.location() {
        prompt.push_str(&format!("\nLocation: {}\n", location));
    }
    if let Some(env) = &report.environment {
        prompt.push_str(&format!("Environment: {}\n", env));
    }
    if !report.metadata.is_empty() {
        if let Ok(meta) = serde_json::to_string(&report.metadata) {
            prompt.push_str(&format!("Metadata: {}\n", meta));
        }
    }

    prompt.push_str("\nRespond with a single JSON object using exactly these fields:\n");
    prompt.push_str(RESPONSE_SCHEMA);
    prompt.push_str("\nRespond with JSON only.");
    prompt
}
