//! 에러 분류기.
//!
//! 메시지와 스택 트레이스를 소문자로 합친 문자열에 순서 있는 정규식 규칙을 적용하고,
//! 처음 일치한 규칙의 유형을 반환한다. 규칙 순서가 곧 우선순위다.
//! 예: "database query timeout" 은 api-timeout 규칙이 먼저라서 api-timeout.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use triage_core::models::classification::ErrorType;
use triage_core::models::report::ErrorReport;

/// 분류 규칙 한 개
struct ClassificationRule {
    error_type: ErrorType,
    pattern: Regex,
}

/// (유형, 패턴) — 입력은 이미 소문자
///
/// 각 패턴은 토큰 목록의 단순 OR다. 단어 경계를 두지 않으므로
/// "http502", "mssql" 같은 붙은 표기도 일치한다.
const RULE_SOURCES: [(ErrorType, &str); 10] = [
    (
        ErrorType::NullReference,
        r"cannot read propert(?:y|ies) of (?:undefined|null)|undefined is not an object|is not a function|null pointer|nullpointerexception|of undefined|of null",
    ),
    (
        ErrorType::ApiTimeout,
        r"timeout|timed out|etimedout|504|502|gateway",
    ),
    (
        ErrorType::AuthFailure,
        r"unauthori[sz]ed|401|403|forbidden|invalid token|jwt|authentication",
    ),
    (
        ErrorType::DatabaseError,
        r"database|mongo|sql|econnrefused.*27017|deadlock|duplicate key|connection pool",
    ),
    (
        ErrorType::CorsError,
        r"cors|access-control-allow-origin|cross-origin",
    ),
    (
        ErrorType::MemoryLeak,
        r"out of memory|heap|memory leak|allocation failed",
    ),
    (
        ErrorType::RateLimit,
        r"rate limit|too many requests|429|throttl",
    ),
    (
        ErrorType::WebsocketError,
        r"websocket|socket hang up|ws://|wss://",
    ),
    (
        ErrorType::ThirdPartyFailure,
        r"stripe|paypal|twilio|sendgrid|third[- ]party|external service",
    ),
    (
        ErrorType::ConfigError,
        r"config|environment variable|missing env|not defined|\.env",
    ),
];

static RULES: Lazy<Vec<ClassificationRule>> = Lazy::new(|| {
    RULE_SOURCES
        .iter()
        .filter_map(|(error_type, source)| {
            Regex::new(source).ok().map(|pattern| ClassificationRule {
                error_type: *error_type,
                pattern,
            })
        })
        .collect()
});

/// 에러 분류기 (상태 없음)
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    /// 메시지 + 스택 트레이스 분류
    ///
    /// 빈 메시지는 규칙을 평가하지 않고 `Unknown`.
    pub fn classify(&self, message: &str, stack_trace: Option<&str>) -> ErrorType {
        classify(message, stack_trace)
    }

    /// 리포트 분류
    pub fn classify_report(&self, report: &ErrorReport) -> ErrorType {
        classify(&report.message, report.stack_trace.as_deref())
    }
}

/// 메시지 + 스택 트레이스 분류 (자유 함수 형태)
pub fn classify(message: &str, stack_trace: Option<&str>) -> ErrorType {
    if message.trim().is_empty() {
        debug!("빈 메시지 — 분류 생략");
        return ErrorType::Unknown;
    }

    let mut haystack = message.to_lowercase();
    if let Some(trace) = stack_trace {
        haystack.push('\n');
        haystack.push_str(&trace.to_lowercase());
    }

    RULES
        .iter()
        .find(|rule| rule.pattern.is_match(&haystack))
        .map(|rule| rule.error_type)
        .unwrap_or(ErrorType::Unknown)
}
