//! 분류 모델.
//!
//! 에러 유형, 카테고리, 심각도. 유형 → 카테고리 매핑은 리포트 내용과
//! 무관한 순수 함수이며, 리포트 문맥으로 바뀔 수 있는 것은 심각도뿐이다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 에러 유형 (패턴 매칭 결과)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorType {
    NullReference,
    ApiTimeout,
    AuthFailure,
    DatabaseError,
    CorsError,
    MemoryLeak,
    RateLimit,
    WebsocketError,
    ThirdPartyFailure,
    ConfigError,
    /// 어떤 규칙에도 맞지 않음
    Unknown,
}

impl ErrorType {
    /// 모든 유형 (선언 순서)
    pub const ALL: [ErrorType; 11] = [
        ErrorType::NullReference,
        ErrorType::ApiTimeout,
        ErrorType::AuthFailure,
        ErrorType::DatabaseError,
        ErrorType::CorsError,
        ErrorType::MemoryLeak,
        ErrorType::RateLimit,
        ErrorType::WebsocketError,
        ErrorType::ThirdPartyFailure,
        ErrorType::ConfigError,
        ErrorType::Unknown,
    ];

    /// 직렬화 이름과 동일한 식별자
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::NullReference => "null-reference",
            ErrorType::ApiTimeout => "api-timeout",
            ErrorType::AuthFailure => "auth-failure",
            ErrorType::DatabaseError => "database-error",
            ErrorType::CorsError => "cors-error",
            ErrorType::MemoryLeak => "memory-leak",
            ErrorType::RateLimit => "rate-limit",
            ErrorType::WebsocketError => "websocket-error",
            ErrorType::ThirdPartyFailure => "third-party-failure",
            ErrorType::ConfigError => "config-error",
            ErrorType::Unknown => "unknown",
        }
    }

    /// 기본 카테고리
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorType::NullReference | ErrorType::CorsError => ErrorCategory::Frontend,
            ErrorType::ApiTimeout
            | ErrorType::AuthFailure
            | ErrorType::RateLimit
            | ErrorType::Unknown => ErrorCategory::Backend,
            ErrorType::DatabaseError => ErrorCategory::Database,
            ErrorType::MemoryLeak | ErrorType::WebsocketError | ErrorType::ConfigError => {
                ErrorCategory::Infrastructure
            }
            ErrorType::ThirdPartyFailure => ErrorCategory::ThirdParty,
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('_', "-");
        ErrorType::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| CoreError::Validation {
                field: "error_type".to_string(),
                message: format!("알 수 없는 에러 유형: {s}"),
            })
    }
}

/// 에러 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    Frontend,
    Backend,
    Database,
    Infrastructure,
    ThirdParty,
}

/// 심각도 (비교/정렬 가능)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_match_as_str() {
        for t in ErrorType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn parse_accepts_snake_and_kebab() {
        assert_eq!("cors-error".parse::<ErrorType>().unwrap(), ErrorType::CorsError);
        assert_eq!(
            "THIRD_PARTY_FAILURE".parse::<ErrorType>().unwrap(),
            ErrorType::ThirdPartyFailure
        );
        assert!(matches!(
            "segfault".parse::<ErrorType>(),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn category_serialization() {
        assert_eq!(
            serde_json::to_string(&ErrorCategory::ThirdParty).unwrap(),
            "\"third-party\""
        );
        assert_eq!(ErrorType::CorsError.category(), ErrorCategory::Frontend);
        assert_eq!(ErrorType::DatabaseError.category(), ErrorCategory::Database);
        assert_eq!(
            ErrorType::ThirdPartyFailure.category(),
            ErrorCategory::ThirdParty
        );
    }

    #[test]
    fn severity_sorts() {
        let mut levels = vec![Severity::High, Severity::Low, Severity::Critical, Severity::Medium];
        levels.sort();
        assert_eq!(
            levels,
            vec![Severity::Low, Severity::Medium, Severity::High, Severity::Critical]
        );
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");
    }
}
