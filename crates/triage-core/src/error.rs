//! TRIAGE 핵심 에러 타입.
//!
//! 어댑터 crate와 설정 레이어가 공유한다. 분석 파이프라인 자체는
//! 외부 서비스 실패를 템플릿 조언으로 흡수하므로 이 에러를 호출자에게 노출하지 않는다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 네트워크 에러 (연결 실패, 응답 읽기 실패)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 외부 호출 타임아웃
    #[error("외부 호출 타임아웃: {timeout_ms}ms 초과")]
    Timeout {
        /// 초과된 타임아웃 시간 (밀리초)
        timeout_ms: u64,
    },

    /// 외부 서비스가 에러를 보고함 (non-2xx, 에러 페이로드)
    #[error("외부 서비스 에러: {0}")]
    ServiceUnavailable(String),

    /// 외부 응답에서 기대한 구조를 찾지 못함
    #[error("응답 파싱 실패: {0}")]
    ResponseParse(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
