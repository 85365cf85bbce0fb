//! 추천 UI 컴포넌트 조회표.
//!
//! 식별자는 UI 협력자에게 불투명한 문자열이며, 조언 전략과 무관하게 고정이다.

use triage_core::models::classification::ErrorType;

/// 유형별 추천 컴포넌트 (순서 유지, 항상 비어 있지 않음)
pub fn recommended_components(error_type: ErrorType) -> &'static [&'static str] {
    match error_type {
        ErrorType::NullReference => &["UserJourney", "StackTrace", "SimilarErrors", "SuggestedFix"],
        ErrorType::ApiTimeout => &[
            "NetworkWaterfall",
            "ResponseTimeChart",
            "ImpactMap",
            "SuggestedFix",
        ],
        ErrorType::AuthFailure => &["AuthFlowDiagram", "UserJourney", "StackTrace", "SuggestedFix"],
        ErrorType::DatabaseError => &["QueryAnalyzer", "StackTrace", "ImpactMap", "SuggestedFix"],
        ErrorType::CorsError => &["NetworkWaterfall", "HeaderInspector", "SuggestedFix"],
        ErrorType::MemoryLeak => &["MemoryChart", "StackTrace", "SimilarErrors", "SuggestedFix"],
        ErrorType::RateLimit => &["RequestRateChart", "ImpactMap", "SuggestedFix"],
        ErrorType::WebsocketError => &["ConnectionTimeline", "NetworkWaterfall", "SuggestedFix"],
        ErrorType::ThirdPartyFailure => &[
            "ServiceStatus",
            "NetworkWaterfall",
            "ImpactMap",
            "SuggestedFix",
        ],
        ErrorType::ConfigError => &["ConfigDiff", "StackTrace", "SuggestedFix"],
        ErrorType::Unknown => DEFAULT_COMPONENTS,
    }
}

/// 분류 불가 시 기본 목록
pub const DEFAULT_COMPONENTS: &[&str] = &["StackTrace", "SimilarErrors", "SuggestedFix"];

/// 소유 문자열 목록으로 변환 (결과 조립용)
pub fn recommended_component_ids(error_type: ErrorType) -> Vec<String> {
    recommended_components(error_type)
        .iter()
        .map(|id| id.to_string())
        .collect()
}
