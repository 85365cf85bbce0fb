//! 조언 모델.
//!
//! 근본 원인, 설명, 수정 제안, 예방 팁, 유사 패턴. 분석마다 새로 만들어지며
//! 이 크레이트에서 저장하지 않는다.

use serde::{Deserialize, Serialize};

/// 신뢰도 상한
pub const MAX_CONFIDENCE: u8 = 100;

/// 조언 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceSource {
    /// 정적 템플릿 (오프라인, 결정적)
    Template,
    /// 외부 텍스트 생성 서비스
    Delegated,
}

/// 수정 제안
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedFix {
    /// 예시 코드
    pub code: String,
    /// 수정 설명
    pub description: String,
    /// 신뢰도 (0 ~ 100)
    pub confidence: u8,
}

/// 조언 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationAdvice {
    pub root_cause: String,
    pub explanation: String,
    pub suggested_fix: SuggestedFix,
    pub prevention_tips: Vec<String>,
    pub similar_patterns: Vec<String>,
    pub source: AdviceSource,
}

/// 임의 수치를 [0, 100] 정수 신뢰도로 변환
///
/// 0 < v < 1 인 분수는 비율로 보고 100을 곱한다. NaN은 0.
pub fn clamp_confidence(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    let scaled = if value > 0.0 && value < 1.0 {
        value * 100.0
    } else {
        value
    };
    scaled.round().clamp(0.0, MAX_CONFIDENCE as f64) as u8
}
