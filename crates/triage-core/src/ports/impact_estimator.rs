//! 영향도 추정 포트.
//!
//! 반환 형태는 구현체(임의값 자리표시자, 저장소 집계)와 무관하게 고정이다.

use async_trait::async_trait;

use crate::models::impact::ImpactEstimate;

/// 영향도 추정기 — 실패하지 않는다 (구현체가 내부에서 흡수)
#[async_trait]
pub trait ImpactEstimator: Send + Sync {
    async fn estimate_impact(&self, error_id: &str) -> ImpactEstimate;
}
