//! 영향도 모델.

use serde::{Deserialize, Serialize};

/// 지역별 영향 비율
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionShare {
    /// 지역 라벨
    pub region: String,
    /// 비율 (%)
    pub percentage: u8,
}

/// 영향도 추정치
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactEstimate {
    pub affected_users: u64,
    pub sessions: u64,
    /// 추정 매출 손실 (음수 아님)
    pub revenue: f64,
    pub regions_affected: Vec<RegionShare>,
}

impl ImpactEstimate {
    /// 영향 없음
    pub fn none() -> Self {
        Self {
            affected_users: 0,
            sessions: 0,
            revenue: 0.0,
            regions_affected: Vec::new(),
        }
    }
}
