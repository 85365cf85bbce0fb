//! 영향도 추정기.
//!
//! - [`RandomImpactEstimator`]: 발생 이력이 없을 때 쓰는 범위 제한 임의값
//! - [`OccurrenceImpactEstimator`]: [`OccurrenceStore`] 집계 기반, 실패 시 임의값
//!
//! 두 구현 모두 [`ImpactEstimator`] 포트를 따르므로 호출자는 교체를 알 필요가 없다.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, warn};

use triage_core::models::impact::{ImpactEstimate, RegionShare};
use triage_core::ports::impact_estimator::ImpactEstimator;
use triage_core::ports::occurrence_store::{OccurrenceCounts, OccurrenceStore, TimeRange};

/// 임의 추정 지역 라벨
const REGIONS: [&str; 3] = ["North America", "Europe", "Asia Pacific"];

/// 영향 사용자 수 범위
const USERS_MIN: u64 = 10;
const USERS_MAX: u64 = 500;

/// 사용자당 최대 손실 매출
const MAX_REVENUE_PER_USER: f64 = 10.0;

/// 임의값 영향도 추정기 (자리표시자)
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomImpactEstimator;

impl RandomImpactEstimator {
    pub fn new() -> Self {
        Self
    }

    /// 주어진 난수 생성기로 추정치 생성
    pub fn sample_with<R: Rng>(rng: &mut R) -> ImpactEstimate {
        let affected_users = rng.gen_range(USERS_MIN..=USERS_MAX);
        let sessions = rng.gen_range(affected_users..=affected_users * 3);
        let revenue = round_cents(affected_users as f64 * rng.gen_range(0.0..=MAX_REVENUE_PER_USER));

        let first = rng.gen_range(30..=60u8);
        let second = rng.gen_range(10..=(95 - first));
        let third = 100 - first - second;

        ImpactEstimate {
            affected_users,
            sessions,
            revenue,
            regions_affected: REGIONS
                .iter()
                .zip([first, second, third])
                .map(|(region, percentage)| RegionShare {
                    region: region.to_string(),
                    percentage,
                })
                .collect(),
        }
    }

    pub fn sample(&self) -> ImpactEstimate {
        Self::sample_with(&mut rand::thread_rng())
    }
}

#[async_trait]
impl ImpactEstimator for RandomImpactEstimator {
    async fn estimate_impact(&self, error_id: &str) -> ImpactEstimate {
        let estimate = self.sample();
        debug!(error_id, users = estimate.affected_users, "임의 영향도 추정");
        estimate
    }
}

/// 발생 이력 기반 영향도 추정기
pub struct OccurrenceImpactEstimator {
    store: Arc<dyn OccurrenceStore>,
    fallback: RandomImpactEstimator,
    window_hours: i64,
    revenue_per_session: f64,
}

impl OccurrenceImpactEstimator {
    /// 기본 24시간 구간, 세션당 손실 1.5
    pub fn new(store: Arc<dyn OccurrenceStore>) -> Self {
        Self {
            store,
            fallback: RandomImpactEstimator::new(),
            window_hours: 24,
            revenue_per_session: 1.5,
        }
    }

    pub fn with_window_hours(mut self, hours: i64) -> Self {
        self.window_hours = hours.max(1);
        self
    }

    pub fn with_revenue_per_session(mut self, amount: f64) -> Self {
        self.revenue_per_session = amount.max(0.0);
        self
    }

    fn from_counts(&self, counts: &OccurrenceCounts) -> ImpactEstimate {
        if counts.occurrences == 0 {
            return ImpactEstimate::none();
        }

        let total: u64 = counts.by_region.iter().map(|(_, n)| *n).sum();
        let regions_affected = if total == 0 {
            Vec::new()
        } else {
            counts
                .by_region
                .iter()
                .map(|(region, n)| RegionShare {
                    region: region.clone(),
                    percentage: ((*n as f64 / total as f64) * 100.0).round() as u8,
                })
                .collect()
        };

        ImpactEstimate {
            affected_users: counts.unique_users,
            sessions: counts.sessions,
            revenue: round_cents(counts.sessions as f64 * self.revenue_per_session),
            regions_affected,
        }
    }
}

#[async_trait]
impl ImpactEstimator for OccurrenceImpactEstimator {
    async fn estimate_impact(&self, error_id: &str) -> ImpactEstimate {
        let range = TimeRange::last_hours(self.window_hours);
        match self.store.occurrence_counts(error_id, range).await {
            Ok(counts) => self.from_counts(&counts),
            Err(e) => {
                warn!(error_id, "발생 횟수 조회 실패, 임의 추정으로 대체: {e}");
                self.fallback.sample()
            }
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value.max(0.0) * 100.0).round() / 100.0
}
