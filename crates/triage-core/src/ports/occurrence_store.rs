//! 발생 이력 저장소 포트.
//!
//! 과거 에러 요약과 발생 횟수를 제공하는 영속성 협력자.
//! 이 워크스페이스에는 구현체가 없으며, 연결되면 유사 패턴과
//! 영향도 추정이 이 포트를 통해 실제 데이터를 사용한다.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 과거 에러 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PastErrorSummary {
    pub error_id: String,
    pub message: String,
    /// 당시 적용된 해결책 (있으면)
    pub resolution: Option<String>,
    pub last_seen: DateTime<Utc>,
}

impl PastErrorSummary {
    /// 유사 패턴 목록에 넣을 한 줄 설명
    pub fn describe(&self) -> String {
        match &self.resolution {
            Some(fix) => format!("{} (resolved: {})", self.message, fix),
            None => self.message.clone(),
        }
    }
}

/// 조회 구간
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    /// 지금부터 `hours` 시간 전까지
    pub fn last_hours(hours: i64) -> Self {
        let to = Utc::now();
        Self {
            from: to - Duration::hours(hours),
            to,
        }
    }
}

/// 발생 횟수 집계
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceCounts {
    pub occurrences: u64,
    pub unique_users: u64,
    pub sessions: u64,
    /// 지역 라벨 → 발생 횟수
    pub by_region: Vec<(String, u64)>,
}

/// 발생 이력 저장소
#[async_trait]
pub trait OccurrenceStore: Send + Sync {
    /// 메시지 키워드로 과거 유사 에러 검색
    async fn find_similar_by_keyword(
        &self,
        message: &str,
    ) -> Result<Vec<PastErrorSummary>, CoreError>;

    /// 구간 내 발생 횟수 집계
    async fn occurrence_counts(
        &self,
        error_id: &str,
        range: TimeRange,
    ) -> Result<OccurrenceCounts, CoreError>;
}
