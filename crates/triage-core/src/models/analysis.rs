//! 분석 결과 모델.
//!
//! [`AnalysisResult`]는 파이프라인의 유일한 외부 출력이며,
//! [`AnalysisEvent`]는 스트리밍 변형이 UI로 내보내는 이벤트다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::advice::RemediationAdvice;
use super::classification::{ErrorCategory, ErrorType, Severity};
use super::impact::ImpactEstimate;

/// 분석 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 에러 ID (리포트 메타데이터 또는 새로 생성)
    pub error_id: String,
    pub error_type: ErrorType,
    pub category: ErrorCategory,
    pub severity: Severity,
    /// UI 컴포넌트 식별자 (순서 유지, 비어 있지 않음)
    pub recommended_components: Vec<String>,
    pub advice: RemediationAdvice,
    pub impact: ImpactEstimate,
    pub analyzed_at: DateTime<Utc>,
}

/// 스트리밍 진행 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStep {
    Identify,
    Analyze,
    Similar,
    Fix,
    Components,
}

impl AnalysisStep {
    /// 방출 순서
    pub const SEQUENCE: [AnalysisStep; 5] = [
        AnalysisStep::Identify,
        AnalysisStep::Analyze,
        AnalysisStep::Similar,
        AnalysisStep::Fix,
        AnalysisStep::Components,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStep::Identify => "identify",
            AnalysisStep::Analyze => "analyze",
            AnalysisStep::Similar => "similar",
            AnalysisStep::Fix => "fix",
            AnalysisStep::Components => "components",
        }
    }

    /// UI 표시용 문구
    pub fn message(&self) -> &'static str {
        match self {
            AnalysisStep::Identify => "Identifying error type",
            AnalysisStep::Analyze => "Analyzing root cause",
            AnalysisStep::Similar => "Searching similar errors",
            AnalysisStep::Fix => "Generating suggested fix",
            AnalysisStep::Components => "Selecting components",
        }
    }
}

/// 스트리밍 이벤트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum AnalysisEvent {
    /// 진행 마커 (UI 페이싱 전용)
    Progress {
        step: AnalysisStep,
        message: String,
    },
    /// 최종 결과
    Result(Box<AnalysisResult>),
    /// 종료 마커
    Complete,
}

impl AnalysisEvent {
    /// SSE `event:` 필드 등에 쓰는 이름
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisEvent::Progress { .. } => "progress",
            AnalysisEvent::Result(_) => "result",
            AnalysisEvent::Complete => "complete",
        }
    }
}
