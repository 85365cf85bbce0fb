//! 결과 조립기.
//!
//! 분류 → (심각도, 조언, 컴포넌트, 영향도) → [`AnalysisResult`] 단일 패스.
//! 스트리밍 변형은 UI 페이싱용 진행 마커를 먼저 내보낸 뒤 결과와 종료 마커를 보낸다.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use triage_core::config::AppConfig;
use triage_core::models::analysis::{AnalysisEvent, AnalysisResult, AnalysisStep};
use triage_core::models::report::ErrorReport;
use triage_core::ports::impact_estimator::ImpactEstimator;
use triage_core::ports::text_generator::TextGenerator;

use crate::advisor::RemediationAdvisor;
use crate::classifier::ErrorClassifier;
use crate::components;
use crate::impact::RandomImpactEstimator;
use crate::severity::SeverityResolver;

/// 스트림 채널 용량 (진행 5 + 결과 + 종료)
const STREAM_CHANNEL_CAPACITY: usize = 8;

/// 분석기 — 요청마다 독립적이며 공유 가변 상태가 없다
pub struct Analyzer {
    classifier: ErrorClassifier,
    severity: SeverityResolver,
    advisor: RemediationAdvisor,
    impact: Arc<dyn ImpactEstimator>,
    step_interval: Duration,
}

impl Analyzer {
    pub fn new(
        severity: SeverityResolver,
        advisor: RemediationAdvisor,
        impact: Arc<dyn ImpactEstimator>,
    ) -> Self {
        Self {
            classifier: ErrorClassifier::new(),
            severity,
            advisor,
            impact,
            step_interval: Duration::ZERO,
        }
    }

    /// 설정 기반 생성
    ///
    /// 자격증명이 설정되어 있고 생성기가 주어지면 위임 전략, 아니면 템플릿 전략.
    pub fn from_config(config: &AppConfig, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        let advisor = match (config.llm.as_ref(), generator) {
            (Some(llm), Some(generator)) if config.delegation_enabled() => {
                RemediationAdvisor::delegated(generator, llm.timeout())
            }
            _ => RemediationAdvisor::template(),
        };
        debug!(strategy = ?advisor.strategy(), "분석기 구성");

        Self::new(
            SeverityResolver::from_config(&config.analysis),
            advisor,
            Arc::new(RandomImpactEstimator::new()),
        )
        .with_step_interval(config.stream_step_interval())
    }

    /// 스트리밍 단계 간격 설정
    pub fn with_step_interval(mut self, interval: Duration) -> Self {
        self.step_interval = interval;
        self
    }

    pub fn advisor(&self) -> &RemediationAdvisor {
        &self.advisor
    }

    /// 단일 패스 분석 — 항상 완전한 결과를 반환
    pub async fn analyze(&self, report: &ErrorReport) -> AnalysisResult {
        let error_id = report
            .error_id()
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let error_type = self.classifier.classify_report(report);
        let severity = self.severity.resolve(error_type, report);
        let recommended_components = components::recommended_component_ids(error_type);

        let (advice, impact) = tokio::join!(
            self.advisor.advise(error_type, report),
            self.impact.estimate_impact(&error_id),
        );

        info!(
            error_id = %error_id,
            error_type = %error_type,
            severity = ?severity,
            source = ?advice.source,
            "에러 분석 완료"
        );

        AnalysisResult {
            error_id,
            error_type,
            category: error_type.category(),
            severity,
            recommended_components,
            advice,
            impact,
            analyzed_at: Utc::now(),
        }
    }

    /// 스트리밍 분석
    ///
    /// 진행 마커 5개 → 결과 → 종료 순서로 보낸다. 수신자가 닫히면 조용히 멈춘다.
    pub fn analyze_stream(self: Arc<Self>, report: ErrorReport) -> mpsc::Receiver<AnalysisEvent> {
        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        tokio::spawn(self.emit_stream(report, tx));
        rx
    }

    /// 이벤트 방출 — 실제로 보낸 이벤트 수를 반환
    async fn emit_stream(
        self: Arc<Self>,
        report: ErrorReport,
        tx: mpsc::Sender<AnalysisEvent>,
    ) -> usize {
        let mut sent = 0usize;

        let pacing = async {
            for (i, step) in AnalysisStep::SEQUENCE.iter().enumerate() {
                if i > 0 && !self.step_interval.is_zero() {
                    tokio::time::sleep(self.step_interval).await;
                }
                let event = AnalysisEvent::Progress {
                    step: *step,
                    message: step.message().to_string(),
                };
                if tx.send(event).await.is_err() {
                    return false;
                }
                sent += 1;
            }
            true
        };

        let (result, receiver_alive) = tokio::join!(self.analyze(&report), pacing);
        if !receiver_alive {
            debug!(sent, "스트림 수신자 종료 — 방출 중단");
            return sent;
        }

        for event in [AnalysisEvent::Result(Box::new(result)), AnalysisEvent::Complete] {
            if tx.send(event).await.is_err() {
                debug!(sent, "스트림 수신자 종료 — 방출 중단");
                return sent;
            }
            sent += 1;
        }
        sent
    }
}
