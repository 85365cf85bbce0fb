//! 조언기.
//!
//! 두 전략:
//! - 템플릿: 정적 레코드 기반, 항상 성공
//! - 위임: 외부 텍스트 생성기 호출 후 응답 파싱
//!
//! 위임 전략이 어떤 이유로든 실패하면 (전송 오류, 타임아웃, 파싱 실패)
//! 해당 요청에 한해 템플릿 조언을 반환한다. 재시도는 하지 않는다.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use triage_core::error::CoreError;
use triage_core::models::advice::RemediationAdvice;
use triage_core::models::classification::ErrorType;
use triage_core::models::report::ErrorReport;
use triage_core::ports::occurrence_store::OccurrenceStore;
use triage_core::ports::text_generator::TextGenerator;

use crate::{components, extraction, prompt, templates};

/// 유사 패턴 최대 개수 (저장소 조회 시)
const MAX_SIMILAR_PATTERNS: usize = 5;

/// 조언 전략
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceStrategy {
    Template,
    Delegated,
}

/// 조언기 (상태 없음, `Arc`로 공유)
pub struct RemediationAdvisor {
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
    occurrence_store: Option<Arc<dyn OccurrenceStore>>,
}

impl RemediationAdvisor {
    /// 템플릿 전용 조언기
    pub fn template() -> Self {
        Self {
            generator: None,
            timeout: Duration::ZERO,
            occurrence_store: None,
        }
    }

    /// 위임 조언기 — `timeout` 안에 응답이 없으면 템플릿으로 대체
    pub fn delegated(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self {
            generator: Some(generator),
            timeout,
            occurrence_store: None,
        }
    }

    /// 유사 패턴을 과거 이력으로 대체할 저장소 연결
    pub fn with_occurrence_store(mut self, store: Arc<dyn OccurrenceStore>) -> Self {
        self.occurrence_store = Some(store);
        self
    }

    pub fn strategy(&self) -> AdviceStrategy {
        if self.generator.is_some() {
            AdviceStrategy::Delegated
        } else {
            AdviceStrategy::Template
        }
    }

    /// 추천 컴포넌트 (전략과 무관)
    pub fn recommended_components(&self, error_type: ErrorType) -> &'static [&'static str] {
        components::recommended_components(error_type)
    }

    /// 조언 생성 — 실패하지 않는다
    pub async fn advise(&self, error_type: ErrorType, report: &ErrorReport) -> RemediationAdvice {
        let mut advice = templates::render(error_type, report);

        if report.is_blank() {
            // 빈 입력은 외부 호출 없이 최저 신뢰도
            advice.suggested_fix.confidence = 0;
            return advice;
        }

        if let Some(generator) = &self.generator {
            match self.delegate(generator.as_ref(), error_type, report, &advice).await {
                Ok(delegated) => advice = delegated,
                Err(e) => {
                    warn!(
                        provider = generator.provider_name(),
                        error_type = %error_type,
                        "위임 조언 실패, 템플릿으로 대체: {e}"
                    );
                }
            }
        }

        if let Some(store) = &self.occurrence_store {
            match store.find_similar_by_keyword(report.headline()).await {
                Ok(past) if !past.is_empty() => {
                    advice.similar_patterns = past
                        .iter()
                        .take(MAX_SIMILAR_PATTERNS)
                        .map(|p| p.describe())
                        .collect();
                }
                Ok(_) => debug!("유사 에러 이력 없음"),
                Err(e) => warn!("유사 에러 조회 실패, 기존 패턴 유지: {e}"),
            }
        }

        advice
    }

    async fn delegate(
        &self,
        generator: &dyn TextGenerator,
        error_type: ErrorType,
        report: &ErrorReport,
        fallback: &RemediationAdvice,
    ) -> Result<RemediationAdvice, CoreError> {
        let prompt = prompt::build_prompt(error_type, report);
        debug!(
            provider = generator.provider_name(),
            prompt_len = prompt.len(),
            "위임 조언 요청"
        );

        let text = tokio::time::timeout(self.timeout, generator.generate(&prompt))
            .await
            .map_err(|_| CoreError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            })??;

        let advice = extraction::parse_advice(&text, fallback)?;
        debug!(
            confidence = advice.suggested_fix.confidence,
            "위임 조언 파싱 완료"
        );
        Ok(advice)
    }
}

impl Default for RemediationAdvisor {
    fn default() -> Self {
        Self::template()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use triage_core::models::advice::AdviceSource;
    use triage_core::ports::occurrence_store::{OccurrenceCounts, PastErrorSummary, TimeRange};

    /// 고정 응답/에러를 반환하는 생성기
    struct StubGenerator {
        response: Result<String, String>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl StubGenerator {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(text.to_string()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(msg: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Err(msg.to_string()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(text: &str, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(text.to_string()),
                delay,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.response.clone().map_err(CoreError::Network)
        }

        fn provider_name(&self) -> &str {
            "stub"
        }
    }

    struct StubStore {
        similar: Result<Vec<PastErrorSummary>, String>,
    }

    #[async_trait]
    impl OccurrenceStore for StubStore {
        async fn find_similar_by_keyword(
            &self,
            _message: &str,
        ) -> Result<Vec<PastErrorSummary>, CoreError> {
            self.similar.clone().map_err(CoreError::Internal)
        }

        async fn occurrence_counts(
            &self,
            _error_id: &str,
            _range: TimeRange,
        ) -> Result<OccurrenceCounts, CoreError> {
            Err(CoreError::Internal("unused".to_string()))
        }
    }

    fn report() -> ErrorReport {
        ErrorReport::new("TypeError: Cannot read property 'profile' of undefined")
            .with_file_path("src/checkout/processOrder.ts")
    }

    #[tokio::test]
    async fn template_strategy_never_fails() {
        let advisor = RemediationAdvisor::template();
        assert_eq!(advisor.strategy(), AdviceStrategy::Template);
        for error_type in ErrorType::ALL {
            let advice = advisor.advise(error_type, &report()).await;
            assert!(advice.suggested_fix.confidence <= 100);
            assert_eq!(advice.source, AdviceSource::Template);
        }
    }

    #[tokio::test]
    async fn delegated_success_uses_generator_output() {
        let generator = StubGenerator::ok(
            r#"Analysis: {"rootCause": "profile not loaded", "suggestedFix": {"code": "user?.profile", "description": "guard", "confidence": 140}}"#,
        );
        let advisor = RemediationAdvisor::delegated(generator.clone(), Duration::from_secs(1));
        assert_eq!(advisor.strategy(), AdviceStrategy::Delegated);

        let advice = advisor.advise(ErrorType::NullReference, &report()).await;
        assert_eq!(advice.source, AdviceSource::Delegated);
        assert_eq!(advice.root_cause, "profile not loaded");
        assert_eq!(advice.suggested_fix.confidence, 100);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transport_error_falls_back_to_template() {
        let advisor = RemediationAdvisor::delegated(
            StubGenerator::failing("connection refused"),
            Duration::from_secs(1),
        );
        let advice = advisor.advise(ErrorType::NullReference, &report()).await;
        assert_eq!(advice, templates::render(ErrorType::NullReference, &report()));
    }

    #[tokio::test]
    async fn garbage_response_falls_back_to_template() {
        let advisor = RemediationAdvisor::delegated(
            StubGenerator::ok("Sorry, I can't do that."),
            Duration::from_secs(1),
        );
        let advice = advisor.advise(ErrorType::CorsError, &report()).await;
        assert_eq!(advice.source, AdviceSource::Template);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_falls_back_without_retry() {
        let generator = StubGenerator::slow(r#"{"rootCause": "late"}"#, Duration::from_secs(60));
        let advisor = RemediationAdvisor::delegated(generator.clone(), Duration::from_millis(500));

        let advice = advisor.advise(ErrorType::ApiTimeout, &report()).await;
        assert_eq!(advice.source, AdviceSource::Template);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_report_skips_generator() {
        let generator = StubGenerator::ok(r#"{"rootCause": "x"}"#);
        let advisor = RemediationAdvisor::delegated(generator.clone(), Duration::from_secs(1));

        let advice = advisor.advise(ErrorType::Unknown, &ErrorReport::new("  ")).await;
        assert_eq!(advice.suggested_fix.confidence, 0);
        assert_eq!(advice.source, AdviceSource::Template);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn occurrence_store_replaces_similar_patterns() {
        let past = (0..8)
            .map(|i| PastErrorSummary {
                error_id: format!("err_{i}"),
                message: format!("Cannot read property 'profile' of undefined #{i}"),
                resolution: None,
                last_seen: Utc::now(),
            })
            .collect();
        let advisor = RemediationAdvisor::template()
            .with_occurrence_store(Arc::new(StubStore { similar: Ok(past) }));

        let advice = advisor.advise(ErrorType::NullReference, &report()).await;
        assert_eq!(advice.similar_patterns.len(), MAX_SIMILAR_PATTERNS);
        assert!(advice.similar_patterns[0].ends_with("#0"));
    }

    #[tokio::test]
    async fn occurrence_store_failure_keeps_template_patterns() {
        let advisor = RemediationAdvisor::template().with_occurrence_store(Arc::new(StubStore {
            similar: Err("db down".to_string()),
        }));
        let advice = advisor.advise(ErrorType::NullReference, &report()).await;
        assert_eq!(
            advice.similar_patterns,
            templates::render(ErrorType::NullReference, &report()).similar_patterns
        );
    }

    #[test]
    fn components_do_not_depend_on_strategy() {
        let template = RemediationAdvisor::template();
        let delegated =
            RemediationAdvisor::delegated(StubGenerator::failing("x"), Duration::from_secs(1));
        for error_type in ErrorType::ALL {
            assert_eq!(
                template.recommended_components(error_type),
                delegated.recommended_components(error_type)
            );
        }
    }
}
