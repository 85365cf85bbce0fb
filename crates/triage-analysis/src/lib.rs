//! # triage-analysis
//!
//! 에러 분석 파이프라인.
//! 리포트를 패턴 규칙으로 분류하고, 심각도와 추천 UI 컴포넌트를 정한 뒤
//! 템플릿 또는 외부 텍스트 생성 서비스로 조언을 만들어 영향도와 함께 조립한다.
//!
//! 모든 서비스는 상태가 없으며 `Arc`로 공유해 여러 요청에서 동시에 호출할 수 있다.

pub mod advisor;
pub mod classifier;
pub mod components;
pub mod extraction;
pub mod impact;
pub mod pipeline;
pub mod prompt;
pub mod severity;
pub mod templates;
