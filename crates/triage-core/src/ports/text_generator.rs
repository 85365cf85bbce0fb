//! 외부 텍스트 생성 서비스 포트.
//!
//! 프롬프트 한 개를 보내고 자유 형식 텍스트를 돌려받는다.
//! 응답에서 JSON을 추출/검증하는 일은 호출자(조언기)의 몫이다.

use async_trait::async_trait;

use crate::error::CoreError;

/// 텍스트 생성기 — 프롬프트 입력, 텍스트 출력
///
/// 구현체: `RemoteTextGenerator` (Anthropic/OpenAI 호환 HTTP API)
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// 프롬프트에 대한 응답 텍스트 생성
    async fn generate(&self, prompt: &str) -> Result<String, CoreError>;

    /// 제공자 이름 (로그용)
    fn provider_name(&self) -> &str;
}
