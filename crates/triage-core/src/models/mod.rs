//! 도메인 모델.
//!
//! 모든 모델은 serde `Serialize`/`Deserialize`를 구현하여
//! JSON 출력 및 외부 수집기와의 교환에 사용된다.

pub mod advice;
pub mod analysis;
pub mod classification;
pub mod impact;
pub mod report;
