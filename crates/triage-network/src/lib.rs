//! # triage-network
//!
//! 외부 텍스트 생성 서비스 어댑터.
//! [`triage_core::ports::text_generator::TextGenerator`] 포트를 HTTP로 구현한다.
//!
//! ```rust,ignore
//! use triage_network::ai_llm_client::RemoteTextGenerator;
//!
//! let generator = RemoteTextGenerator::new(&endpoint)?;
//! ```

pub mod ai_llm_client;
