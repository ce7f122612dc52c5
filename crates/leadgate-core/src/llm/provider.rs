//! ChatProvider trait definition.
//!
//! The core abstraction over the external chat-completion service. The
//! conversation engine only needs the synchronous completion path; there
//! is no streaming surface.

use leadgate_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for chat-completion backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in leadgate-infra (e.g., `OpenAiChatProvider`).
pub trait ChatProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
