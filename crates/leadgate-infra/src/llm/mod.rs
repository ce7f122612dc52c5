//! Chat provider implementations.

pub mod openai;

pub use openai::OpenAiChatProvider;
