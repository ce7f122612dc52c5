//! Conversation orchestrator: session store, transcript, payload
//! extraction, prompt rendering, and the per-turn engine.

pub mod engine;
pub mod extract;
pub mod prompt;
pub mod session;
pub mod transcript;

pub use engine::ConversationEngine;
pub use session::{SessionState, SessionStore};
pub use transcript::Transcript;
