//! Conversation state types for the chat orchestrator.
//!
//! These types model the transient, in-process conversation state: the
//! role-tagged transcript, the partially-filled lead draft, and the
//! coarse conversation stage.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

// Re-export MessageRole from the llm module (used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Coarse stage of a conversation. Forward-only: Novice advances to
/// Advanced exactly once, when the user turn contains the configured
/// trigger phrase; there is no reverse transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStage {
    Novice,
    Advanced,
}

impl fmt::Display for ConversationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationStage::Novice => write!(f, "novice"),
            ConversationStage::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for ConversationStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "novice" => Ok(ConversationStage::Novice),
            "advanced" => Ok(ConversationStage::Advanced),
            other => Err(format!("invalid conversation stage: '{other}'")),
        }
    }
}

impl Default for ConversationStage {
    fn default() -> Self {
        ConversationStage::Novice
    }
}

/// One entry of a session transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: MessageRole,
    pub content: String,
}

impl TranscriptEntry {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// The partially-filled lead record accumulated across a conversation.
///
/// Fields are monotonically filled in: [`LeadDraft::merge`] overwrites a
/// field only when the incoming value is non-null, so a null from the
/// model never erases a previously known value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadDraft {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub empresa: Option<String>,
    pub setor: Option<String>,
    pub interesse: Option<String>,
    pub mensagem: Option<String>,
    pub origem: Option<String>,
}

impl LeadDraft {
    /// Initial draft for a fresh session: everything unknown except the
    /// traffic source, which the chat widget implies.
    pub fn for_website() -> Self {
        Self {
            origem: Some("website".to_string()),
            ..Self::default()
        }
    }

    /// Merge extracted values into this draft. Non-null values overwrite;
    /// null values never erase.
    pub fn merge(&mut self, extracted: &LeadDraft) {
        fn take(dst: &mut Option<String>, src: &Option<String>) {
            if src.is_some() {
                *dst = src.clone();
            }
        }
        take(&mut self.nome, &extracted.nome);
        take(&mut self.email, &extracted.email);
        take(&mut self.telefone, &extracted.telefone);
        take(&mut self.empresa, &extracted.empresa);
        take(&mut self.setor, &extracted.setor);
        take(&mut self.interesse, &extracted.interesse);
        take(&mut self.mensagem, &extracted.mensagem);
        take(&mut self.origem, &extracted.origem);
    }
}

/// POST /chat request body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurnRequest {
    pub session_id: Option<Uuid>,
    pub message: String,
}

/// POST /chat response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurnResponse {
    pub response: String,
    pub session_id: Uuid,
}
