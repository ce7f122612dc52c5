//! Automatic message templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named message template sent automatically by outreach flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoMessage {
    pub id: Uuid,
    pub nome: String,
    pub conteudo: String,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}

/// Request body for creating an automatic message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAutoMessageRequest {
    pub nome: String,
    pub conteudo: String,
    #[serde(default = "default_true")]
    pub ativo: bool,
}

fn default_true() -> bool {
    true
}

/// Partial update for an automatic message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAutoMessageRequest {
    pub nome: Option<String>,
    pub conteudo: Option<String>,
    pub ativo: Option<bool>,
}
