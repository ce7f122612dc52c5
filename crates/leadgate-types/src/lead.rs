//! Lead and lead-child record types.
//!
//! A lead is a prospect record accumulated from form submissions and from
//! the conversational orchestrator. It owns, by cascade, zero-or-more
//! message, call, and interaction children that are append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Progress status of a lead.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (status IN ('interacted', 'qualified', 'converted', 'ignored', 'called'))`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Interacted,
    Qualified,
    Converted,
    Ignored,
    Called,
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadStatus::Interacted => write!(f, "interacted"),
            LeadStatus::Qualified => write!(f, "qualified"),
            LeadStatus::Converted => write!(f, "converted"),
            LeadStatus::Ignored => write!(f, "ignored"),
            LeadStatus::Called => write!(f, "called"),
        }
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "interacted" => Ok(LeadStatus::Interacted),
            "qualified" => Ok(LeadStatus::Qualified),
            "converted" => Ok(LeadStatus::Converted),
            "ignored" => Ok(LeadStatus::Ignored),
            "called" => Ok(LeadStatus::Called),
            other => Err(format!("invalid lead status: '{other}'")),
        }
    }
}

impl Default for LeadStatus {
    fn default() -> Self {
        LeadStatus::Interacted
    }
}

/// A prospect record.
///
/// Contact and interest fields are all optional -- leads start from a single
/// point of contact and fill in over time. The `mensagem` field holds the
/// latest full transcript snapshot written by the conversation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub nome: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub empresa: Option<String>,
    pub setor: Option<String>,
    pub interesse: Option<String>,
    pub mensagem: Option<String>,
    pub instagram_id: Option<String>,
    pub facebook_id: Option<String>,
    /// Acquisition channel: instagram, facebook, pesquisa_ativa.
    pub canal_origem: Option<String>,
    /// Traffic source recorded by the chat widget (default "website").
    pub origem: String,
    pub status: LeadStatus,
    pub produto_sugerido: Option<String>,
    pub respondeu: bool,
    pub tentou_chamada: bool,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}

/// Request body for creating a lead from a form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLeadRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub empresa: Option<String>,
    pub setor: Option<String>,
    pub interesse: Option<String>,
    pub mensagem: Option<String>,
    pub instagram_id: Option<String>,
    pub facebook_id: Option<String>,
    pub canal_origem: Option<String>,
    #[serde(default = "default_origem")]
    pub origem: String,
}

fn default_origem() -> String {
    "website".to_string()
}

/// Partial update for a lead. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLeadRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub empresa: Option<String>,
    pub setor: Option<String>,
    pub interesse: Option<String>,
    pub mensagem: Option<String>,
    pub instagram_id: Option<String>,
    pub facebook_id: Option<String>,
    pub canal_origem: Option<String>,
    pub origem: Option<String>,
    pub status: Option<LeadStatus>,
    pub produto_sugerido: Option<String>,
    pub respondeu: Option<bool>,
    pub tentou_chamada: Option<bool>,
    pub ativo: Option<bool>,
}

/// A message exchanged with a lead. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadMessage {
    pub id: Uuid,
    pub lead_id: Uuid,
    /// Channel the message went through: instagram, facebook.
    pub canal: Option<String>,
    /// Who produced it: bot, usuario.
    pub origem: Option<String>,
    pub conteudo: Option<String>,
    pub data_envio: DateTime<Utc>,
}

/// A call attempt against a lead. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadCall {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub numero: Option<String>,
    /// agendada, realizada, falha.
    pub status: Option<String>,
    pub data_chamada: DateTime<Utc>,
}

/// An observed interaction from a lead. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadInteraction {
    pub id: Uuid,
    pub lead_id: Uuid,
    /// comentario, story_reply, dm, like, contato_externo.
    pub tipo: Option<String>,
    pub canal: Option<String>,
    pub conteudo: Option<String>,
    pub data_interacao: DateTime<Utc>,
}

/// Request body for appending a message to a lead.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLeadMessageRequest {
    pub canal: Option<String>,
    pub origem: Option<String>,
    pub conteudo: Option<String>,
}

/// Request body for appending a call record to a lead.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLeadCallRequest {
    pub numero: Option<String>,
    pub status: Option<String>,
}

/// Request body for appending an interaction to a lead.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLeadInteractionRequest {
    pub tipo: Option<String>,
    pub canal: Option<String>,
    pub conteudo: Option<String>,
}
