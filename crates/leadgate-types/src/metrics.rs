//! Monthly metrics snapshot types.
//!
//! One row per (ano, mes), enforced by a UNIQUE constraint in the schema.
//! Writes are upserts: updating an existing period overwrites its counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregate counters for a single year/month period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub id: Uuid,
    pub ano: i32,
    pub mes: i32,
    pub mensagens_enviadas: i64,
    pub interacoes_chatbot: i64,
    pub chamadas_realizadas: i64,
    pub leads_qualificados: i64,
    pub armazenamento_mb: f64,
    pub atualizado_em: DateTime<Utc>,
}

/// Request body for PUT /metrics/{ano}/{mes}.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertMetricsRequest {
    #[serde(default)]
    pub mensagens_enviadas: i64,
    #[serde(default)]
    pub interacoes_chatbot: i64,
    #[serde(default)]
    pub chamadas_realizadas: i64,
    #[serde(default)]
    pub leads_qualificados: i64,
    #[serde(default)]
    pub armazenamento_mb: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_request_defaults_to_zero() {
        let req: UpsertMetricsRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.mensagens_enviadas, 0);
        assert_eq!(req.armazenamento_mb, 0.0);
    }
}
