//! SQLite metrics repository implementation.
//!
//! One row per (ano, mes), enforced by the UNIQUE constraint; writes go
//! through `INSERT ... ON CONFLICT DO UPDATE`.

use chrono::Utc;
use leadgate_core::repository::MetricsRepository;
use leadgate_types::error::RepositoryError;
use leadgate_types::metrics::{MetricsSnapshot, UpsertMetricsRequest};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `MetricsRepository`.
pub struct SqliteMetricsRepository {
    pool: DatabasePool,
}

impl SqliteMetricsRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_snapshot(row: &sqlx::sqlite::SqliteRow) -> Result<MetricsSnapshot, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let atualizado_em: String = row
        .try_get("atualizado_em")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    let get_i64 = |name: &str| -> Result<i64, RepositoryError> {
        row.try_get(name)
            .map_err(|e| RepositoryError::Query(e.to_string()))
    };

    Ok(MetricsSnapshot {
        id: parse_uuid(&id, "metrics id")?,
        ano: get_i64("ano")? as i32,
        mes: get_i64("mes")? as i32,
        mensagens_enviadas: get_i64("mensagens_enviadas")?,
        interacoes_chatbot: get_i64("interacoes_chatbot")?,
        chamadas_realizadas: get_i64("chamadas_realizadas")?,
        leads_qualificados: get_i64("leads_qualificados")?,
        armazenamento_mb: row
            .try_get("armazenamento_mb")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        atualizado_em: parse_datetime(&atualizado_em)?,
    })
}

impl MetricsRepository for SqliteMetricsRepository {
    async fn upsert(
        &self,
        ano: i32,
        mes: i32,
        counts: &UpsertMetricsRequest,
    ) -> Result<MetricsSnapshot, RepositoryError> {
        let now = Utc::now();

        sqlx::query(
            r#"INSERT INTO metrics (id, ano, mes, mensagens_enviadas, interacoes_chatbot,
                                    chamadas_realizadas, leads_qualificados, armazenamento_mb, atualizado_em)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT (ano, mes) DO UPDATE SET
                   mensagens_enviadas = excluded.mensagens_enviadas,
                   interacoes_chatbot = excluded.interacoes_chatbot,
                   chamadas_realizadas = excluded.chamadas_realizadas,
                   leads_qualificados = excluded.leads_qualificados,
                   armazenamento_mb = excluded.armazenamento_mb,
                   atualizado_em = excluded.atualizado_em"#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(ano as i64)
        .bind(mes as i64)
        .bind(counts.mensagens_enviadas)
        .bind(counts.interacoes_chatbot)
        .bind(counts.chamadas_realizadas)
        .bind(counts.leads_qualificados)
        .bind(counts.armazenamento_mb)
        .bind(format_datetime(&now))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        self.get(ano, mes)
            .await?
            .ok_or_else(|| RepositoryError::Query("upserted snapshot missing".to_string()))
    }

    async fn get(&self, ano: i32, mes: i32) -> Result<Option<MetricsSnapshot>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM metrics WHERE ano = ? AND mes = ?")
            .bind(ano as i64)
            .bind(mes as i64)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| row_to_snapshot(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<MetricsSnapshot>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM metrics ORDER BY ano DESC, mes DESC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(row_to_snapshot).collect()
    }
}
