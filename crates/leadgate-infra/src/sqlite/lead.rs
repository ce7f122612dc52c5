//! SQLite lead repository implementation.
//!
//! Covers the lead table plus its append-only children. Partial updates are
//! read-modify-write: fetch the current row, apply the non-None fields, and
//! write the full row back through the single-connection writer.

use leadgate_core::repository::LeadRepository;
use leadgate_types::error::RepositoryError;
use leadgate_types::lead::{
    Lead, LeadCall, LeadInteraction, LeadMessage, LeadStatus, UpdateLeadRequest,
};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, map_sqlx_error, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `LeadRepository`.
pub struct SqliteLeadRepository {
    pool: DatabasePool,
}

impl SqliteLeadRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_lead(&self, id: &Uuid) -> Result<Option<Lead>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM leads WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let lead_row =
                    LeadRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(lead_row.into_lead()?))
            }
            None => Ok(None),
        }
    }
}

/// Internal row type for mapping SQLite rows to domain Lead.
struct LeadRow {
    id: String,
    nome: Option<String>,
    email: Option<String>,
    telefone: Option<String>,
    empresa: Option<String>,
    setor: Option<String>,
    interesse: Option<String>,
    mensagem: Option<String>,
    instagram_id: Option<String>,
    facebook_id: Option<String>,
    canal_origem: Option<String>,
    origem: String,
    status: String,
    produto_sugerido: Option<String>,
    respondeu: i64,
    tentou_chamada: i64,
    ativo: i64,
    criado_em: String,
}

impl LeadRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            nome: row.try_get("nome")?,
            email: row.try_get("email")?,
            telefone: row.try_get("telefone")?,
            empresa: row.try_get("empresa")?,
            setor: row.try_get("setor")?,
            interesse: row.try_get("interesse")?,
            mensagem: row.try_get("mensagem")?,
            instagram_id: row.try_get("instagram_id")?,
            facebook_id: row.try_get("facebook_id")?,
            canal_origem: row.try_get("canal_origem")?,
            origem: row.try_get("origem")?,
            status: row.try_get("status")?,
            produto_sugerido: row.try_get("produto_sugerido")?,
            respondeu: row.try_get("respondeu")?,
            tentou_chamada: row.try_get("tentou_chamada")?,
            ativo: row.try_get("ativo")?,
            criado_em: row.try_get("criado_em")?,
        })
    }

    fn into_lead(self) -> Result<Lead, RepositoryError> {
        let status: LeadStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(Lead {
            id: parse_uuid(&self.id, "lead id")?,
            nome: self.nome,
            email: self.email,
            telefone: self.telefone,
            empresa: self.empresa,
            setor: self.setor,
            interesse: self.interesse,
            mensagem: self.mensagem,
            instagram_id: self.instagram_id,
            facebook_id: self.facebook_id,
            canal_origem: self.canal_origem,
            origem: self.origem,
            status,
            produto_sugerido: self.produto_sugerido,
            respondeu: self.respondeu != 0,
            tentou_chamada: self.tentou_chamada != 0,
            ativo: self.ativo != 0,
            criado_em: parse_datetime(&self.criado_em)?,
        })
    }
}

/// Apply a partial update to a fetched lead.
fn apply_update(lead: &mut Lead, update: &UpdateLeadRequest) {
    if update.nome.is_some() {
        lead.nome = update.nome.clone();
    }
    if update.email.is_some() {
        lead.email = update.email.clone();
    }
    if update.telefone.is_some() {
        lead.telefone = update.telefone.clone();
    }
    if update.empresa.is_some() {
        lead.empresa = update.empresa.clone();
    }
    if update.setor.is_some() {
        lead.setor = update.setor.clone();
    }
    if update.interesse.is_some() {
        lead.interesse = update.interesse.clone();
    }
    if update.mensagem.is_some() {
        lead.mensagem = update.mensagem.clone();
    }
    if update.instagram_id.is_some() {
        lead.instagram_id = update.instagram_id.clone();
    }
    if update.facebook_id.is_some() {
        lead.facebook_id = update.facebook_id.clone();
    }
    if update.canal_origem.is_some() {
        lead.canal_origem = update.canal_origem.clone();
    }
    if let Some(origem) = &update.origem {
        lead.origem = origem.clone();
    }
    if let Some(status) = &update.status {
        lead.status = status.clone();
    }
    if update.produto_sugerido.is_some() {
        lead.produto_sugerido = update.produto_sugerido.clone();
    }
    if let Some(respondeu) = update.respondeu {
        lead.respondeu = respondeu;
    }
    if let Some(tentou_chamada) = update.tentou_chamada {
        lead.tentou_chamada = tentou_chamada;
    }
    if let Some(ativo) = update.ativo {
        lead.ativo = ativo;
    }
}

impl LeadRepository for SqliteLeadRepository {
    async fn create(&self, lead: &Lead) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO leads (id, nome, email, telefone, empresa, setor, interesse, mensagem,
                                  instagram_id, facebook_id, canal_origem, origem, status,
                                  produto_sugerido, respondeu, tentou_chamada, ativo, criado_em)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(lead.id.to_string())
        .bind(&lead.nome)
        .bind(&lead.email)
        .bind(&lead.telefone)
        .bind(&lead.empresa)
        .bind(&lead.setor)
        .bind(&lead.interesse)
        .bind(&lead.mensagem)
        .bind(&lead.instagram_id)
        .bind(&lead.facebook_id)
        .bind(&lead.canal_origem)
        .bind(&lead.origem)
        .bind(lead.status.to_string())
        .bind(&lead.produto_sugerido)
        .bind(lead.respondeu as i64)
        .bind(lead.tentou_chamada as i64)
        .bind(lead.ativo as i64)
        .bind(format_datetime(&lead.criado_em))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Lead>, RepositoryError> {
        self.fetch_lead(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Lead>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM leads WHERE email = ? LIMIT 1")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let lead_row =
                    LeadRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(lead_row.into_lead()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Lead>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM leads ORDER BY criado_em DESC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut leads = Vec::with_capacity(rows.len());
        for row in &rows {
            let lead_row =
                LeadRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            leads.push(lead_row.into_lead()?);
        }

        Ok(leads)
    }

    async fn update(&self, id: &Uuid, update: &UpdateLeadRequest) -> Result<Lead, RepositoryError> {
        let mut lead = self.fetch_lead(id).await?.ok_or(RepositoryError::NotFound)?;
        apply_update(&mut lead, update);

        sqlx::query(
            r#"UPDATE leads
               SET nome = ?, email = ?, telefone = ?, empresa = ?, setor = ?, interesse = ?,
                   mensagem = ?, instagram_id = ?, facebook_id = ?, canal_origem = ?, origem = ?,
                   status = ?, produto_sugerido = ?, respondeu = ?, tentou_chamada = ?, ativo = ?
               WHERE id = ?"#,
        )
        .bind(&lead.nome)
        .bind(&lead.email)
        .bind(&lead.telefone)
        .bind(&lead.empresa)
        .bind(&lead.setor)
        .bind(&lead.interesse)
        .bind(&lead.mensagem)
        .bind(&lead.instagram_id)
        .bind(&lead.facebook_id)
        .bind(&lead.canal_origem)
        .bind(&lead.origem)
        .bind(lead.status.to_string())
        .bind(&lead.produto_sugerido)
        .bind(lead.respondeu as i64)
        .bind(lead.tentou_chamada as i64)
        .bind(lead.ativo as i64)
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(lead)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn add_message(&self, message: &LeadMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO lead_messages (id, lead_id, canal, origem, conteudo, data_envio)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.lead_id.to_string())
        .bind(&message.canal)
        .bind(&message.origem)
        .bind(&message.conteudo)
        .bind(format_datetime(&message.data_envio))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_messages(&self, lead_id: &Uuid) -> Result<Vec<LeadMessage>, RepositoryError> {
        let rows =
            sqlx::query("SELECT * FROM lead_messages WHERE lead_id = ? ORDER BY data_envio ASC")
                .bind(lead_id.to_string())
                .fetch_all(&self.pool.reader)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            messages.push(LeadMessage {
                id: parse_uuid(
                    &row.try_get::<String, _>("id")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    "message id",
                )?,
                lead_id: parse_uuid(
                    &row.try_get::<String, _>("lead_id")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    "lead_id",
                )?,
                canal: row
                    .try_get("canal")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                origem: row
                    .try_get("origem")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                conteudo: row
                    .try_get("conteudo")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                data_envio: parse_datetime(
                    &row.try_get::<String, _>("data_envio")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                )?,
            });
        }

        Ok(messages)
    }

    async fn add_call(&self, call: &LeadCall) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO lead_calls (id, lead_id, numero, status, data_chamada)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(call.id.to_string())
        .bind(call.lead_id.to_string())
        .bind(&call.numero)
        .bind(&call.status)
        .bind(format_datetime(&call.data_chamada))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_calls(&self, lead_id: &Uuid) -> Result<Vec<LeadCall>, RepositoryError> {
        let rows =
            sqlx::query("SELECT * FROM lead_calls WHERE lead_id = ? ORDER BY data_chamada ASC")
                .bind(lead_id.to_string())
                .fetch_all(&self.pool.reader)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut calls = Vec::with_capacity(rows.len());
        for row in &rows {
            calls.push(LeadCall {
                id: parse_uuid(
                    &row.try_get::<String, _>("id")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    "call id",
                )?,
                lead_id: parse_uuid(
                    &row.try_get::<String, _>("lead_id")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    "lead_id",
                )?,
                numero: row
                    .try_get("numero")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                status: row
                    .try_get("status")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                data_chamada: parse_datetime(
                    &row.try_get::<String, _>("data_chamada")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                )?,
            });
        }

        Ok(calls)
    }

    async fn add_interaction(&self, interaction: &LeadInteraction) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO lead_interactions (id, lead_id, tipo, canal, conteudo, data_interacao)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(interaction.id.to_string())
        .bind(interaction.lead_id.to_string())
        .bind(&interaction.tipo)
        .bind(&interaction.canal)
        .bind(&interaction.conteudo)
        .bind(format_datetime(&interaction.data_interacao))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_interactions(
        &self,
        lead_id: &Uuid,
    ) -> Result<Vec<LeadInteraction>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM lead_interactions WHERE lead_id = ? ORDER BY data_interacao ASC",
        )
        .bind(lead_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut interactions = Vec::with_capacity(rows.len());
        for row in &rows {
            interactions.push(LeadInteraction {
                id: parse_uuid(
                    &row.try_get::<String, _>("id")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    "interaction id",
                )?,
                lead_id: parse_uuid(
                    &row.try_get::<String, _>("lead_id")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                    "lead_id",
                )?,
                tipo: row
                    .try_get("tipo")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                canal: row
                    .try_get("canal")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                conteudo: row
                    .try_get("conteudo")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?,
                data_interacao: parse_datetime(
                    &row.try_get::<String, _>("data_interacao")
                        .map_err(|e| RepositoryError::Query(e.to_string()))?,
                )?,
            });
        }

        Ok(interactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_lead() -> Lead {
        Lead {
            id: Uuid::now_v7(),
            nome: Some("Ana".to_string()),
            email: Some("ana@example.com".to_string()),
            telefone: None,
            empresa: None,
            setor: None,
            interesse: None,
            mensagem: None,
            instagram_id: None,
            facebook_id: None,
            canal_origem: None,
            origem: "website".to_string(),
            status: LeadStatus::Interacted,
            produto_sugerido: None,
            respondeu: false,
            tentou_chamada: false,
            ativo: true,
            criado_em: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_lead() {
        let repo = SqliteLeadRepository::new(test_pool().await);
        let lead = make_lead();
        repo.create(&lead).await.unwrap();

        let found = repo.get(&lead.id).await.unwrap().unwrap();
        assert_eq!(found.nome.as_deref(), Some("Ana"));
        assert_eq!(found.status, LeadStatus::Interacted);
        assert_eq!(found.origem, "website");
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let repo = SqliteLeadRepository::new(test_pool().await);
        let lead = make_lead();
        repo.create(&lead).await.unwrap();

        let found = repo.find_by_email("ana@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, lead.id);

        let missing = repo.find_by_email("nope@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields() {
        let repo = SqliteLeadRepository::new(test_pool().await);
        let lead = make_lead();
        repo.create(&lead).await.unwrap();

        let update = UpdateLeadRequest {
            telefone: Some("912345678".to_string()),
            status: Some(LeadStatus::Qualified),
            ..UpdateLeadRequest::default()
        };
        let updated = repo.update(&lead.id, &update).await.unwrap();

        assert_eq!(updated.telefone.as_deref(), Some("912345678"));
        assert_eq!(updated.status, LeadStatus::Qualified);
        assert_eq!(updated.nome.as_deref(), Some("Ana"), "untouched field kept");
        assert_eq!(updated.email.as_deref(), Some("ana@example.com"));
    }

    #[tokio::test]
    async fn test_update_unknown_lead_is_not_found() {
        let repo = SqliteLeadRepository::new(test_pool().await);
        let err = repo
            .update(&Uuid::now_v7(), &UpdateLeadRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_children() {
        let repo = SqliteLeadRepository::new(test_pool().await);
        let lead = make_lead();
        repo.create(&lead).await.unwrap();

        repo.add_message(&LeadMessage {
            id: Uuid::now_v7(),
            lead_id: lead.id,
            canal: Some("instagram".to_string()),
            origem: Some("bot".to_string()),
            conteudo: Some("Olá!".to_string()),
            data_envio: Utc::now(),
        })
        .await
        .unwrap();

        repo.add_call(&LeadCall {
            id: Uuid::now_v7(),
            lead_id: lead.id,
            numero: Some("912345678".to_string()),
            status: Some("realizada".to_string()),
            data_chamada: Utc::now(),
        })
        .await
        .unwrap();

        repo.add_interaction(&LeadInteraction {
            id: Uuid::now_v7(),
            lead_id: lead.id,
            tipo: Some("dm".to_string()),
            canal: Some("instagram".to_string()),
            conteudo: Some("oi".to_string()),
            data_interacao: Utc::now(),
        })
        .await
        .unwrap();

        assert_eq!(repo.list_messages(&lead.id).await.unwrap().len(), 1);
        assert_eq!(repo.list_calls(&lead.id).await.unwrap().len(), 1);
        assert_eq!(repo.list_interactions(&lead.id).await.unwrap().len(), 1);

        repo.delete(&lead.id).await.unwrap();

        assert!(repo.get(&lead.id).await.unwrap().is_none());
        assert!(repo.list_messages(&lead.id).await.unwrap().is_empty());
        assert!(repo.list_calls(&lead.id).await.unwrap().is_empty());
        assert!(repo.list_interactions(&lead.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_child_insert_requires_existing_lead() {
        let repo = SqliteLeadRepository::new(test_pool().await);
        let err = repo
            .add_message(&LeadMessage {
                id: Uuid::now_v7(),
                lead_id: Uuid::now_v7(),
                canal: None,
                origem: None,
                conteudo: None,
                data_envio: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }
}
