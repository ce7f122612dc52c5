//! SQLite automatic-message repository implementation.

use leadgate_core::repository::AutoMessageRepository;
use leadgate_types::auto_message::{AutoMessage, UpdateAutoMessageRequest};
use leadgate_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, map_sqlx_error, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `AutoMessageRepository`.
pub struct SqliteAutoMessageRepository {
    pool: DatabasePool,
}

impl SqliteAutoMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: &Uuid) -> Result<Option<AutoMessage>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM auto_messages WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| row_to_message(&row)).transpose()
    }
}

fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> Result<AutoMessage, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let criado_em: String = row
        .try_get("criado_em")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let ativo: i64 = row
        .try_get("ativo")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(AutoMessage {
        id: parse_uuid(&id, "auto message id")?,
        nome: row
            .try_get("nome")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        conteudo: row
            .try_get("conteudo")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        ativo: ativo != 0,
        criado_em: parse_datetime(&criado_em)?,
    })
}

impl AutoMessageRepository for SqliteAutoMessageRepository {
    async fn create(&self, message: &AutoMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO auto_messages (id, nome, conteudo, ativo, criado_em)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(&message.nome)
        .bind(&message.conteudo)
        .bind(message.ativo as i64)
        .bind(format_datetime(&message.criado_em))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<AutoMessage>, RepositoryError> {
        self.fetch(id).await
    }

    async fn list(&self) -> Result<Vec<AutoMessage>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM auto_messages ORDER BY criado_em DESC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(row_to_message).collect()
    }

    async fn update(
        &self,
        id: &Uuid,
        update: &UpdateAutoMessageRequest,
    ) -> Result<AutoMessage, RepositoryError> {
        let mut message = self.fetch(id).await?.ok_or(RepositoryError::NotFound)?;

        if let Some(nome) = &update.nome {
            message.nome = nome.clone();
        }
        if let Some(conteudo) = &update.conteudo {
            message.conteudo = conteudo.clone();
        }
        if let Some(ativo) = update.ativo {
            message.ativo = ativo;
        }

        sqlx::query("UPDATE auto_messages SET nome = ?, conteudo = ?, ativo = ? WHERE id = ?")
            .bind(&message.nome)
            .bind(&message.conteudo)
            .bind(message.ativo as i64)
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        Ok(message)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM auto_messages WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
