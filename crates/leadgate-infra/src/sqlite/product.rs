//! SQLite product repository implementation.
//!
//! The descriptive arrays (dores, beneficios, palavras_chave) are stored
//! as JSON text columns and round-tripped through serde_json.

use leadgate_core::repository::ProductRepository;
use leadgate_types::error::RepositoryError;
use leadgate_types::product::{Product, UpdateProductRequest};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, map_sqlx_error, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `ProductRepository`.
pub struct SqliteProductRepository {
    pool: DatabasePool,
}

impl SqliteProductRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_product(&self, id: &Uuid) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let product_row = ProductRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(product_row.into_product()?))
            }
            None => Ok(None),
        }
    }
}

/// Internal row type for mapping SQLite rows to domain Product.
struct ProductRow {
    id: String,
    nome: String,
    descricao: Option<String>,
    publico_alvo: Option<String>,
    dores: String,
    beneficios: String,
    palavras_chave: String,
    link_compra: Option<String>,
    ativo: i64,
    criado_em: String,
}

impl ProductRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            nome: row.try_get("nome")?,
            descricao: row.try_get("descricao")?,
            publico_alvo: row.try_get("publico_alvo")?,
            dores: row.try_get("dores")?,
            beneficios: row.try_get("beneficios")?,
            palavras_chave: row.try_get("palavras_chave")?,
            link_compra: row.try_get("link_compra")?,
            ativo: row.try_get("ativo")?,
            criado_em: row.try_get("criado_em")?,
        })
    }

    fn into_product(self) -> Result<Product, RepositoryError> {
        Ok(Product {
            id: parse_uuid(&self.id, "product id")?,
            nome: self.nome,
            descricao: self.descricao,
            publico_alvo: self.publico_alvo,
            dores: parse_array(&self.dores)?,
            beneficios: parse_array(&self.beneficios)?,
            palavras_chave: parse_array(&self.palavras_chave)?,
            link_compra: self.link_compra,
            ativo: self.ativo != 0,
            criado_em: parse_datetime(&self.criado_em)?,
        })
    }
}

fn parse_array(json: &str) -> Result<Vec<String>, RepositoryError> {
    serde_json::from_str(json)
        .map_err(|e| RepositoryError::Query(format!("invalid JSON array column: {e}")))
}

fn format_array(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

impl ProductRepository for SqliteProductRepository {
    async fn create(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO products (id, nome, descricao, publico_alvo, dores, beneficios,
                                     palavras_chave, link_compra, ativo, criado_em)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(product.id.to_string())
        .bind(&product.nome)
        .bind(&product.descricao)
        .bind(&product.publico_alvo)
        .bind(format_array(&product.dores))
        .bind(format_array(&product.beneficios))
        .bind(format_array(&product.palavras_chave))
        .bind(&product.link_compra)
        .bind(product.ativo as i64)
        .bind(format_datetime(&product.criado_em))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Product>, RepositoryError> {
        self.fetch_product(id).await
    }

    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM products ORDER BY criado_em DESC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            let product_row =
                ProductRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            products.push(product_row.into_product()?);
        }

        Ok(products)
    }

    async fn update(
        &self,
        id: &Uuid,
        update: &UpdateProductRequest,
    ) -> Result<Product, RepositoryError> {
        let mut product = self
            .fetch_product(id)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if let Some(nome) = &update.nome {
            product.nome = nome.clone();
        }
        if update.descricao.is_some() {
            product.descricao = update.descricao.clone();
        }
        if update.publico_alvo.is_some() {
            product.publico_alvo = update.publico_alvo.clone();
        }
        if let Some(dores) = &update.dores {
            product.dores = dores.clone();
        }
        if let Some(beneficios) = &update.beneficios {
            product.beneficios = beneficios.clone();
        }
        if let Some(palavras) = &update.palavras_chave {
            product.palavras_chave = palavras.clone();
        }
        if update.link_compra.is_some() {
            product.link_compra = update.link_compra.clone();
        }
        if let Some(ativo) = update.ativo {
            product.ativo = ativo;
        }

        sqlx::query(
            r#"UPDATE products
               SET nome = ?, descricao = ?, publico_alvo = ?, dores = ?, beneficios = ?,
                   palavras_chave = ?, link_compra = ?, ativo = ?
               WHERE id = ?"#,
        )
        .bind(&product.nome)
        .bind(&product.descricao)
        .bind(&product.publico_alvo)
        .bind(format_array(&product.dores))
        .bind(format_array(&product.beneficios))
        .bind(format_array(&product.palavras_chave))
        .bind(&product.link_compra)
        .bind(product.ativo as i64)
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(product)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
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

    fn make_product() -> Product {
        Product {
            id: Uuid::now_v7(),
            nome: "Automação fiscal".to_string(),
            descricao: Some("Automatiza a entrega de obrigações".to_string()),
            publico_alvo: Some("escritórios de contabilidade".to_string()),
            dores: vec!["retrabalho".to_string(), "prazos".to_string()],
            beneficios: vec!["menos erros".to_string()],
            palavras_chave: vec!["fiscal".to_string()],
            link_compra: None,
            ativo: true,
            criado_em: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_arrays_roundtrip_through_json_columns() {
        let repo = SqliteProductRepository::new(test_pool().await);
        let product = make_product();
        repo.create(&product).await.unwrap();

        let found = repo.get(&product.id).await.unwrap().unwrap();
        assert_eq!(found.dores, vec!["retrabalho", "prazos"]);
        assert_eq!(found.beneficios, vec!["menos erros"]);
        assert_eq!(found.palavras_chave, vec!["fiscal"]);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let repo = SqliteProductRepository::new(test_pool().await);
        let product = make_product();
        repo.create(&product).await.unwrap();

        let update = UpdateProductRequest {
            ativo: Some(false),
            palavras_chave: Some(vec!["impostos".to_string()]),
            ..UpdateProductRequest::default()
        };
        let updated = repo.update(&product.id, &update).await.unwrap();

        assert!(!updated.ativo);
        assert_eq!(updated.palavras_chave, vec!["impostos"]);
        assert_eq!(updated.nome, "Automação fiscal", "untouched field kept");
    }

    #[tokio::test]
    async fn test_delete_and_not_found() {
        let repo = SqliteProductRepository::new(test_pool().await);
        let product = make_product();
        repo.create(&product).await.unwrap();

        repo.delete(&product.id).await.unwrap();
        assert!(repo.get(&product.id).await.unwrap().is_none());

        let err = repo.delete(&product.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
