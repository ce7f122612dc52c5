//! Product catalog types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog entry describing something the sales flow can suggest.
///
/// The descriptive arrays (`dores`, `beneficios`, `palavras_chave`) are
/// stored as JSON text columns in SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub nome: String,
    pub descricao: Option<String>,
    pub publico_alvo: Option<String>,
    /// Pain points this product addresses.
    #[serde(default)]
    pub dores: Vec<String>,
    /// Benefits to highlight.
    #[serde(default)]
    pub beneficios: Vec<String>,
    /// Keywords for matching against conversations.
    #[serde(default)]
    pub palavras_chave: Vec<String>,
    pub link_compra: Option<String>,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
}

/// Request body for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub nome: String,
    pub descricao: Option<String>,
    pub publico_alvo: Option<String>,
    #[serde(default)]
    pub dores: Vec<String>,
    #[serde(default)]
    pub beneficios: Vec<String>,
    #[serde(default)]
    pub palavras_chave: Vec<String>,
    pub link_compra: Option<String>,
    #[serde(default = "default_true")]
    pub ativo: bool,
}

fn default_true() -> bool {
    true
}

/// Partial update for a product. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub publico_alvo: Option<String>,
    pub dores: Option<Vec<String>>,
    pub beneficios: Option<Vec<String>>,
    pub palavras_chave: Option<Vec<String>>,
    pub link_compra: Option<String>,
    pub ativo: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_product_defaults() {
        let req: CreateProductRequest =
            serde_json::from_str(r#"{"nome": "Automação fiscal"}"#).unwrap();
        assert!(req.ativo);
        assert!(req.dores.is_empty());
    }

    #[test]
    fn test_product_arrays_serialize() {
        let product = Product {
            id: Uuid::now_v7(),
            nome: "Automação fiscal".to_string(),
            descricao: None,
            publico_alvo: None,
            dores: vec!["retrabalho".to_string()],
            beneficios: vec![],
            palavras_chave: vec!["fiscal".to_string(), "impostos".to_string()],
            link_compra: None,
            ativo: true,
            criado_em: Utc::now(),
        };
        let json = serde_json::to_string(&product).unwrap();
        assert!(json.contains("\"dores\":[\"retrabalho\"]"));
    }
}
