//! ProductRepository trait definition.

use leadgate_types::error::RepositoryError;
use leadgate_types::product::{Product, UpdateProductRequest};
use uuid::Uuid;

/// Repository trait for product catalog persistence.
pub trait ProductRepository: Send + Sync {
    fn create(
        &self,
        product: &Product,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Product>, RepositoryError>> + Send;

    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Product>, RepositoryError>> + Send;

    /// Apply a partial update. Fails with `NotFound` for unknown ids.
    fn update(
        &self,
        id: &Uuid,
        update: &UpdateProductRequest,
    ) -> impl std::future::Future<Output = Result<Product, RepositoryError>> + Send;

    fn delete(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
