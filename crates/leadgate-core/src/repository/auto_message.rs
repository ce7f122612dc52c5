//! AutoMessageRepository trait definition.

use leadgate_types::auto_message::{AutoMessage, UpdateAutoMessageRequest};
use leadgate_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for automatic message templates.
pub trait AutoMessageRepository: Send + Sync {
    fn create(
        &self,
        message: &AutoMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<AutoMessage>, RepositoryError>> + Send;

    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<AutoMessage>, RepositoryError>> + Send;

    /// Apply a partial update. Fails with `NotFound` for unknown ids.
    fn update(
        &self,
        id: &Uuid,
        update: &UpdateAutoMessageRequest,
    ) -> impl std::future::Future<Output = Result<AutoMessage, RepositoryError>> + Send;

    fn delete(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
