//! UserRepository trait definition.

use leadgate_types::error::RepositoryError;
use leadgate_types::user::User;
use uuid::Uuid;

/// Repository trait for user persistence.
///
/// Create fails with `RepositoryError::Conflict` when the unique email or
/// handle constraint is violated.
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    fn create(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a user by id.
    fn get(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Find a user whose email OR handle matches the identifier.
    fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Find a user by exact email (token subject resolution).
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// List all users, newest first.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<User>, RepositoryError>> + Send;

    /// Total number of registered users (first-user flag grant).
    fn count(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Set the active flag on a user. Fails with `NotFound` for unknown ids.
    fn set_active(
        &self,
        id: &Uuid,
        is_active: bool,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
