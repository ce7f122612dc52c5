//! MetricsRepository trait definition.
//!
//! One snapshot per (ano, mes): the schema carries a UNIQUE constraint and
//! writes are upserts.

use leadgate_types::error::RepositoryError;
use leadgate_types::metrics::{MetricsSnapshot, UpsertMetricsRequest};

/// Repository trait for monthly metrics snapshots.
pub trait MetricsRepository: Send + Sync {
    /// Insert or overwrite the snapshot for a period.
    fn upsert(
        &self,
        ano: i32,
        mes: i32,
        counts: &UpsertMetricsRequest,
    ) -> impl std::future::Future<Output = Result<MetricsSnapshot, RepositoryError>> + Send;

    /// Get the snapshot for one period.
    fn get(
        &self,
        ano: i32,
        mes: i32,
    ) -> impl std::future::Future<Output = Result<Option<MetricsSnapshot>, RepositoryError>> + Send;

    /// List all snapshots, newest period first.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<MetricsSnapshot>, RepositoryError>> + Send;
}
