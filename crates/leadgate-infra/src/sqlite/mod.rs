//! SQLite persistence via sqlx.
//!
//! All repositories share the split reader/writer [`pool::DatabasePool`]
//! and map rows through private Row structs.

pub mod auto_message;
pub mod lead;
pub mod metrics;
pub mod pool;
pub mod product;
pub mod user;

pub use auto_message::SqliteAutoMessageRepository;
pub use lead::SqliteLeadRepository;
pub use metrics::SqliteMetricsRepository;
pub use pool::DatabasePool;
pub use product::SqliteProductRepository;
pub use user::SqliteUserRepository;

use chrono::{DateTime, Utc};
use leadgate_types::error::RepositoryError;

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub(crate) fn parse_uuid(s: &str, field: &str) -> Result<uuid::Uuid, RepositoryError> {
    uuid::Uuid::parse_str(s).map_err(|e| RepositoryError::Query(format!("invalid {field}: {e}")))
}

/// Map a sqlx error, turning unique-constraint violations into `Conflict`.
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(db_err.message().to_string());
        }
    }
    RepositoryError::Query(err.to_string())
}
