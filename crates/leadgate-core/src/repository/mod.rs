//! Repository trait definitions.
//!
//! Implementations live in leadgate-infra (SQLite via sqlx). All traits use
//! native async fn in traits (RPITIT, Rust 2024 edition).

pub mod auto_message;
pub mod lead;
pub mod metrics;
pub mod product;
pub mod user;

pub use auto_message::AutoMessageRepository;
pub use lead::LeadRepository;
pub use metrics::MetricsRepository;
pub use product::ProductRepository;
pub use user::UserRepository;
