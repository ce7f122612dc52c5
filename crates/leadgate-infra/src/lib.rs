//! Infrastructure implementations for Leadgate.
//!
//! Concrete backends for the traits defined in leadgate-core: SQLite
//! repositories via sqlx, Argon2id password hashing, HS256 tokens, the
//! OpenAI chat provider, and the Google speech clients.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod speech;
pub mod sqlite;
