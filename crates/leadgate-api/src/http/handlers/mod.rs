//! REST API request handlers.

pub mod auth;
pub mod auto_message;
pub mod chat;
pub mod lead;
pub mod metrics;
pub mod product;
pub mod user;
pub mod voice;
