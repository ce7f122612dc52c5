//! Shared domain types for Leadgate.
//!
//! This crate contains the core domain types used across the Leadgate
//! backend: User, Lead (and its child records), Product, AutoMessage,
//! MetricsSnapshot, conversation state, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod auto_message;
pub mod chat;
pub mod config;
pub mod error;
pub mod lead;
pub mod llm;
pub mod metrics;
pub mod product;
pub mod speech;
pub mod user;
