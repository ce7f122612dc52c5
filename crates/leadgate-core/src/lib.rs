//! Business logic for Leadgate.
//!
//! This crate defines the repository and provider traits (implemented in
//! leadgate-infra) and the services built on top of them: the auth service,
//! the in-process session store, and the conversation orchestrator.
//!
//! Never depends on leadgate-infra -- the dependency points the other way.

pub mod auth;
pub mod conversation;
pub mod llm;
pub mod repository;
pub mod speech;
