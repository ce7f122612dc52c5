//! LeadRepository trait definition.
//!
//! Covers the lead record itself plus its append-only children (messages,
//! calls, interactions). Deleting a lead cascades to its children.

use leadgate_types::error::RepositoryError;
use leadgate_types::lead::{
    Lead, LeadCall, LeadInteraction, LeadMessage, UpdateLeadRequest,
};
use uuid::Uuid;

/// Repository trait for lead persistence.
pub trait LeadRepository: Send + Sync {
    /// Insert a new lead.
    fn create(
        &self,
        lead: &Lead,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a lead by id.
    fn get(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Lead>, RepositoryError>> + Send;

    /// Find a lead by email (conversation-to-lead adoption).
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<Lead>, RepositoryError>> + Send;

    /// List all leads, newest first.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Lead>, RepositoryError>> + Send;

    /// Apply a partial update. Unspecified fields are left untouched.
    /// Fails with `NotFound` for unknown ids.
    fn update(
        &self,
        id: &Uuid,
        update: &UpdateLeadRequest,
    ) -> impl std::future::Future<Output = Result<Lead, RepositoryError>> + Send;

    /// Delete a lead. Cascades to messages, calls, and interactions.
    fn delete(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    // --- Append-only children ---

    fn add_message(
        &self,
        message: &LeadMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn list_messages(
        &self,
        lead_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<LeadMessage>, RepositoryError>> + Send;

    fn add_call(
        &self,
        call: &LeadCall,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn list_calls(
        &self,
        lead_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<LeadCall>, RepositoryError>> + Send;

    fn add_interaction(
        &self,
        interaction: &LeadInteraction,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn list_interactions(
        &self,
        lead_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<LeadInteraction>, RepositoryError>> + Send;
}
