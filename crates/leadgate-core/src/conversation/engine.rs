//! Per-turn conversation engine.
//!
//! One turn: resolve the session, render the stage-aware system prompt,
//! call the chat provider, then fold the reply back into session state --
//! transcript append, payload extraction, draft merge, stage transition,
//! and lead upsert. A hand-off sentinel in the reply short-circuits
//! everything after the transcript append.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use leadgate_types::chat::{ChatTurnRequest, ChatTurnResponse, ConversationStage, MessageRole};
use leadgate_types::config::ChatConfig;
use leadgate_types::error::{ChatError, RepositoryError};
use leadgate_types::lead::{Lead, LeadStatus, UpdateLeadRequest};
use leadgate_types::llm::{CompletionRequest, Message};

use crate::conversation::extract::{self, Extraction};
use crate::conversation::prompt;
use crate::conversation::session::{SessionState, SessionStore};
use crate::llm::ChatProvider;
use crate::repository::LeadRepository;

/// Orchestrates chat turns against a provider and a lead repository.
pub struct ConversationEngine<P, L> {
    provider: P,
    leads: L,
    sessions: Arc<SessionStore>,
    config: ChatConfig,
}

impl<P, L> ConversationEngine<P, L>
where
    P: ChatProvider,
    L: LeadRepository,
{
    pub fn new(provider: P, leads: L, sessions: Arc<SessionStore>, config: ChatConfig) -> Self {
        Self {
            provider,
            leads,
            sessions,
            config,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Run one conversation turn.
    pub async fn process_turn(
        &self,
        request: &ChatTurnRequest,
    ) -> Result<ChatTurnResponse, ChatError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let (session_id, state) = self.sessions.get_or_create(request.session_id);
        let mut state = state.lock().await;

        let system = prompt::render(state.stage, &state.draft, &self.config);
        let completion = self.build_request(system, &state, message);

        let raw = self
            .provider
            .complete(&completion)
            .await
            .map_err(|err| {
                warn!(%session_id, error = %err, "Chat provider call failed");
                ChatError::Provider(err.to_string())
            })?
            .content;

        // Hand-off: return exactly the sentinel, leave the draft and any
        // persisted lead untouched this turn.
        if raw.contains(&self.config.handoff_sentinel) {
            state.transcript.push(MessageRole::User, message);
            state
                .transcript
                .push(MessageRole::Assistant, self.config.handoff_sentinel.clone());
            state.touch();
            info!(%session_id, "Hand-off sentinel returned, escalating to a human");
            return Ok(ChatTurnResponse {
                response: self.config.handoff_sentinel.clone(),
                session_id,
            });
        }

        let cleaned = extract::extract_payload(&raw);

        state.transcript.push(MessageRole::User, message);
        state
            .transcript
            .push(MessageRole::Assistant, cleaned.text.clone());

        match &cleaned.payload {
            Extraction::Found(extracted) => state.draft.merge(extracted),
            Extraction::NotOffered => debug!(%session_id, "Reply carried no payload block"),
            Extraction::Malformed => {
                warn!(%session_id, "Payload block failed to parse, draft left unchanged");
            }
        }

        // Latest-full-context snapshot: the whole transcript rides along in
        // the lead's mensagem field.
        state.draft.mensagem = Some(state.transcript.serialize());

        if state.stage == ConversationStage::Novice
            && message
                .to_lowercase()
                .contains(&self.config.trigger_phrase.to_lowercase())
        {
            info!(%session_id, "Stage transition novice -> advanced");
            state.stage = ConversationStage::Advanced;
        }

        self.upsert_lead(session_id, &mut state).await?;
        state.touch();

        Ok(ChatTurnResponse {
            response: cleaned.text,
            session_id,
        })
    }

    fn build_request(
        &self,
        system: String,
        state: &SessionState,
        message: &str,
    ) -> CompletionRequest {
        let mut messages: Vec<Message> = state
            .transcript
            .entries()
            .iter()
            .map(|e| Message {
                role: e.role,
                content: e.content.clone(),
            })
            .collect();
        messages.push(Message {
            role: MessageRole::User,
            content: message.to_string(),
        });

        CompletionRequest {
            model: self.config.model.clone(),
            messages,
            system: Some(system),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
        }
    }

    /// Persist the current draft: update the remembered lead, else adopt an
    /// existing lead by email, else insert a new one.
    async fn upsert_lead(
        &self,
        session_id: Uuid,
        state: &mut SessionState,
    ) -> Result<(), ChatError> {
        let update = Self::draft_update(state);

        if let Some(lead_id) = state.lead_id {
            match self.leads.update(&lead_id, &update).await {
                Ok(_) => return Ok(()),
                // Deleted out from under the session: fall through and
                // re-attach below.
                Err(RepositoryError::NotFound) => state.lead_id = None,
                Err(err) => return Err(err.into()),
            }
        }

        if let Some(email) = state.draft.email.clone() {
            if let Some(existing) = self.leads.find_by_email(&email).await? {
                self.leads.update(&existing.id, &update).await?;
                state.lead_id = Some(existing.id);
                debug!(%session_id, lead_id = %existing.id, "Adopted existing lead by email");
                return Ok(());
            }
        }

        let lead = Self::draft_insert(state);
        self.leads.create(&lead).await?;
        info!(%session_id, lead_id = %lead.id, "Created lead from conversation");
        state.lead_id = Some(lead.id);
        Ok(())
    }

    fn draft_update(state: &SessionState) -> UpdateLeadRequest {
        UpdateLeadRequest {
            nome: state.draft.nome.clone(),
            email: state.draft.email.clone(),
            telefone: state.draft.telefone.clone(),
            empresa: state.draft.empresa.clone(),
            setor: state.draft.setor.clone(),
            interesse: state.draft.interesse.clone(),
            mensagem: state.draft.mensagem.clone(),
            origem: state.draft.origem.clone(),
            ..UpdateLeadRequest::default()
        }
    }

    fn draft_insert(state: &SessionState) -> Lead {
        Lead {
            id: Uuid::now_v7(),
            nome: state.draft.nome.clone(),
            email: state.draft.email.clone(),
            telefone: state.draft.telefone.clone(),
            empresa: state.draft.empresa.clone(),
            setor: state.draft.setor.clone(),
            interesse: state.draft.interesse.clone(),
            mensagem: state.draft.mensagem.clone(),
            instagram_id: None,
            facebook_id: None,
            canal_origem: None,
            origem: state
                .draft
                .origem
                .clone()
                .unwrap_or_else(|| "website".to_string()),
            status: LeadStatus::Interacted,
            produto_sugerido: None,
            respondeu: false,
            tentou_chamada: false,
            ativo: true,
            criado_em: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use chrono::Duration;

    use leadgate_types::lead::{LeadCall, LeadInteraction, LeadMessage};
    use leadgate_types::llm::{CompletionResponse, LlmError, Usage};

    /// Provider that pops scripted replies.
    struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
    }

    impl ScriptedProvider {
        fn new(replies: impl IntoIterator<Item = Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().collect()),
            }
        }
    }

    impl ChatProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted reply available");
            reply.map(|content| CompletionResponse {
                id: "cmpl-test".to_string(),
                content,
                model: "gpt-4".to_string(),
                usage: Usage::default(),
            })
        }
    }

    /// In-memory lead store.
    #[derive(Default, Clone)]
    struct MemoryLeads {
        leads: Arc<Mutex<Vec<Lead>>>,
    }

    impl MemoryLeads {
        fn snapshot(&self) -> Vec<Lead> {
            self.leads.lock().unwrap().clone()
        }
    }

    impl LeadRepository for MemoryLeads {
        async fn create(&self, lead: &Lead) -> Result<(), RepositoryError> {
            self.leads.lock().unwrap().push(lead.clone());
            Ok(())
        }

        async fn get(&self, id: &Uuid) -> Result<Option<Lead>, RepositoryError> {
            Ok(self.leads.lock().unwrap().iter().find(|l| l.id == *id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Lead>, RepositoryError> {
            Ok(self
                .leads
                .lock()
                .unwrap()
                .iter()
                .find(|l| l.email.as_deref() == Some(email))
                .cloned())
        }

        async fn list(&self) -> Result<Vec<Lead>, RepositoryError> {
            Ok(self.snapshot())
        }

        async fn update(
            &self,
            id: &Uuid,
            update: &UpdateLeadRequest,
        ) -> Result<Lead, RepositoryError> {
            let mut leads = self.leads.lock().unwrap();
            let lead = leads
                .iter_mut()
                .find(|l| l.id == *id)
                .ok_or(RepositoryError::NotFound)?;
            if update.nome.is_some() {
                lead.nome = update.nome.clone();
            }
            if update.email.is_some() {
                lead.email = update.email.clone();
            }
            if update.telefone.is_some() {
                lead.telefone = update.telefone.clone();
            }
            if update.empresa.is_some() {
                lead.empresa = update.empresa.clone();
            }
            if update.setor.is_some() {
                lead.setor = update.setor.clone();
            }
            if update.interesse.is_some() {
                lead.interesse = update.interesse.clone();
            }
            if update.mensagem.is_some() {
                lead.mensagem = update.mensagem.clone();
            }
            if let Some(origem) = &update.origem {
                lead.origem = origem.clone();
            }
            Ok(lead.clone())
        }

        async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
            self.leads.lock().unwrap().retain(|l| l.id != *id);
            Ok(())
        }

        async fn add_message(&self, _message: &LeadMessage) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn list_messages(&self, _lead_id: &Uuid) -> Result<Vec<LeadMessage>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn add_call(&self, _call: &LeadCall) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn list_calls(&self, _lead_id: &Uuid) -> Result<Vec<LeadCall>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn add_interaction(
            &self,
            _interaction: &LeadInteraction,
        ) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn list_interactions(
            &self,
            _lead_id: &Uuid,
        ) -> Result<Vec<LeadInteraction>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    fn engine(
        replies: impl IntoIterator<Item = Result<String, LlmError>>,
    ) -> ConversationEngine<ScriptedProvider, MemoryLeads> {
        let sessions = Arc::new(SessionStore::new(80, Duration::minutes(30)));
        ConversationEngine::new(
            ScriptedProvider::new(replies),
            MemoryLeads::default(),
            sessions,
            ChatConfig::default(),
        )
    }

    fn payload_reply(text: &str, json: &str) -> Result<String, LlmError> {
        Ok(format!("{text}\n```json\n{json}\n```"))
    }

    fn turn(session_id: Option<Uuid>, message: &str) -> ChatTurnRequest {
        ChatTurnRequest {
            session_id,
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_progressive_profiling_creates_then_updates_one_lead() {
        let engine = engine([
            payload_reply(
                "Prazer, Ana!",
                r#"{"nome": "Ana", "email": null, "telefone": null, "empresa": null, "setor": null, "interesse": null, "mensagem": null, "origem": null}"#,
            ),
            payload_reply(
                "Anotei o seu e-mail.",
                r#"{"nome": null, "email": "ana@example.com", "telefone": null, "empresa": null, "setor": null, "interesse": null, "mensagem": null, "origem": null}"#,
            ),
        ]);

        let first = engine
            .process_turn(&turn(None, "Olá, sou a Ana"))
            .await
            .unwrap();
        assert_eq!(first.response, "Prazer, Ana!");

        let second = engine
            .process_turn(&turn(Some(first.session_id), "O meu e-mail é ana@example.com"))
            .await
            .unwrap();
        assert_eq!(second.session_id, first.session_id);

        let leads = engine.leads.snapshot();
        assert_eq!(leads.len(), 1, "both turns upsert the same lead");
        assert_eq!(leads[0].nome.as_deref(), Some("Ana"));
        assert_eq!(leads[0].email.as_deref(), Some("ana@example.com"));
        assert_eq!(leads[0].origem, "website");
    }

    #[tokio::test]
    async fn test_null_in_payload_never_erases_known_field() {
        let engine = engine([
            payload_reply("Olá Ana!", r#"{"nome": "Ana"}"#),
            payload_reply("Certo.", r#"{"nome": null, "telefone": "912345678"}"#),
        ]);

        let first = engine.process_turn(&turn(None, "oi")).await.unwrap();
        engine
            .process_turn(&turn(Some(first.session_id), "o meu número"))
            .await
            .unwrap();

        let leads = engine.leads.snapshot();
        assert_eq!(leads[0].nome.as_deref(), Some("Ana"));
        assert_eq!(leads[0].telefone.as_deref(), Some("912345678"));
    }

    #[tokio::test]
    async fn test_mensagem_holds_transcript_snapshot() {
        let engine = engine([payload_reply("Olá Ana!", r#"{"nome": "Ana"}"#)]);
        engine.process_turn(&turn(None, "oi, sou a Ana")).await.unwrap();

        let leads = engine.leads.snapshot();
        let mensagem = leads[0].mensagem.as_deref().unwrap();
        assert!(mensagem.contains("user: oi, sou a Ana"));
        assert!(mensagem.contains("assistant: Olá Ana!"));
    }

    #[tokio::test]
    async fn test_sentinel_short_circuits_draft_and_lead() {
        let config = ChatConfig::default();
        let engine = engine([Ok(format!(
            "Claro. {}",
            config.handoff_sentinel
        ))]);

        let result = engine
            .process_turn(&turn(None, "quero falar com um humano"))
            .await
            .unwrap();

        assert_eq!(result.response, config.handoff_sentinel);
        assert!(engine.leads.snapshot().is_empty(), "no lead upsert on hand-off");

        let (_, state) = engine.sessions.get_or_create(Some(result.session_id));
        let state = state.lock().await;
        assert_eq!(state.transcript.len(), 2);
        assert_eq!(state.transcript.entries()[1].content, config.handoff_sentinel);
        assert!(state.draft.nome.is_none());
    }

    #[tokio::test]
    async fn test_trigger_phrase_advances_stage_exactly_once() {
        let engine = engine([
            payload_reply("Ótimo!", r#"{"nome": null}"#),
            payload_reply("Perfeito.", r#"{"nome": null}"#),
        ]);

        let first = engine
            .process_turn(&turn(None, "Já uso IA na minha empresa"))
            .await
            .unwrap();

        let (_, state) = engine.sessions.get_or_create(Some(first.session_id));
        assert_eq!(state.lock().await.stage, ConversationStage::Advanced);

        engine
            .process_turn(&turn(Some(first.session_id), "conta-me mais"))
            .await
            .unwrap();
        let (_, state) = engine.sessions.get_or_create(Some(first.session_id));
        assert_eq!(
            state.lock().await.stage,
            ConversationStage::Advanced,
            "stage never reverts"
        );
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let engine = engine([]);
        let err = engine.process_turn(&turn(None, "   ")).await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
    }

    #[tokio::test]
    async fn test_provider_failure_is_typed_and_leaves_state_untouched() {
        let engine = engine([Err(LlmError::Provider {
            message: "upstream 500".to_string(),
        })]);

        let (session_id, _) = engine.sessions.get_or_create(None);
        let err = engine
            .process_turn(&turn(Some(session_id), "olá"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Provider(_)));

        let (_, state) = engine.sessions.get_or_create(Some(session_id));
        assert!(state.lock().await.transcript.is_empty());
        assert!(engine.leads.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_cleaned_reply_has_no_payload_or_json_word() {
        let engine = engine([payload_reply(
            "Aqui está a resposta em json:",
            r#"{"nome": "Rui"}"#,
        )]);
        let result = engine.process_turn(&turn(None, "olá")).await.unwrap();
        assert!(!result.response.contains('{'));
        assert!(!result.response.to_lowercase().contains("json"));
    }

    #[tokio::test]
    async fn test_email_match_adopts_existing_lead() {
        let engine = engine([payload_reply(
            "Bem-vinda de volta, Ana!",
            r#"{"nome": "Ana", "email": "ana@example.com"}"#,
        )]);

        let existing = Lead {
            id: Uuid::now_v7(),
            nome: Some("Ana".to_string()),
            email: Some("ana@example.com".to_string()),
            telefone: None,
            empresa: None,
            setor: None,
            interesse: None,
            mensagem: None,
            instagram_id: None,
            facebook_id: None,
            canal_origem: None,
            origem: "website".to_string(),
            status: LeadStatus::Interacted,
            produto_sugerido: None,
            respondeu: false,
            tentou_chamada: false,
            ativo: true,
            criado_em: Utc::now(),
        };
        engine.leads.create(&existing).await.unwrap();

        let result = engine.process_turn(&turn(None, "sou a Ana")).await.unwrap();

        let leads = engine.leads.snapshot();
        assert_eq!(leads.len(), 1, "matched by email instead of inserting");

        let (_, state) = engine.sessions.get_or_create(Some(result.session_id));
        assert_eq!(state.lock().await.lead_id, Some(existing.id));
    }

    #[tokio::test]
    async fn test_malformed_payload_keeps_turn_alive() {
        let engine = engine([Ok(
            "Claro!\n```json\n{\"nome\": broken\n```".to_string()
        )]);
        let result = engine.process_turn(&turn(None, "olá")).await.unwrap();
        assert_eq!(result.response, "Claro!");

        // Draft unchanged apart from the transcript snapshot; lead still
        // upserted so the conversation is not lost.
        let leads = engine.leads.snapshot();
        assert_eq!(leads.len(), 1);
        assert!(leads[0].nome.is_none());
        assert!(leads[0].mensagem.is_some());
    }
}
