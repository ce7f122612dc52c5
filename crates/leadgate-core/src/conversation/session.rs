//! In-process session store with per-session mutual exclusion and
//! idle-TTL eviction.
//!
//! Each session is held behind its own `Mutex` so a turn's read-modify-write
//! is atomic with respect to concurrent turns on the same session id. The
//! map itself is a `DashMap`, so turns on different sessions never contend.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use leadgate_types::chat::{ConversationStage, LeadDraft};

use crate::conversation::transcript::Transcript;

/// Per-session conversation state.
#[derive(Debug)]
pub struct SessionState {
    pub transcript: Transcript,
    pub draft: LeadDraft,
    pub stage: ConversationStage,
    /// The persisted lead this session upserts into. Captured at the first
    /// insert (or adopted by email match) and reused on later turns.
    pub lead_id: Option<Uuid>,
    /// Last turn timestamp, used by TTL eviction.
    pub last_activity: DateTime<Utc>,
}

impl SessionState {
    fn new(transcript_cap: usize) -> Self {
        Self {
            transcript: Transcript::with_cap(transcript_cap),
            draft: LeadDraft::for_website(),
            stage: ConversationStage::Novice,
            lead_id: None,
            last_activity: Utc::now(),
        }
    }

    /// Record activity for TTL purposes.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

/// Map from session id to lockable conversation state.
pub struct SessionStore {
    sessions: DashMap<Uuid, Arc<Mutex<SessionState>>>,
    transcript_cap: usize,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(transcript_cap: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            transcript_cap,
            idle_ttl,
        }
    }

    /// Resolve or create a session.
    ///
    /// An absent or unknown id allocates a fresh random identifier with
    /// empty state; a known id returns the existing state unchanged.
    pub fn get_or_create(&self, session_id: Option<Uuid>) -> (Uuid, Arc<Mutex<SessionState>>) {
        if let Some(id) = session_id {
            if let Some(existing) = self.sessions.get(&id) {
                return (id, Arc::clone(existing.value()));
            }
            // Unknown id: honor it as the key but start from empty state,
            // so a client that kept an evicted id can continue.
            let state = Arc::new(Mutex::new(SessionState::new(self.transcript_cap)));
            self.sessions.insert(id, Arc::clone(&state));
            return (id, state);
        }

        let id = Uuid::new_v4();
        let state = Arc::new(Mutex::new(SessionState::new(self.transcript_cap)));
        self.sessions.insert(id, Arc::clone(&state));
        (id, state)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Evict sessions idle longer than the TTL. Returns the evicted count.
    ///
    /// A session currently locked by a turn is skipped this sweep; its
    /// `last_activity` is refreshed by the turn anyway.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let mut evicted = 0;
        self.sessions.retain(|id, state| {
            let Ok(state) = state.try_lock() else {
                return true;
            };
            let keep = now - state.last_activity < self.idle_ttl;
            if !keep {
                debug!(session_id = %id, "Evicting idle session");
                evicted += 1;
            }
            keep
        });
        evicted
    }
}
