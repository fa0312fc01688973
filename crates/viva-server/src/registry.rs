//! In-memory registry of open interview sessions.
//!
//! Maps a session id to the resume URL the workflow engine gave us when the
//! session started. Entries live from a successful start call until the end
//! call; nothing is persisted, so a restart forgets every session.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Process-wide session table, cheap to clone into handlers.
///
/// Uses `std::sync::RwLock`: every operation is a single HashMap access that
/// never spans an `.await`, so each call is one uninterrupted step.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, String>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a session, overwriting any entry with the same id.
    pub fn create(&self, session_id: impl Into<String>, resume_url: impl Into<String>) {
        let session_id = session_id.into();
        let resume_url = resume_url.into();
        let replaced = self
            .sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(session_id.clone(), resume_url);
        if replaced.is_some() {
            tracing::info!(session_id = %session_id, "overwrote existing session entry");
        }
    }

    /// Returns the resume URL for a session.
    pub fn get(&self, session_id: &str) -> Option<String> {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(session_id)
            .cloned()
    }

    /// Forgets a session. Returns whether an entry existed.
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(session_id)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of every open session, sorted for stable log output.
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}
