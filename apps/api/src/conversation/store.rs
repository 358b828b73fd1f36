//! In-memory, session-scoped chatbot state.
//!
//! Each session owns an optional CV context and a bounded conversation history.
//! All mutation goes through the store's write lock, and the lock is never held
//! across a model call, so concurrent requests on one session serialize their
//! updates without losing appends.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::models::conversation::{ConversationTurn, Session};

/// History is trimmed once it grows past this many turns...
pub const HISTORY_TRIM_TRIGGER: usize = 10;
/// ...down to this many of the newest turns.
pub const HISTORY_RETAINED: usize = 8;

#[derive(Clone, Default)]
pub struct ConversationStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the session's CV context and starts a fresh conversation.
    pub async fn set_context(&self, session_id: &str, cv_context: Value) {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(session_id.to_string()).or_default();
        session.cv_context = Some(cv_context);
        session.history.clear();
    }

    pub async fn context(&self, session_id: &str) -> Option<Value> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).and_then(|s| s.cv_context.clone())
    }

    /// A copy of the session's state; empty for sessions never seen.
    pub async fn snapshot(&self, session_id: &str) -> Session {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned().unwrap_or_default()
    }

    /// Appends a turn, applies retention, and returns the resulting history length.
    pub async fn append_turn(&self, session_id: &str, turn: ConversationTurn) -> usize {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(session_id.to_string()).or_default();
        session.history.push(turn);
        enforce_retention(&mut session.history);
        session.history.len()
    }

    pub async fn history(&self, session_id: &str) -> Vec<ConversationTurn> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .map(|s| s.history.clone())
            .unwrap_or_default()
    }

    /// Drops the conversation but keeps the CV context.
    pub async fn clear_history(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(session_id) {
            session.history.clear();
        }
    }
}

fn enforce_retention(history: &mut Vec<ConversationTurn>) {
    if history.len() > HISTORY_TRIM_TRIGGER {
        let excess = history.len() - HISTORY_RETAINED;
        history.drain(..excess);
    }
}
