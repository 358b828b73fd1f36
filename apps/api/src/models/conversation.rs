use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One chat exchange. Stored oldest-first in a session's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_message: String,
    pub assistant_message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(user_message: impl Into<String>, assistant_message: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            assistant_message: assistant_message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Per-session chatbot state: the CV analysis the user last supplied and the
/// retained conversation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub cv_context: Option<Value>,
    pub history: Vec<ConversationTurn>,
}
