//! Chat data model shared between the gateway, the completion client,
//! and the record store client.

use serde::{Deserialize, Serialize};

/// Speaker of a [`ChatTurn`], matching the completion service's wire tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged turn of a conversation. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One user message paired with one rendered assistant reply, appended to
/// a thread's log after a successful completion. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub user_message: String,
    /// Sanitized HTML produced by the renderer.
    pub ai_reply: String,
}

/// A durable conversation record in the external store.
///
/// The store is the sole source of truth: the relay reads a thread,
/// contributes at most one [`ChatExchange`] per request, and never caches
/// thread state beyond that request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatThread {
    pub id: String,
    /// System-prompt configuration for the thread's assistant, if set.
    pub assistant_config: Option<String>,
    /// Append-only exchange log, oldest first.
    pub log: Vec<ChatExchange>,
}
