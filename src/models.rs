//! Core data models for the budget assistant

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

//
// ================= Profile =================
//

/// Financial facts accumulated for one user over a conversation.
///
/// `name` is set at most once (first mention wins); `income` and
/// `savings_goal` are replaced by each new successful extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    pub income: Option<f64>,
    pub savings_goal: Option<f64>,
}

impl UserProfile {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.income.is_none() && self.savings_goal.is_none()
    }
}

//
// ================= Expenses =================
//

/// Category → amount. Categories are free text, lowercased and trimmed;
/// re-mentioning a category overwrites its amount rather than adding to it.
pub type ExpenseLedger = HashMap<String, f64>;

//
// ================= Conversation =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        };
        write!(f, "{}", s)
    }
}

/// A single turn in the conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

//
// ================= Response =================
//

/// Which pipeline produced the reply
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    LlmResponse,
    FallbackResponse,
}

/// Final outcome of one orchestrator call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutcome {
    pub reply: String,
    pub source: ResponseSource,
}
