//! Conversation session state
//!
//! One `Session` owns everything accumulated for a single user: the
//! financial profile, the expense ledger, the turn history, the greeting
//! cooldown, and the running LLM chat transcript. Sessions are never
//! shared across users; the registry hands out one mutex-guarded
//! session per caller.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::models::{ChatRole, ChatTurn, ExpenseLedger, UserProfile};
use crate::templates::format_amount;

/// Seconds a full greeting stays suppressed after it was last issued
pub const GREETING_COOLDOWN_SECS: i64 = 300;

/// Turns surfaced when formatting history for external context
pub const CONTEXT_TURNS: usize = 5;

pub struct Session {
    pub profile: UserProfile,
    pub ledger: ExpenseLedger,
    history: Vec<ChatTurn>,
    llm_transcript: Vec<ChatTurn>,
    last_greeting_at: Option<DateTime<Utc>>,
    pub(crate) rng: StdRng,
}

impl Session {
    pub fn new() -> Self {
        Self {
            profile: UserProfile::default(),
            ledger: ExpenseLedger::new(),
            history: Vec::new(),
            llm_transcript: Vec::new(),
            last_greeting_at: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Session with a seeded RNG so template choice is deterministic
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ..Self::new()
        }
    }

    // =============================
    // Turn history
    // =============================

    /// Append a turn. History is append-only.
    pub fn push_turn(&mut self, turn: ChatTurn) {
        self.history.push(turn);
    }

    pub fn turn_count(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Format the most recent turns for external context. Older turns are
    /// retained but not surfaced.
    pub fn formatted_recent_history(&self) -> String {
        if self.history.is_empty() {
            return "This is the start of the conversation.".to_string();
        }

        let start = self.history.len().saturating_sub(CONTEXT_TURNS);
        self.history[start..]
            .iter()
            .map(|turn| format!("{}: {}", turn.role, turn.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the profile and ledger for the LLM prompt. Only fields that
    /// are currently set appear; amounts use two decimal places here.
    pub fn formatted_financial_context(&self) -> String {
        if self.profile.is_empty() && self.ledger.is_empty() {
            return "No financial data available yet.".to_string();
        }

        let mut context = Vec::new();

        if !self.profile.is_empty() {
            context.push("User Financial Profile:".to_string());
            if let Some(name) = &self.profile.name {
                context.push(format!("- Name: {}", name));
            }
            if let Some(income) = self.profile.income {
                context.push(format!("- Monthly Income: ₹{}", format_amount(income, 2)));
            }
            if let Some(goal) = self.profile.savings_goal {
                context.push(format!("- Savings Goal: ₹{}", format_amount(goal, 2)));
            }
        }

        if !self.ledger.is_empty() {
            context.push("\nExpense Categories:".to_string());

            let mut categories: Vec<_> = self.ledger.iter().collect();
            categories.sort_by(|a, b| a.0.cmp(b.0));
            for (category, amount) in categories {
                context.push(format!("- {}: ₹{}", category, format_amount(*amount, 2)));
            }
        }

        context.join("\n")
    }

    // =============================
    // Greeting cooldown
    // =============================

    /// A full greeting is allowed when no greeting was issued yet, or when
    /// strictly more than the cooldown window has elapsed since the last one.
    pub fn greeting_allows_full(&self, now: DateTime<Utc>) -> bool {
        match self.last_greeting_at {
            None => true,
            Some(last) => now.signed_duration_since(last).num_seconds() > GREETING_COOLDOWN_SECS,
        }
    }

    pub fn record_greeting(&mut self, now: DateTime<Utc>) {
        self.last_greeting_at = Some(now);
    }

    // =============================
    // LLM chat transcript
    // =============================

    /// The stateful chat transcript sent to the LLM collaborator. Distinct
    /// from the turn history: entries hold the full composite prompts.
    pub fn llm_transcript(&self) -> &[ChatTurn] {
        &self.llm_transcript
    }

    pub fn push_llm_exchange(&mut self, prompt: String, reply: String) {
        self.llm_transcript.push(ChatTurn {
            role: ChatRole::User,
            content: prompt,
        });
        self.llm_transcript.push(ChatTurn {
            role: ChatRole::Assistant,
            content: reply,
        });
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// =============================
// Session registry
// =============================

/// Hands out one isolated session per caller-supplied key. The per-entry
/// mutex serializes concurrent requests against the same session; distinct
/// sessions never share state.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get_or_create(&self, session_id: Uuid) -> Arc<Mutex<Session>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(&session_id) {
                return session.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id)
            .or_insert_with(|| Arc::new(Mutex::new(Session::new())))
            .clone()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_full_greeting_allowed_when_never_greeted() {
        let session = Session::new();
        assert!(session.greeting_allows_full(Utc::now()));
    }

    #[test]
    fn test_greeting_cooldown_boundary() {
        let mut session = Session::new();
        let start = Utc::now();
        session.record_greeting(start);

        assert!(!session.greeting_allows_full(start + Duration::seconds(299)));
        assert!(!session.greeting_allows_full(start + Duration::seconds(300)));
        assert!(session.greeting_allows_full(start + Duration::seconds(301)));
    }

    #[test]
    fn test_recent_history_surfaces_last_five_turns() {
        let mut session = Session::new();
        for i in 0..8 {
            session.push_turn(ChatTurn::user(format!("message {}", i)));
        }

        let formatted = session.formatted_recent_history();
        assert!(!formatted.contains("message 2"));
        assert!(formatted.contains("message 3"));
        assert!(formatted.contains("message 7"));
        assert_eq!(formatted.lines().count(), 5);
    }

    #[test]
    fn test_empty_history_placeholder() {
        let session = Session::new();
        assert_eq!(
            session.formatted_recent_history(),
            "This is the start of the conversation."
        );
    }

    #[test]
    fn test_financial_context_lists_only_set_fields() {
        let mut session = Session::new();
        assert_eq!(
            session.formatted_financial_context(),
            "No financial data available yet."
        );

        session.profile.income = Some(50000.0);
        session.ledger.insert("rent".to_string(), 15000.0);

        let context = session.formatted_financial_context();
        assert!(context.contains("- Monthly Income: ₹50,000.00"));
        assert!(context.contains("- rent: ₹15,000.00"));
        assert!(!context.contains("Savings Goal"));
    }

    #[tokio::test]
    async fn test_registry_isolates_sessions() {
        let registry = SessionRegistry::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        {
            let session = registry.get_or_create(a).await;
            session.lock().await.profile.income = Some(1000.0);
        }

        let other = registry.get_or_create(b).await;
        assert!(other.lock().await.profile.income.is_none());
        assert_eq!(registry.session_count().await, 2);

        let again = registry.get_or_create(a).await;
        assert_eq!(again.lock().await.profile.income, Some(1000.0));
    }
}
