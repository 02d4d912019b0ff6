//! Response orchestration
//!
//! Single integration point with the external collaborators. Each call
//! attempts the LLM path first when a collaborator is configured and
//! falls back to the deterministic pipeline (extraction → intent
//! triggers → templates) on any failure; collaborator errors never
//! reach the caller.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::advice::{self, AdviceSource, HttpAdviceSource};
use crate::config::Config;
use crate::error::AssistantError;
use crate::extractor;
use crate::finance;
use crate::gemini::GeminiClient;
use crate::models::{ChatOutcome, ChatTurn, ResponseSource};
use crate::responder;
use crate::session::Session;
use crate::Result;

pub struct Assistant {
    llm: Option<GeminiClient>,
    advice: Option<Box<dyn AdviceSource>>,
}

impl Assistant {
    /// Assistant with the collaborators named in the configuration
    pub fn new(config: &Config) -> Self {
        let advice = config
            .advice_api_base_url
            .clone()
            .map(HttpAdviceSource::new)
            .map(|source| Box::new(source) as Box<dyn AdviceSource>);

        Self {
            llm: Some(GeminiClient::new(config.gemini_api_key.clone())),
            advice,
        }
    }

    /// Assistant with no external collaborators: every reply comes from
    /// the deterministic fallback pipeline
    pub fn offline() -> Self {
        Self {
            llm: None,
            advice: None,
        }
    }

    /// Swap in an advice source (used by tests)
    pub fn with_advice_source(mut self, source: Box<dyn AdviceSource>) -> Self {
        self.advice = Some(source);
        self
    }

    fn advice_source(&self) -> Option<&dyn AdviceSource> {
        self.advice.as_deref()
    }

    // =============================
    // Chat
    // =============================

    /// Answer one user message, mutating the session
    pub async fn respond(&self, session: &mut Session, input: &str) -> ChatOutcome {
        self.respond_at(session, input, Utc::now()).await
    }

    /// Same as `respond`, with the clock injected for cooldown tests
    pub async fn respond_at(
        &self,
        session: &mut Session,
        input: &str,
        now: DateTime<Utc>,
    ) -> ChatOutcome {
        if let Some(llm) = &self.llm {
            let prompt = build_composite_prompt(session, input);

            match llm.chat(session.llm_transcript(), &prompt).await {
                Ok(reply) => {
                    info!("Conversational response from Gemini API");
                    session.push_llm_exchange(prompt, reply.clone());
                    session.push_turn(ChatTurn::user(input));
                    session.push_turn(ChatTurn::assistant(reply.clone()));

                    return ChatOutcome {
                        reply,
                        source: ResponseSource::LlmResponse,
                    };
                }
                Err(e) => {
                    warn!("Gemini call failed, using deterministic fallback: {}", e);
                }
            }
        }

        extractor::extract(input, &mut session.profile, &mut session.ledger);
        let reply = responder::respond(session, input, now);

        session.push_turn(ChatTurn::user(input));
        session.push_turn(ChatTurn::assistant(reply.clone()));

        ChatOutcome {
            reply,
            source: ResponseSource::FallbackResponse,
        }
    }

    // =============================
    // Savings review
    // =============================

    /// Gap-or-surplus review of the session's savings goal, with banking
    /// product suggestions appended
    pub async fn savings_review(&self, session: &Session) -> Result<String> {
        let income = session
            .profile
            .income
            .ok_or_else(|| AssistantError::SessionError("Monthly income not set".to_string()))?;
        let goal = session
            .profile
            .savings_goal
            .ok_or_else(|| AssistantError::SessionError("Savings goal not set".to_string()))?;

        let total = finance::total_expenses(&session.ledger);
        let remaining = finance::remaining_balance(income, total);
        let outlook = finance::savings_gap_or_surplus(remaining, goal);

        let mut review = advice::savings_review(self.advice_source(), outlook, goal).await;
        review.push_str("\n\n");
        review.push_str(&advice::policy_suggestions(self.advice_source(), goal).await);

        Ok(review)
    }
}

/// Composite prompt for the LLM path: financial context, the most recent
/// turns, and the raw user message. The persona lives in the client's
/// system instruction.
fn build_composite_prompt(session: &Session, input: &str) -> String {
    format!(
        "Financial Context:\n{}\n\nPrevious Conversation:\n{}\n\nUser's message: {}",
        session.formatted_financial_context(),
        session.formatted_recent_history(),
        input
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An assistant whose LLM collaborator is configured but guaranteed
    /// to fail (empty key, so no network traffic happens)
    fn assistant_with_broken_llm() -> Assistant {
        Assistant {
            llm: Some(GeminiClient::new(String::new())),
            advice: None,
        }
    }

    #[tokio::test]
    async fn test_collaborator_failure_is_transparent() {
        let assistant = assistant_with_broken_llm();
        let mut session = Session::with_seed(3);

        let outcome = assistant.respond(&mut session, "hello there").await;

        assert_eq!(outcome.source, ResponseSource::FallbackResponse);
        assert!(!outcome.reply.is_empty());
    }

    #[tokio::test]
    async fn test_offline_assistant_always_uses_fallback() {
        let assistant = Assistant::offline();
        let mut session = Session::with_seed(3);

        let outcome = assistant.respond(&mut session, "I earn 50000").await;

        assert_eq!(outcome.source, ResponseSource::FallbackResponse);
        assert_eq!(session.profile.income, Some(50000.0));
        assert_eq!(session.turn_count(), 2);
    }

    #[tokio::test]
    async fn test_conversation_accumulates_state_across_turns() {
        let assistant = Assistant::offline();
        let mut session = Session::with_seed(11);

        assistant.respond(&mut session, "Hi, my name is Asha").await;
        assistant.respond(&mut session, "I earn 50,000 a month").await;
        assistant.respond(&mut session, "I spend 15000 on rent").await;
        let outcome = assistant
            .respond(&mut session, "can you analyze my budget?")
            .await;

        assert_eq!(session.profile.name.as_deref(), Some("Asha"));
        assert_eq!(session.profile.income, Some(50000.0));
        assert_eq!(session.ledger.get("rent"), Some(&15000.0));
        assert!(outcome.reply.contains("₹50,000"));
        assert_eq!(session.turn_count(), 8);
    }

    #[tokio::test]
    async fn test_savings_review_requires_profile_facts() {
        let assistant = Assistant::offline();
        let session = Session::new();

        let result = assistant.savings_review(&session).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_savings_review_shortfall_end_to_end() {
        let assistant = Assistant::offline();
        let mut session = Session::new();
        session.profile.income = Some(50000.0);
        session.profile.savings_goal = Some(30000.0);
        session.ledger.insert("rent".to_string(), 25000.0);

        let review = assistant.savings_review(&session).await.unwrap();

        // remaining 25,000 against a 30,000 goal: shortfall framing
        assert!(review.contains("₹5,000.00 short"));
        assert!(review.contains("🏦 Banking Recommendations") || review.contains("wealth management"));
    }

    #[test]
    fn test_composite_prompt_embeds_context_and_message() {
        let mut session = Session::new();
        session.profile.income = Some(50000.0);
        session.push_turn(ChatTurn::user("earlier question"));

        let prompt = build_composite_prompt(&session, "what next?");

        assert!(prompt.contains("Financial Context:"));
        assert!(prompt.contains("₹50,000.00"));
        assert!(prompt.contains("user: earlier question"));
        assert!(prompt.ends_with("User's message: what next?"));
    }
}
