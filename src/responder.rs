//! Intent triggers and fallback reply generation
//!
//! The deterministic counterpart to the LLM path. Triggers are evaluated
//! against the current utterance and session state in a fixed priority
//! order, stopping at the first match; reordering them changes observable
//! behavior, so the order is part of the contract:
//!
//! greeting → capability inquiry → savings goal → fresh income →
//! expense → analysis → default
//!
//! Entity extraction has already run against the utterance by the time
//! this module is called.

use chrono::{DateTime, Utc};

use crate::extractor;
use crate::finance;
use crate::session::Session;
use crate::templates::{
    format_amount, pick, render, ADVICE, BUDGET_ANALYSIS, CAPABILITIES, EMPTY_LEDGER_ADVICE,
    EXPENSE_ADDED, GENERAL, GREETING_ONBOARDING, GREETING_SHORT_ACK, INCOME_ADDED,
    SAVINGS_GOAL_ADDED,
};

/// Static keyword lists — zero allocation
const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "hola", "greetings"];

const CAPABILITY_TRIGGERS: &[&str] = &[
    "what can you do",
    "your capabilities",
    "help me",
    "what do you do",
    "how can you help",
];

const ANALYSIS_KEYWORDS: &[&str] = &[
    "analyze",
    "analysis",
    "how am i doing",
    "budget",
    "review",
    "overview",
    "summary",
    "status",
];

/// A recorded income is only acknowledged while the conversation is this
/// young; afterwards income mentions fall through to other intents.
const FRESH_INCOME_MAX_TURNS: usize = 3;

/// Which response category the utterance resolves to
#[derive(Debug, Clone, PartialEq)]
enum Intent {
    Greeting,
    Capability,
    SavingsGoal,
    FreshIncome,
    Expense { amount: f64, category: String },
    Analysis,
    Default,
}

/// First matching trigger wins
fn classify(input: &str, session: &Session) -> Intent {
    let lowered = input.to_lowercase();

    if GREETING_WORDS.iter().any(|word| lowered.contains(word)) {
        return Intent::Greeting;
    }

    if CAPABILITY_TRIGGERS
        .iter()
        .any(|trigger| lowered.contains(trigger))
    {
        return Intent::Capability;
    }

    if extractor::match_savings_goal(input).is_some() {
        return Intent::SavingsGoal;
    }

    if session.profile.income.is_some() && session.turn_count() < FRESH_INCOME_MAX_TURNS {
        return Intent::FreshIncome;
    }

    if let Some((amount, category)) = extractor::match_expense(input) {
        return Intent::Expense { amount, category };
    }

    if ANALYSIS_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
        && session.profile.income.is_some()
    {
        return Intent::Analysis;
    }

    Intent::Default
}

/// Produce the fallback reply for an utterance. Mutates the session only
/// for the greeting cooldown and the RNG; extraction happened upstream.
pub fn respond(session: &mut Session, input: &str, now: DateTime<Utc>) -> String {
    match classify(input, session) {
        Intent::Greeting => render_greeting(session, now),
        Intent::Capability => render_capabilities(),
        Intent::SavingsGoal => render_savings_goal(session),
        Intent::FreshIncome => render_fresh_income(session),
        Intent::Expense { amount, category } => render_expense(session, amount, &category),
        Intent::Analysis => render_analysis(session),
        Intent::Default => render_default(session),
    }
}

fn render_greeting(session: &mut Session, now: DateTime<Utc>) -> String {
    if session.greeting_allows_full(now) {
        session.record_greeting(now);
        pick(&mut session.rng, GREETING_ONBOARDING).to_string()
    } else {
        GREETING_SHORT_ACK.to_string()
    }
}

fn render_capabilities() -> String {
    let mut response =
        String::from("I'm your personal finance assistant! Here's what I can do for you:\n\n");
    for capability in CAPABILITIES {
        response.push_str(&format!("• {}\n", capability));
    }
    response.push_str("\nReady to get started? Just tell me your name! 😊");
    response
}

fn render_savings_goal(session: &mut Session) -> String {
    let goal = session.profile.savings_goal.unwrap_or(0.0);
    let template = pick(&mut session.rng, SAVINGS_GOAL_ADDED);
    render(template, &[("goal", format_amount(goal, 0))])
}

fn render_fresh_income(session: &mut Session) -> String {
    let income = session.profile.income.unwrap_or(0.0);
    let template = pick(&mut session.rng, INCOME_ADDED);
    render(template, &[("income", format_amount(income, 0))])
}

fn render_expense(session: &mut Session, amount: f64, category: &str) -> String {
    let total = finance::total_expenses(&session.ledger);
    let template = pick(&mut session.rng, EXPENSE_ADDED);
    render(
        template,
        &[
            ("amount", format_amount(amount, 0)),
            ("category", category.to_string()),
            ("total_expenses", format_amount(total, 0)),
        ],
    )
}

fn render_analysis(session: &mut Session) -> String {
    let income = session.profile.income.unwrap_or(0.0);
    let total = finance::total_expenses(&session.ledger);
    let remaining = finance::remaining_balance(income, total);

    let advice = advice_line(session, income);

    let template = pick(&mut session.rng, BUDGET_ANALYSIS);
    render(
        template,
        &[
            ("income", format_amount(income, 0)),
            ("total_expenses", format_amount(total, 0)),
            ("remaining", format_amount(remaining, 0)),
            ("advice", advice),
        ],
    )
}

/// Highest-category advice for the analysis reply, or the generic
/// tracking prompt when the ledger is empty or income is unusable
fn advice_line(session: &mut Session, income: f64) -> String {
    if session.ledger.is_empty() || income == 0.0 {
        return EMPTY_LEDGER_ADVICE.to_string();
    }

    let Some((category, amount)) = finance::highest_category(&session.ledger) else {
        return EMPTY_LEDGER_ADVICE.to_string();
    };
    let category = category.to_string();
    let percent = amount / income * 100.0;
    let recommended_savings = finance::fifty_thirty_twenty(income).savings;
    let savings_goal = session.profile.savings_goal.unwrap_or(recommended_savings);

    let template = pick(&mut session.rng, ADVICE);
    render(
        template,
        &[
            ("category", category),
            ("amount", format_amount(amount, 0)),
            ("percent", format!("{:.1}", percent)),
            ("recommended", "15-20".to_string()),
            ("status", finance::classify_share(percent).to_string()),
            ("goal", format_amount(recommended_savings, 0)),
            ("savings_goal", format_amount(savings_goal, 0)),
        ],
    )
}

fn render_default(session: &mut Session) -> String {
    let template = pick(&mut session.rng, GENERAL);
    match &session.profile.name {
        Some(name) => format!("Hi {}! {}", name, template),
        None => template.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor;
    use crate::models::ChatTurn;
    use chrono::Duration;

    fn session() -> Session {
        Session::with_seed(7)
    }

    /// Extraction-then-respond, the way the orchestrator drives it
    fn reply(session: &mut Session, input: &str, now: DateTime<Utc>) -> String {
        extractor::extract(input, &mut session.profile, &mut session.ledger);
        respond(session, input, now)
    }

    #[test]
    fn test_greeting_full_then_short_then_full_again() {
        let mut session = session();
        let start = Utc::now();

        let first = reply(&mut session, "hello there", start);
        assert!(GREETING_ONBOARDING.contains(&first.as_str()));

        let second = reply(&mut session, "hello again", start + Duration::seconds(299));
        assert_eq!(second, GREETING_SHORT_ACK);

        let third = reply(&mut session, "hello once more", start + Duration::seconds(301));
        assert!(GREETING_ONBOARDING.contains(&third.as_str()));
    }

    #[test]
    fn test_greeting_outranks_analysis() {
        let mut session = session();
        session.profile.income = Some(50000.0);
        // Turns pushed so the fresh-income trigger is out of the way
        for _ in 0..4 {
            session.push_turn(ChatTurn::user("..."));
        }

        let out = reply(&mut session, "hello, can you analyze my budget?", Utc::now());
        assert!(GREETING_ONBOARDING.contains(&out.as_str()));
    }

    #[test]
    fn test_capability_inquiry_lists_everything() {
        let mut session = session();
        let out = reply(&mut session, "what can you do?", Utc::now());

        for capability in CAPABILITIES {
            assert!(out.contains(capability));
        }
        assert!(out.contains("Just tell me your name!"));
        assert_eq!(out.matches('•').count(), CAPABILITIES.len());
    }

    #[test]
    fn test_savings_goal_confirmation() {
        let mut session = session();
        let out = reply(&mut session, "I want to save 8,000 every month", Utc::now());

        assert_eq!(session.profile.savings_goal, Some(8000.0));
        assert!(out.contains("savings goal"));
        assert!(out.contains("₹8,000"));
    }

    #[test]
    fn test_fresh_income_acknowledged_early_only() {
        let mut session = session();

        let out = reply(&mut session, "my income is 50000", Utc::now());
        assert!(out.contains("income as ₹50,000"));

        // Past the early-conversation window the same trigger stays quiet
        for _ in 0..4 {
            session.push_turn(ChatTurn::user("..."));
        }
        let later = reply(&mut session, "okay then", Utc::now());
        assert!(!later.contains("income as"));
    }

    #[test]
    fn test_expense_acknowledged_with_running_total() {
        let mut session = session();
        session.profile.income = Some(50000.0);
        for _ in 0..4 {
            session.push_turn(ChatTurn::user("..."));
        }

        reply(&mut session, "I spend 15000 on rent", Utc::now());
        let out = reply(&mut session, "I also spend 10,000 on food", Utc::now());

        assert!(out.contains("₹10,000"));
        assert!(out.contains("food"));
        // Whichever template fired, no placeholder may survive rendering
        assert!(!out.contains('{'));
        assert_eq!(finance::total_expenses(&session.ledger), 25000.0);
    }

    #[test]
    fn test_analysis_combines_figures_and_advice() {
        let mut session = session();
        for _ in 0..4 {
            session.push_turn(ChatTurn::user("..."));
        }
        reply(&mut session, "I earn 50000", Utc::now());
        reply(&mut session, "I spend 15000 on rent", Utc::now());
        reply(&mut session, "I spend 10000 on food", Utc::now());

        let out = reply(&mut session, "can you analyze my spending?", Utc::now());

        assert!(out.contains("₹50,000"));
        assert!(out.contains("₹25,000"));
        assert!(!out.contains('{'));
    }

    #[test]
    fn test_analysis_without_income_falls_through_to_default() {
        let mut session = session();
        for _ in 0..4 {
            session.push_turn(ChatTurn::user("..."));
        }

        let out = reply(&mut session, "give me an analysis", Utc::now());
        assert!(GENERAL.contains(&out.as_str()));
    }

    #[test]
    fn test_analysis_with_empty_ledger_uses_generic_advice() {
        let mut session = session();
        session.profile.income = Some(50000.0);
        for _ in 0..4 {
            session.push_turn(ChatTurn::user("..."));
        }

        let out = reply(&mut session, "budget overview please", Utc::now());
        assert!(out.contains(EMPTY_LEDGER_ADVICE));
    }

    #[test]
    fn test_default_is_personalized_once_named() {
        let mut session = session();
        for _ in 0..4 {
            session.push_turn(ChatTurn::user("..."));
        }

        let anonymous = reply(&mut session, "tell me something", Utc::now());
        assert!(GENERAL.contains(&anonymous.as_str()));

        reply(&mut session, "my name is asha, nice to meet you", Utc::now());
        let personalized = reply(&mut session, "tell me something", Utc::now());
        assert!(personalized.starts_with("Hi Asha! "));
    }

    #[test]
    fn test_same_seed_same_replies() {
        let mut a = Session::with_seed(99);
        let mut b = Session::with_seed(99);
        let now = Utc::now();

        for input in ["hello", "I earn 42000", "I spend 2000 on books", "what now?"] {
            assert_eq!(reply(&mut a, input, now), reply(&mut b, input, now));
        }
    }
}
