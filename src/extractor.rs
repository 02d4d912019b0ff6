//! Entity extraction from free-form user text
//!
//! Parses income, expenses, savings goals, and the user's name out of
//! loosely formatted utterances with a fixed set of case-insensitive
//! patterns. Extraction mutates the profile/ledger in place and never
//! fails: malformed numeric candidates are silently skipped so the
//! fallback path stays unconditionally available.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{ExpenseLedger, UserProfile};

lazy_static! {
    static ref INCOME_RE: Regex = Regex::new(
        r"(?i)(?:income|earn|salary|make|making)(?:\s+is|\s+of)?\s+(?:rs\.?|₹)?\s*(\d+(?:,\d+)*(?:\.\d+)?)"
    )
    .unwrap();
    static ref EXPENSE_RE: Regex = Regex::new(
        r"(?i)(?:spend|spent|spending|pay|paying|paid|expense|expenses|cost|costs)\s+(?:rs\.?|₹)?\s*(\d+(?:,\d+)*(?:\.\d+)?)\s+(?:on|for|in)\s+([a-zA-Z\s]+)"
    )
    .unwrap();

    // Tried in declared order; the first family that matches wins and the
    // second is not consulted. This differs from the expense rule's
    // extract-all behavior.
    static ref SAVINGS_RES: [Regex; 2] = [
        Regex::new(r"(?i)(?:save|saving|savings|goal)\s+(?:rs\.?|₹)?\s*(\d+(?:,\d+)*(?:\.\d+)?)")
            .unwrap(),
        Regex::new(
            r"(?i)(?:want to|wanna|going to|plan to)\s+save\s+(?:rs\.?|₹)?\s*(\d+(?:,\d+)*(?:\.\d+)?)"
        )
        .unwrap(),
    ];

    static ref NAME_RES: [Regex; 3] = [
        Regex::new(r"(?i)(?:my name is|i am|i'm) ([A-Za-z]+)").unwrap(),
        Regex::new(r"(?i)(?:call me) ([A-Za-z]+)").unwrap(),
        Regex::new(r"(?i)^(?:i'm|i am) ([A-Za-z]+)").unwrap(),
    ];
}

/// Extract every recognized financial fact from `text` into the profile
/// and ledger. Income and savings goal take the latest value; expense
/// categories are overwritten per mention; the name is set at most once.
pub fn extract(text: &str, profile: &mut UserProfile, ledger: &mut ExpenseLedger) {
    if let Some(income) = match_income(text) {
        profile.income = Some(income);
    }

    for (amount, category) in match_all_expenses(text) {
        ledger.insert(category, amount);
    }

    if let Some(goal) = match_savings_goal(text) {
        profile.savings_goal = Some(goal);
    }

    if profile.name.is_none() {
        if let Some(name) = match_name(text) {
            profile.name = Some(name);
        }
    }
}

/// First income mention, commas stripped
pub fn match_income(text: &str) -> Option<f64> {
    let caps = INCOME_RE.captures(text)?;
    parse_amount(caps.get(1)?.as_str())
}

/// First expense mention, for acknowledgement rendering
pub fn match_expense(text: &str) -> Option<(f64, String)> {
    let caps = EXPENSE_RE.captures(text)?;
    let amount = parse_amount(caps.get(1)?.as_str())?;
    let category = caps.get(2)?.as_str().trim().to_lowercase();
    Some((amount, category))
}

/// Every expense mention in the utterance, in match order
fn match_all_expenses(text: &str) -> Vec<(f64, String)> {
    EXPENSE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let amount = parse_amount(caps.get(1)?.as_str())?;
            let category = caps.get(2)?.as_str().trim().to_lowercase();
            Some((amount, category))
        })
        .collect()
}

/// First savings-goal pattern family to produce a parseable number wins
pub fn match_savings_goal(text: &str) -> Option<f64> {
    for pattern in SAVINGS_RES.iter() {
        if let Some(caps) = pattern.captures(text) {
            if let Some(goal) = caps.get(1).and_then(|m| parse_amount(m.as_str())) {
                return Some(goal);
            }
        }
    }
    None
}

fn match_name(text: &str) -> Option<String> {
    for pattern in NAME_RES.iter() {
        if let Some(caps) = pattern.captures(text) {
            if let Some(name) = caps.get(1) {
                return Some(capitalize(name.as_str()));
            }
        }
    }
    None
}

/// Parse a captured number, dropping thousands-separator commas
fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse().ok()
}

/// First letter upper, rest lower
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}
