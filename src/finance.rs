//! Financial computations over a session's profile and ledger
//!
//! Pure functions, no side effects. Callers guard the income-dependent
//! calculations; everything here is total over its inputs.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::models::ExpenseLedger;

/// Share of income above which a category counts as high spending
pub const HIGH_SPEND_PERCENT: f64 = 30.0;

/// Sum of all ledger amounts, zero when empty
pub fn total_expenses(ledger: &ExpenseLedger) -> f64 {
    ledger.values().sum()
}

/// Income minus total expenses. May be negative; not clamped.
pub fn remaining_balance(income: f64, total_expenses: f64) -> f64 {
    income - total_expenses
}

/// Per-category share of income. `None` when income is zero, since the
/// percentages are undefined; the caller must guard.
pub fn expense_percentages(ledger: &ExpenseLedger, income: f64) -> Option<HashMap<String, f64>> {
    if income == 0.0 {
        return None;
    }

    Some(
        ledger
            .iter()
            .map(|(category, amount)| (category.clone(), amount / income * 100.0))
            .collect(),
    )
}

/// Ideal allocation under the 50/30/20 rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetSplit {
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
}

pub fn fifty_thirty_twenty(income: f64) -> BudgetSplit {
    BudgetSplit {
        needs: income * 0.5,
        wants: income * 0.3,
        savings: income * 0.2,
    }
}

/// Category with the largest amount, if any
pub fn highest_category(ledger: &ExpenseLedger) -> Option<(&str, f64)> {
    ledger
        .iter()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
        .map(|(category, amount)| (category.as_str(), *amount))
}

/// How a category's share of income reads in advice text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendClassification {
    High,
    Reasonable,
}

impl fmt::Display for SpendClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpendClassification::High => "high",
            SpendClassification::Reasonable => "reasonable",
        };
        write!(f, "{}", s)
    }
}

/// High only when strictly above the threshold; exactly 30% is reasonable
pub fn classify_share(percent: f64) -> SpendClassification {
    if percent > HIGH_SPEND_PERCENT {
        SpendClassification::High
    } else {
        SpendClassification::Reasonable
    }
}

/// Whether the month's remaining balance covers the savings goal.
/// The two framings drive disjoint advice flows downstream: a shortfall
/// leads to expense-reduction tips, a surplus to investment tips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SavingsOutlook {
    Shortfall(f64),
    Surplus(f64),
}

pub fn savings_gap_or_surplus(remaining: f64, savings_goal: f64) -> SavingsOutlook {
    if remaining < savings_goal {
        SavingsOutlook::Shortfall(savings_goal - remaining)
    } else {
        SavingsOutlook::Surplus(remaining - savings_goal)
    }
}
