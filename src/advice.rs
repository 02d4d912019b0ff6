//! Financial advice lookup
//!
//! Wraps the web search-backed advice service behind a trait so the
//! orchestrator never depends on a concrete transport. Every lookup that
//! fails, times out, or comes back empty is replaced per-call with a
//! canned bullet list keyed by coarse query category, so advice text is
//! always available offline.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::warn;

use crate::error::AssistantError;
use crate::finance::SavingsOutlook;
use crate::templates::format_amount;
use crate::Result;

/// Minimum characters of underlying source text for a usable snippet
const MIN_SNIPPET_LEN: usize = 30;

/// Bullet points surfaced per advice lookup
const MAX_ADVICE_POINTS: usize = 5;

/// One search hit from the advice service
#[derive(Debug, Clone, Deserialize)]
pub struct AdviceResult {
    pub snippet: String,
}

/// Source of searched financial advice
#[async_trait]
pub trait AdviceSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<AdviceResult>>;
}

/// HTTP-backed advice search service
pub struct HttpAdviceSource {
    client: Client,
    base_url: String,
}

impl HttpAdviceSource {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

}

#[async_trait]
impl AdviceSource for HttpAdviceSource {
    async fn search(&self, query: &str) -> Result<Vec<AdviceResult>> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .post(url)
            .json(&json!({ "query": query }))
            .send()
            .await
            .map_err(|e| AssistantError::SearchError(format!("Advice search failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::SearchError(format!(
                "Advice search returned {}",
                status
            )));
        }

        let results = response
            .json::<Vec<AdviceResult>>()
            .await
            .map_err(|e| AssistantError::SearchError(format!("Invalid search response: {}", e)))?;

        Ok(results)
    }
}

// =============================
// Formatting
// =============================

/// Clean search hits into at most five unique bullet points
pub fn format_advice(results: &[AdviceResult]) -> String {
    let mut points: Vec<String> = Vec::new();

    for result in results {
        let text = result.snippet.trim();
        if text.len() <= MIN_SNIPPET_LEN {
            continue;
        }

        let cleaned = text.replace("...", "");
        let cleaned = cleaned.trim();
        let point = if cleaned.starts_with('•') {
            cleaned.to_string()
        } else {
            format!("• {}", cleaned)
        };

        if !points.contains(&point) {
            points.push(point);
        }
    }

    points.truncate(MAX_ADVICE_POINTS);
    points.join("\n")
}

/// Search for advice, substituting the canned list on any failure
pub async fn get_financial_advice(source: Option<&dyn AdviceSource>, query: &str) -> String {
    if let Some(source) = source {
        match source.search(query).await {
            Ok(results) => {
                let formatted = format_advice(&results);
                if !formatted.is_empty() {
                    return formatted;
                }
                warn!("Advice search returned no usable snippets for '{}'", query);
            }
            Err(e) => {
                warn!("Advice search failed for '{}': {}", query, e);
            }
        }
    }

    fallback_advice(query).to_string()
}

/// Canned advice keyed by coarse query category
pub fn fallback_advice(query: &str) -> &'static str {
    let query = query.to_lowercase();

    if query.contains("savings") {
        "• Create a detailed monthly budget and track all expenses\n\
         • Use automatic transfers to your savings account\n\
         • Look for ways to reduce recurring bills\n\
         • Consider a side hustle for additional income\n\
         • Use the 50/30/20 budgeting rule"
    } else if query.contains("investment") {
        "• Consider mutual funds for long-term wealth creation\n\
         • Explore fixed deposits for stable returns\n\
         • Look into government savings schemes\n\
         • Diversify your investment portfolio\n\
         • Start with systematic investment plans (SIPs)"
    } else if query.contains("expense") {
        "• Review and cancel unnecessary subscriptions\n\
         • Use budgeting apps to track expenses\n\
         • Look for cheaper alternatives for regular purchases\n\
         • Consider bulk buying for regular items\n\
         • Use cashback and reward programs"
    } else {
        "• Track all income and expenses meticulously\n\
         • Set realistic financial goals\n\
         • Build an emergency fund\n\
         • Avoid unnecessary debt\n\
         • Invest in your financial education"
    }
}

// =============================
// Savings review
// =============================

/// Full savings review for the month. The shortfall and surplus framings
/// lead to different advice: expense-reduction tips versus investment
/// options.
pub async fn savings_review(
    source: Option<&dyn AdviceSource>,
    outlook: SavingsOutlook,
    savings_goal: f64,
) -> String {
    let goal_query = format!(
        "best savings strategies for monthly savings goal of {} rupees india",
        format_amount(savings_goal, 0)
    );
    let financial_advice = get_financial_advice(source, &goal_query).await;

    match outlook {
        SavingsOutlook::Shortfall(deficit) => {
            let reduction_query = format!(
                "how to reduce monthly expenses to save {} rupees india",
                format_amount(deficit, 0)
            );
            let expense_reduction_tips = get_financial_advice(source, &reduction_query).await;

            format!(
                "📊 Savings Analysis:\n\n\
                 You're currently ₹{} short of your savings goal.\n\n\
                 💡 Personalized Recommendations:\n{}\n\n\
                 ✂️ Expense Reduction Tips:\n{}",
                format_amount(deficit, 2),
                financial_advice,
                expense_reduction_tips
            )
        }
        SavingsOutlook::Surplus(surplus) => {
            let investment_query = format!(
                "best investment options for {} rupees monthly surplus india",
                format_amount(surplus, 0)
            );
            let investment_advice = get_financial_advice(source, &investment_query).await;

            format!(
                "📈 Investment Opportunities:\n\n\
                 Great! You have a surplus of ₹{} after meeting your savings goal.\n\n\
                 💰 Investment Recommendations:\n{}\n\n\
                 🎯 Additional Investment Options:\n{}",
                format_amount(surplus, 2),
                financial_advice,
                investment_advice
            )
        }
    }
}

// =============================
// Banking products
// =============================

/// Banking product suggestions sized to the savings goal, with tax-saving
/// options once the goal is large enough to matter
pub async fn policy_suggestions(source: Option<&dyn AdviceSource>, savings_goal: f64) -> String {
    let query = format!(
        "best savings accounts and banking products for {} monthly savings india",
        format_amount(savings_goal, 0)
    );

    let searched = match source {
        Some(source) => source.search(&query).await.ok().map(|r| format_advice(&r)),
        None => None,
    };

    match searched.filter(|advice| !advice.is_empty()) {
        Some(banking_advice) => {
            let mut response = format!("🏦 Banking Recommendations:\n\n{}", banking_advice);

            if savings_goal >= 10000.0 {
                let tax_advice =
                    get_financial_advice(source, "best tax saving investment options india").await;
                response.push_str("\n\n💰 Tax Saving Options:\n");
                response.push_str(&tax_advice);
            }

            response
        }
        None => fallback_policy_suggestions(savings_goal).to_string(),
    }
}

/// Canned banking suggestions tiered by goal size
pub fn fallback_policy_suggestions(savings_goal: f64) -> &'static str {
    if savings_goal < 5000.0 {
        "• Consider opening a high-interest savings account\n\
         • Look into recurring deposit schemes\n\
         • Check for zero-balance account options\n\
         • Use UPI and digital banking for cashback benefits\n\
         • Compare different banks' savings account interest rates"
    } else if savings_goal < 20000.0 {
        "• Explore fixed deposit options with higher interest rates\n\
         • Consider post office savings schemes\n\
         • Look into mutual fund SIP options\n\
         • Check for special banking programs for regular savers\n\
         • Compare different banks' premium savings accounts"
    } else {
        "• Consider premium banking services for higher value accounts\n\
         • Look into wealth management services\n\
         • Explore multi-deposit schemes\n\
         • Check for relationship banking benefits\n\
         • Compare different banks' investment advisory services"
    }
}
