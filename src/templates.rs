//! Response template catalog
//!
//! Static, process-wide tables of reply templates per intent category,
//! with named `{placeholder}` substitution. Choice among same-category
//! alternatives is uniformly random through the caller's RNG, so tests
//! can seed it and pin exact output.

use rand::rngs::StdRng;
use rand::Rng;

// =============================
// Greeting
// =============================

pub const GREETING_ONBOARDING: &[&str] = &[
    "👋 Hi there! I'm your AI financial buddy. Want to know what I can do? Just ask 'what can you do?' Or we can start budgeting - what's your name?",
    "Hello! I'm here to help with your finances. Ask me 'what can you do?' to learn more, or we can get started - what's your name?",
    "Hey! 😊 I'm your personal finance assistant. Want to see my capabilities? Ask 'what can you do?' Or let's begin - what's your name?",
    "Hi! Ready to manage your finances better? Ask me 'what can you do?' to learn more, or we can start right away - what's your name?",
];

pub const GREETING_SHORT_ACK: &str = "I'm here to help! Just let me know what you need.";

// =============================
// Capabilities
// =============================

pub const CAPABILITIES: &[&str] = &[
    "Create and manage monthly budgets 💰",
    "Track expenses by categories 📊",
    "Set and monitor savings goals 🎯",
    "Analyze spending patterns 📈",
    "Provide investment advice 💡",
    "Calculate expense ratios and financial metrics 📊",
    "Suggest tax-saving strategies 💰",
    "Help with debt management 📉",
];

// =============================
// Fact acknowledgements
// =============================

pub const INCOME_ADDED: &[&str] = &[
    "✅ Great! I've recorded your monthly income as ₹{income}.",
    "Thanks! I've noted your income as ₹{income} per month.",
];

pub const EXPENSE_ADDED: &[&str] = &[
    "📝 Got it! I've added ₹{amount} for {category} to your expenses.",
    "Added: ₹{amount} for {category}. Your total expenses are now ₹{total_expenses}.",
];

pub const SAVINGS_GOAL_ADDED: &[&str] = &[
    "🎯 Excellent! Your savings goal is set to ₹{goal} per month.",
    "I've set your monthly savings goal to ₹{goal}. Let's work towards achieving it!",
];

// =============================
// Analysis
// =============================

pub const BUDGET_ANALYSIS: &[&str] = &[
    "📊 Based on your information:\n• Income: ₹{income}\n• Total Expenses: ₹{total_expenses}\n• Remaining: ₹{remaining}\n\n{advice}",
    "💰 Here's your financial snapshot:\n• Monthly Income: ₹{income}\n• Total Expenses: ₹{total_expenses}\n• Available for Savings: ₹{remaining}\n\n{advice}",
];

pub const ADVICE: &[&str] = &[
    "Based on your expenses, you might want to consider reducing your {category} spending by {percent}% to save more money.",
    "I notice that you're spending {amount} on {category}. That's about {percent}% of your income. The recommended percentage is around {recommended}%.",
    "Looking at your financial data, I suggest focusing on saving more in the {category} category. Try to aim for {goal} per month.",
    "Your {category} expenses seem {status}. Most financial experts recommend keeping it under {recommended}% of your income.",
    "To reach your savings goal of {savings_goal}, consider cutting back on {category} by about {amount} per month.",
    "Great job on managing your {category}! You're spending less than the recommended amount.",
    "To improve your financial health, try the 50/30/20 rule: 50% for needs, 30% for wants, and 20% for savings.",
    "Looking at your spending, I recommend creating an emergency fund of at least 3-6 months of expenses.",
    "Consider automating your savings by setting up automatic transfers to your savings account each month.",
];

pub const EMPTY_LEDGER_ADVICE: &str =
    "Consider tracking your expenses by category to get more specific advice.";

// =============================
// Default
// =============================

pub const GENERAL: &[&str] = &[
    "I'm here to help with your budget! You can tell me about your income, expenses, or savings goals.",
    "Need help with something specific? You can ask me about budget analysis, expense tracking, or savings advice.",
    "Feel free to share more details about your financial situation so I can provide better advice.",
    "Is there anything specific about your finances you'd like to discuss today?",
];

// =============================
// Selection & rendering
// =============================

/// Uniform choice among a category's templates
pub fn pick<'a>(rng: &mut StdRng, templates: &[&'a str]) -> &'a str {
    templates[rng.gen_range(0..templates.len())]
}

/// Substitute named `{placeholder}` values into a template
pub fn render(template: &str, values: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

/// Group an amount with thousands separators at the given precision,
/// e.g. `format_amount(50000.0, 0)` → `"50,000"`. The currency glyph
/// lives in the templates, not here.
pub fn format_amount(value: f64, decimals: usize) -> String {
    let negative = value < 0.0;
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (formatted.as_str(), None),
    };

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(formatted.len() + digits.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    grouped
}
