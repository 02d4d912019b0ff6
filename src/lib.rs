//! Budget Assistant
//!
//! A conversational assistant that helps a user build a personal budget:
//! record income, log categorized expenses, set a savings goal, and get
//! a simple financial analysis.
//!
//! Two response paths:
//! - Primary: the Gemini conversational collaborator, fed a persona,
//!   the financial context, and the recent conversation
//! - Fallback: a fully offline, deterministic pipeline — regex entity
//!   extraction into session state, a priority-ordered intent trigger
//!   chain, and a templated response catalog
//!
//! Any collaborator failure falls through to the fallback; the caller
//! never sees an error from the conversational path.

pub mod advice;
pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod extractor;
pub mod finance;
pub mod gemini;
pub mod models;
pub mod responder;
pub mod session;
pub mod templates;

pub use error::Result;

// Re-export common types
pub use assistant::Assistant;
pub use models::*;
pub use session::Session;
