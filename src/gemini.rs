//! Gemini API client for the conversational path
//!
//! Maintains no state of its own: the per-session chat transcript is
//! owned by the `Session` and replayed on every call, which keeps the
//! collaborator chat stateful across calls within one session.
//! Uses a long-lived reqwest::Client for connection pooling.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::error::AssistantError;
use crate::models::{ChatRole, ChatTurn};
use crate::Result;

/// Upper bound on one collaborator round trip
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Persona and style instruction for every session
const SYSTEM_PROMPT: &str = r#"You are a friendly and casual financial chatbot named Fin. Act like a helpful friend who's good with money, not a formal advisor. Keep these points in mind:

Your Personality:
- Super friendly and casual - use "hey", "cool", etc.
- Chat like a friend texting
- Keep responses short and sweet (2-3 sentences max per point)
- Use everyday language, avoid financial jargon
- Be encouraging and positive
- Use emojis naturally (1-2 per message)
- Share quick, practical money tips

When giving financial advice:
- Break it down simply
- Use real-life examples
- Give one main tip at a time
- Keep numbers simple (round figures)
- Use ₹ for money values
- Be encouraging, not judgmental

Remember:
- Chat casually like a friend
- Keep it short and simple
- Be positive and encouraging
- Use natural, conversational language
- If topic isn't about money, gently bring it back to finances in a friendly way
- Never sound like a formal advisor or AI"#;

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent".to_string(),
        }
    }

    /// Send one chat turn, replaying the session transcript for context
    pub async fn chat(&self, transcript: &[ChatTurn], message: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(AssistantError::LlmError(
                "GEMINI_API_KEY not configured".to_string(),
            ));
        }

        let url = format!("{}?key={}", self.base_url, self.api_key);

        let mut contents: Vec<Content> = transcript.iter().map(Content::from_turn).collect();
        contents.push(Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: message.to_string(),
            }],
        });

        let request = GeminiRequest {
            contents,
            generation_config: GenerationConfig {
                temperature: 0.3,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 1024,
            },
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: SYSTEM_PROMPT.to_string(),
                }],
            },
        };

        info!("Calling Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                AssistantError::LlmError(format!("Gemini API error: {}", e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error response: {}", error_text);
            return Err(AssistantError::LlmError(format!(
                "Gemini API error: {}",
                error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            AssistantError::LlmError(format!("Gemini parse error: {}", e))
        })?;

        let answer = gemini_response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| AssistantError::LlmError("Empty response from Gemini".to_string()))?;

        Ok(answer)
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    system_instruction: SystemInstruction,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn from_turn(turn: &ChatTurn) -> Self {
        let role = match turn.role {
            ChatRole::User => "user",
            // Gemini's wire format calls the assistant side "model"
            ChatRole::Assistant => "model",
        };
        Self {
            role: role.to_string(),
            parts: vec![Part {
                text: turn.content.clone(),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}
