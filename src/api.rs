//! REST API server for the budget assistant
//!
//! Exposes the orchestrator over HTTP. Request validation failures are
//! surfaced as client errors with a descriptive message; anything
//! unexpected becomes a generic server error and the process keeps
//! serving. Each caller-supplied session key maps to its own isolated,
//! mutex-guarded session so concurrent users never share state.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::assistant::Assistant;
use crate::error::AssistantError;
use crate::session::SessionRegistry;

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub assistant: Arc<Assistant>,
    pub sessions: Arc<SessionRegistry>,
}

/// =============================
/// Helpers — Session Keys
/// =============================

fn stable_uuid_from_string(input: &str) -> Uuid {
    use sha2::{Digest, Sha256};

    let hash = Sha256::digest(input.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);

    // Set UUID version (4) and variant (RFC4122) bits.
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

fn session_uuid(value: Option<&str>) -> Uuid {
    match value {
        Some(v) if !v.trim().is_empty() => {
            Uuid::parse_str(v).unwrap_or_else(|_| stable_uuid_from_string(v))
        }
        _ => stable_uuid_from_string("anonymous-user"),
    }
}

/// =============================
/// Helpers — Error Responses
/// =============================

fn client_error(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn server_error(message: String) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

/// Validate content type and parse the raw body; the error shapes here
/// are part of the request contract
fn parse_body(headers: &HeaderMap, body: &Bytes) -> Result<Value, (StatusCode, Json<Value>)> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("application/json"))
        .unwrap_or(false);

    if !is_json {
        return Err(client_error("Content-Type must be application/json"));
    }

    serde_json::from_slice(body).map_err(|_| client_error("Request body must be valid JSON"))
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Chat Endpoint
/// =============================

async fn chat_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let data = match parse_body(&headers, &body) {
        Ok(data) => data,
        Err(rejection) => return rejection,
    };

    let input = match data.get("input") {
        None => return client_error("Missing \"input\" field in request body"),
        Some(value) => match value.as_str() {
            None => return client_error("Input must be a string"),
            Some(input) => input.to_string(),
        },
    };

    let session_id = session_uuid(data.get("session_id").and_then(Value::as_str));
    info!("Chat request for session {}", session_id);

    let session = state.sessions.get_or_create(session_id).await;
    let mut session = session.lock().await;
    let outcome = state.assistant.respond(&mut session, &input).await;

    (StatusCode::OK, Json(json!({ "response": outcome.reply })))
}

/// =============================
/// Savings Review Endpoint
/// =============================

async fn savings_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let data = match parse_body(&headers, &body) {
        Ok(data) => data,
        Err(rejection) => return rejection,
    };

    let session_id = session_uuid(data.get("session_id").and_then(Value::as_str));
    let session = state.sessions.get_or_create(session_id).await;
    let session = session.lock().await;

    match state.assistant.savings_review(&session).await {
        Ok(review) => (StatusCode::OK, Json(json!({ "response": review }))),
        Err(AssistantError::SessionError(message)) => client_error(&message),
        Err(e) => {
            error!("Savings review failed: {}", e);
            server_error(e.to_string())
        }
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(assistant: Arc<Assistant>) -> Router {
    let state = ApiState {
        assistant,
        sessions: Arc::new(SessionRegistry::new()),
    };

    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat_handler))
        .route("/api/savings", post(savings_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    assistant: Arc<Assistant>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(assistant);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> ApiState {
        ApiState {
            assistant: Arc::new(Assistant::offline()),
            sessions: Arc::new(SessionRegistry::new()),
        }
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let state = test_state();
        let body = Bytes::from(r#"{"input": "hello there"}"#);

        let (status, Json(response)) =
            chat_handler(State(state), json_headers(), body).await;

        assert_eq!(status, StatusCode::OK);
        assert!(!response["response"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_rejects_missing_content_type() {
        let state = test_state();
        let body = Bytes::from(r#"{"input": "hello"}"#);

        let (status, Json(response)) =
            chat_handler(State(state), HeaderMap::new(), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response["error"],
            "Content-Type must be application/json"
        );
    }

    #[tokio::test]
    async fn test_chat_rejects_invalid_json() {
        let state = test_state();
        let body = Bytes::from("not json at all");

        let (status, Json(response)) =
            chat_handler(State(state), json_headers(), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Request body must be valid JSON");
    }

    #[tokio::test]
    async fn test_chat_rejects_missing_input_field() {
        let state = test_state();
        let body = Bytes::from(r#"{"text": "hello"}"#);

        let (status, Json(response)) =
            chat_handler(State(state), json_headers(), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Missing \"input\" field in request body");
    }

    #[tokio::test]
    async fn test_chat_rejects_non_string_input() {
        let state = test_state();
        let body = Bytes::from(r#"{"input": 42}"#);

        let (status, Json(response)) =
            chat_handler(State(state), json_headers(), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Input must be a string");
    }

    #[tokio::test]
    async fn test_sessions_are_isolated_per_caller() {
        let state = test_state();

        let body = Bytes::from(r#"{"input": "I earn 75000", "session_id": "caller-a"}"#);
        chat_handler(State(state.clone()), json_headers(), body).await;

        let a = state.sessions.get_or_create(session_uuid(Some("caller-a"))).await;
        assert_eq!(a.lock().await.profile.income, Some(75000.0));

        let b = state.sessions.get_or_create(session_uuid(Some("caller-b"))).await;
        assert!(b.lock().await.profile.income.is_none());
    }

    #[tokio::test]
    async fn test_savings_review_requires_facts() {
        let state = test_state();
        let body = Bytes::from(r#"{"session_id": "caller-c"}"#);

        let (status, Json(response)) =
            savings_handler(State(state), json_headers(), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].as_str().unwrap().contains("not set"));
    }

    #[tokio::test]
    async fn test_savings_review_round_trip() {
        let state = test_state();

        let session = state
            .sessions
            .get_or_create(session_uuid(Some("caller-d")))
            .await;
        {
            let mut session = session.lock().await;
            session.profile.income = Some(50000.0);
            session.profile.savings_goal = Some(20000.0);
            session.ledger.insert("rent".to_string(), 25000.0);
        }

        let body = Bytes::from(r#"{"session_id": "caller-d"}"#);
        let (status, Json(response)) =
            savings_handler(State(state), json_headers(), body).await;

        assert_eq!(status, StatusCode::OK);
        // remaining 25,000 against a 20,000 goal: surplus framing
        assert!(response["response"]
            .as_str()
            .unwrap()
            .contains("surplus of ₹5,000.00"));
    }

    #[test]
    fn test_stable_session_uuid_is_deterministic() {
        let a = session_uuid(Some("caller-a"));
        let b = session_uuid(Some("caller-a"));
        let c = session_uuid(Some("caller-b"));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(session_uuid(None), session_uuid(Some("  ")));
    }
}
