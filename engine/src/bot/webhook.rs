//! Webhook server
//!
//! Endpoints:
//! - GET /         - liveness banner
//! - GET /health   - health check
//! - POST /webhook - Telegram update delivery
//!
//! Each update is handled on its own request task; replies are sent back to
//! the chat through [`TelegramClient`] and echoed in the response body.

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::telegram::{TelegramClient, Update};
use crate::orchestrator::Orchestrator;

/// Header carrying the secret registered with `setWebhook`
pub const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

const EMPTY_TEXT_REPLY: &str = "🤖 Please send some text.";

/// State shared across handlers
#[derive(Clone)]
pub struct WebhookState {
    orchestrator: Arc<Orchestrator>,
    telegram: Option<TelegramClient>,
    secret: Option<String>,
}

impl WebhookState {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        telegram: Option<TelegramClient>,
        secret: Option<String>,
    ) -> Self {
        Self {
            orchestrator,
            telegram,
            secret: secret.filter(|s| !s.is_empty()),
        }
    }
}

/// Build the axum router
pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/webhook", post(webhook_handler))
        .with_state(state)
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: WebhookState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("Listener has no local address")?;
    tracing::info!("Webhook server listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Webhook server error")?;

    tracing::info!("Webhook server shutting down gracefully");
    Ok(())
}

async fn index_handler() -> Json<Value> {
    Json(json!({"message": "✅ Inter-Tribal Chambers bot is live!"}))
}

async fn health_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn webhook_handler(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(expected) = &state.secret {
        let provided = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if provided != Some(expected.as_str()) {
            tracing::warn!("Rejected webhook call with missing or wrong secret");
            return (StatusCode::FORBIDDEN, Json(json!({"detail": "Forbidden"}))).into_response();
        }
    }

    let value: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Invalid webhook JSON: {}", e);
            return (StatusCode::BAD_REQUEST, Json(json!({"detail": "Invalid JSON"})))
                .into_response();
        }
    };

    let update: Update = serde_json::from_value(value).unwrap_or_default();
    let Some(message) = update.into_message() else {
        return Json(json!({"status": "ignored"})).into_response();
    };

    let chat_id = message.chat.id;

    if message.is_audio() {
        tracing::info!("Ignoring voice message from chat {}", chat_id);
        return Json(json!({"status": "ignored", "reason": "voice"})).into_response();
    }

    let text = message.text.as_deref().unwrap_or_default().trim();
    if text.is_empty() {
        return Json(json!({"status": "ok", "reply": EMPTY_TEXT_REPLY})).into_response();
    }

    let reply = state.orchestrator.handle(&chat_id.to_string(), text).await;

    if let Some(telegram) = &state.telegram {
        if !reply.is_empty() {
            if let Err(e) = telegram.send_message(chat_id, &reply).await {
                tracing::error!("Failed to send reply to chat {}: {}", chat_id, e);
            }
        }
    }

    Json(json!({"status": "ok", "reply": reply})).into_response()
}
