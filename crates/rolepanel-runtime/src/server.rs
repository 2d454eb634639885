//! Interactions webhook ingress.
//!
//! Single POST route; every delivery is signature-checked before the payload
//! is even parsed. Invalid signatures get 401 (Discord probes this during
//! endpoint registration), undecodable payloads get 400.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use rolepanel_discord::{
    verify_interaction_signature, InteractionEnvelope, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
use tracing::{info, warn};

use crate::router::InteractionRouter;

/// Webhook server settings.
#[derive(Debug, Clone)]
pub struct WebhookServerConfig {
    pub bind_addr: SocketAddr,
    /// Hex-encoded ed25519 public key of the Discord application.
    pub public_key_hex: String,
}

struct WebhookState {
    router: InteractionRouter,
    public_key_hex: String,
}

/// Builds the axum application serving `POST /interactions`.
pub fn webhook_app(router: InteractionRouter, public_key_hex: String) -> Router {
    let state = Arc::new(WebhookState {
        router,
        public_key_hex,
    });
    Router::new()
        .route("/interactions", post(handle_interaction))
        .with_state(state)
}

/// Binds and runs the webhook server until the task is cancelled or the
/// listener fails.
pub async fn run_webhook_server(
    config: &WebhookServerConfig,
    router: InteractionRouter,
) -> Result<()> {
    let app = webhook_app(router, config.public_key_hex.clone());
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind webhook listener on {}", config.bind_addr))?;
    info!(bind_addr = %config.bind_addr, "interaction webhook listening");
    axum::serve(listener, app)
        .await
        .context("webhook server terminated")?;
    Ok(())
}

async fn handle_interaction(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = header_str(&headers, SIGNATURE_HEADER);
    let timestamp = header_str(&headers, TIMESTAMP_HEADER);
    let (Some(signature), Some(timestamp)) = (signature, timestamp) else {
        return (StatusCode::UNAUTHORIZED, "missing signature headers").into_response();
    };
    if let Err(error) =
        verify_interaction_signature(&state.public_key_hex, signature, timestamp, &body)
    {
        warn!(%error, "rejected interaction delivery");
        return (StatusCode::UNAUTHORIZED, "invalid request signature").into_response();
    }

    let envelope: InteractionEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(error) => {
            warn!(%error, "undecodable interaction payload");
            return (StatusCode::BAD_REQUEST, "malformed interaction payload").into_response();
        }
    };

    let response = state.router.route(&envelope).await;
    Json(response).into_response()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
