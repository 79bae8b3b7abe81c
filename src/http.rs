//! HTTP boundary for wardrobe-advisor
//!
//! `POST /api/wardrobe/recommend` takes `{"prompt": "..."}` and answers with the
//! canonical recommendation. `GET /health` is a plain liveness probe.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::WardrobeError;
use crate::models::WardrobeRecommendation;
use crate::service::WardrobeService;

const MISSING_PROMPT: &str = "Missing prompt in request body";

/// Shared state for HTTP server
#[derive(Clone)]
pub struct HttpState {
    pub service: Arc<WardrobeService>,
}

impl HttpState {
    pub fn new(service: WardrobeService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

pub async fn recommend_handler(
    State(state): State<HttpState>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<WardrobeRecommendation>, WardrobeError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("recommend", %request_id);

    let prompt = match body {
        Ok(Json(RecommendRequest {
            prompt: Some(prompt),
        })) if !prompt.trim().is_empty() => prompt,
        Ok(_) => return Err(WardrobeError::invalid_request(MISSING_PROMPT)),
        Err(rejection) => {
            tracing::debug!(%request_id, "Unreadable request body: {}", rejection);
            return Err(WardrobeError::invalid_request(MISSING_PROMPT));
        }
    };

    let recommendation = state.service.recommend(&prompt).instrument(span).await?;
    Ok(Json(recommendation))
}

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/wardrobe/recommend", post(recommend_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_http_server(state: HttpState, bind: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener: {}", e))?;

    tracing::info!("Starting HTTP server on {}", bind);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
