use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use underwrite_core::{underwrite, DealInput, DealMetrics};

use crate::config::ServiceConfig;
use crate::error::ApiError;

/// Immutable state shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub round_output: bool,
}

impl From<&ServiceConfig> for AppState {
    fn from(cfg: &ServiceConfig) -> Self {
        Self {
            round_output: cfg.round_output,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/ai/deals/underwrite", post(underwrite_deal))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(Arc::new(state))
}

/// GET /healthz
async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /ai/deals/underwrite
async fn underwrite_deal(
    State(state): State<Arc<AppState>>,
    Json(deal): Json<DealInput>,
) -> Result<Json<DealMetrics>, ApiError> {
    let metrics = underwrite(&deal).map_err(|e| {
        tracing::info!(error = %e, kind = e.kind(), "deal rejected");
        ApiError(e)
    })?;
    tracing::debug!(roi = %metrics.cash_on_cash_roi, "deal underwritten");

    Ok(Json(if state.round_output {
        metrics.rounded()
    } else {
        metrics
    }))
}
