//! Health endpoint.

use axum::{Json, Router, extract::State, routing::get};
use flashpoll_common::{AppResult, AppResultExt};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Report healthy once the database answers a ping.
async fn health(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    state
        .gateway
        .ping()
        .await
        .context_action("Database unavailable")?;

    Ok(Json(HealthResponse { status: "ok" }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
