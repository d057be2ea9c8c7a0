//! API endpoints.

mod health;
mod polls;

use axum::Router;

use crate::state::AppState;

pub use polls::{
    CommentResponse, CreatePollResponse, PollOptionResponse, PollResponse, ReactionsResponse,
};

/// Create the API router. The server nests it under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(polls::router())
        .merge(health::router())
}
