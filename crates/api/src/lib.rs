//! HTTP API layer for flashpoll.
//!
//! - **Endpoints**: poll lifecycle under `/polls` plus a `/health` probe
//! - **Extractors**: JSON bodies whose rejections render as `AppError`
//! - **State**: the poll service and the persistence gateway
//!
//! Built on Axum 0.8. Cross-cutting layers (tracing, CORS, body limit) are
//! added by the server binary.

pub mod endpoints;
pub mod extractors;
pub mod response;
pub mod state;

pub use endpoints::router;
pub use state::AppState;
