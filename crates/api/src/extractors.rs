//! Request extractors.

use axum::extract::FromRequest;
use flashpoll_common::AppError;

/// JSON body extractor.
///
/// Behaves like [`axum::Json`] but rejects with [`AppError::BadRequest`], so a
/// malformed body gets the same error shape as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
