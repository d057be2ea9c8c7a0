//! Poll endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use flashpoll_common::{AppResult, AppResultExt};
use flashpoll_core::CreatePollInput;
use flashpoll_db::entities::{PollComment, PollOption, poll};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::ApiJson,
    response::{SuccessResponse, timestamp},
    state::AppState,
};

/// Full poll document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub id: String,
    pub question: String,
    pub options: Vec<PollOptionResponse>,
    pub expires_at: String,
    pub hide_results: bool,
    pub is_private: bool,
    pub created_at: String,
    pub reactions: ReactionsResponse,
    pub comments: Vec<CommentResponse>,
}

/// Poll option with its running tally.
#[derive(Debug, Serialize)]
pub struct PollOptionResponse {
    pub id: String,
    pub text: String,
    pub votes: i64,
}

/// Reaction counters.
#[derive(Debug, Serialize)]
pub struct ReactionsResponse {
    pub likes: i64,
    pub trending: i64,
}

/// Comment as shown to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub text: String,
    pub created_at: String,
}

/// Create poll response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollResponse {
    pub success: bool,
    pub poll_id: String,
}

impl From<PollOption> for PollOptionResponse {
    fn from(option: PollOption) -> Self {
        Self {
            id: option.id,
            text: option.text,
            votes: option.votes,
        }
    }
}

impl From<PollComment> for CommentResponse {
    fn from(comment: PollComment) -> Self {
        Self {
            text: comment.text,
            created_at: timestamp(&comment.created_at),
        }
    }
}

impl From<poll::Model> for PollResponse {
    fn from(poll: poll::Model) -> Self {
        Self {
            id: poll.id,
            question: poll.question,
            options: poll.options.0.into_iter().map(Into::into).collect(),
            expires_at: timestamp(&poll.expires_at),
            hide_results: poll.hide_results,
            is_private: poll.is_private,
            created_at: timestamp(&poll.created_at),
            reactions: ReactionsResponse {
                likes: poll.likes_count,
                trending: poll.trending_count,
            },
            comments: poll.comments.0.into_iter().map(Into::into).collect(),
        }
    }
}

/// Vote request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub option_id: String,
}

/// React request.
#[derive(Debug, Deserialize)]
pub struct ReactRequest {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Comment request.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

/// Create a poll.
async fn create_poll(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePollInput>,
) -> AppResult<Json<CreatePollResponse>> {
    let poll_id = state
        .poll_service
        .create(req)
        .await
        .context_action("Failed to create poll")?;

    Ok(Json(CreatePollResponse {
        success: true,
        poll_id,
    }))
}

/// Get a live poll.
async fn show_poll(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PollResponse>> {
    let poll = state
        .poll_service
        .get_live(&id)
        .await
        .context_action("Failed to fetch poll")?;

    Ok(Json(poll.into()))
}

/// Vote for an option.
async fn vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<VoteRequest>,
) -> AppResult<SuccessResponse> {
    state
        .poll_service
        .vote(&id, &req.option_id)
        .await
        .context_action("Failed to submit vote")?;

    Ok(SuccessResponse::ok())
}

/// Add a reaction.
async fn react(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ReactRequest>,
) -> AppResult<SuccessResponse> {
    state
        .poll_service
        .react(&id, &req.kind)
        .await
        .context_action("Failed to add reaction")?;

    Ok(SuccessResponse::ok())
}

/// Post a comment.
async fn comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CommentRequest>,
) -> AppResult<Json<CommentResponse>> {
    let comment = state
        .poll_service
        .comment(&id, &req.text)
        .await
        .context_action("Failed to add comment")?;

    Ok(Json(comment.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/polls", post(create_poll))
        .route("/polls/{id}", get(show_poll))
        .route("/polls/{id}/vote", post(vote))
        .route("/polls/{id}/react", post(react))
        .route("/polls/{id}/comment", post(comment))
}
