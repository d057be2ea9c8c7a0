//! Poll service.

use chrono::{DateTime, Duration, Utc};
use flashpoll_common::{AppError, AppResult, IdGenerator, config::PollConfig};
use flashpoll_db::{
    entities::{PollComment, PollComments, PollOption, PollOptions, ReactionKind, poll},
    repositories::PollRepository,
};
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

/// Input for creating a poll.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollInput {
    #[validate(required(message = "question is required"))]
    pub question: Option<String>,
    #[validate(
        required(message = "options are required"),
        length(min = 2, max = 10, message = "a poll needs between 2 and 10 options")
    )]
    pub options: Option<Vec<String>>,
    /// Lifetime in seconds.
    #[validate(
        required(message = "expiresIn is required"),
        range(min = 1, message = "expiresIn must be positive")
    )]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub hide_results: bool,
    #[serde(default)]
    pub is_private: bool,
}

/// Service for the poll lifecycle: create, read, vote, react, comment.
#[derive(Clone)]
pub struct PollService {
    poll_repo: PollRepository,
    id_gen: IdGenerator,
    max_expires_in: i64,
}

impl PollService {
    /// Create a new poll service.
    #[must_use]
    pub const fn new(poll_repo: PollRepository, config: &PollConfig) -> Self {
        Self {
            poll_repo,
            id_gen: IdGenerator::new(),
            max_expires_in: config.max_expires_in,
        }
    }

    /// Create a poll and return its id.
    pub async fn create(&self, input: CreatePollInput) -> AppResult<String> {
        let poll = self.build_poll(input, Utc::now())?;
        let id = poll.id.clone();
        let option_count = poll.options.0.len();

        self.poll_repo.insert(poll).await?;

        info!(poll_id = %id, options = option_count, "Poll created");
        Ok(id)
    }

    /// Get a poll that has not expired.
    ///
    /// An expired poll is reported exactly like one that never existed.
    pub async fn get_live(&self, id: &str) -> AppResult<poll::Model> {
        let id = normalize_id(id)?;

        self.poll_repo
            .find_live(&id, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound("Poll not found or has expired".to_string()))
    }

    /// Cast one vote for an option of a live poll.
    ///
    /// There is no per-voter bookkeeping; repeated calls add repeated votes.
    pub async fn vote(&self, poll_id: &str, option_id: &str) -> AppResult<()> {
        let poll_id = normalize_id(poll_id)?;
        let option_id = normalize_id(option_id)?;

        let poll = self.get_live(&poll_id).await?;
        let position = poll
            .option_position(&option_id)
            .ok_or_else(|| AppError::InvalidOption(option_id.clone()))?;

        let matched = self
            .poll_repo
            .increment_option_votes(&poll_id, position, &option_id, Utc::now())
            .await?;

        // Options never move, so a miss here means the poll expired in between.
        if !matched {
            return Err(AppError::NotFound(
                "Poll not found or has expired".to_string(),
            ));
        }

        debug!(poll_id = %poll_id, option_id = %option_id, "Vote recorded");
        Ok(())
    }

    /// Bump one of the two reaction counters of a live poll.
    pub async fn react(&self, poll_id: &str, kind: &str) -> AppResult<()> {
        let kind: ReactionKind = kind.parse()?;
        let poll_id = normalize_id(poll_id)?;

        let matched = self
            .poll_repo
            .increment_reaction(&poll_id, kind, Utc::now())
            .await?;

        if !matched {
            return Err(AppError::NotFound(
                "Poll not found or has expired".to_string(),
            ));
        }

        debug!(poll_id = %poll_id, reaction = %kind, "Reaction recorded");
        Ok(())
    }

    /// Append a comment to a poll.
    ///
    /// Only existence is checked: expired polls still take comments.
    pub async fn comment(&self, poll_id: &str, text: &str) -> AppResult<PollComment> {
        let poll_id = normalize_id(poll_id)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Comment cannot be empty".to_string()));
        }

        let comment = PollComment {
            text: text.to_string(),
            created_at: Utc::now(),
        };

        if !self.poll_repo.append_comment(&poll_id, &comment).await? {
            return Err(AppError::NotFound("Poll not found".to_string()));
        }

        debug!(poll_id = %poll_id, "Comment added");
        Ok(comment)
    }

    /// Validate `input` and lay out the full poll row as of `now`.
    fn build_poll(&self, input: CreatePollInput, now: DateTime<Utc>) -> AppResult<poll::Model> {
        input.validate()?;

        let question = input
            .question
            .ok_or_else(|| AppError::Validation("question is required".to_string()))?;
        if question.trim().is_empty() {
            return Err(AppError::Validation("question cannot be empty".to_string()));
        }

        let texts = input
            .options
            .ok_or_else(|| AppError::Validation("options are required".to_string()))?;
        if texts.iter().any(|text| text.trim().is_empty()) {
            return Err(AppError::Validation(
                "poll options cannot be empty".to_string(),
            ));
        }

        let expires_in = input
            .expires_in
            .ok_or_else(|| AppError::Validation("expiresIn is required".to_string()))?
            .min(self.max_expires_in);
        let expires_at = Duration::try_seconds(expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AppError::Validation("expiresIn is out of range".to_string()))?;

        let options = texts
            .into_iter()
            .map(|text| PollOption {
                id: self.id_gen.generate(),
                text,
                votes: 0,
            })
            .collect();

        Ok(poll::Model {
            id: self.id_gen.generate(),
            question,
            options: PollOptions(options),
            expires_at: expires_at.into(),
            hide_results: input.hide_results,
            is_private: input.is_private,
            created_at: now.into(),
            likes_count: 0,
            trending_count: 0,
            comments: PollComments::default(),
        })
    }
}

/// Check the shape of `id` and return it in the lower-case form ids are
/// stored in.
fn normalize_id(id: &str) -> AppResult<String> {
    if IdGenerator::is_valid(id) {
        Ok(id.to_ascii_lowercase())
    } else {
        Err(AppError::InvalidId(id.to_string()))
    }
}
