//! Poll repository.
//!
//! Every mutation here is a single `UPDATE` on the poll row. Postgres takes
//! the row lock and re-evaluates the `SET` expression against the latest
//! row version, so concurrent increments never lose an update and a failed
//! statement leaves the row untouched.

use chrono::{DateTime, Utc};
use flashpoll_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Select, UpdateMany, Value,
    sea_query::Expr,
};

use crate::DbGateway;
use crate::entities::{Poll, PollComment, ReactionKind, poll};

/// Poll repository for database operations.
#[derive(Clone)]
pub struct PollRepository {
    gateway: DbGateway,
}

impl PollRepository {
    /// Create a new poll repository.
    #[must_use]
    pub const fn new(gateway: DbGateway) -> Self {
        Self { gateway }
    }

    /// Insert a complete poll row.
    pub async fn insert(&self, model: poll::Model) -> AppResult<()> {
        let db = self.gateway.acquire().await?;

        Poll::insert(model.into_active_model())
            .exec_without_returning(db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Find a poll that is still live at `now`.
    pub async fn find_live(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<poll::Model>> {
        let db = self.gateway.acquire().await?;

        live_by_id(id, now)
            .one(db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add one vote to the option at `position`.
    ///
    /// Returns `false` when nothing matched: the poll is gone or expired, or
    /// the option at `position` is not `option_id`.
    pub async fn increment_option_votes(
        &self,
        id: &str,
        position: usize,
        option_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let db = self.gateway.acquire().await?;

        let result = option_vote_update(id, position, option_id, now)
            .exec(db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Add one to a reaction counter of a live poll.
    pub async fn increment_reaction(
        &self,
        id: &str,
        kind: ReactionKind,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let db = self.gateway.acquire().await?;

        let result = reaction_update(id, kind, now)
            .exec(db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }

    /// Append a comment to a poll, live or not.
    pub async fn append_comment(&self, id: &str, comment: &PollComment) -> AppResult<bool> {
        let db = self.gateway.acquire().await?;

        let result = comment_append(id, comment)?
            .exec(db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

fn live_by_id(id: &str, now: DateTime<Utc>) -> Select<Poll> {
    Poll::find_by_id(id).filter(poll::Column::ExpiresAt.gt(now))
}

fn option_vote_update(
    id: &str,
    position: usize,
    option_id: &str,
    now: DateTime<Utc>,
) -> UpdateMany<Poll> {
    let index = position as i32;

    // `$N` in a custom fragment refers to that fragment's own values; the
    // builder renumbers them into the statement.
    Poll::update_many()
        .col_expr(
            poll::Column::Options,
            Expr::cust_with_values(
                r#"jsonb_set("options", ARRAY[$1, 'votes'], to_jsonb(("options" -> $2 ->> 'votes')::bigint + 1))"#,
                [Value::from(position.to_string()), Value::from(index)],
            ),
        )
        .filter(poll::Column::Id.eq(id))
        .filter(poll::Column::ExpiresAt.gt(now))
        .filter(Expr::cust_with_values(
            r#"("options" -> $1 ->> 'id') = $2"#,
            [Value::from(index), Value::from(option_id)],
        ))
}

fn reaction_update(id: &str, kind: ReactionKind, now: DateTime<Utc>) -> UpdateMany<Poll> {
    let column = kind.column();

    Poll::update_many()
        .col_expr(column, Expr::col(column).add(1))
        .filter(poll::Column::Id.eq(id))
        .filter(poll::Column::ExpiresAt.gt(now))
}

fn comment_append(id: &str, comment: &PollComment) -> AppResult<UpdateMany<Poll>> {
    let entry = serde_json::to_value([comment])
        .map_err(|e| AppError::Internal(format!("Failed to encode comment: {e}")))?;

    Ok(Poll::update_many()
        .col_expr(
            poll::Column::Comments,
            Expr::cust_with_values(r#""comments" || $1"#, [entry]),
        )
        .filter(poll::Column::Id.eq(id)))
}
