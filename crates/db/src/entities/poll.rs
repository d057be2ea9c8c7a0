//! Poll entity.
//!
//! A poll is stored as exactly one row. Its options and comments are value
//! objects embedded in `JSONB` columns; they have no rows or identity of
//! their own beyond the option id used to target votes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use flashpoll_common::AppError;
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "poll")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(column_type = "Text")]
    pub question: String,

    /// Options in creation order. Never resized.
    #[sea_orm(column_type = "JsonBinary")]
    pub options: PollOptions,

    /// The poll is live while `now < expires_at`.
    #[sea_orm(indexed)]
    pub expires_at: DateTimeWithTimeZone,

    pub hide_results: bool,

    pub is_private: bool,

    pub created_at: DateTimeWithTimeZone,

    pub likes_count: i64,

    pub trending_count: i64,

    /// Comments in insertion order. Append-only.
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: PollComments,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Position of the option with `option_id`, if it belongs to this poll.
    #[must_use]
    pub fn option_position(&self, option_id: &str) -> Option<usize> {
        self.options.0.iter().position(|o| o.id == option_id)
    }
}

/// One answer of a poll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    pub id: String,
    pub text: String,
    pub votes: i64,
}

/// Ordered option list stored in the `options` column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct PollOptions(pub Vec<PollOption>);

/// An anonymous comment. Identified only by its position and timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollComment {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Ordered comment list stored in the `comments` column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct PollComments(pub Vec<PollComment>);

/// The two reaction counters a poll carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Likes,
    Trending,
}

impl ReactionKind {
    /// Counter column backing this reaction.
    #[must_use]
    pub const fn column(self) -> Column {
        match self {
            Self::Likes => Column::LikesCount,
            Self::Trending => Column::TrendingCount,
        }
    }

    /// Wire name of the reaction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Likes => "likes",
            Self::Trending => "trending",
        }
    }
}

impl FromStr for ReactionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "likes" => Ok(Self::Likes),
            "trending" => Ok(Self::Trending),
            other => Err(AppError::InvalidType(other.to_string())),
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(expires_at: DateTime<Utc>) -> Model {
        Model {
            id: "01hq3w2v0t9y5x6z7a8b9c0d1e".to_string(),
            question: "Tabs or spaces?".to_string(),
            options: PollOptions(vec![
                PollOption {
                    id: "01hq3w2v0t9y5x6z7a8b9c0d1f".to_string(),
                    text: "Tabs".to_string(),
                    votes: 0,
                },
                PollOption {
                    id: "01hq3w2v0t9y5x6z7a8b9c0d1g".to_string(),
                    text: "Spaces".to_string(),
                    votes: 3,
                },
            ]),
            expires_at: expires_at.into(),
            hide_results: false,
            is_private: false,
            created_at: Utc::now().into(),
            likes_count: 0,
            trending_count: 0,
            comments: PollComments::default(),
        }
    }

    #[test]
    fn test_reaction_kind_parse() {
        assert_eq!("likes".parse::<ReactionKind>().unwrap(), ReactionKind::Likes);
        assert_eq!(
            "trending".parse::<ReactionKind>().unwrap(),
            ReactionKind::Trending
        );
        assert!(matches!(
            "bogus".parse::<ReactionKind>(),
            Err(AppError::InvalidType(_))
        ));
        // Matching is exact.
        assert!("Likes".parse::<ReactionKind>().is_err());
    }

    #[test]
    fn test_reaction_kind_columns() {
        assert_eq!(ReactionKind::Likes.column().as_str(), "likes_count");
        assert_eq!(ReactionKind::Trending.column().as_str(), "trending_count");
    }

    #[test]
    fn test_option_position() {
        let poll = sample(Utc::now());
        assert_eq!(poll.option_position("01hq3w2v0t9y5x6z7a8b9c0d1g"), Some(1));
        assert_eq!(poll.option_position("01hq3w2v0t9y5x6z7a8b9c0d1h"), None);
    }

    #[test]
    fn test_embedded_values_serialize_as_plain_arrays() {
        let poll = sample(Utc::now());
        let options = serde_json::to_value(&poll.options).unwrap();
        assert_eq!(options[1], json!({"id": "01hq3w2v0t9y5x6z7a8b9c0d1g", "text": "Spaces", "votes": 3}));

        let comments = serde_json::to_value(PollComments(vec![PollComment {
            text: "nice".to_string(),
            created_at: Utc::now(),
        }]))
        .unwrap();
        assert!(comments[0]["createdAt"].is_string());
    }
}
