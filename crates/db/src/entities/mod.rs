//! Database entities.

pub mod poll;

pub use poll::{Entity as Poll, PollComment, PollComments, PollOption, PollOptions, ReactionKind};
