//! Business logic services.

pub mod poll;

pub use poll::{CreatePollInput, PollService};
