//! Shared application state.

use flashpoll_common::config::PollConfig;
use flashpoll_core::PollService;
use flashpoll_db::{DbGateway, repositories::PollRepository};

/// Application state handed to every handler.
///
/// Cloning is cheap: everything inside shares the one gateway.
#[derive(Clone)]
pub struct AppState {
    pub poll_service: PollService,
    pub gateway: DbGateway,
}

impl AppState {
    /// Wire the services on top of `gateway`.
    #[must_use]
    pub fn new(gateway: DbGateway, polls: &PollConfig) -> Self {
        let poll_repo = PollRepository::new(gateway.clone());

        Self {
            poll_service: PollService::new(poll_repo, polls),
            gateway,
        }
    }
}
