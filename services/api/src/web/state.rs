//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use forum_core::ports::ForumStore;

use crate::config::Config;
use crate::web::hub::EventHub;

/// The shared application state, created once at startup and passed to all
/// handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ForumStore>,
    pub hub: EventHub,
    pub config: Arc<Config>,
}
