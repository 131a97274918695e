// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core library for the consultation signaling server: presence tracking,
//! call-invitation arbitration and room fan-out for live video
//! consultations.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod invitations;
pub mod messages;
pub mod metrics;
pub mod notify;
pub mod presence;
pub mod registry;
pub mod rooms;
pub mod timeout;
pub mod ws_router;

use crate::config::Settings;
use crate::coordinator::{spawn_coordinator, CoordinatorHandle};
use crate::notify::{CallNotifier, NoopNotifier};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Handle to the signaling coordinator actor
    pub coordinator: CoordinatorHandle,
    /// Settings manager
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state, spawning the coordinator task.
    pub fn new(settings: Settings, notifier: Arc<dyn CallNotifier>) -> Self {
        let coordinator = spawn_coordinator(settings.invite_timeout(), notifier);
        Self {
            coordinator,
            settings: Arc::new(settings),
        }
    }

    /// Create a new application state with default settings and no push
    /// gateway.
    pub fn new_default() -> Self {
        Self::new(Settings::default(), Arc::new(NoopNotifier))
    }
}
