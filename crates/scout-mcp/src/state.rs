//! Lifecycle state for the coordinator.

use chrono::{DateTime, Utc};
use scout_core::plan::{InitPhase, InitStatus};

/// Mutable initialization state, published by the coordinator and
/// snapshotted into [`InitStatus`] for the tool surface.
#[derive(Debug, Clone)]
pub struct InitState {
    pub phase: InitPhase,
    pub attempts: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl Default for InitState {
    fn default() -> Self {
        Self {
            phase: InitPhase::Idle,
            attempts: 0,
            started_at: None,
            completed_at: None,
            error_message: None,
        }
    }
}

impl InitState {
    pub fn snapshot(&self) -> InitStatus {
        InitStatus {
            phase: self.phase,
            attempts: self.attempts,
            started_at: self.started_at,
            completed_at: self.completed_at,
            error_message: self.error_message.clone(),
        }
    }
}
