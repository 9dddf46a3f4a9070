// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Recognition session states and errors

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle of the current recognition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl SessionState {
    /// Returns whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Idle, Running)
                | (Running, Succeeded)
                | (Running, Failed)
                // retry without re-selecting
                | (Succeeded, Running)
                | (Failed, Running)
                // new image selected or sample removed
                | (Idle, Idle)
                | (Succeeded, Idle)
                | (Failed, Idle)
        )
    }

    pub fn is_running(self) -> bool {
        self == SessionState::Running
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Running => write!(f, "Running"),
            SessionState::Succeeded => write!(f, "Succeeded"),
            SessionState::Failed => write!(f, "Failed"),
        }
    }
}

/// Commands rejected by the session; none change state
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No image selected")]
    NoImageSelected,

    #[error("A recognition attempt is already running")]
    AlreadyRunning,

    #[error("No recognition attempt is running")]
    NotRunning,

    #[error("Attempt does not belong to the running recognition")]
    StaleAttempt,
}
