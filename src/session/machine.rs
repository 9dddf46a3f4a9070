// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Recognition session orchestration
//!
//! One session owns the selected image, the state of the current attempt,
//! its result and the history ledger. An attempt is split into
//! [`RecognitionSession::begin`] and [`RecognitionSession::finish`] so that a
//! shared session only needs to be locked around those two steps, never
//! across the call to the vision service.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ledger::HistoryLedger;
use super::record::{build_record, round_latency, ResultRecord};
use super::state::{SessionError, SessionState};
use crate::recognition::{AnalysisError, PlateAnalyzer, RecognitionOutcome};
use crate::vision::ImageRef;

/// Token for an accepted `start`, carrying what the attempt needs to finish
#[derive(Debug, Clone)]
pub struct Attempt {
    generation: u64,
    image: ImageRef,
    started_at: Instant,
}

impl Attempt {
    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}

/// Serializable view of a session for the display layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub state: SessionState,
    pub has_image: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_image_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_result: Option<ResultRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub history_len: usize,
}

/// State machine for recognition attempts on one workbench session
#[derive(Debug)]
pub struct RecognitionSession {
    id: Uuid,
    state: SessionState,
    selected: Option<ImageRef>,
    current: Option<ResultRecord>,
    last_error: Option<AnalysisError>,
    history: HistoryLedger,
    generation: u64,
}

impl Default for RecognitionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecognitionSession {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            state: SessionState::Idle,
            selected: None,
            current: None,
            last_error: None,
            history: HistoryLedger::new(),
            generation: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn selected_image(&self) -> Option<&ImageRef> {
        self.selected.as_ref()
    }

    pub fn current_result(&self) -> Option<&ResultRecord> {
        self.current.as_ref()
    }

    pub fn last_error(&self) -> Option<&AnalysisError> {
        self.last_error.as_ref()
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        info!(session = %self.id, from = %self.state, to = %next, "session_transition");
        self.state = next;
    }

    fn reset_to_idle(&mut self) -> Result<(), SessionError> {
        if self.state.is_running() {
            return Err(SessionError::AlreadyRunning);
        }
        self.current = None;
        self.last_error = None;
        self.transition(SessionState::Idle);
        Ok(())
    }

    /// Bind a new image, discarding the current (not historical) result
    pub fn select_image(&mut self, image: ImageRef) -> Result<(), SessionError> {
        self.reset_to_idle()?;
        debug!(session = %self.id, image = %image.id(), "image selected");
        self.selected = Some(image);
        Ok(())
    }

    /// Unbind the selected image
    pub fn remove_image(&mut self) -> Result<(), SessionError> {
        self.reset_to_idle()?;
        self.selected = None;
        Ok(())
    }

    /// Accept a `start` command and move to Running
    ///
    /// Rejected without any state change when no image is selected or an
    /// attempt is already running.
    pub fn begin(&mut self, now: Instant) -> Result<Attempt, SessionError> {
        if self.state.is_running() {
            debug!(session = %self.id, "start ignored: already running");
            return Err(SessionError::AlreadyRunning);
        }
        let image = self.selected.clone().ok_or(SessionError::NoImageSelected)?;

        self.generation += 1;
        self.current = None;
        self.last_error = None;
        self.transition(SessionState::Running);

        Ok(Attempt {
            generation: self.generation,
            image,
            started_at: now,
        })
    }

    fn check_attempt(&self, attempt: &Attempt) -> Result<(), SessionError> {
        if !self.state.is_running() {
            return Err(SessionError::NotRunning);
        }
        if attempt.generation != self.generation {
            return Err(SessionError::StaleAttempt);
        }
        Ok(())
    }

    /// Finish the running attempt with a service outcome
    pub fn complete(
        &mut self,
        attempt: Attempt,
        outcome: RecognitionOutcome,
        now: Instant,
    ) -> Result<&ResultRecord, SessionError> {
        self.complete_at(attempt, outcome, now, Local::now())
    }

    /// [`complete`](Self::complete) with an explicit wall-clock capture time
    pub fn complete_at(
        &mut self,
        attempt: Attempt,
        outcome: RecognitionOutcome,
        now: Instant,
        captured_at: DateTime<Local>,
    ) -> Result<&ResultRecord, SessionError> {
        self.check_attempt(&attempt)?;

        let latency = round_latency(now.saturating_duration_since(attempt.started_at));
        let record = build_record(outcome, latency, attempt.image, captured_at);

        info!(
            session = %self.id,
            plate = record.plate_number(),
            confidence = record.confidence(),
            latency_s = latency,
            "recognition succeeded"
        );

        self.history.append(record.clone());
        self.transition(SessionState::Succeeded);
        Ok(&*self.current.insert(record))
    }

    /// Finish the running attempt with a failure; no record is produced
    pub fn fail(
        &mut self,
        attempt: Attempt,
        error: AnalysisError,
        now: Instant,
    ) -> Result<(), SessionError> {
        self.check_attempt(&attempt)?;

        let latency = round_latency(now.saturating_duration_since(attempt.started_at));
        warn!(
            session = %self.id,
            kind = error.kind(),
            latency_s = latency,
            "recognition failed: {}",
            error
        );

        self.last_error = Some(error);
        self.transition(SessionState::Failed);
        Ok(())
    }

    /// Finish the running attempt with whatever the analyzer returned
    pub fn finish(
        &mut self,
        attempt: Attempt,
        result: Result<RecognitionOutcome, AnalysisError>,
        now: Instant,
    ) -> Result<SessionState, SessionError> {
        match result {
            Ok(outcome) => self.complete(attempt, outcome, now).map(|_| ())?,
            Err(error) => self.fail(attempt, error, now)?,
        }
        Ok(self.state)
    }

    /// Run one full attempt against `analyzer`
    ///
    /// Returns the resulting state (`Succeeded` or `Failed`); a rejected
    /// `start` returns the rejection and leaves the session untouched.
    pub async fn run(&mut self, analyzer: &dyn PlateAnalyzer) -> Result<SessionState, SessionError> {
        let attempt = self.begin(Instant::now())?;
        debug!(session = %self.id, analyzer = analyzer.name(), "analyzing image");
        let result = analyzer.analyze(attempt.image().payload()).await;
        self.finish(attempt, result, Instant::now())
    }

    /// Clear the history ledger; the current state and result are kept
    pub fn clear_history(&mut self) {
        info!(session = %self.id, cleared = self.history.len(), "history cleared");
        self.history.clear();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            state: self.state,
            has_image: self.selected.is_some(),
            selected_image_id: self.selected.as_ref().map(ImageRef::id),
            current_result: self.current.clone(),
            last_error: self.last_error.as_ref().map(ToString::to_string),
            history_len: self.history.len(),
        }
    }
}
