// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Recognition sessions
//!
//! A session drives one attempt at a time through
//! Idle → Running → Succeeded/Failed, turns each successful attempt into an
//! immutable [`ResultRecord`] and keeps those records newest-first in a
//! [`HistoryLedger`].

pub mod ledger;
pub mod machine;
pub mod record;
pub mod registry;
pub mod state;

pub use ledger::HistoryLedger;
pub use machine::{Attempt, RecognitionSession, SessionSnapshot};
pub use record::{build_record, round_latency, ResultRecord, UNKNOWN_COLOR, UNKNOWN_PLATE};
pub use registry::{SessionHandle, SessionRegistry};
pub use state::{SessionError, SessionState};
