//! Progress reporting and structured activity output.
//!
//! The engine never renders anything itself: prompt-phase "loading" notices
//! and execute-phase step messages go to a caller-supplied
//! [`ProgressReporter`], and optional per-step summaries go to an
//! [`ActivitySink`] (typically an activity-log collaborator).

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single progress message, optionally tagged with a step counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub message: String,
    /// 1-based index of the step this message belongs to, if known.
    pub current: Option<usize>,
    /// Estimated number of steps remaining to run, if known.
    pub total: Option<usize>,
}

impl ProgressUpdate {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            current: None,
            total: None,
        }
    }
}

impl fmt::Display for ProgressUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.current, self.total) {
            (Some(current), Some(total)) => {
                write!(f, "{} ({current}/{total})", self.message)
            }
            _ => write!(f, "{}", self.message),
        }
    }
}

/// Sink for progress messages emitted while the wizard runs.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Reporter that discards everything. Used when the caller does not care
/// about progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report(&self, _update: ProgressUpdate) {}
}

/// Reporter that stamps every update with a fixed `(current/total)` counter
/// before forwarding it. The engine wraps the caller's reporter with this
/// for the duration of one execute step.
pub(crate) struct CountedReporter<'a> {
    pub inner: &'a dyn ProgressReporter,
    pub current: usize,
    pub total: usize,
}

impl ProgressReporter for CountedReporter<'_> {
    fn report(&self, mut update: ProgressUpdate) {
        update.current = Some(self.current);
        update.total = Some(self.total);
        self.inner.report(update);
    }
}

/// Outcome classification for an [`ActivityOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityOutcome {
    Progress,
    Success,
    Failure,
}

/// Structured per-step summary for an external activity log.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityOutput {
    /// Short human-readable label, e.g. "Creating storage account".
    pub label: String,
    /// Longer free-form detail, if any.
    pub detail: Option<String>,
    pub outcome: ActivityOutcome,
    pub at: DateTime<Utc>,
}

impl ActivityOutput {
    pub fn new(label: impl Into<String>, outcome: ActivityOutcome) -> Self {
        Self {
            label: label.into(),
            detail: None,
            outcome,
            at: Utc::now(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Consumer of [`ActivityOutput`]s. The engine emits a step's progress
/// output before it runs, and its success or fail output afterwards.
pub trait ActivitySink: Send + Sync {
    fn record(&self, output: ActivityOutput);
}

/// Options for [`crate::Wizard::execute`].
#[derive(Default, Clone)]
pub struct ExecuteOptions {
    /// Receives structured per-step summaries when set.
    pub activity: Option<Arc<dyn ActivitySink>>,
}

/// In-memory [`ActivitySink`] for tests and simple callers.
#[derive(Debug, Default)]
pub struct MemoryActivityLog {
    entries: Mutex<Vec<ActivityOutput>>,
}

impl MemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ActivityOutput> {
        self.entries.lock().expect("activity log lock poisoned").clone()
    }
}

impl ActivitySink for MemoryActivityLog {
    fn record(&self, output: ActivityOutput) {
        self.entries
            .lock()
            .expect("activity log lock poisoned")
            .push(output);
    }
}
