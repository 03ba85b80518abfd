//! Shared mutable state passed to every wizard step.

use std::collections::{BTreeMap, BTreeSet};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::cancel::CancellationToken;

/// The property bag shared by every step of a wizard run.
///
/// Carries both domain state (the answers collected so far, as string keys
/// mapping to JSON values) and wizard-visible bookkeeping (the id of the
/// currently active step and, during the prompt phase, the cancellation
/// token). Pre-populated by the caller and mutated in place by steps.
#[derive(Debug, Default)]
pub struct WizardContext {
    values: BTreeMap<String, Value>,
    current_step_id: Option<String>,
    cancel: Option<CancellationToken>,
}

impl WizardContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw JSON value, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    /// Serialize and store a typed value.
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> serde_json::Result<()> {
        self.values.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Fetch and deserialize a typed value. Returns `None` when the key is
    /// absent or the stored value does not match `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Fetch the raw JSON value for a key.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The set of keys currently present. Recorded by the engine immediately
    /// before a step prompts, and used as the rollback target when the user
    /// navigates back past that step.
    pub fn key_snapshot(&self) -> BTreeSet<String> {
        self.values.keys().cloned().collect()
    }

    /// Remove every key that is not in `snapshot`. Keys that existed before
    /// the snapshot keep their current values; only additions are undone.
    pub fn rollback_to(&mut self, snapshot: &BTreeSet<String>) {
        self.values.retain(|key, _| snapshot.contains(key));
    }

    /// Effective id of the step the wizard is currently processing, if any.
    pub fn current_step_id(&self) -> Option<&str> {
        self.current_step_id.as_deref()
    }

    pub(crate) fn set_current_step_id(&mut self, id: Option<String>) {
        self.current_step_id = id;
    }

    /// The prompt-phase cancellation token. Present only while
    /// [`crate::Wizard::prompt`] is running.
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    pub(crate) fn install_cancellation(&mut self, token: CancellationToken) {
        self.cancel = Some(token);
    }

    pub(crate) fn clear_cancellation(&mut self) {
        self.cancel = None;
    }
}
