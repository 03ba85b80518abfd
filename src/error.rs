//! Error types for the wizard engine.

use thiserror::Error;

/// Errors surfaced by [`crate::Wizard::prompt`] and [`crate::Wizard::execute`].
#[derive(Debug, Error)]
pub enum WizardError {
    /// The user aborted an input prompt, or the cancellation token fired.
    /// Terminal: the wizard is not resumed or retried.
    #[error("wizard cancelled by user")]
    UserCancelled,

    /// Back-navigation was requested with no previous step to return to.
    /// Handled internally while prior steps exist; escapes only at the root.
    #[error("no previous step to go back to")]
    GoBack,

    /// A step failed while prompting, building a sub-wizard, or executing.
    /// Propagates immediately; already-applied side effects are not rolled
    /// back.
    #[error("step '{step_id}' failed: {source}")]
    Step {
        step_id: String,
        #[source]
        source: anyhow::Error,
    },
}

impl WizardError {
    /// True for the silent control-flow variants that should not produce an
    /// error dialog (cancellation and go-back).
    pub fn is_silent(&self) -> bool {
        matches!(self, WizardError::UserCancelled | WizardError::GoBack)
    }
}
