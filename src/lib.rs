//! stepwise - Multi-step wizard orchestration engine
//!
//! Sequences user-input collection ("prompt steps") and side-effecting work
//! ("execute steps") into a single linear, cancellable session. Steps can
//! inject additional steps at runtime (sub-wizards), and the user can
//! navigate backwards with correct rollback of both the step list and the
//! shared context.
//!
//! The engine renders nothing itself: callers supply an [`InputSource`] to
//! collect input and optionally a [`ProgressReporter`] / [`ActivitySink`]
//! for progress and structured summaries.

pub mod cancel;
pub mod context;
pub mod engine;
pub mod error;
pub mod input;
pub mod logging;
pub mod progress;
pub mod step;

pub use cancel::CancellationToken;
pub use context::WizardContext;
pub use engine::{Wizard, WizardBuilder};
pub use error::WizardError;
pub use input::{InputRequest, InputSource, PromptContext, PromptError};
pub use progress::{
    ActivityOutcome, ActivityOutput, ActivitySink, ExecuteOptions, MemoryActivityLog,
    NullReporter, ProgressReporter, ProgressUpdate,
};
pub use step::{ExecuteStep, PromptStep, SubWizard};
