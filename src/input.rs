//! Input collection seam between the engine and whatever renders prompts.
//!
//! The engine consumes exactly one thing from its environment here: an
//! [`InputSource`] that can collect a piece of user input or signal
//! cancellation / back-navigation. Steps never talk to the source directly;
//! they go through [`PromptContext::ask`], which races the call against the
//! prompt-phase cancellation token, surfaces a deferred "loading" notice for
//! slow calls, and records the raw answer so the engine can cache it for
//! revisits.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::cancel::CancellationToken;
use crate::context::WizardContext;
use crate::progress::{ProgressReporter, ProgressUpdate};

/// How long an input call may remain outstanding before the engine emits a
/// "Loading..." progress notice.
pub(crate) const LOADING_NOTICE_DELAY: Duration = Duration::from_millis(500);

/// Signals an input call can produce instead of a value.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The user dismissed the prompt or the cancellation token fired.
    #[error("input cancelled")]
    Cancelled,

    /// The user asked to return to the previous step.
    #[error("previous step requested")]
    Back,

    /// The step itself failed (validation, sub-wizard construction, IO).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// One request for a piece of user input.
#[derive(Debug, Clone)]
pub struct InputRequest {
    /// Effective id of the step asking.
    pub step_id: String,
    /// Question to put to the user.
    pub message: String,
    /// Pre-filled default value, if the step supplied one.
    pub default: Option<Value>,
    /// The answer given the last time this step prompted, if the user is
    /// revisiting it. Sources should prefer this over `default` when
    /// pre-filling.
    pub remembered: Option<Value>,
    /// Wizard title, if one was configured.
    pub title: Option<String>,
    /// `(current, total)` step counter for display. Absent when the wizard
    /// was built with `hide_step_count`.
    pub step_counter: Option<(usize, usize)>,
}

/// Caller-supplied collector of user input.
///
/// Implementations return the collected value, or [`PromptError::Back`] /
/// [`PromptError::Cancelled`] when the user navigates away instead of
/// answering.
#[async_trait]
pub trait InputSource: Send + Sync {
    async fn request(&self, request: InputRequest) -> Result<Value, PromptError>;
}

/// The raw outcome of a step's input call, kept for the engine's input cache.
#[derive(Debug, Clone)]
pub(crate) struct RawAnswer {
    pub value: Value,
    pub default: Option<Value>,
}

/// Per-step bundle of identity and display data for a [`PromptContext`].
pub(crate) struct PromptSetup {
    pub step_id: String,
    pub remembered: Option<Value>,
    pub title: Option<String>,
    pub step_counter: Option<(usize, usize)>,
}

/// The view of the wizard a [`crate::PromptStep`] sees while prompting.
///
/// Dereferences to the shared [`WizardContext`] for reading and writing
/// answers, and adds [`ask`](Self::ask) for collecting input.
pub struct PromptContext<'a> {
    ctx: &'a mut WizardContext,
    input: &'a dyn InputSource,
    progress: &'a dyn ProgressReporter,
    cancel: CancellationToken,
    setup: PromptSetup,
    answer: Option<RawAnswer>,
}

impl<'a> PromptContext<'a> {
    pub(crate) fn new(
        ctx: &'a mut WizardContext,
        input: &'a dyn InputSource,
        progress: &'a dyn ProgressReporter,
        cancel: CancellationToken,
        setup: PromptSetup,
    ) -> Self {
        Self {
            ctx,
            input,
            progress,
            cancel,
            setup,
            answer: None,
        }
    }

    /// Effective id of the step currently prompting.
    pub fn step_id(&self) -> &str {
        &self.setup.step_id
    }

    /// Collect one piece of user input with no pre-filled default.
    pub async fn ask(&mut self, message: impl Into<String> + Send) -> Result<Value, PromptError> {
        self.ask_inner(message.into(), None).await
    }

    /// Collect one piece of user input, pre-filling `default`.
    pub async fn ask_with_default(
        &mut self,
        message: impl Into<String> + Send,
        default: Value,
    ) -> Result<Value, PromptError> {
        self.ask_inner(message.into(), Some(default)).await
    }

    async fn ask_inner(
        &mut self,
        message: String,
        default: Option<Value>,
    ) -> Result<Value, PromptError> {
        let request = InputRequest {
            step_id: self.setup.step_id.clone(),
            message,
            default: default.clone(),
            remembered: self.setup.remembered.clone(),
            title: self.setup.title.clone(),
            step_counter: self.setup.step_counter,
        };

        let input = self.input;
        let progress = self.progress;
        let cancel = self.cancel.clone();

        let value = tokio::select! {
            () = cancel.cancelled() => return Err(PromptError::Cancelled),
            result = request_with_loading(input, progress, request) => result?,
        };

        self.answer = Some(RawAnswer {
            value: value.clone(),
            default,
        });
        Ok(value)
    }

    pub(crate) fn take_answer(self) -> Option<RawAnswer> {
        self.answer
    }
}

impl Deref for PromptContext<'_> {
    type Target = WizardContext;

    fn deref(&self) -> &WizardContext {
        self.ctx
    }
}

impl DerefMut for PromptContext<'_> {
    fn deref_mut(&mut self) -> &mut WizardContext {
        self.ctx
    }
}

/// Run the input call, emitting a single "Loading..." notice if it outlasts
/// [`LOADING_NOTICE_DELAY`].
async fn request_with_loading(
    input: &dyn InputSource,
    progress: &dyn ProgressReporter,
    request: InputRequest,
) -> Result<Value, PromptError> {
    let call = input.request(request);
    tokio::pin!(call);
    let notice = tokio::time::sleep(LOADING_NOTICE_DELAY);
    tokio::pin!(notice);
    let mut noticed = false;

    loop {
        tokio::select! {
            result = &mut call => return result,
            () = &mut notice, if !noticed => {
                noticed = true;
                progress.report(ProgressUpdate::message("Loading..."));
            }
        }
    }
}
