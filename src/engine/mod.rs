//! The wizard engine: owns the step stacks and drives both phases.
//!
//! A [`Wizard`] is built once with an ordered list of prompt steps and
//! execute steps, then driven through two phases against a caller-owned
//! [`WizardContext`]: [`prompt`](Wizard::prompt) collects all user input
//! (with back-navigation and dynamic sub-wizard splicing), and
//! [`execute`](Wizard::execute) runs the side-effecting steps once, in
//! priority order.

mod execute;
mod prompt;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::cancel::CancellationToken;
use crate::context::WizardContext;
use crate::input::InputSource;
use crate::progress::{NullReporter, ProgressReporter};
use crate::step::{ExecuteStep, PromptRecord, PromptStep};

/// Orchestrates a single wizard session.
///
/// Exactly one step is ever active at a time; the engine suspends only while
/// awaiting that step's own input-collection or side-effecting call.
pub struct Wizard {
    run_id: Uuid,
    title: Option<String>,
    hide_step_count: bool,
    input: Arc<dyn InputSource>,
    progress: Arc<dyn ProgressReporter>,
    cancel: Option<CancellationToken>,
    /// Steps not yet visited. Consumed LIFO: the last entry runs next, so
    /// initial steps are pushed in reverse declaration order.
    pub(crate) pending: Vec<PromptRecord>,
    /// Steps that completed a prompt pass, in visit order. Source of truth
    /// for back-navigation and step counting.
    pub(crate) finished: Vec<PromptRecord>,
    pub(crate) execute_steps: Vec<Box<dyn ExecuteStep>>,
    /// Raw answers keyed by effective step id, for pre-filling revisits.
    pub(crate) input_cache: HashMap<String, Value>,
}

impl Wizard {
    pub fn builder() -> WizardBuilder {
        WizardBuilder::new()
    }

    /// Id of this wizard session, for log correlation.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// 1-based index of the step currently (or next) being prompted:
    /// one more than the number of steps that have actually prompted.
    /// Monotonically non-decreasing during a single forward pass.
    pub fn current_step(&self) -> usize {
        1 + self.finished.iter().filter(|r| r.prompted).count()
    }

    /// Estimated total number of steps, for display only.
    ///
    /// Counts steps that have prompted, pending steps whose `should_prompt`
    /// currently returns true, and one reserved slot for the execute phase
    /// (even when the wizard has no execute steps). Necessarily an estimate:
    /// steps not yet reached may expand via sub-wizards.
    pub fn total_steps(&self, ctx: &WizardContext) -> usize {
        self.current_step() + self.pending_prompt_count(ctx) + 1
    }

    fn pending_prompt_count(&self, ctx: &WizardContext) -> usize {
        self.pending
            .iter()
            .filter(|r| r.step.should_prompt(ctx))
            .count()
    }
}

/// Builder for [`Wizard`].
pub struct WizardBuilder {
    title: Option<String>,
    hide_step_count: bool,
    prompt_steps: Vec<Box<dyn PromptStep>>,
    execute_steps: Vec<Box<dyn ExecuteStep>>,
    progress: Arc<dyn ProgressReporter>,
    cancel: Option<CancellationToken>,
}

impl WizardBuilder {
    fn new() -> Self {
        Self {
            title: None,
            hide_step_count: false,
            prompt_steps: Vec::new(),
            execute_steps: Vec::new(),
            progress: Arc::new(NullReporter),
            cancel: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Suppress the `(current/total)` step counter on input requests.
    pub fn hide_step_count(mut self) -> Self {
        self.hide_step_count = true;
        self
    }

    /// Append a prompt step. Steps prompt in the order they are added.
    pub fn prompt_step(mut self, step: impl PromptStep + 'static) -> Self {
        self.prompt_steps.push(Box::new(step));
        self
    }

    pub fn boxed_prompt_step(mut self, step: Box<dyn PromptStep>) -> Self {
        self.prompt_steps.push(step);
        self
    }

    /// Append an execute step. Execution order is by ascending priority,
    /// with registration order breaking ties.
    pub fn execute_step(mut self, step: impl ExecuteStep + 'static) -> Self {
        self.execute_steps.push(Box::new(step));
        self
    }

    pub fn boxed_execute_step(mut self, step: Box<dyn ExecuteStep>) -> Self {
        self.execute_steps.push(step);
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Attach an externally owned cancellation token. When set, the prompt
    /// phase observes it instead of creating a private one, so the caller
    /// can cancel the wizard while a step is suspended mid-prompt.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn build(self, input: Arc<dyn InputSource>) -> Wizard {
        // Reverse so the first-declared step is popped first.
        let pending = self
            .prompt_steps
            .into_iter()
            .rev()
            .map(PromptRecord::new)
            .collect();

        Wizard {
            run_id: Uuid::new_v4(),
            title: self.title,
            hide_step_count: self.hide_step_count,
            input,
            progress: self.progress,
            cancel: self.cancel,
            pending,
            finished: Vec::new(),
            execute_steps: self.execute_steps,
            input_cache: HashMap::new(),
        }
    }
}
