//! Interactive input-collection steps.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::context::WizardContext;
use crate::input::{PromptContext, PromptError};
use crate::step::ExecuteStep;

/// A unit of interactive input collection.
///
/// A prompt step may conditionally decline to run via
/// [`should_prompt`](Self::should_prompt), and may inject further steps by
/// returning a [`SubWizard`] once it has run. Steps are stateless from the
/// engine's point of view: per-pass bookkeeping lives in the engine, so a
/// step is free to be re-prompted after back-navigation.
#[async_trait]
pub trait PromptStep: Send + Sync {
    /// Explicit id, if the step wants one. Two steps with the same effective
    /// id are considered the same question.
    fn id(&self) -> Option<&str> {
        None
    }

    /// Identity used for de-duplication and input caching: the explicit id,
    /// or the step's type name as a fallback.
    fn effective_id(&self) -> String {
        self.id()
            .map(str::to_string)
            .unwrap_or_else(|| std::any::type_name_of_val(self).to_string())
    }

    /// Whether the step wants to run given the current context. Steps that
    /// return `false` are visited but not prompted, and are skipped over
    /// during back-navigation.
    fn should_prompt(&self, ctx: &WizardContext) -> bool {
        let _ = ctx;
        true
    }

    /// Collect input through [`PromptContext::ask`] and record the result on
    /// the context.
    async fn prompt(&self, ctx: &mut PromptContext<'_>) -> Result<(), PromptError>;

    /// Additional steps to splice in after this step has run, if any.
    /// Called on every pass, including re-runs after back-navigation.
    async fn sub_wizard(&self, ctx: &WizardContext) -> anyhow::Result<Option<SubWizard>> {
        let _ = ctx;
        Ok(None)
    }

    /// Opt out of the step-uniqueness filter (and of input caching), allowing
    /// several instances with the same effective id to prompt independently.
    fn allows_duplicates(&self) -> bool {
        false
    }
}

/// A dynamically produced bundle of extra steps, returned by
/// [`PromptStep::sub_wizard`].
///
/// Prompt steps run immediately after the producing step, in declared order,
/// before any previously pending step. Execute steps join the global execute
/// list and are ordered by priority like any other.
#[derive(Default)]
pub struct SubWizard {
    pub prompt_steps: Vec<Box<dyn PromptStep>>,
    pub execute_steps: Vec<Box<dyn ExecuteStep>>,
}

impl SubWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt_step(mut self, step: impl PromptStep + 'static) -> Self {
        self.prompt_steps.push(Box::new(step));
        self
    }

    pub fn with_execute_step(mut self, step: impl ExecuteStep + 'static) -> Self {
        self.execute_steps.push(Box::new(step));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.prompt_steps.is_empty() && self.execute_steps.is_empty()
    }
}

/// Engine-owned per-pass bookkeeping for one prompt step.
///
/// Lives in exactly one of the pending stack or the finished history at a
/// time. Reset before each (re-)run of the step.
pub(crate) struct PromptRecord {
    pub step: Box<dyn PromptStep>,
    /// Did the step actually ask the user this pass (vs being skipped)?
    pub prompted: bool,
    pub has_sub_wizard: bool,
    /// How many prompt steps this step injected, for unwinding on back-nav.
    pub num_sub_prompt_steps: usize,
    /// How many execute steps this step injected, for unwinding on back-nav.
    pub num_sub_execute_steps: usize,
    /// Context keys present immediately before this step prompted; the
    /// rollback target when the user navigates back past it.
    pub keys_before_prompt: Option<BTreeSet<String>>,
}

impl PromptRecord {
    pub fn new(step: Box<dyn PromptStep>) -> Self {
        Self {
            step,
            prompted: false,
            has_sub_wizard: false,
            num_sub_prompt_steps: 0,
            num_sub_execute_steps: 0,
            keys_before_prompt: None,
        }
    }

    /// Clear all run-time flags ahead of a (re-)run.
    pub fn reset(&mut self) {
        self.prompted = false;
        self.has_sub_wizard = false;
        self.num_sub_prompt_steps = 0;
        self.num_sub_execute_steps = 0;
        self.keys_before_prompt = None;
    }
}
