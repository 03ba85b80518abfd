//! Execute phase: priority-ordered, lazily guarded, halt-on-error.

use crate::context::WizardContext;
use crate::error::WizardError;
use crate::progress::{CountedReporter, ExecuteOptions};

use super::Wizard;

impl Wizard {
    /// Run the execute phase: all execute steps in ascending priority order
    /// (registration order breaks ties), skipping any step whose
    /// `should_execute` is false at the moment of its turn.
    ///
    /// Progress messages from each step are stamped with a
    /// `(current/total)` counter, where total counts the steps whose guard
    /// is true among the remainder. When `options.activity` is set, each
    /// step's structured progress/success/fail outputs are forwarded to it.
    ///
    /// # Errors
    ///
    /// [`WizardError::Step`] as soon as a step fails. Remaining steps do not
    /// run and completed side effects are not rolled back; steps are
    /// expected to be individually idempotent or externally compensable.
    pub async fn execute(
        &mut self,
        ctx: &mut WizardContext,
        options: ExecuteOptions,
    ) -> Result<(), WizardError> {
        // Stable sort: registration order survives within a priority.
        self.execute_steps.sort_by_key(|step| step.priority());

        let mut done = 0usize;
        for index in 0..self.execute_steps.len() {
            if !self.execute_steps[index].should_execute(ctx) {
                tracing::debug!(
                    run_id = %self.run_id,
                    step_id = %self.execute_steps[index].effective_id(),
                    "execute step declined to run"
                );
                continue;
            }

            // Guards are evaluated lazily, so the estimate is recomputed at
            // every turn: an earlier step's side effects may have changed
            // which later steps will run.
            let remaining = self.execute_steps[index..]
                .iter()
                .filter(|step| step.should_execute(ctx))
                .count();
            let current = done + 1;
            let total = done + remaining;

            let step = &self.execute_steps[index];
            let step_id = step.effective_id();
            tracing::debug!(
                run_id = %self.run_id,
                step_id = %step_id,
                priority = step.priority(),
                current,
                total,
                "running execute step"
            );

            if let Some(activity) = options.activity.as_deref() {
                if let Some(output) = step.progress_output(ctx) {
                    activity.record(output);
                }
            }

            let reporter = CountedReporter {
                inner: self.progress.as_ref(),
                current,
                total,
            };

            match step.execute(ctx, &reporter).await {
                Ok(()) => {
                    done += 1;
                    if let Some(activity) = options.activity.as_deref() {
                        if let Some(output) = step.success_output(ctx) {
                            activity.record(output);
                        }
                    }
                }
                Err(source) => {
                    tracing::debug!(
                        run_id = %self.run_id,
                        step_id = %step_id,
                        error = %source,
                        "execute step failed"
                    );
                    if let Some(activity) = options.activity.as_deref() {
                        if let Some(output) = step.fail_output(ctx) {
                            activity.record(output);
                        }
                    }
                    return Err(WizardError::Step { step_id, source });
                }
            }
        }

        Ok(())
    }
}
