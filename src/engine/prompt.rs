//! Prompt phase: the forward loop, sub-wizard splicing, and back-navigation.

use std::collections::BTreeSet;

use crate::cancel::CancellationToken;
use crate::context::WizardContext;
use crate::error::WizardError;
use crate::input::{PromptContext, PromptError, PromptSetup};
use crate::step::{PromptRecord, SubWizard};

use super::Wizard;

impl Wizard {
    /// Run the prompt phase to completion.
    ///
    /// Creates (or adopts) a single cancellation token for the whole phase,
    /// installs it on the context, and removes it before returning — on
    /// success, error, or cancellation alike.
    ///
    /// # Errors
    ///
    /// [`WizardError::UserCancelled`] when a prompt is dismissed or the
    /// token fires; [`WizardError::GoBack`] when the user navigates back
    /// past the first step; [`WizardError::Step`] when a step's prompt or
    /// sub-wizard construction fails.
    pub async fn prompt(&mut self, ctx: &mut WizardContext) -> Result<(), WizardError> {
        let cancel = self.cancel.clone().unwrap_or_default();
        ctx.install_cancellation(cancel.clone());

        let result = self.prompt_loop(ctx, &cancel).await;

        ctx.clear_cancellation();
        ctx.set_current_step_id(None);
        if let Err(err) = &result {
            tracing::debug!(run_id = %self.run_id, error = %err, "prompt phase ended early");
        }
        result
    }

    async fn prompt_loop(
        &mut self,
        ctx: &mut WizardContext,
        cancel: &CancellationToken,
    ) -> Result<(), WizardError> {
        // Holds the landing step after back-navigation; otherwise the next
        // step comes off the pending stack.
        let mut current: Option<PromptRecord> = None;

        loop {
            let Some(mut record) = current.take().or_else(|| self.pending.pop()) else {
                break;
            };

            if cancel.is_cancelled() {
                return Err(WizardError::UserCancelled);
            }

            record.reset();
            let step_id = record.step.effective_id();
            ctx.set_current_step_id(Some(step_id.clone()));

            if record.step.should_prompt(ctx) {
                record.keys_before_prompt = Some(ctx.key_snapshot());

                match self.prompt_one(ctx, &record, &step_id, cancel).await {
                    Ok(answer) => {
                        record.prompted = true;
                        if let Some(answer) = answer {
                            let unchanged_default =
                                answer.default.as_ref() == Some(&answer.value);
                            if !unchanged_default && !record.step.allows_duplicates() {
                                self.input_cache.insert(step_id.clone(), answer.value);
                            }
                        }
                    }
                    Err(PromptError::Back) => {
                        tracing::debug!(
                            run_id = %self.run_id,
                            step_id = %step_id,
                            "back-navigation requested"
                        );
                        current = Some(self.go_back(record, ctx)?);
                        continue;
                    }
                    Err(PromptError::Cancelled) => return Err(WizardError::UserCancelled),
                    Err(PromptError::Other(source)) => {
                        return Err(WizardError::Step { step_id, source })
                    }
                }
            } else {
                tracing::debug!(run_id = %self.run_id, step_id = %step_id, "step declined to prompt");
            }

            // Cancellation is also checked before expanding a sub-wizard, so
            // latency stays bounded by one step's remaining work.
            if cancel.is_cancelled() {
                return Err(WizardError::UserCancelled);
            }

            match record.step.sub_wizard(ctx).await {
                Ok(Some(sub)) if !sub.is_empty() => {
                    self.splice_sub_wizard(&mut record, sub, &step_id);
                }
                Ok(_) => {}
                Err(source) => return Err(WizardError::Step { step_id, source }),
            }

            self.finished.push(record);
        }

        Ok(())
    }

    /// Drive one step's prompt call and hand back the raw answer (if the
    /// step asked anything) for the input cache.
    async fn prompt_one(
        &self,
        ctx: &mut WizardContext,
        record: &PromptRecord,
        step_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<crate::input::RawAnswer>, PromptError> {
        tracing::debug!(run_id = %self.run_id, step_id = %step_id, "prompting step");

        let step_counter = if self.hide_step_count {
            None
        } else {
            let current_step = self.current_step();
            Some((current_step, current_step + self.pending_prompt_count(ctx) + 1))
        };
        let remembered = if record.step.allows_duplicates() {
            None
        } else {
            self.input_cache.get(step_id).cloned()
        };

        let setup = PromptSetup {
            step_id: step_id.to_string(),
            remembered,
            title: self.title.clone(),
            step_counter,
        };
        let mut prompt_ctx = PromptContext::new(
            ctx,
            self.input.as_ref(),
            self.progress.as_ref(),
            cancel.clone(),
            setup,
        );

        record.step.prompt(&mut prompt_ctx).await?;
        Ok(prompt_ctx.take_answer())
    }

    /// Splice a sub-wizard in behind the step that produced it.
    ///
    /// Injected prompt steps run immediately after `record`, before any
    /// previously pending step, in their declared order. Steps whose
    /// effective id already exists in pending, finished, or the producing
    /// step itself are dropped unless they opt in to duplicates.
    pub(crate) fn splice_sub_wizard(
        &mut self,
        record: &mut PromptRecord,
        sub: SubWizard,
        current_id: &str,
    ) {
        record.has_sub_wizard = true;

        let mut known: BTreeSet<String> = self
            .pending
            .iter()
            .chain(self.finished.iter())
            .map(|r| r.step.effective_id())
            .collect();
        known.insert(current_id.to_string());

        let mut survivors = Vec::with_capacity(sub.prompt_steps.len());
        for step in sub.prompt_steps {
            let step_id = step.effective_id();
            if !step.allows_duplicates() && known.contains(&step_id) {
                tracing::warn!(
                    run_id = %self.run_id,
                    step_id = %step_id,
                    "dropping duplicate sub-wizard prompt step"
                );
                continue;
            }
            known.insert(step_id);
            survivors.push(step);
        }

        record.num_sub_prompt_steps = survivors.len();
        record.num_sub_execute_steps = sub.execute_steps.len();
        tracing::debug!(
            run_id = %self.run_id,
            step_id = %current_id,
            prompt_steps = record.num_sub_prompt_steps,
            execute_steps = record.num_sub_execute_steps,
            "splicing sub-wizard"
        );

        // Push survivors in reverse so the first-declared one pops first.
        for step in survivors.into_iter().rev() {
            self.pending.push(PromptRecord::new(step));
        }
        self.execute_steps.extend(sub.execute_steps);
    }

    /// Unwind to the most recent step that actually prompted.
    ///
    /// Pushes the current step (and any skipped steps passed over on the
    /// way) back onto pending, removes everything each unwound step had
    /// injected, and rolls the context back to the landing step's pre-prompt
    /// key snapshot. Fails with [`WizardError::GoBack`] when there is no
    /// prior step to land on.
    fn go_back(
        &mut self,
        current: PromptRecord,
        ctx: &mut WizardContext,
    ) -> Result<PromptRecord, WizardError> {
        let mut outgoing = current;

        loop {
            self.pending.push(outgoing);

            let Some(record) = self.finished.pop() else {
                tracing::debug!(run_id = %self.run_id, "back-navigation past the first step");
                return Err(WizardError::GoBack);
            };

            if record.has_sub_wizard {
                // The tail of pending holds exactly the steps this one
                // injected (later finished steps were unwound first), and
                // likewise for the execute list.
                let pending_len = self.pending.len().saturating_sub(record.num_sub_prompt_steps);
                self.pending.truncate(pending_len);
                let execute_len = self
                    .execute_steps
                    .len()
                    .saturating_sub(record.num_sub_execute_steps);
                self.execute_steps.truncate(execute_len);
            }

            if record.prompted {
                if let Some(snapshot) = record.keys_before_prompt.as_ref() {
                    ctx.rollback_to(snapshot);
                }
                tracing::debug!(
                    run_id = %self.run_id,
                    step_id = %record.step.effective_id(),
                    "landed on previous step"
                );
                return Ok(record);
            }

            // Skipped steps are not valid landing points; keep unwinding.
            outgoing = record;
        }
    }
}
