//! Side-effecting steps run after all prompting completes.

use async_trait::async_trait;

use crate::context::WizardContext;
use crate::progress::{ActivityOutput, ProgressReporter};

/// A unit of side-effecting work, run at most once per wizard session.
///
/// Execute steps are ordered by ascending [`priority`](Self::priority) and
/// guarded by [`should_execute`](Self::should_execute), which is evaluated
/// at the step's turn (not snapshotted up front), so an earlier step's side
/// effects can change whether a later step runs. Steps must be individually
/// idempotent or externally compensable: on failure the engine halts without
/// rolling anything back.
#[async_trait]
pub trait ExecuteStep: Send + Sync {
    /// Explicit id, if the step wants one.
    fn id(&self) -> Option<&str> {
        None
    }

    /// Identity used for de-duplication and error reporting.
    fn effective_id(&self) -> String {
        self.id()
            .map(str::to_string)
            .unwrap_or_else(|| std::any::type_name_of_val(self).to_string())
    }

    /// Ordering key: lower runs earlier. Registration order breaks ties.
    fn priority(&self) -> i32;

    /// Whether the step still needs to run, given the context as it is at
    /// the step's turn.
    fn should_execute(&self, ctx: &WizardContext) -> bool {
        let _ = ctx;
        true
    }

    /// Perform the work. Progress messages sent through `progress` are
    /// stamped with a `(current/total)` counter by the engine.
    async fn execute(
        &self,
        ctx: &mut WizardContext,
        progress: &dyn ProgressReporter,
    ) -> anyhow::Result<()>;

    /// Structured summary emitted to the activity sink before the step runs.
    fn progress_output(&self, ctx: &WizardContext) -> Option<ActivityOutput> {
        let _ = ctx;
        None
    }

    /// Structured summary emitted after the step succeeds.
    fn success_output(&self, ctx: &WizardContext) -> Option<ActivityOutput> {
        let _ = ctx;
        None
    }

    /// Structured summary emitted after the step fails.
    fn fail_output(&self, ctx: &WizardContext) -> Option<ActivityOutput> {
        let _ = ctx;
        None
    }
}
