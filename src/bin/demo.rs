//! Interactive demo: a small service-scaffold wizard on stdin.
//!
//! Answers are typed one per line. Enter `<` to go back a step; Ctrl-D
//! cancels. Choosing the "api" kind injects a sub-wizard with an extra
//! prompt and an extra execute step.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use serde_json::{json, Value};

use stepwise::{
    logging, ExecuteOptions, ExecuteStep, InputRequest, InputSource, ProgressReporter,
    ProgressUpdate, PromptContext, PromptError, PromptStep, SubWizard, Wizard, WizardContext,
};

#[derive(Parser)]
#[command(name = "stepwise-demo", about = "Scaffold a service, wizard-style")]
struct Cli {
    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

/// Reads one answer per line from stdin.
struct StdinInput;

#[async_trait]
impl InputSource for StdinInput {
    async fn request(&self, request: InputRequest) -> Result<Value, PromptError> {
        let header = match (&request.title, request.step_counter) {
            (Some(title), Some((current, total))) => {
                format!("{title} — step {current}/{total}")
            }
            (Some(title), None) => title.clone(),
            (None, Some((current, total))) => format!("step {current}/{total}"),
            (None, None) => String::new(),
        };
        if !header.is_empty() {
            println!("[{header}]");
        }

        // Prefer the remembered answer over the step's default when
        // pre-filling a revisited question.
        let prefill = request.remembered.clone().or(request.default.clone());
        match &prefill {
            Some(value) => println!("{} [{}]", request.message, render(value)),
            None => println!("{}", request.message),
        }

        let (read, line) = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            let read = std::io::stdin().read_line(&mut line)?;
            Ok::<_, std::io::Error>((read, line))
        })
        .await
        .map_err(|e| PromptError::Other(e.into()))?
        .map_err(|e| PromptError::Other(e.into()))?;

        if read == 0 {
            // EOF
            return Err(PromptError::Cancelled);
        }
        let answer = line.trim();
        if answer == "<" {
            return Err(PromptError::Back);
        }
        if answer.is_empty() {
            return prefill
                .ok_or_else(|| PromptError::Other(anyhow::anyhow!("an answer is required")));
        }
        Ok(json!(answer))
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, update: ProgressUpdate) {
        eprintln!("  {update}");
    }
}

struct NameStep;

#[async_trait]
impl PromptStep for NameStep {
    fn id(&self) -> Option<&str> {
        Some("service-name")
    }

    async fn prompt(&self, ctx: &mut PromptContext<'_>) -> Result<(), PromptError> {
        let name = ctx.ask("Service name:").await?;
        ctx.insert("name", name);
        Ok(())
    }
}

struct KindStep;

#[async_trait]
impl PromptStep for KindStep {
    fn id(&self) -> Option<&str> {
        Some("service-kind")
    }

    async fn prompt(&self, ctx: &mut PromptContext<'_>) -> Result<(), PromptError> {
        let kind = ctx
            .ask_with_default("Service kind (api or worker):", json!("api"))
            .await?;
        ctx.insert("kind", kind);
        Ok(())
    }

    async fn sub_wizard(&self, ctx: &WizardContext) -> Result<Option<SubWizard>> {
        if ctx.get::<String>("kind").as_deref() == Some("api") {
            Ok(Some(
                SubWizard::new()
                    .with_prompt_step(PortStep)
                    .with_execute_step(RouteStubStep),
            ))
        } else {
            Ok(None)
        }
    }
}

struct PortStep;

#[async_trait]
impl PromptStep for PortStep {
    fn id(&self) -> Option<&str> {
        Some("listen-port")
    }

    async fn prompt(&self, ctx: &mut PromptContext<'_>) -> Result<(), PromptError> {
        let port = ctx.ask_with_default("Listen port:", json!("8080")).await?;
        ctx.insert("port", port);
        Ok(())
    }
}

struct PlanStep;

#[async_trait]
impl ExecuteStep for PlanStep {
    fn id(&self) -> Option<&str> {
        Some("plan")
    }

    fn priority(&self) -> i32 {
        5
    }

    async fn execute(
        &self,
        ctx: &mut WizardContext,
        progress: &dyn ProgressReporter,
    ) -> Result<()> {
        let name: String = ctx.get("name").unwrap_or_default();
        let kind: String = ctx.get("kind").unwrap_or_default();
        progress.report(ProgressUpdate::message(format!(
            "Planning {kind} service '{name}'"
        )));
        Ok(())
    }
}

struct ScaffoldStep;

#[async_trait]
impl ExecuteStep for ScaffoldStep {
    fn id(&self) -> Option<&str> {
        Some("scaffold")
    }

    fn priority(&self) -> i32 {
        10
    }

    async fn execute(
        &self,
        ctx: &mut WizardContext,
        progress: &dyn ProgressReporter,
    ) -> Result<()> {
        let name: String = ctx.get("name").unwrap_or_default();
        progress.report(ProgressUpdate::message(format!("Scaffolding '{name}'")));
        println!("Scaffolded service '{name}' (dry run).");
        Ok(())
    }
}

/// Injected alongside `PortStep` when the api kind is selected.
struct RouteStubStep;

#[async_trait]
impl ExecuteStep for RouteStubStep {
    fn id(&self) -> Option<&str> {
        Some("route-stub")
    }

    fn priority(&self) -> i32 {
        20
    }

    fn should_execute(&self, ctx: &WizardContext) -> bool {
        ctx.contains_key("port")
    }

    async fn execute(
        &self,
        ctx: &mut WizardContext,
        progress: &dyn ProgressReporter,
    ) -> Result<()> {
        let port: String = ctx.get("port").unwrap_or_default();
        progress.report(ProgressUpdate::message(format!(
            "Adding health route on port {port}"
        )));
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.debug)?;

    let mut ctx = WizardContext::new();
    let mut wizard = Wizard::builder()
        .with_title("New service")
        .prompt_step(NameStep)
        .prompt_step(KindStep)
        .execute_step(ScaffoldStep)
        .execute_step(PlanStep)
        .with_progress(Arc::new(StderrProgress))
        .build(Arc::new(StdinInput));

    match wizard.prompt(&mut ctx).await {
        Ok(()) => {}
        Err(err) if err.is_silent() => {
            eprintln!("Cancelled.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    wizard.execute(&mut ctx, ExecuteOptions::default()).await?;
    Ok(())
}
