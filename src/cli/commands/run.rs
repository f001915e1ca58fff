//! One-shot run command implementation.

use crate::agent::AgentRunner;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run a single task from the terminal and print the outcome.
pub async fn run_task(task: &str, json: bool, settings: Settings) -> Result<()> {
    if task.trim().is_empty() {
        Output::error("Task must not be empty.");
        anyhow::bail!("empty task");
    }

    let runner = AgentRunner::new(&settings);

    let spinner = Output::spinner("Planning and executing...");
    let outcome = runner.run(task.trim()).await;
    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if let Some(error) = &outcome.error {
        if outcome.success {
            Output::warning(error);
        } else {
            Output::error(error);
            anyhow::bail!("task run failed");
        }
    }

    Output::header("Plan");
    Output::info(&outcome.reasoning);
    for (i, (item, record)) in outcome.plan.iter().zip(outcome.steps.iter()).enumerate() {
        Output::step(i + 1, &item.title, &item.tool, record.success);
        let detail = if record.success {
            record.output.as_str()
        } else {
            record.error.as_deref().unwrap_or("failed")
        };
        for line in detail.lines() {
            println!("       {}", line);
        }
    }

    Output::header("Answer");
    println!("{}\n", outcome.final_answer);
    Output::kv("Duration", &format!("{} ms", outcome.meta.duration_ms));

    Ok(())
}
