//! Agent runner: plan, execute, summarize — one outcome per task.

use super::executor::Executor;
use super::planner::{HeuristicPlanner, LlmPlanner, PlanItem, Planner};
use super::summarizer::{LlmSummarizer, Summarizer};
use crate::config::Settings;
use crate::error::Result;
use crate::openai;
use crate::tools::{ToolExecution, ToolRegistry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Informational error carried on successful runs made without a credential.
pub const OFFLINE_NOTICE: &str =
    "OPENAI_API_KEY is not configured; the plan was produced heuristically and no live \
     reasoning was performed.";

/// Timing metadata for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMeta {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl RunMeta {
    fn span(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            completed_at,
            duration_ms: (completed_at - started_at).num_milliseconds(),
        }
    }
}

/// The aggregate result of one task run. Constructed once per request,
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOutcome {
    pub success: bool,
    pub plan: Vec<PlanItem>,
    pub steps: Vec<ToolExecution>,
    #[serde(rename = "final")]
    pub final_answer: String,
    pub reasoning: String,
    pub meta: RunMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentOutcome {
    /// A failed outcome with empty plan, steps, and final answer.
    pub fn failure(error: impl Into<String>, meta: RunMeta) -> Self {
        Self {
            success: false,
            plan: Vec::new(),
            steps: Vec::new(),
            final_answer: String::new(),
            reasoning: String::new(),
            meta,
            error: Some(error.into()),
        }
    }

    /// The fixed-shape outcome used to reject an empty task.
    pub fn rejected(message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self::failure(message, RunMeta::span(now, now))
    }
}

/// Orchestrates one task run end to end.
///
/// The planning and summarizing strategies are chosen once, at construction,
/// from credential presence; `run` itself never re-inspects the environment.
pub struct AgentRunner {
    planner: Planner,
    executor: Executor,
    summarizer: Summarizer,
}

impl AgentRunner {
    /// Build a runner from settings, picking the live or the offline
    /// strategy pair based on credential presence.
    pub fn new(settings: &Settings) -> Self {
        let registry = Arc::new(ToolRegistry::standard(&settings.search));

        let (planner, summarizer) = if openai::api_key_configured() {
            info!("OpenAI credential found; planning and summarizing with the live model");
            (
                Planner::Llm(LlmPlanner::new(&settings.llm, &registry)),
                Summarizer::Llm(LlmSummarizer::new(&settings.llm)),
            )
        } else {
            info!("No OpenAI credential; falling back to heuristic planning");
            (
                Planner::Heuristic(HeuristicPlanner::new()),
                Summarizer::Static,
            )
        };

        Self {
            planner,
            executor: Executor::new(registry),
            summarizer,
        }
    }

    /// Build a runner from explicit components.
    pub fn with_components(planner: Planner, executor: Executor, summarizer: Summarizer) -> Self {
        Self {
            planner,
            executor,
            summarizer,
        }
    }

    /// The tool registry backing this runner.
    pub fn registry(&self) -> Arc<ToolRegistry> {
        self.executor.registry()
    }

    /// Run one task end to end and always return a complete outcome.
    ///
    /// On the offline path the outcome is successful but carries an
    /// informational `error` naming the missing credential. On the live
    /// path a planning or summarizing failure produces a failed outcome
    /// with the failure message and empty plan, steps, and final answer.
    #[instrument(skip(self, task), fields(task_len = task.len()))]
    pub async fn run(&self, task: &str) -> AgentOutcome {
        let started_at = Utc::now();
        info!("Running task");

        let result = self.attempt(task).await;
        let meta = RunMeta::span(started_at, Utc::now());

        match result {
            Ok((reasoning, plan, steps, final_answer)) => AgentOutcome {
                success: true,
                plan,
                steps,
                final_answer,
                reasoning,
                meta,
                error: if self.planner.is_live() {
                    None
                } else {
                    Some(OFFLINE_NOTICE.to_string())
                },
            },
            Err(e) => AgentOutcome::failure(e.to_string(), meta),
        }
    }

    async fn attempt(
        &self,
        task: &str,
    ) -> Result<(String, Vec<PlanItem>, Vec<ToolExecution>, String)> {
        let payload = self.planner.plan(task).await?;
        let steps = self.executor.run(&payload.plan, task).await;
        let final_answer = self.summarizer.summarize(task, &payload, &steps).await?;
        Ok((payload.reasoning, payload.plan, steps, final_answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::summarizer::FALLBACK_FINAL;
    use crate::config::Settings;

    fn offline_runner() -> AgentRunner {
        let settings = Settings::default();
        let registry = Arc::new(ToolRegistry::standard(&settings.search));
        AgentRunner::with_components(
            Planner::Heuristic(HeuristicPlanner::new()),
            Executor::new(registry),
            Summarizer::Static,
        )
    }

    #[tokio::test]
    async fn test_offline_run_succeeds_with_informational_error() {
        let outcome = offline_runner().run("Plan a product launch").await;

        assert!(outcome.success);
        assert!(!outcome.plan.is_empty());
        assert_eq!(outcome.steps.len(), outcome.plan.len());
        assert_eq!(outcome.final_answer, FALLBACK_FINAL);
        assert_eq!(outcome.error.as_deref(), Some(OFFLINE_NOTICE));
        assert!(!outcome.reasoning.is_empty());
        assert!(outcome.meta.duration_ms >= 0);
    }

    #[tokio::test]
    async fn test_step_records_line_up_with_the_plan() {
        let outcome = offline_runner().run("Plan a product launch").await;
        for (item, record) in outcome.plan.iter().zip(outcome.steps.iter()) {
            assert!(item.tool.eq_ignore_ascii_case(&record.tool));
        }
    }

    #[test]
    fn test_outcome_serializes_with_the_wire_field_names() {
        let outcome = AgentOutcome::rejected("task must not be empty");
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["success"], false);
        assert!(json["final"].is_string());
        assert!(json["meta"]["startedAt"].is_string());
        assert!(json["meta"]["completedAt"].is_string());
        assert_eq!(json["meta"]["durationMs"], 0);
        assert_eq!(json["error"], "task must not be empty");
    }

    #[test]
    fn test_successful_outcome_omits_null_error() {
        let outcome = AgentOutcome {
            success: true,
            plan: Vec::new(),
            steps: Vec::new(),
            final_answer: "done".to_string(),
            reasoning: "r".to_string(),
            meta: RunMeta::span(Utc::now(), Utc::now()),
            error: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("error").is_none());
    }
}
