//! Sequential plan execution against the tool registry.

use super::planner::PlanItem;
use crate::error::StegError;
use crate::tools::{ToolContext, ToolExecution, ToolRegistry};
use std::sync::Arc;
use tracing::{info, warn};

/// Runs plan steps in order, one record per step.
///
/// A step naming an unregistered tool becomes a failed record and does not
/// abort the rest of the plan. Steps never observe each other's output;
/// each gets only its own description and the original task.
pub struct Executor {
    registry: Arc<ToolRegistry>,
}

impl Executor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        self.registry.clone()
    }

    pub async fn run(&self, plan: &[PlanItem], task: &str) -> Vec<ToolExecution> {
        let ctx = ToolContext::new(task);
        let mut steps = Vec::with_capacity(plan.len());

        for item in plan {
            let record = match self.registry.lookup(&item.tool) {
                Some(tool) => {
                    info!("Executing step '{}' with tool '{}'", item.title, item.tool);
                    tool.execute(&item.description, &ctx).await
                }
                None => {
                    warn!("Step '{}' names unregistered tool '{}'", item.title, item.tool);
                    ToolExecution::fail(
                        &item.tool,
                        &item.description,
                        StegError::UnregisteredTool(item.tool.clone()).to_string(),
                    )
                }
            };
            steps.push(record);
        }

        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchSettings;
    use uuid::Uuid;

    fn item(tool: &str, description: &str) -> PlanItem {
        PlanItem {
            id: Uuid::new_v4().to_string(),
            title: format!("use {}", tool),
            description: description.to_string(),
            tool: tool.to_string(),
        }
    }

    fn executor() -> Executor {
        Executor::new(Arc::new(ToolRegistry::standard(&SearchSettings::default())))
    }

    #[tokio::test]
    async fn test_unregistered_tool_fails_without_aborting_the_plan() {
        let plan = vec![item("time_machine", "go back"), item("calculator", "2+2")];
        let steps = executor().run(&plan, "task").await;

        assert_eq!(steps.len(), 2);
        assert!(!steps[0].success);
        assert!(steps[0].error.as_deref().unwrap().contains("time_machine"));
        assert!(steps[1].success);
        assert_eq!(steps[1].output, "Result: 4");
    }

    #[tokio::test]
    async fn test_lookup_tolerates_case_differences() {
        let plan = vec![item("Calculator", "6*7")];
        let steps = executor().run(&plan, "task").await;
        assert!(steps[0].success);
        assert_eq!(steps[0].output, "Result: 42");
    }

    #[tokio::test]
    async fn test_one_record_per_step_in_order() {
        let plan = vec![
            item("knowledge_base", "agentic ai"),
            item("calculator", "1+1"),
            item("knowledge_base", "zzyyxx"),
        ];
        let steps = executor().run(&plan, "task").await;
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].tool, "knowledge_base");
        assert_eq!(steps[1].tool, "calculator");
        assert_eq!(steps[2].tool, "knowledge_base");
    }
}
