//! Tool infrastructure and the built-in tool belt.
//!
//! Tools are small, stateless capabilities the agent can bind plan steps to.
//! Each invocation gets a text input and a minimal task context and always
//! produces a [`ToolExecution`] record, success or not.

pub mod calculator;
pub mod knowledge;
pub mod registry;
pub mod search;

pub use calculator::CalculatorTool;
pub use knowledge::KnowledgeBaseTool;
pub use registry::ToolRegistry;
pub use search::WebSearchTool;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Execution context passed to every tool invocation.
///
/// Carries the original user task, used as a fallback input when a step's
/// own description is empty.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub task: String,
}

impl ToolContext {
    pub fn new(task: impl Into<String>) -> Self {
        Self { task: task.into() }
    }
}

/// The structured result of one tool invocation.
///
/// Invariant: `error` is set if and only if `success` is false, and `output`
/// is empty only on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExecution {
    pub id: Uuid,
    pub tool: String,
    pub input: String,
    pub output: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolExecution {
    /// Record a successful invocation.
    pub fn ok(tool: impl Into<String>, input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tool: tool.into(),
            input: input.into(),
            output: output.into(),
            success: true,
            error: None,
        }
    }

    /// Record a failed invocation.
    pub fn fail(tool: impl Into<String>, input: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tool: tool.into(),
            input: input.into(),
            output: String::new(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Trait representing a named capability the executor can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The registered name, also the identity used for plan binding.
    fn name(&self) -> &str;

    /// Description shown to the planner (and the UI) when picking tools.
    fn description(&self) -> &str;

    /// Execute the tool. Failures are reported inside the record, never
    /// raised past it.
    async fn execute(&self, input: &str, ctx: &ToolContext) -> ToolExecution;
}

/// A type alias for a shared dynamic tool reference.
pub type DynTool = Arc<dyn Tool>;

/// Resolve the effective input for tools that fall back to the task string.
///
/// Returns the trimmed step input when non-empty, otherwise the trimmed task.
pub(crate) fn effective_input<'a>(input: &'a str, ctx: &'a ToolContext) -> &'a str {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        ctx.task.trim()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_record_invariant() {
        let ok = ToolExecution::ok("calculator", "2+2", "Result: 4");
        assert!(ok.success);
        assert!(ok.error.is_none());

        let failed = ToolExecution::fail("calculator", "", "expression required");
        assert!(!failed.success);
        assert!(failed.output.is_empty());
        assert!(failed.error.is_some());
    }

    #[test]
    fn test_effective_input_falls_back_to_task() {
        let ctx = ToolContext::new("original task");
        assert_eq!(effective_input("  ", &ctx), "original task");
        assert_eq!(effective_input("step input", &ctx), "step input");
    }
}
