//! Task planning: turn a free-text task into a short, tool-bound plan.
//!
//! Two strategies exist and the choice is made once at construction: an
//! LLM-backed planner when an OpenAI credential is configured, and a
//! keyword-heuristic planner otherwise. The heuristic is a deliberate
//! capability downgrade, not an error-recovery path.

use crate::config::LlmSettings;
use crate::error::{Result, StegError};
use crate::openai::create_client;
use crate::tools::{calculator, knowledge, search, ToolRegistry};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    ResponseFormatJsonSchema,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// Maximum number of steps the heuristic planner keeps.
const HEURISTIC_STEP_CAP: usize = 3;

/// Bounds on plan length for the LLM strategy.
const MIN_PLAN_STEPS: usize = 2;
const MAX_PLAN_STEPS: usize = 4;

/// One step of a plan, bound to exactly one tool by name.
///
/// The tool name is not validated at planning time; an unknown name is
/// surfaced later as a failed execution record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tool: String,
}

impl PlanItem {
    fn new(title: &str, description: &str, tool: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            tool: tool.to_string(),
        }
    }
}

/// A plan plus the rationale that produced it. Step order is significant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanPayload {
    pub reasoning: String,
    pub plan: Vec<PlanItem>,
}

/// Planner with its strategy fixed at construction.
pub enum Planner {
    Llm(LlmPlanner),
    Heuristic(HeuristicPlanner),
}

impl Planner {
    /// Produce a plan for the task.
    pub async fn plan(&self, task: &str) -> Result<PlanPayload> {
        match self {
            Planner::Llm(p) => p.plan(task).await,
            Planner::Heuristic(p) => Ok(p.plan(task)),
        }
    }

    /// Whether this planner consults a live model.
    pub fn is_live(&self) -> bool {
        matches!(self, Planner::Llm(_))
    }
}

/// LLM-backed planner with a schema-constrained reply.
pub struct LlmPlanner {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    catalog: Vec<(String, String)>,
}

impl LlmPlanner {
    pub fn new(settings: &LlmSettings, registry: &ToolRegistry) -> Self {
        Self {
            client: create_client(),
            model: settings.model.clone(),
            catalog: registry.catalog(),
        }
    }

    async fn plan(&self, task: &str) -> Result<PlanPayload> {
        info!("Planning with model {}", self.model);

        let catalog_text = self
            .catalog
            .iter()
            .map(|(name, description)| format!("- {}: {}", name, description))
            .collect::<Vec<_>>()
            .join("\n");

        let system_prompt = format!(
            "You are a planning assistant. Break the user's task into {} to {} ordered steps. \
             Each step must name exactly one of the available tools and carry a description \
             usable as that tool's input.\n\nAvailable tools:\n{}",
            MIN_PLAN_STEPS, MAX_PLAN_STEPS, catalog_text
        );

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt)
                .build()
                .map_err(|e| StegError::Planning(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(task.to_string())
                .build()
                .map_err(|e| StegError::Planning(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    name: "task_plan".to_string(),
                    description: Some("An ordered, tool-bound plan for the task.".to_string()),
                    schema: Some(self.plan_schema()),
                    strict: Some(true),
                },
            })
            .build()
            .map_err(|e| StegError::Planning(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| StegError::Planning(format!("planner call failed: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| StegError::Planning("empty response from model".to_string()))?;

        parse_plan_payload(content)
    }

    /// JSON schema constraining the planner reply: reasoning plus a 2-4 step
    /// plan whose tool names are drawn from the registered set.
    fn plan_schema(&self) -> serde_json::Value {
        let tool_names: Vec<&str> = self.catalog.iter().map(|(name, _)| name.as_str()).collect();
        serde_json::json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["reasoning", "plan"],
            "properties": {
                "reasoning": { "type": "string" },
                "plan": {
                    "type": "array",
                    "minItems": MIN_PLAN_STEPS,
                    "maxItems": MAX_PLAN_STEPS,
                    "items": {
                        "type": "object",
                        "additionalProperties": false,
                        "required": ["id", "title", "description", "tool"],
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "description": { "type": "string" },
                            "tool": { "type": "string", "enum": tool_names }
                        }
                    }
                }
            }
        })
    }
}

/// Parse and shape-validate a planner reply. Schema enforcement upstream is
/// not trusted; a malformed or out-of-bounds payload is a planning failure.
fn parse_plan_payload(content: &str) -> Result<PlanPayload> {
    let payload: PlanPayload = serde_json::from_str(content)
        .map_err(|e| StegError::Planning(format!("malformed plan payload: {}", e)))?;

    if payload.plan.len() < MIN_PLAN_STEPS || payload.plan.len() > MAX_PLAN_STEPS {
        return Err(StegError::Planning(format!(
            "plan must contain {} to {} steps, got {}",
            MIN_PLAN_STEPS,
            MAX_PLAN_STEPS,
            payload.plan.len()
        )));
    }

    Ok(payload)
}

/// Keyword-heuristic planner used when no credential is configured.
pub struct HeuristicPlanner {
    analysis: Regex,
    research: Regex,
}

impl HeuristicPlanner {
    pub fn new() -> Self {
        Self {
            analysis: Regex::new(
                r"\b(calculat\w*|comput\w*|math|sum|total\w*|average\w*|percent\w*|estimat\w*|quantif\w*|metric\w*)\b",
            )
            .expect("valid analysis regex"),
            research: Regex::new(
                r"\b(research\w*|latest|news|current\w*|today|recent\w*|trend\w*|live|happening)\b",
            )
            .expect("valid research regex"),
        }
    }

    /// Append steps in fixed priority order and cap at three. The
    /// unconditional knowledge-base step is appended last, so it is only
    /// dropped when both conditional steps fired and the cap truncates it.
    pub fn plan(&self, task: &str) -> PlanPayload {
        let lowered = task.to_lowercase();
        let mut plan = Vec::new();

        if self.analysis.is_match(&lowered) {
            plan.push(PlanItem::new(
                "Quantify key numbers",
                "Work out the concrete figures mentioned in the task.",
                calculator::NAME,
            ));
        }

        if self.research.is_match(&lowered) {
            plan.push(PlanItem::new(
                "Collect live context",
                "Gather current information relevant to the task.",
                search::NAME,
            ));
        }

        plan.push(PlanItem::new(
            "Reference built-in playbooks",
            "Pull matching guidance from the built-in knowledge base.",
            knowledge::NAME,
        ));

        plan.truncate(HEURISTIC_STEP_CAP);
        debug!("Heuristic plan has {} step(s)", plan.len());

        PlanPayload {
            reasoning: "Derived from task keywords without a language model: matched patterns \
                        decide which tools apply, and the built-in playbooks are always consulted."
                .to_string(),
            plan,
        }
    }
}

impl Default for HeuristicPlanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_sequence(payload: &PlanPayload) -> Vec<&str> {
        payload.plan.iter().map(|s| s.tool.as_str()).collect()
    }

    #[test]
    fn test_calculation_task_leads_with_calculator() {
        let planner = HeuristicPlanner::new();
        let payload = planner.plan("Calculate the quarterly budget");
        let tools = tool_sequence(&payload);
        assert_eq!(tools.first(), Some(&calculator::NAME));
        assert_eq!(tools.last(), Some(&knowledge::NAME));
        assert!(tools.len() <= HEURISTIC_STEP_CAP);
    }

    #[test]
    fn test_plain_task_gets_single_knowledge_step() {
        let planner = HeuristicPlanner::new();
        let payload = planner.plan("Plan a product launch");
        assert_eq!(tool_sequence(&payload), vec![knowledge::NAME]);
    }

    #[test]
    fn test_both_keyword_groups_fill_the_cap_in_order() {
        let planner = HeuristicPlanner::new();
        let payload = planner.plan("Research the latest trends and calculate the growth rate");
        assert_eq!(
            tool_sequence(&payload),
            vec![calculator::NAME, search::NAME, knowledge::NAME]
        );
    }

    #[test]
    fn test_summarize_does_not_trigger_the_sum_keyword() {
        let planner = HeuristicPlanner::new();
        let payload = planner.plan("Summarize our onboarding docs");
        assert_eq!(tool_sequence(&payload), vec![knowledge::NAME]);
    }

    #[test]
    fn test_plans_are_idempotent_up_to_ids() {
        let planner = HeuristicPlanner::new();
        let first = planner.plan("Research current pricing and estimate totals");
        let second = planner.plan("Research current pricing and estimate totals");
        assert_eq!(tool_sequence(&first), tool_sequence(&second));
        assert_eq!(first.plan.len(), second.plan.len());
    }

    #[test]
    fn test_parse_rejects_out_of_bounds_plans() {
        let one_step = r#"{"reasoning": "r", "plan": [
            {"id": "1", "title": "t", "description": "d", "tool": "calculator"}
        ]}"#;
        assert!(parse_plan_payload(one_step).is_err());

        let malformed = r#"{"reasoning": "r"}"#;
        assert!(parse_plan_payload(malformed).is_err());
    }

    #[test]
    fn test_parse_accepts_a_well_formed_payload() {
        let content = r#"{"reasoning": "two steps", "plan": [
            {"id": "1", "title": "a", "description": "d", "tool": "web_search"},
            {"id": "2", "title": "b", "description": "d", "tool": "knowledge_base"}
        ]}"#;
        let payload = parse_plan_payload(content).unwrap();
        assert_eq!(payload.plan.len(), 2);
        assert_eq!(payload.reasoning, "two steps");
    }
}
