//! Final-answer synthesis from the plan and the tool output.

use super::planner::PlanPayload;
use crate::config::LlmSettings;
use crate::error::{Result, StegError};
use crate::openai::create_client;
use crate::tools::ToolExecution;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use tracing::info;

/// Fixed final answer used when no credential is configured.
pub const FALLBACK_FINAL: &str =
    "Live reasoning is unavailable because no OpenAI credential is configured; \
     use the plan and tool output above as a starting point.";

const SYSTEM_PROMPT: &str =
    "You are a synthesis assistant. Given a task, the plan that was executed, and each \
     step's tool output, write a concise, actionable answer to the task. Refer to step \
     results where they matter and note any step that failed.";

/// Summarizer with its strategy fixed at construction.
pub enum Summarizer {
    Llm(LlmSummarizer),
    Static,
}

impl Summarizer {
    /// Produce the final answer text.
    pub async fn summarize(
        &self,
        task: &str,
        payload: &PlanPayload,
        steps: &[ToolExecution],
    ) -> Result<String> {
        match self {
            Summarizer::Llm(s) => s.summarize(task, payload, steps).await,
            Summarizer::Static => Ok(FALLBACK_FINAL.to_string()),
        }
    }
}

/// LLM-backed summarizer.
pub struct LlmSummarizer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl LlmSummarizer {
    pub fn new(settings: &LlmSettings) -> Self {
        Self {
            client: create_client(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        }
    }

    async fn summarize(
        &self,
        task: &str,
        payload: &PlanPayload,
        steps: &[ToolExecution],
    ) -> Result<String> {
        info!("Summarizing with model {}", self.model);

        let run_json = serde_json::to_string_pretty(&serde_json::json!({
            "task": task,
            "reasoning": payload.reasoning,
            "plan": payload.plan,
            "steps": steps,
        }))?;

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| StegError::Summary(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(run_json)
                .build()
                .map_err(|e| StegError::Summary(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| StegError::Summary(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| StegError::Summary(format!("summarizer call failed: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| StegError::Summary("empty response from model".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_summarizer_returns_the_fixed_sentence() {
        let payload = PlanPayload {
            reasoning: "r".to_string(),
            plan: Vec::new(),
        };
        let answer = Summarizer::Static
            .summarize("task", &payload, &[])
            .await
            .unwrap();
        assert_eq!(answer, FALLBACK_FINAL);
    }
}
