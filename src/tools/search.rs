//! Web search tool backed by the DuckDuckGo instant-answer API.

use super::{effective_input, Tool, ToolContext, ToolExecution};
use crate::config::SearchSettings;
use crate::error::{Result, StegError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const NAME: &str = "web_search";

const DESCRIPTION: &str =
    "Search the public web for live context and return up to a handful of short snippets.";

const NO_SNIPPETS: &str = "No search snippets returned.";

/// Instant-answer response shape. Only the fields we read are modeled;
/// everything else in the payload is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchApiResponse {
    #[serde(rename = "AbstractText")]
    abstract_text: String,
    #[serde(rename = "RelatedTopics")]
    related_topics: Vec<RelatedTopic>,
}

/// A related topic either carries its own text or nests a list of
/// sub-topics that do. Both shapes flatten into candidate snippets.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RelatedTopic {
    #[serde(rename = "Text")]
    text: String,
    #[serde(rename = "Topics")]
    topics: Vec<RelatedTopic>,
}

/// Web search tool.
pub struct WebSearchTool {
    client: reqwest::Client,
    endpoint: String,
    user_agent: String,
    max_snippets: usize,
}

impl WebSearchTool {
    pub fn new(settings: &SearchSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: settings.endpoint.clone(),
            user_agent: settings.user_agent.clone(),
            max_snippets: settings.max_snippets,
        }
    }

    async fn fetch_snippets(&self, query: &str) -> Result<Vec<String>> {
        let url = Url::parse_with_params(
            &self.endpoint,
            &[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ],
        )
        .map_err(|e| StegError::Network(format!("invalid search endpoint: {}", e)))?;

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StegError::Network(format!(
                "search API returned HTTP {}",
                status.as_u16()
            )));
        }

        let payload: SearchApiResponse = response.json().await?;
        Ok(collect_snippets(&payload, self.max_snippets))
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    async fn execute(&self, input: &str, ctx: &ToolContext) -> ToolExecution {
        let query = effective_input(input, ctx);
        if query.is_empty() {
            return ToolExecution::fail(
                NAME,
                input,
                StegError::MissingInput("a search query is required".to_string()).to_string(),
            );
        }

        match self.fetch_snippets(query).await {
            Ok(snippets) if snippets.is_empty() => {
                // An empty result set is not a tool failure.
                ToolExecution::ok(NAME, query, NO_SNIPPETS)
            }
            Ok(snippets) => {
                debug!("Collected {} snippets for '{}'", snippets.len(), query);
                ToolExecution::ok(NAME, query, snippets.join("\n"))
            }
            Err(e) => ToolExecution::fail(NAME, query, e.to_string()),
        }
    }
}

/// Flatten the abstract text and related topics into at most `max` snippets.
fn collect_snippets(payload: &SearchApiResponse, max: usize) -> Vec<String> {
    let mut snippets = Vec::new();

    if !payload.abstract_text.trim().is_empty() {
        snippets.push(payload.abstract_text.trim().to_string());
    }

    fn walk(topics: &[RelatedTopic], snippets: &mut Vec<String>, max: usize) {
        for topic in topics {
            if snippets.len() >= max {
                return;
            }
            if !topic.text.trim().is_empty() {
                snippets.push(topic.text.trim().to_string());
            }
            walk(&topic.topics, snippets, max);
        }
    }
    walk(&payload.related_topics, &mut snippets, max);

    snippets.truncate(max);
    snippets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SearchApiResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_collects_abstract_before_topics() {
        let payload = parse(
            r#"{
                "AbstractText": "An abstract.",
                "RelatedTopics": [
                    {"Text": "First topic."},
                    {"Text": "Second topic."}
                ]
            }"#,
        );
        let snippets = collect_snippets(&payload, 4);
        assert_eq!(snippets, vec!["An abstract.", "First topic.", "Second topic."]);
    }

    #[test]
    fn test_flattens_nested_topic_groups() {
        let payload = parse(
            r#"{
                "RelatedTopics": [
                    {"Text": "Direct."},
                    {"Topics": [{"Text": "Nested one."}, {"Text": "Nested two."}]}
                ]
            }"#,
        );
        let snippets = collect_snippets(&payload, 4);
        assert_eq!(snippets, vec!["Direct.", "Nested one.", "Nested two."]);
    }

    #[test]
    fn test_caps_snippet_count() {
        let payload = parse(
            r#"{
                "AbstractText": "A.",
                "RelatedTopics": [
                    {"Text": "B."}, {"Text": "C."}, {"Text": "D."}, {"Text": "E."}
                ]
            }"#,
        );
        assert_eq!(collect_snippets(&payload, 4).len(), 4);
    }

    #[test]
    fn test_empty_payload_yields_no_snippets() {
        let payload = parse(r#"{"AbstractText": "", "RelatedTopics": []}"#);
        assert!(collect_snippets(&payload, 4).is_empty());
    }

    #[test]
    fn test_ignores_unknown_fields_and_blank_texts() {
        let payload = parse(
            r#"{
                "Heading": "ignored",
                "AbstractText": "  ",
                "RelatedTopics": [{"Text": "  "}, {"Text": "Kept."}]
            }"#,
        );
        assert_eq!(collect_snippets(&payload, 4), vec!["Kept."]);
    }

    #[tokio::test]
    async fn test_missing_query_fails_without_network() {
        let tool = WebSearchTool::new(&SearchSettings::default());
        let ctx = ToolContext::new("   ");
        let record = tool.execute("", &ctx).await;
        assert!(!record.success);
        assert!(record.error.unwrap().contains("search query is required"));
    }

    /// Serve a canned response on a local port and return a tool pointed at it.
    async fn tool_against(app: axum::Router) -> WebSearchTool {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let settings = SearchSettings {
            endpoint: format!("http://{}/", addr),
            ..Default::default()
        };
        WebSearchTool::new(&settings)
    }

    #[tokio::test]
    async fn test_non_2xx_status_is_reported_in_the_error() {
        use axum::http::StatusCode;
        use axum::routing::get;

        let app = axum::Router::new()
            .route("/", get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }));
        let tool = tool_against(app).await;

        let record = tool.execute("rust agents", &ToolContext::new("task")).await;
        assert!(!record.success);
        assert!(record.error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_empty_2xx_payload_is_success_with_sentinel() {
        use axum::routing::get;
        use axum::Json;

        let app = axum::Router::new().route(
            "/",
            get(|| async {
                Json(serde_json::json!({ "AbstractText": "", "RelatedTopics": [] }))
            }),
        );
        let tool = tool_against(app).await;

        let record = tool.execute("rust agents", &ToolContext::new("task")).await;
        assert!(record.success);
        assert_eq!(record.output, NO_SNIPPETS);
    }
}
