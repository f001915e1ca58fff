//! Knowledge-base tool: keyword lookup over a fixed document set.

use super::{effective_input, Tool, ToolContext, ToolExecution};
use async_trait::async_trait;
use regex::Regex;

pub const NAME: &str = "knowledge_base";

const DESCRIPTION: &str =
    "Look up built-in playbooks and reference notes by keyword overlap with the query.";

/// How many documents to return at most.
const MAX_RESULTS: usize = 2;

const NO_RESULTS: &str = "No relevant knowledge snippets found.";

struct KnowledgeDoc {
    title: &'static str,
    content: &'static str,
}

/// The built-in document set. Small and fixed; loaded once per tool.
const DOCUMENTS: &[KnowledgeDoc] = &[
    KnowledgeDoc {
        title: "Agentic AI definition",
        content: "Agentic AI systems pair a language model with planning and tool use so the \
                  model can decompose a task, call external capabilities, and fold the results \
                  back into its answer instead of replying in a single shot.",
    },
    KnowledgeDoc {
        title: "Plan-and-execute pattern",
        content: "A planner proposes a short ordered list of steps up front, an executor runs \
                  each step against a named tool, and a final pass synthesizes the tool output \
                  into one answer.",
    },
    KnowledgeDoc {
        title: "Tool design guidelines",
        content: "Keep tools small and stateless, validate input before doing work, and report \
                  failures inside the result record so one bad step never sinks the whole run.",
    },
    KnowledgeDoc {
        title: "Product launch playbook",
        content: "A launch plan covers positioning, pricing, an announcement channel list, and a \
                  post-launch metrics review; start from the target audience and work backwards.",
    },
    KnowledgeDoc {
        title: "Evaluation checklist",
        content: "Before shipping an agent, check that every plan step names a registered tool, \
                  that failures surface per step, and that the final answer says which steps \
                  informed it.",
    },
];

/// Knowledge-base lookup tool. Never fails: with no keyword overlap it
/// reports an empty-result sentinel with success.
pub struct KnowledgeBaseTool {
    tokenizer: Regex,
}

impl KnowledgeBaseTool {
    pub fn new() -> Self {
        Self {
            tokenizer: Regex::new(r"[a-z0-9]+").expect("valid tokenizer regex"),
        }
    }

    fn search(&self, query: &str) -> String {
        let query = query.to_lowercase();
        let keywords: Vec<&str> = {
            let mut seen = Vec::new();
            for m in self.tokenizer.find_iter(&query) {
                if !seen.contains(&m.as_str()) {
                    seen.push(m.as_str());
                }
            }
            seen
        };

        let mut scored: Vec<(usize, &KnowledgeDoc)> = DOCUMENTS
            .iter()
            .map(|doc| {
                let haystack = format!("{} {}", doc.title, doc.content).to_lowercase();
                let score = keywords.iter().filter(|k| haystack.contains(**k)).count();
                (score, doc)
            })
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        if scored.is_empty() {
            return NO_RESULTS.to_string();
        }

        scored
            .iter()
            .take(MAX_RESULTS)
            .map(|(_, doc)| format!("\u{2022} {}: {}", doc.title, doc.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for KnowledgeBaseTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for KnowledgeBaseTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    async fn execute(&self, input: &str, ctx: &ToolContext) -> ToolExecution {
        let query = effective_input(input, ctx);
        ToolExecution::ok(NAME, query, self.search(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str, task: &str) -> ToolExecution {
        let tool = KnowledgeBaseTool::new();
        let ctx = ToolContext::new(task);
        tokio_test::block_on(tool.execute(input, &ctx))
    }

    #[test]
    fn test_surfaces_agentic_ai_document() {
        let record = run("agentic ai", "task");
        assert!(record.success);
        assert!(record.output.contains("Agentic AI definition"));
    }

    #[test]
    fn test_no_overlap_yields_sentinel() {
        let record = run("zzyyxx", "qqwwrr");
        assert!(record.success);
        assert_eq!(record.output, NO_RESULTS);
    }

    #[test]
    fn test_caps_results_at_two() {
        // "plan" appears across several documents.
        let record = run("plan the launch steps", "task");
        assert!(record.success);
        assert_eq!(record.output.lines().count(), MAX_RESULTS);
        assert!(record.output.lines().all(|l| l.starts_with('\u{2022}')));
    }

    #[test]
    fn test_empty_input_falls_back_to_task() {
        let record = run("", "agentic ai");
        assert!(record.success);
        assert_eq!(record.input, "agentic ai");
        assert!(record.output.contains("Agentic AI definition"));
    }
}
