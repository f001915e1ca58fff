//! Tool registry: a fixed lookup table built once at startup.

use super::{CalculatorTool, DynTool, KnowledgeBaseTool, WebSearchTool};
use crate::config::SearchSettings;
use std::fmt;
use std::sync::Arc;

/// Registry of the tools available to the agent.
///
/// Built once at startup and never mutated; lookups are by name,
/// case-insensitively, and `list` preserves registration order.
pub struct ToolRegistry {
    tools: Vec<DynTool>,
}

impl ToolRegistry {
    /// Build the registry with the standard tool belt in its fixed order:
    /// web search, calculator, knowledge base.
    pub fn standard(search: &SearchSettings) -> Self {
        Self {
            tools: vec![
                Arc::new(WebSearchTool::new(search)),
                Arc::new(CalculatorTool::new()),
                Arc::new(KnowledgeBaseTool::new()),
            ],
        }
    }

    /// Look up a tool by name, case-insensitively.
    pub fn lookup(&self, name: &str) -> Option<&DynTool> {
        self.tools
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// All registered tools, in registration order.
    pub fn list(&self) -> &[DynTool] {
        &self.tools
    }

    /// The tool catalog as (name, description) pairs, for the planner prompt
    /// and the tools endpoint.
    pub fn catalog(&self) -> Vec<(String, String)> {
        self.tools
            .iter()
            .map(|t| (t.name().to_string(), t.description().to_string()))
            .collect()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ToolRegistry {
        ToolRegistry::standard(&SearchSettings::default())
    }

    #[test]
    fn test_registration_order() {
        let names: Vec<_> = registry().list().iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["web_search", "calculator", "knowledge_base"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = registry();
        assert!(registry.lookup("CALCULATOR").is_some());
        assert!(registry.lookup("Web_Search").is_some());
        assert!(registry.lookup("nope").is_none());
    }

    #[test]
    fn test_catalog_has_descriptions() {
        for (name, description) in registry().catalog() {
            assert!(!name.is_empty());
            assert!(!description.is_empty());
        }
    }
}
