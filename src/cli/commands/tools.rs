//! Tools listing command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::tools::ToolRegistry;
use anyhow::Result;

/// List the registered tools in registration order.
pub fn run_tools(settings: Settings) -> Result<()> {
    let registry = ToolRegistry::standard(&settings.search);

    Output::header("Registered tools");
    for (name, description) in registry.catalog() {
        Output::list_item(&name);
        println!("      {}", description);
    }

    Ok(())
}
