//! Steg - plan-and-execute agent service
//!
//! A small web service that takes a free-text task, plans it into a few
//! tool-bound steps, executes each step against a fixed tool belt, and
//! returns a synthesized answer alongside the raw plan and per-step records.
//!
//! The name "Steg" comes from the Norwegian word for "step."
//!
//! # Overview
//!
//! Steg allows you to:
//! - Submit a task over HTTP (or from the CLI) and get back a full outcome
//! - Plan with a live LLM when a credential is configured, or with keyword
//!   heuristics when it is not
//! - Execute plan steps against web search, a calculator, and a built-in
//!   knowledge base
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `tools` - The tool trait, registry, and the three built-in tools
//! - `agent` - Planner, executor, summarizer, and the agent runner
//! - `openai` - OpenAI client construction and credential detection
//! - `cli` - Command-line interface and the HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use steg::agent::AgentRunner;
//! use steg::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let runner = AgentRunner::new(&settings);
//!
//!     let outcome = runner.run("Plan a product launch").await;
//!     println!("{}", outcome.final_answer);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod tools;

pub use error::{Result, StegError};
