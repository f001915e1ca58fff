//! Configuration module for Steg.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{GeneralSettings, LlmSettings, SearchSettings, ServerSettings, Settings};
