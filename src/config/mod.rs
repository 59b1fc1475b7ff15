//! Configuration module
//!
//! This module handles project-level configuration (`codeweave.toml`):
//! scan behaviour, recognizer threshold and path exclusions.

mod project_config;

pub use project_config::{
    load_config_file, load_project_config, ConfigError, ExcludeConfig, ProjectConfig,
    RecognizerConfig, ScanConfig, CONFIG_FILE_NAME, DEFAULT_EXCLUDE_PATTERNS,
};
