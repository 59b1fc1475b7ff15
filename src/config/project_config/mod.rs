//! Project-level configuration support
//!
//! Loads per-project configuration from `codeweave.toml` in the scanned root.
//!
//! # Configuration Format
//!
//! ```toml
//! # codeweave.toml
//!
//! [scan]
//! fail_fast = false
//! group_by_directory = true
//! progress_interval_secs = 10
//!
//! [recognizer]
//! threshold = 0.9
//!
//! [exclude]
//! paths = ["generated/**", "**/fixtures/**"]
//! skip_defaults = false
//! ```

use ignore::overrides::{Override, OverrideBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = "codeweave.toml";

/// Default exclusion patterns for vendored and generated code.
///
/// These are applied automatically unless `skip_defaults = true` in config.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "**/vendor/**",
    "**/node_modules/**",
    "**/third_party/**",
    "**/third-party/**",
    "**/bower_components/**",
    "**/dist/**",
    "**/target/**",
    "**/*.min.js",
    "**/*.bundle.js",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] ignore::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Project configuration loaded from `codeweave.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub recognizer: RecognizerConfig,

    #[serde(default)]
    pub exclude: ExcludeConfig,
}

impl ProjectConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.recognizer.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "recognizer.threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        if self.scan.progress_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "scan.progress_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// `[scan]` section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    /// Stop at the first file that fails to parse
    #[serde(default)]
    pub fail_fast: bool,

    /// Create a package entity per directory
    #[serde(default = "default_group_by_directory")]
    pub group_by_directory: bool,

    /// Seconds between progress log lines
    #[serde(default = "default_progress_interval")]
    pub progress_interval_secs: u64,
}

fn default_group_by_directory() -> bool {
    true
}

fn default_progress_interval() -> u64 {
    10
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            group_by_directory: default_group_by_directory(),
            progress_interval_secs: default_progress_interval(),
        }
    }
}

impl ScanConfig {
    pub fn progress_interval(&self) -> Duration {
        Duration::from_secs(self.progress_interval_secs.max(1))
    }
}

/// `[recognizer]` section
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecognizerConfig {
    /// Probability above which a comment line counts as commented-out code
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.9
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

/// Path exclusion configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExcludeConfig {
    /// Gitignore-style globs excluded from scanning
    #[serde(default)]
    pub paths: Vec<String>,

    /// Disable [`DEFAULT_EXCLUDE_PATTERNS`]
    #[serde(default)]
    pub skip_defaults: bool,
}

impl ExcludeConfig {
    /// Returns effective exclusion patterns (defaults + user patterns).
    /// If `skip_defaults` is true, only user patterns are returned.
    pub fn effective_patterns(&self) -> Vec<String> {
        let mut patterns = Vec::new();

        if !self.skip_defaults {
            patterns.extend(DEFAULT_EXCLUDE_PATTERNS.iter().map(|s| s.to_string()));
        }

        for p in &self.paths {
            if !patterns.contains(p) {
                patterns.push(p.clone());
            }
        }

        patterns
    }

    /// Compile the patterns into walker overrides rooted at `root`
    pub fn overrides(&self, root: &Path) -> Result<Override, ConfigError> {
        let mut builder = OverrideBuilder::new(root);
        for pattern in self.effective_patterns() {
            // Override globs whitelist by default; "!" turns them into ignores
            builder.add(&format!("!{}", pattern))?;
        }
        Ok(builder.build()?)
    }
}

/// Load project configuration from the repository root.
///
/// A missing file yields the defaults. An unreadable or invalid one is
/// reported as a warning and also yields the defaults.
pub fn load_project_config(repo_path: &Path) -> ProjectConfig {
    let toml_path = repo_path.join(CONFIG_FILE_NAME);
    if !toml_path.exists() {
        debug!("No project config found, using defaults");
        return ProjectConfig::default();
    }

    match load_config_file(&toml_path) {
        Ok(config) => {
            debug!("Loaded project config from {}", toml_path.display());
            config
        }
        Err(e) => {
            warn!("Failed to load {}: {}", toml_path.display(), e);
            ProjectConfig::default()
        }
    }
}

/// Load and validate one TOML config file
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests;
