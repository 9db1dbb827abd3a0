//! Configuration schema (tablediff.toml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::diagnostic::{DiagnosticCode, Severity};

/// Severity threshold overrides for specific diagnostic codes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Map of diagnostic code to severity override
    pub overrides: HashMap<String, Severity>,
}

impl Default for SeverityThreshold {
    fn default() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }
}

impl SeverityThreshold {
    /// Get severity for a diagnostic code, or default
    pub fn get_severity(&self, code: DiagnosticCode, default: Severity) -> Severity {
        self.overrides
            .get(code.as_str())
            .copied()
            .unwrap_or(default)
    }

    /// Set severity override for a code
    pub fn set_override(&mut self, code: DiagnosticCode, severity: Severity) {
        self.overrides.insert(code.as_str().to_string(), severity);
    }
}

/// Ignore rules for specific columns or patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnoreRules {
    /// Suppress diagnostics for these columns (glob patterns)
    #[serde(default)]
    pub columns: Vec<String>,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
        }
    }
}

impl IgnoreRules {
    /// Check if a column matches any pattern in the list
    fn matches_pattern(column: &str, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| {
            // Simple glob matching (* and **)
            if pattern.contains('*') {
                glob_match(pattern, column)
            } else {
                pattern == column
            }
        })
    }

    /// Check if a column should be ignored
    pub fn is_ignored(&self, column: &str) -> bool {
        Self::matches_pattern(column, &self.columns)
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Severity thresholds
    #[serde(default)]
    pub severity: SeverityThreshold,

    /// Ignore rules
    #[serde(default)]
    pub ignore: IgnoreRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            severity: SeverityThreshold::default(),
            ignore: IgnoreRules::default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Simple glob matching (supports * and **)
fn glob_match(pattern: &str, text: &str) -> bool {
    // Very simple implementation - just handle basic * wildcard
    if pattern == "*" || pattern == "**" {
        return true;
    }

    if let Some(star_pos) = pattern.find('*') {
        let prefix = &pattern[..star_pos];
        let suffix = &pattern[star_pos + 1..];

        text.starts_with(prefix) && text.ends_with(suffix)
    } else {
        pattern == text
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
