//! Diagnostic codes and error reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    /// A column present in the initial schema is missing from the target schema
    ColumnRemoved,

    /// A column exists in both schemas with structurally different definitions
    ColumnModified,

    /// A column is present only in the target schema
    ColumnAdded,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColumnRemoved => "COLUMN_REMOVED",
            Self::ColumnModified => "COLUMN_MODIFIED",
            Self::ColumnAdded => "COLUMN_ADDED",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - should be reviewed but not blocking
    Warn,

    /// Error - blocking issue that should fail CI
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Column the diagnostic refers to
    pub column: Option<String>,

    /// Rendered definition before the change, when one existed
    pub before: Option<String>,

    /// Rendered definition after the change, when one exists
    pub after: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            column: None,
            before: None,
            after: None,
        }
    }

    /// Set the column
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Set before/after values
    pub fn with_transition(mut self, before: impl Into<String>, after: impl Into<String>) -> Self {
        self.before = Some(before.into());
        self.after = Some(after.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_stability() {
        // Ensure codes are stable strings
        assert_eq!(DiagnosticCode::ColumnRemoved.as_str(), "COLUMN_REMOVED");
        assert_eq!(DiagnosticCode::ColumnModified.as_str(), "COLUMN_MODIFIED");
        assert_eq!(DiagnosticCode::ColumnAdded.as_str(), "COLUMN_ADDED");
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::new(
            DiagnosticCode::ColumnRemoved,
            Severity::Error,
            "Column 'the_geom' is missing from the target schema"
        )
        .with_column("the_geom");

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("COLUMN_REMOVED"));
        assert!(json.contains("error"));
        assert!(json.contains("the_geom"));
    }
}
