//! TableDiff Core
//!
//! Core domain model with stable, versioned types.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod schema;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use schema::{Column, ColumnDefinition, ColumnName, PropertyValue, SchemaError, TableSchema};
pub use report::{Report, ReportSummary, ReportVersion};
pub use config::{Config, ConfigError, IgnoreRules, SeverityThreshold};
