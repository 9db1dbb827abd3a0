//! Migration impact assessment
//!
//! This module maps a change set onto leveled diagnostics so migration
//! tooling can decide which changes are safe to apply to a live table and
//! which would destroy data.

use crate::column_diff::{Change, ChangeSet};
use tablediff_core::{Config, Diagnostic, DiagnosticCode, Severity};

/// Result of assessing a change set against a migration policy
#[derive(Debug, Clone)]
pub struct MigrationImpact {
    /// The table the changes apply to
    pub table: String,

    /// Diagnostics produced by the assessment, in change set order
    pub diagnostics: Vec<Diagnostic>,
}

impl MigrationImpact {
    /// Assess a change set
    ///
    /// Default severities:
    /// - Removed columns are errors (applying the target would drop data)
    /// - Modified columns are warnings (the column is altered in place)
    /// - Added columns are info
    ///
    /// `config.severity` can override the severity per diagnostic code, and
    /// columns matching `config.ignore` produce no diagnostic at all.
    pub fn assess(table: impl Into<String>, changes: &ChangeSet, config: &Config) -> Self {
        let table = table.into();
        let mut diagnostics = Vec::new();

        for change in changes.iter() {
            if config.ignore.is_ignored(change.name()) {
                continue;
            }

            let diagnostic = match change {
                Change::Removed { name, definition } => {
                    let message = format!(
                        "Column '{}' of table '{}' is missing from the target schema",
                        name, table
                    );

                    Diagnostic {
                        code: DiagnosticCode::ColumnRemoved,
                        severity: config
                            .severity
                            .get_severity(DiagnosticCode::ColumnRemoved, Severity::Error),
                        message,
                        column: Some(name.clone()),
                        before: Some(definition.to_string()),
                        after: None,
                    }
                }
                Change::Modified { name, old, new } => {
                    let message = format!(
                        "Column '{}' of table '{}' changed definition: was {}, now {}",
                        name, table, old, new
                    );

                    Diagnostic {
                        code: DiagnosticCode::ColumnModified,
                        severity: config
                            .severity
                            .get_severity(DiagnosticCode::ColumnModified, Severity::Warn),
                        message,
                        column: Some(name.clone()),
                        before: Some(old.to_string()),
                        after: Some(new.to_string()),
                    }
                }
                Change::Added { name, definition } => {
                    let message = format!(
                        "New column '{}' added to table '{}' (definition: {})",
                        name, table, definition
                    );

                    Diagnostic {
                        code: DiagnosticCode::ColumnAdded,
                        severity: config
                            .severity
                            .get_severity(DiagnosticCode::ColumnAdded, Severity::Info),
                        message,
                        column: Some(name.clone()),
                        before: None,
                        after: Some(definition.to_string()),
                    }
                }
            };

            diagnostics.push(diagnostic);
        }

        Self { table, diagnostics }
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Warn)
    }

    /// Check if there are any info messages
    pub fn has_info(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Info)
    }

    /// Count error diagnostics
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    /// Count warning diagnostics
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warn).count()
    }

    /// Count info diagnostics
    pub fn info_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Info).count()
    }

    /// Whether applying the target schema would need destructive DDL
    /// under the current policy
    pub fn requires_destructive_ddl(&self) -> bool {
        self.has_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_diff::SchemaComparator;
    use tablediff_core::{Column, ColumnDefinition, TableSchema};

    fn test_column(name: &str) -> Column {
        Column::new(
            name,
            ColumnDefinition::new()
                .with_property("type", "text")
                .with_property("length", name.len() as i64),
        )
    }

    fn create_test_schema() -> TableSchema {
        TableSchema::from_columns(vec![test_column("cartodb_id"), test_column("the_geom")])
    }

    #[test]
    fn test_no_changes_no_diagnostics() {
        let schema = create_test_schema();
        let changes = SchemaComparator::compare(&schema, &schema.clone());

        let impact = MigrationImpact::assess("districts", &changes, &Config::default());

        assert!(impact.diagnostics.is_empty());
        assert!(!impact.requires_destructive_ddl());
    }

    #[test]
    fn test_removed_column_is_error() {
        let initial = create_test_schema();
        let target = TableSchema::from_columns(vec![test_column("cartodb_id")]);

        let changes = SchemaComparator::compare(&initial, &target);
        let impact = MigrationImpact::assess("districts", &changes, &Config::default());

        assert_eq!(impact.error_count(), 1);
        assert_eq!(impact.diagnostics[0].code, DiagnosticCode::ColumnRemoved);
        assert!(impact.diagnostics[0].message.contains("the_geom"));
        assert!(impact.diagnostics[0].before.is_some());
        assert!(impact.diagnostics[0].after.is_none());
        assert!(impact.requires_destructive_ddl());
    }

    #[test]
    fn test_modified_column_is_warning() {
        let initial = create_test_schema();
        let mut target = initial.clone();
        target.columns[0].definition = ColumnDefinition::new().with_property("type", "bigint");

        let changes = SchemaComparator::compare(&initial, &target);
        let impact = MigrationImpact::assess("districts", &changes, &Config::default());

        assert_eq!(impact.warning_count(), 1);
        assert_eq!(impact.diagnostics[0].code, DiagnosticCode::ColumnModified);
        assert!(impact.diagnostics[0].before.is_some());
        assert!(impact.diagnostics[0].after.is_some());
        assert!(!impact.requires_destructive_ddl());
    }

    #[test]
    fn test_added_column_is_info() {
        let initial = create_test_schema();
        let mut target = initial.clone();
        target.columns.push(test_column("population"));

        let changes = SchemaComparator::compare(&initial, &target);
        let impact = MigrationImpact::assess("districts", &changes, &Config::default());

        assert_eq!(impact.info_count(), 1);
        assert!(!impact.has_errors());
        assert_eq!(impact.diagnostics[0].code, DiagnosticCode::ColumnAdded);
        assert!(impact.diagnostics[0].message.contains("population"));
    }

    #[test]
    fn test_severity_override() {
        let initial = create_test_schema();
        let target = TableSchema::from_columns(vec![test_column("cartodb_id")]);

        let mut config = Config::default();
        config.severity.set_override(DiagnosticCode::ColumnRemoved, Severity::Warn);

        let changes = SchemaComparator::compare(&initial, &target);
        let impact = MigrationImpact::assess("districts", &changes, &config);

        assert_eq!(impact.error_count(), 0);
        assert_eq!(impact.warning_count(), 1);
        assert!(!impact.requires_destructive_ddl());
    }

    #[test]
    fn test_ignored_column_produces_no_diagnostic() {
        let initial = create_test_schema();
        let mut target = TableSchema::from_columns(vec![test_column("cartodb_id")]);
        target.columns.push(test_column("_airbyte_raw_id"));

        let mut config = Config::default();
        config.ignore.columns = vec!["the_geom".to_string(), "_airbyte_*".to_string()];

        let changes = SchemaComparator::compare(&initial, &target);
        let impact = MigrationImpact::assess("districts", &changes, &config);

        assert!(impact.diagnostics.is_empty());
    }

    #[test]
    fn test_diagnostics_follow_change_order() {
        let mut initial = create_test_schema();
        initial.columns.push(test_column("removed_col"));
        initial.columns.push(test_column("value_col"));

        let mut target = create_test_schema();
        target.columns.push(Column::new(
            "value_col",
            ColumnDefinition::new().with_property("type", "integer"),
        ));
        target.columns.push(test_column("added_col"));

        let changes = SchemaComparator::compare(&initial, &target);
        let impact = MigrationImpact::assess("districts", &changes, &Config::default());

        let codes: Vec<_> = impact.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![
                DiagnosticCode::ColumnRemoved,
                DiagnosticCode::ColumnModified,
                DiagnosticCode::ColumnAdded,
            ]
        );
    }
}
