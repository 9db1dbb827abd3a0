//! Column-level schema comparison
//!
//! This module implements the core comparison logic that classifies every
//! column of two table schema snapshots as added, removed, or modified.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tablediff_core::{ColumnDefinition, ColumnName, TableSchema};

/// Classification of a single change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Column present only in the target schema
    Added,

    /// Column present only in the initial schema
    Removed,

    /// Column present in both schemas with different definitions
    Modified,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Removed => write!(f, "removed"),
            Self::Modified => write!(f, "modified"),
        }
    }
}

/// The before/after state of one column name
///
/// A change always carries at least one definition: a column only enters the
/// change set if it exists in at least one of the two schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Change {
    /// Column present only in the target schema
    Added {
        name: ColumnName,
        definition: ColumnDefinition,
    },

    /// Column present only in the initial schema
    Removed {
        name: ColumnName,
        definition: ColumnDefinition,
    },

    /// Column present in both schemas with structurally different definitions
    Modified {
        name: ColumnName,
        old: ColumnDefinition,
        new: ColumnDefinition,
    },
}

impl Change {
    /// The column name this change refers to
    pub fn name(&self) -> &str {
        match self {
            Self::Added { name, .. } | Self::Removed { name, .. } | Self::Modified { name, .. } => {
                name
            }
        }
    }

    /// Definition on the initial side, absent for an added column
    pub fn old_definition(&self) -> Option<&ColumnDefinition> {
        match self {
            Self::Added { .. } => None,
            Self::Removed { definition, .. } => Some(definition),
            Self::Modified { old, .. } => Some(old),
        }
    }

    /// Definition on the target side, absent for a removed column
    pub fn new_definition(&self) -> Option<&ColumnDefinition> {
        match self {
            Self::Added { definition, .. } => Some(definition),
            Self::Removed { .. } => None,
            Self::Modified { new, .. } => Some(new),
        }
    }

    /// Classification of this change
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Added { .. } => ChangeKind::Added,
            Self::Removed { .. } => ChangeKind::Removed,
            Self::Modified { .. } => ChangeKind::Modified,
        }
    }

    /// Whether this is an added column
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added { .. })
    }

    /// Whether this is a removed column
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed { .. })
    }

    /// Whether this is a modified column
    pub fn is_modified(&self) -> bool {
        matches!(self, Self::Modified { .. })
    }
}

/// All changes produced by one comparison, in candidate order
///
/// Candidate order is the initial schema's column order followed by columns
/// unique to the target schema in theirs, so removals and modifications
/// surface before additions of later columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Ordered list of changes
    pub changes: Vec<Change>,
}

impl ChangeSet {
    /// Whether the schemas were equivalent
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Total number of changes
    pub fn change_count(&self) -> usize {
        self.changes.len()
    }

    /// Iterate over changes in candidate order
    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    /// Columns present in the initial schema but missing from the target
    pub fn removed(&self) -> Vec<&Change> {
        self.changes.iter().filter(|c| c.is_removed()).collect()
    }

    /// Check if any column was removed
    pub fn has_removed(&self) -> bool {
        self.changes.iter().any(|c| c.is_removed())
    }

    /// Columns present in both schemas whose definitions differ
    pub fn modified(&self) -> Vec<&Change> {
        self.changes.iter().filter(|c| c.is_modified()).collect()
    }

    /// Check if any column was modified
    pub fn has_modified(&self) -> bool {
        self.changes.iter().any(|c| c.is_modified())
    }

    /// Columns present only in the target schema
    pub fn added(&self) -> Vec<&Change> {
        self.changes.iter().filter(|c| c.is_added()).collect()
    }

    /// Check if any column was added
    pub fn has_added(&self) -> bool {
        self.changes.iter().any(|c| c.is_added())
    }
}

/// Compares two table schema snapshots column by column
///
/// The comparison is pure: no I/O, no shared state across invocations, and
/// the same pair of schemas always yields the same change set.
pub struct SchemaComparator;

impl SchemaComparator {
    /// Compare an initial schema against a target schema
    ///
    /// Emits exactly one change per column name whose presence or definition
    /// differs between the two schemas. Columns with equal definitions on
    /// both sides produce nothing.
    pub fn compare(initial: &TableSchema, target: &TableSchema) -> ChangeSet {
        let initial_index = column_index(initial);
        let target_index = column_index(target);

        let mut changes = Vec::new();

        for name in candidate_names(initial, target) {
            let old = initial_index.get(name).copied();
            let new = target_index.get(name).copied();

            match (old, new) {
                (Some(old), Some(new)) => {
                    if old != new {
                        changes.push(Change::Modified {
                            name: name.to_string(),
                            old: old.clone(),
                            new: new.clone(),
                        });
                    }
                }
                (Some(old), None) => {
                    changes.push(Change::Removed {
                        name: name.to_string(),
                        definition: old.clone(),
                    });
                }
                (None, Some(new)) => {
                    changes.push(Change::Added {
                        name: name.to_string(),
                        definition: new.clone(),
                    });
                }
                // Candidates come from the union of both schemas, so at
                // least one side is always present
                (None, None) => {}
            }
        }

        ChangeSet { changes }
    }
}

/// Candidate column names in comparison order
///
/// Initial schema names first, then names unique to the target schema.
/// Duplicate names keep their first occurrence position.
fn candidate_names<'a>(initial: &'a TableSchema, target: &'a TableSchema) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for column in initial.columns.iter().chain(target.columns.iter()) {
        if seen.insert(column.name.as_str()) {
            names.push(column.name.as_str());
        }
    }

    names
}

/// Build a name -> definition lookup index for one schema
///
/// Duplicate names are tolerated; the first occurrence in schema order
/// shadows the rest, matching `TableSchema::find_column`.
fn column_index(schema: &TableSchema) -> HashMap<&str, &ColumnDefinition> {
    let mut index = HashMap::new();

    for column in &schema.columns {
        index.entry(column.name.as_str()).or_insert(&column.definition);
    }

    index
}
