//! TableDiff engine - Core comparison logic
//!
//! This crate implements the main business logic for TableDiff:
//! - Column-level schema comparison
//! - Change set queries
//! - Migration impact assessment

pub mod column_diff;
pub mod impact;

pub use column_diff::{Change, ChangeKind, ChangeSet, SchemaComparator};
pub use impact::MigrationImpact;
