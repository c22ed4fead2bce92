//! Schema metadata types and the canonical text rendering used to
//! ground SQL generation.
//!
//! The metadata store is a single table of `(table_name, column_name,
//! description)` rows where a NULL column name carries the table-level
//! description. This crate groups those rows into [`TableMetadata`] and
//! renders them into the exact text block every prompt is built from,
//! so ordering here must be stable and deterministic.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to read schema metadata: {0}")]
    Store(String),

    #[error("Duplicate metadata entry for {table}.{column}")]
    DuplicateColumn { table: String, column: String },

    #[error("Table '{0}' has more than one table-level description")]
    DuplicateTableDescription(String),
}

/// One row of the `schema_metadata` store. `column_name = None` is the
/// table-level description; at most one such row may exist per table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMetadataEntry {
    pub table_name: String,
    pub column_name: Option<String>,
    pub description: String,
}

impl SchemaMetadataEntry {
    pub fn table(table: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            table_name: table.into(),
            column_name: None,
            description: description.into(),
        }
    }

    pub fn column(
        table: impl Into<String>,
        column: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table.into(),
            column_name: Some(column.into()),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub description: String,
}

/// Grouped, ordered view of one table's metadata. This is the
/// structured form presentation layers render per-column widgets from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub table_name: String,
    pub description: Option<String>,
    pub columns: Vec<ColumnMetadata>,
}

/// Canonical entry order: table name, table-level row first, then
/// columns ascending by name.
fn canonical_cmp(a: &SchemaMetadataEntry, b: &SchemaMetadataEntry) -> Ordering {
    a.table_name
        .cmp(&b.table_name)
        .then_with(|| a.column_name.is_some().cmp(&b.column_name.is_some()))
        .then_with(|| a.column_name.cmp(&b.column_name))
}

/// Group raw metadata rows into per-table structures.
///
/// Entries are re-sorted into canonical order first, so the result is
/// identical no matter how the store handed them over. Violations of
/// the uniqueness invariants are rejected here, at load time.
pub fn group_entries(entries: &[SchemaMetadataEntry]) -> Result<Vec<TableMetadata>, MetadataError> {
    let mut sorted: Vec<&SchemaMetadataEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| canonical_cmp(a, b));

    let mut tables: Vec<TableMetadata> = Vec::new();
    for entry in sorted {
        let needs_new = tables
            .last()
            .map(|t| t.table_name != entry.table_name)
            .unwrap_or(true);
        if needs_new {
            tables.push(TableMetadata {
                table_name: entry.table_name.clone(),
                description: None,
                columns: Vec::new(),
            });
        }
        let current = tables.last_mut().unwrap();

        match &entry.column_name {
            None => {
                if current.description.is_some() {
                    return Err(MetadataError::DuplicateTableDescription(
                        entry.table_name.clone(),
                    ));
                }
                current.description = Some(entry.description.clone());
            }
            Some(column) => {
                if current.columns.iter().any(|c| &c.name == column) {
                    return Err(MetadataError::DuplicateColumn {
                        table: entry.table_name.clone(),
                        column: column.clone(),
                    });
                }
                current.columns.push(ColumnMetadata {
                    name: column.clone(),
                    description: entry.description.clone(),
                });
            }
        }
    }

    Ok(tables)
}

/// Render grouped metadata into the prompt text block.
///
/// Per-table shape:
/// ```text
/// Table: orders
/// Description: Stores customer orders
/// Columns:
/// - order_id: Unique identifier for each order
/// ```
/// The `Description:`/`Columns:` pair only appears when a table-level
/// description exists; tables with columns but no description list the
/// columns directly under `Table:`. Blocks are joined by a blank line.
pub fn render_schema(tables: &[TableMetadata]) -> String {
    let mut blocks = Vec::with_capacity(tables.len());

    for table in tables {
        let mut lines = vec![format!("Table: {}", table.table_name)];
        if let Some(description) = &table.description {
            lines.push(format!("Description: {}", description));
            lines.push("Columns:".to_string());
        }
        for column in &table.columns {
            lines.push(format!("- {}: {}", column.name, column.description));
        }
        blocks.push(lines.join("\n"));
    }

    blocks.join("\n\n")
}

/// Group and render in one step.
pub fn format_entries(entries: &[SchemaMetadataEntry]) -> Result<String, MetadataError> {
    Ok(render_schema(&group_entries(entries)?))
}
