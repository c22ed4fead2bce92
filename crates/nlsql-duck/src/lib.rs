//! DuckDB executor: runs generated SQL and reads the schema metadata
//! store.
//!
//! SQL is passed to the engine unmodified and engine diagnostics come
//! back verbatim, so the caller can see exactly why a generated query
//! was rejected. No retries, no rewriting.

use duckdb::{Connection, Result as DuckResult};
use nlsql_schema::{MetadataError, SchemaMetadataEntry};
use std::path::Path;
use thiserror::Error;

pub mod seed;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Database error: {0}")]
    Database(#[from] duckdb::Error),
}

/// Typed tabular result: named columns, ordered rows, heterogeneous
/// JSON scalar cells.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub row_count: usize,
}

/// Canonical read order for the metadata store: table name, table-level
/// row (NULL column) first, then columns ascending by name.
const METADATA_QUERY: &str = "
    SELECT table_name, column_name, description
    FROM schema_metadata
    ORDER BY table_name, column_name IS NOT NULL, column_name
";

pub struct DuckExecutor {
    conn: Connection,
}

impl DuckExecutor {
    /// In-memory database, mainly for tests and demos.
    pub fn new() -> DuckResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Open (or create) a database file on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> DuckResult<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Execute one SQL statement and collect the full result set.
    pub fn execute(&self, sql: &str) -> Result<QueryResult, ExecutionError> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;

        // Column names come from the executed statement, not the rows,
        // so a zero-row result still carries its header.
        let columns: Vec<String> = match rows.as_ref() {
            Some(executed) => (0..executed.column_count())
                .map(|i| executed.column_name(i).map(|name| name.to_string()))
                .collect::<DuckResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        let mut result_rows: Vec<Vec<serde_json::Value>> = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                cells.push(value_to_json(row, i)?);
            }
            result_rows.push(cells);
        }

        let row_count = result_rows.len();
        Ok(QueryResult {
            columns,
            rows: result_rows,
            row_count,
        })
    }

    /// Read all schema metadata rows in canonical order.
    pub fn load_schema_metadata(&self) -> Result<Vec<SchemaMetadataEntry>, MetadataError> {
        let mut stmt = self
            .conn
            .prepare(METADATA_QUERY)
            .map_err(|e| MetadataError::Store(e.to_string()))?;

        let entries = stmt
            .query_map([], |row| {
                Ok(SchemaMetadataEntry {
                    table_name: row.get(0)?,
                    column_name: row.get::<_, Option<String>>(1)?,
                    description: row.get(2)?,
                })
            })
            .map_err(|e| MetadataError::Store(e.to_string()))?
            .collect::<DuckResult<Vec<_>>>()
            .map_err(|e| MetadataError::Store(e.to_string()))?;

        Ok(entries)
    }
}

fn value_to_json(row: &duckdb::Row, idx: usize) -> Result<serde_json::Value, ExecutionError> {
    use duckdb::types::ValueRef;

    let value = match row.get_ref(idx)? {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(i) => serde_json::json!(i),
        ValueRef::SmallInt(i) => serde_json::json!(i),
        ValueRef::Int(i) => serde_json::json!(i),
        ValueRef::BigInt(i) => serde_json::json!(i),
        ValueRef::HugeInt(i) => serde_json::json!(i),
        ValueRef::UTinyInt(i) => serde_json::json!(i),
        ValueRef::USmallInt(i) => serde_json::json!(i),
        ValueRef::UInt(i) => serde_json::json!(i),
        ValueRef::UBigInt(i) => serde_json::json!(i),
        ValueRef::Float(f) => serde_json::json!(f),
        ValueRef::Double(f) => serde_json::json!(f),
        ValueRef::Decimal(d) => serde_json::Value::String(d.to_string()),
        ValueRef::Text(s) => serde_json::Value::String(String::from_utf8_lossy(s).to_string()),
        ValueRef::Blob(b) => serde_json::Value::String(format!("<blob {} bytes>", b.len())),
        ValueRef::Timestamp(_, _) | ValueRef::Date32(_) | ValueRef::Time64(_, _) => {
            // Render temporal values through DuckDB's own text form.
            match row.get::<_, String>(idx) {
                Ok(s) => serde_json::Value::String(s),
                Err(_) => serde_json::Value::String("<timestamp>".to_string()),
            }
        }
        _ => serde_json::Value::String("<unsupported>".to_string()),
    };

    Ok(value)
}
