//! Pipeline orchestrator: the single `question -> (sql, result)` entry
//! point consumed by any presentation layer.
//!
//! One invocation is one sequential chain: fetch metadata, render it,
//! build the prompt, generate SQL, execute. Any stage failure aborts
//! the chain and propagates as a [`PipelineError`]; no partial results,
//! no retries, no caching between calls.

use nlsql_duck::{DuckExecutor, ExecutionError, QueryResult};
use nlsql_llm::{build_prompt, GenerationError, SqlGenerator};
use nlsql_schema::MetadataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Generated SQL together with its execution result.
#[derive(Debug)]
pub struct PipelineOutput {
    pub sql: String,
    pub result: QueryResult,
}

pub struct QueryPipeline {
    executor: DuckExecutor,
    generator: Box<dyn SqlGenerator>,
}

impl QueryPipeline {
    pub fn new(executor: DuckExecutor, generator: Box<dyn SqlGenerator>) -> Self {
        Self { executor, generator }
    }

    pub fn executor(&self) -> &DuckExecutor {
        &self.executor
    }

    /// Render the current schema metadata as the structured per-table
    /// view, for presentation layers that show a schema panel.
    pub fn schema_overview(&self) -> Result<Vec<nlsql_schema::TableMetadata>, MetadataError> {
        let entries = self.executor.load_schema_metadata()?;
        nlsql_schema::group_entries(&entries)
    }

    /// Run one question through the full pipeline.
    pub async fn process(&self, question: &str) -> Result<PipelineOutput, PipelineError> {
        let entries = self.executor.load_schema_metadata()?;
        let tables = nlsql_schema::group_entries(&entries)?;
        tracing::debug!(entries = entries.len(), tables = tables.len(), "metadata fetched");

        let metadata_text = nlsql_schema::render_schema(&tables);
        let prompt = build_prompt(question, &metadata_text);
        tracing::debug!(chars = prompt.len(), "prompt built");

        let sql = self.generator.generate(&prompt).await?;
        tracing::info!(backend = self.generator.name(), %sql, "sql generated");

        let result = self.executor.execute(&sql)?;
        tracing::info!(rows = result.row_count, cols = result.columns.len(), "sql executed");

        Ok(PipelineOutput { sql, result })
    }
}
