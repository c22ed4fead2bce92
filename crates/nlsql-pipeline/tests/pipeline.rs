//! End-to-end pipeline tests with a stub generation backend and an
//! in-memory seeded DuckDB.

use async_trait::async_trait;
use nlsql_duck::{seed, DuckExecutor};
use nlsql_llm::{GenerationError, SqlGenerator};
use nlsql_pipeline::{PipelineError, QueryPipeline};

/// Stub backend returning a canned completion, recording whether it
/// was called.
struct StubGenerator {
    completion: Result<String, ()>,
}

#[async_trait]
impl SqlGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        // The pipeline must hand backends the fully built prompt.
        assert!(prompt.contains("Database Schema:"));
        assert!(prompt.contains("User Question:"));

        match &self.completion {
            Ok(sql) => Ok(sql.clone()),
            Err(()) => Err(GenerationError::Api {
                status: 500,
                body: "internal server error".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}

fn seeded_pipeline(completion: Result<String, ()>) -> QueryPipeline {
    let executor = DuckExecutor::new().unwrap();
    seed::init_schema(executor.connection()).unwrap();
    seed::insert_sample_data(executor.connection()).unwrap();
    QueryPipeline::new(executor, Box::new(StubGenerator { completion }))
}

#[tokio::test]
async fn process_returns_generated_sql_and_result() {
    let sql = "SELECT products.product_id, COUNT(*) AS order_count \
               FROM orders JOIN products ON orders.product_id = products.product_id \
               GROUP BY products.product_id";
    let pipeline = seeded_pipeline(Ok(sql.to_string()));

    let output = pipeline.process("How many orders per product?").await.unwrap();

    assert_eq!(output.sql, sql);
    assert_eq!(output.result.columns.len(), 2);
    // Sample data has one order for each of the three products.
    assert_eq!(output.result.row_count, 3);
}

#[tokio::test]
async fn backend_failure_short_circuits_as_generation_error() {
    let pipeline = seeded_pipeline(Err(()));

    let err = pipeline.process("anything").await.unwrap_err();

    match err {
        PipelineError::Generation(GenerationError::Api { status, body }) => {
            assert_eq!(status, 500);
            assert!(body.contains("internal server error"));
        }
        other => panic!("expected GenerationError, got {other:?}"),
    }
}

#[tokio::test]
async fn bad_generated_sql_surfaces_engine_message() {
    let pipeline = seeded_pipeline(Ok("SELECT * FROM no_such_table".to_string()));

    let err = pipeline.process("list the things").await.unwrap_err();

    match err {
        PipelineError::Execution(e) => {
            assert!(e.to_string().contains("no_such_table"), "lost diagnostic: {e}");
        }
        other => panic!("expected ExecutionError, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_metadata_store_fails_before_generation() {
    // No seed: schema_metadata does not exist, so the pipeline must
    // fail at the metadata stage without touching the backend.
    struct Unreachable;

    #[async_trait]
    impl SqlGenerator for Unreachable {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            panic!("generator must not be called when metadata fetch fails");
        }
        fn name(&self) -> &str {
            "unreachable"
        }
    }

    let executor = DuckExecutor::new().unwrap();
    let pipeline = QueryPipeline::new(executor, Box::new(Unreachable));

    let err = pipeline.process("q").await.unwrap_err();
    assert!(matches!(err, PipelineError::Metadata(_)));
}

#[tokio::test]
async fn schema_overview_matches_seeded_tables() {
    let pipeline = seeded_pipeline(Ok("SELECT 1".to_string()));

    let tables = pipeline.schema_overview().unwrap();
    let names: Vec<&str> = tables.iter().map(|t| t.table_name.as_str()).collect();

    assert_eq!(names, vec!["customers", "orders", "products"]);
    let orders = &tables[1];
    assert!(orders.columns.iter().any(|c| c.name == "product_id"));
}
