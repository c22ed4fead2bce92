//! Natural language to SQL converter CLI.
//!
//! `nlsql init` seeds the demo database; running without arguments
//! starts an interactive loop that sends each question through the
//! pipeline and prints the generated SQL and its results.

use anyhow::Context;
use std::io::{BufRead, Write};
use std::time::Duration;

use nlsql_duck::{seed, DuckExecutor};
use nlsql_llm::{OllamaGenerator, OpenAiGenerator, SqlGenerator};
use nlsql_pipeline::QueryPipeline;

mod config;
mod history;
mod logging;
mod render;

use config::{BackendKind, Config};

fn build_generator(config: &Config) -> anyhow::Result<Box<dyn SqlGenerator>> {
    let generator: Box<dyn SqlGenerator> = match config.generator.backend {
        BackendKind::Ollama => Box::new(OllamaGenerator::new(
            config.generator.ollama_url.clone(),
            config.generator.model.clone(),
            Duration::from_secs(config.generator.timeout_secs),
        )?),
        BackendKind::OpenAi => {
            let api_key = Config::get_openai_api_key()?;
            Box::new(OpenAiGenerator::new(api_key, config.generator.model.clone()))
        }
    };
    Ok(generator)
}

fn init_database(config: &Config) -> anyhow::Result<()> {
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let executor = DuckExecutor::open(&config.database.path)
        .with_context(|| format!("opening database at {}", config.database.path))?;
    seed::init_schema(executor.connection())?;
    seed::insert_sample_data(executor.connection())?;
    println!("Database initialized at {}", config.database.path);
    Ok(())
}

fn record_history(config: &Config, entry: history::HistoryEntry) {
    if !config.history.enabled {
        return;
    }
    if let Err(e) = history::append(&config.history.path, entry) {
        tracing::warn!(error = %e, "failed to write history");
    }
}

async fn run_repl(config: &Config) -> anyhow::Result<()> {
    let executor = DuckExecutor::open(&config.database.path)
        .with_context(|| format!("opening database at {}", config.database.path))?;
    let generator = build_generator(config)?;
    tracing::info!(backend = generator.name(), model = %config.generator.model, "generator ready");

    let pipeline = QueryPipeline::new(executor, generator);

    println!("Natural Language to SQL Converter");
    println!("Type a question about the data, '.schema' to inspect tables, or 'exit' to quit.");

    let stdin = std::io::stdin();
    loop {
        print!("\nquestion> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let question = line.trim();

        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") {
            break;
        }
        if question == ".schema" {
            match pipeline.schema_overview() {
                Ok(tables) => println!("\n{}", render::schema_overview(&tables)),
                Err(e) => eprintln!("Error: {e}"),
            }
            continue;
        }

        match pipeline.process(question).await {
            Ok(output) => {
                println!("\nGenerated SQL:\n{}\n", output.sql);
                println!("{}", render::result_table(&output.result));
                record_history(config, history::HistoryEntry::success(question, output.sql));
            }
            Err(e) => {
                eprintln!("\nError: {e}");
                record_history(config, history::HistoryEntry::failure(question, None, e.to_string()));
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load_or_default("config.yaml")?;
    logging::init(&config.logging);

    match std::env::args().nth(1).as_deref() {
        Some("init") => init_database(&config),
        Some(other) => anyhow::bail!("unknown command '{other}' (expected 'init' or no arguments)"),
        None => run_repl(&config).await,
    }
}
