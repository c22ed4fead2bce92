//! Structured logging setup.
//!
//! One `tracing` event is emitted per pipeline stage, so tests and
//! operators can follow a question through metadata fetch, prompt
//! build, generation and execution without parsing printed text.

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Log format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format for development
    Pretty,
    /// JSON format for production (structured logging)
    Json,
    /// Compact format for testing
    Compact,
}

impl LogFormat {
    fn parse(s: &str) -> Self {
        match s {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    File,
    Both,
}

impl LogOutput {
    fn parse(s: &str) -> Self {
        match s {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            _ => LogOutput::Stdout,
        }
    }
}

/// Initialize the logging system from the loaded configuration.
///
/// Quiets noisy third-party crates unless the filter says otherwise.
pub fn init(config: &LoggingConfig) {
    let format = LogFormat::parse(&config.format);
    let output = LogOutput::parse(&config.output);

    let env_filter = EnvFilter::try_new(&config.level)
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("reqwest=warn".parse().unwrap())
        .add_directive("tokio=warn".parse().unwrap())
        .add_directive("h2=warn".parse().unwrap());

    let file_layer = match output {
        LogOutput::Stdout => None,
        LogOutput::File | LogOutput::Both => {
            std::fs::create_dir_all(&config.directory).ok();
            let appender = RollingFileAppender::new(Rotation::DAILY, &config.directory, "nlsql.log");
            Some(fmt::layer().with_writer(appender).with_ansi(false).boxed())
        }
    };

    let stdout_layer = match output {
        LogOutput::File => None,
        LogOutput::Stdout | LogOutput::Both => Some(match format {
            LogFormat::Pretty => fmt::layer().pretty().with_target(true).boxed(),
            LogFormat::Json => fmt::layer().json().with_current_span(true).boxed(),
            LogFormat::Compact => fmt::layer().compact().boxed(),
        }),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    tracing::debug!(?format, ?output, "logging initialized");
}
