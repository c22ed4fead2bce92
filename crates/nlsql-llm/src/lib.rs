//! Query generation client: turns a built prompt into raw SQL text via
//! a swappable completion backend.
//!
//! Two backends implement the same [`SqlGenerator`] contract: a locally
//! hosted Ollama-style endpoint and the hosted OpenAI chat-completion
//! API. Callers pick one via configuration; the pipeline never knows
//! which is behind the trait object.

use async_trait::async_trait;
use thiserror::Error;

pub mod ollama;
pub mod openai;
pub mod prompt;

pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;
pub use prompt::build_prompt;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation backend returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("OpenAI API error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),

    #[error("Generation backend request timed out")]
    Timeout,

    #[error("Generation backend returned an empty completion")]
    EmptyResponse,
}

/// A text-completion backend that maps a prompt to a raw SQL string.
#[async_trait]
pub trait SqlGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// Strip one wrapping markdown code fence from a completion.
///
/// The prompt forbids fences, but that instruction is advisory and
/// backends routinely ignore it, so ```` ```sql\nSELECT 1\n``` ````
/// must still come back as `SELECT 1`.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix("```sql")
        .or_else(|| trimmed.strip_prefix("```SQL"))
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    inner.strip_suffix("```").unwrap_or(inner).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_sql_fence() {
        assert_eq!(strip_code_fences("```sql\nSELECT 1\n```"), "SELECT 1");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fences("```\nSELECT 2\n```"), "SELECT 2");
    }

    #[test]
    fn strips_uppercase_language_tag() {
        assert_eq!(strip_code_fences("```SQL\nSELECT 3\n```"), "SELECT 3");
    }

    #[test]
    fn passes_through_plain_sql() {
        assert_eq!(
            strip_code_fences("  SELECT * FROM orders  \n"),
            "SELECT * FROM orders"
        );
    }

    #[test]
    fn does_not_touch_fences_inside_the_query() {
        let sql = "SELECT '```' AS fence";
        assert_eq!(strip_code_fences(sql), sql);
    }
}
