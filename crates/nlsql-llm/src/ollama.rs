//! Locally hosted generation backend speaking the Ollama HTTP API.

use crate::{strip_code_fences, GenerationError, SqlGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "mistral";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

// Low temperature keeps the SQL near-deterministic across runs.
const TEMPERATURE: f32 = 0.1;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct OllamaGenerator {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaGenerator {
    /// The generation call is the dominant source of unbounded latency,
    /// so every request runs under `timeout`; expiry surfaces as
    /// [`GenerationError::Timeout`].
    pub fn new(base_url: String, model: String, timeout: Duration) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            model,
            client,
        })
    }
}

#[async_trait]
impl SqlGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else {
                    GenerationError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let sql = strip_code_fences(&parsed.response);
        if sql.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        tracing::debug!(model = %self.model, chars = sql.len(), "ollama completion received");
        Ok(sql)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
