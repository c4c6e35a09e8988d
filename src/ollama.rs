//! Ollama generation backend for local LLM answering.
//!
//! This module is only available when the `ollama` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{RagError, Result};
use crate::generator::Generator;

/// The default Ollama server address.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// The default Ollama model.
const DEFAULT_MODEL: &str = "llama3.2";

/// Prompt used when retrieval produced grounding context.
const RAG_TEMPLATE: &str = "You are a helpful assistant. Answer the question using only the \
context below.\n\nRULES:\n1. Use ONLY the given context\n2. Do not invent information that is \
not in the context\n3. If unsure, say you do not know\n4. Be brief and precise\n\nCONTEXT:\n\
{context}\n\nQUESTION: {question}\n\nANSWER:";

/// Prompt used when no context is available.
const CHAT_TEMPLATE: &str = "You are a helpful assistant. Give a brief, friendly reply to the \
user's message.\n\nQUESTION: {question}\n\nANSWER:";

/// A [`Generator`] backed by a local Ollama server.
///
/// Calls the `/api/generate` endpoint without streaming. With an empty
/// context the chat template is used, so the generator answers
/// conversationally instead of erroring.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::ollama::OllamaGenerator;
///
/// let generator = OllamaGenerator::new().with_model("mistral");
/// let answer = generator.generate("What is Rust?", &context).await?;
/// ```
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl Default for OllamaGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaGenerator {
    /// Create a generator against the default local Ollama server.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 500,
        }
    }

    /// Set the server address (e.g. `http://remote-host:11434`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model name (e.g. `mistral`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn build_prompt(question: &str, context: &str) -> String {
        if context.trim().is_empty() {
            CHAT_TEMPLATE.replace("{question}", question)
        } else {
            RAG_TEMPLATE.replace("{context}", context).replace("{question}", question)
        }
    }
}

// ── Ollama API request/response types ──────────────────────────────

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
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

// ── Generator implementation ───────────────────────────────────────

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, question: &str, context: &str) -> Result<String> {
        let prompt = Self::build_prompt(question, context);

        debug!(
            provider = "Ollama",
            model = %self.model,
            context_len = context.len(),
            "generating answer"
        );

        let request_body = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.base_url);
        let response =
            self.client.post(&url).json(&request_body).send().await.map_err(|e| {
                error!(provider = "Ollama", error = %e, "request failed");
                RagError::Generation {
                    provider: "Ollama".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(provider = "Ollama", %status, "API error");
            return Err(RagError::Generation {
                provider: "Ollama".into(),
                message: format!("API returned {status}: {body}"),
            });
        }

        let generate_response: GenerateResponse = response.json().await.map_err(|e| {
            error!(provider = "Ollama", error = %e, "failed to parse response");
            RagError::Generation {
                provider: "Ollama".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(generate_response.response.trim().to_string())
    }
}
