use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Provider;
use crate::app_config::TranslationConfig;
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils;
use crate::translation::Translator;

/// Ollama client for interacting with the Ollama API
#[derive(Debug, Clone)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Generate request for the Ollama API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }

    /// Cap the number of generated tokens
    pub fn max_tokens(mut self, num_predict: u32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).num_predict = Some(num_predict);
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

impl Ollama {
    /// Create a client for a complete endpoint URL such as `http://localhost:11434`
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64, max_retries: u32, backoff_base_ms: u64) -> Self {
        let base_url = endpoint.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs.max(1)))
                // Ollama speaks HTTP/1.1
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate text from the Ollama API with retry logic.
    ///
    /// Network and server errors are retried with exponential backoff;
    /// client errors are returned immediately.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            match self.client.post(&url).json(request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response
                            .text()
                            .await
                            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read Ollama response: {}", e)))?;
                        return parse_generation_response(&body);
                    }

                    let message = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());
                    let api_error = ProviderError::ApiError {
                        status_code: status.as_u16(),
                        message,
                    };

                    if !status.is_server_error() {
                        error!("Ollama API error: {}", api_error);
                        return Err(api_error);
                    }
                    error!(
                        "Ollama API error: {} - attempt {}/{}",
                        api_error,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(api_error);
                }
                Err(e) => {
                    error!(
                        "Ollama API network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(ProviderError::ConnectionError(e.to_string()));
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(16));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!("Ollama request failed after {} attempts", self.max_retries + 1))
        }))
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to connect to Ollama: {}", e)))?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama version response: {}", e)))?;

        response["version"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }
}

/// Parse a generate response, accepting a streamed JSONL body as well
fn parse_generation_response(body: &str) -> Result<GenerationResponse, ProviderError> {
    if let Ok(response) = serde_json::from_str::<GenerationResponse>(body) {
        return Ok(response);
    }

    let chunks: Vec<GenerationResponse> = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<GenerationResponse>(line).ok())
        .collect();

    if chunks.is_empty() {
        let preview: String = body.chars().take(500).collect();
        error!("Failed to parse Ollama API response (first 500 chars): {}", preview);
        return Err(ProviderError::ParseError(
            "Ollama response contains invalid JSON".to_string(),
        ));
    }

    Ok(GenerationResponse {
        model: chunks[0].model.clone(),
        response: chunks.iter().map(|c| c.response.as_str()).collect(),
        done: chunks.iter().any(|c| c.done),
    })
}

#[async_trait]
impl Provider for Ollama {
    type Request = GenerationRequest;
    type Response = GenerationResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.generate(&request).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let version = self.version().await?;
        debug!("Connected to Ollama {} at {}", version, self.base_url);
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.response.clone()
    }
}

const SYSTEM_PROMPT: &str = "You are a bilingual dictionary. Answer with exactly one word: \
the most common translation of the given word. No punctuation, no explanation.";

/// Single-word translator backed by an Ollama model
#[derive(Debug, Clone)]
pub struct OllamaTranslator {
    client: Ollama,
    model: String,
    temperature: f32,
}

impl OllamaTranslator {
    pub fn new(client: Ollama, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
        }
    }

    pub fn from_config(config: &TranslationConfig) -> Self {
        let client = Ollama::new(
            config.endpoint.clone(),
            config.timeout_secs,
            config.retry_count,
            config.retry_backoff_ms,
        );
        Self::new(client, config.model.clone(), config.temperature)
    }

    pub fn client(&self) -> &Ollama {
        &self.client
    }

    /// Build the request asking for the translation of one word
    pub fn build_request(&self, text: &str, source_language: &str, target_language: &str) -> GenerationRequest {
        let source_name = language_utils::get_language_name(source_language).unwrap_or_else(|_| source_language.to_string());
        let target_name = language_utils::get_language_name(target_language).unwrap_or_else(|_| target_language.to_string());

        GenerationRequest::new(
            self.model.clone(),
            format!("Translate the {} word \"{}\" into {}.", source_name, text, target_name),
        )
        .system(SYSTEM_PROMPT)
        .temperature(self.temperature)
        .max_tokens(16)
    }
}

/// First non-blank line of a model answer, without quotes or trailing punctuation
pub fn first_answer_line(output: &str) -> Option<String> {
    let line = output.lines().map(str::trim).find(|line| !line.is_empty())?;
    let cleaned = line
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '*' | '.' | '!' | '?' | ',' | ';' | ':'))
        .trim();

    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

#[async_trait]
impl Translator for OllamaTranslator {
    async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String, TranslationError> {
        let request = self.build_request(text, source_language, target_language);
        let response = self.client.complete(request).await?;
        let output = Ollama::extract_text(&response);

        match first_answer_line(&output) {
            Some(answer) => {
                debug!("Ollama translated '{}' -> '{}'", text, answer);
                Ok(answer)
            }
            None => {
                warn!("Ollama returned no translation for '{}'", text);
                Err(TranslationError::EmptyTranslation(text.to_string()))
            }
        }
    }
}
