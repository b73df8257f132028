//! Client for the text-generation API that suggests songs.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Ways a generation call can fail.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("generation API timed out")]
    Timeout,

    #[error("generation API returned status {0}")]
    Status(u16),

    #[error("invalid response from generation API: {0}")]
    InvalidResponse(String),

    #[error("request to generation API failed: {0}")]
    Network(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else if e.is_decode() {
            UpstreamError::InvalidResponse(e.to_string())
        } else {
            UpstreamError::Network(e.to_string())
        }
    }
}

/// Anything that can turn a prompt into raw suggestion text.
#[async_trait]
pub trait SongGenerator: Send + Sync {
    /// Model name, part of the cache key.
    fn model(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError>;
}

pub fn build_prompt(genre: &str, count: usize) -> String {
    format!(
        "Suggest {} {} songs with their artists. Format: Song - Artist.",
        count, genre
    )
}

#[derive(Debug, Clone)]
pub struct CohereConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

// Cohere generate request format
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

// Only the field we read back
#[derive(Deserialize)]
struct GenerateResponse {
    text: Option<String>,
}

pub struct CohereClient {
    config: CohereConfig,
    client: Client,
}

impl CohereClient {
    pub fn new(config: CohereConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/generate", self.config.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SongGenerator for CohereClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            max_tokens: self.config.max_tokens,
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to generation API"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Generation API returned an error");
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: GenerateResponse = response.json().await?;
        let text = body
            .text
            .ok_or_else(|| UpstreamError::InvalidResponse("missing `text` field".to_string()))?;

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_count_and_genre() {
        assert_eq!(
            build_prompt("Afrobeats", 5),
            "Suggest 5 Afrobeats songs with their artists. Format: Song - Artist."
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = CohereClient::new(CohereConfig {
            api_url: "https://api.cohere.ai/".to_string(),
            api_key: "k".to_string(),
            model: "command".to_string(),
            max_tokens: 100,
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        assert_eq!(client.endpoint(), "https://api.cohere.ai/generate");
        assert_eq!(client.model(), "command");
    }
}
