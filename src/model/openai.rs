use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

use super::{CompletionError, CompletionRequest, CompletionService};
use crate::config::Settings;

// A wrapper for an OpenAI-compatible chat completions API
pub struct OpenAiClient {
    url: String,
    api_key: Secret<String>,
    client: Client,
}

impl OpenAiClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let url = settings.completions_url();
        info!("Using completion service at: {}", url);

        // The timeout covers the whole round trip, body included
        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self {
            url,
            api_key: settings.api_key.clone(),
            client,
        })
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        info!(
            "Sending request to completion service (model: {}, max_tokens: {})",
            request.model, request.max_tokens
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status, body });
        }

        let response_json: Value = response.json().await?;
        debug!("Response JSON: {}", response_json);

        extract_content(&response_json)
    }
}

// Pull the first candidate's text out of a completion payload
fn extract_content(response_json: &Value) -> Result<String, CompletionError> {
    let choices = response_json
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| CompletionError::Decode("missing `choices` array".to_string()))?;

    let content = choices
        .first()
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .filter(|content| !content.is_empty())
        .ok_or(CompletionError::EmptyCompletion)?;

    info!("Response length: {} characters", content.len());
    Ok(content.to_string())
}
