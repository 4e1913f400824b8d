use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::gemini::models::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};
use crate::generator::TextModel;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClient {
    http_client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        if !config.validate_gemini_config() {
            return Err(AppError::Config("GEMINI_API_KEY not set".into()));
        }

        Ok(Self {
            http_client: Client::new(),
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_content(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, self.model);

        debug!("Sending {} char prompt to {}", prompt.len(), self.model);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::from_text(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&error_text) {
                Ok(api_error) => format!(
                    "{} {}",
                    api_error.error.status.unwrap_or_default(),
                    api_error.error.message
                ),
                Err(_) => error_text,
            };
            return Err(AppError::ModelApi(format!("{}: {}", status, message.trim())));
        }

        let body: GenerateContentResponse = response.json().await?;

        match body.text() {
            Some(text) => Ok(text),
            None => {
                let reason = body
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.clone())
                    .unwrap_or_else(|| "no candidates".to_string());
                warn!("Gemini returned no text ({})", reason);
                Err(AppError::ModelApi(format!("empty response ({})", reason)))
            }
        }
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.generate_content(prompt).await
    }
}
