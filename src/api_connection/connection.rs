use dotenv::dotenv;
use reqwest::Client;
use serde_json::json;
use std::env;
use thiserror::Error;
use tracing::{debug, warn};

use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, Provider, OPENROUTER_BASE_URL,
};

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
}

impl Provider {
    pub fn openrouter(api_key_env_var_name: &str) -> Self {
        Self::OpenRouter {
            api_key: api_key_env_var_name.to_string(),
            base_url: OPENROUTER_BASE_URL.to_string(),
            routing: Vec::new(),
        }
    }

    /// Points the provider at another OpenAI-compatible endpoint.
    pub fn with_base_url(self, url: &str) -> Self {
        match self {
            Provider::OpenRouter { api_key, routing, .. } => Provider::OpenRouter {
                api_key,
                base_url: url.trim_end_matches('/').to_string(),
                routing,
            },
        }
    }

    pub fn with_routing(self, providers: Vec<String>) -> Self {
        match self {
            Provider::OpenRouter { api_key, base_url, .. } => Provider::OpenRouter {
                api_key,
                base_url,
                routing: providers,
            },
        }
    }

    pub async fn call_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError> {
        match self {
            Provider::OpenRouter {
                api_key: api_key_env_var_name,
                base_url,
                routing,
            } => {
                dotenv().ok();
                let actual_api_key = env::var(api_key_env_var_name)
                    .map_err(|_| ApiConnectionError::MissingApiKey(api_key_env_var_name.clone()))?;

                let url = format!("{}/chat/completions", base_url);
                let mut request_payload = serde_json::to_value(&request)?;
                if !routing.is_empty() {
                    if let Some(obj) = request_payload.as_object_mut() {
                        obj.insert("provider".to_string(), json!({ "only": routing }));
                    }
                }

                let site_url = env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
                let app_name = env::var("APP_NAME").unwrap_or_else(|_| "RecipeBox".to_string());

                debug!(model = %request.model, %url, "Sending chat completion request");
                let response = Client::new()
                    .post(&url)
                    .bearer_auth(actual_api_key)
                    .header("Content-Type", "application/json")
                    .header("HTTP-Referer", site_url)
                    .header("X-Title", app_name)
                    .json(&request_payload)
                    .send()
                    .await?;

                if response.status().is_success() {
                    Ok(response.json::<ChatCompletionResponse>().await?)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    warn!(%status, "Chat completion request failed");
                    Err(ApiConnectionError::ApiError { status, error_body })
                }
            }
        }
    }
}
