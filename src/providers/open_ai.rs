use crate::config::ProviderConfig;
use crate::error::ChefError;
use crate::providers::{api_error_message, media_unsupported, GenerationRequest, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Map, Value};
use std::time::Duration;

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ChefError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                ChefError::Builder("OPENAI_API_KEY not found in config or environment".to_string())
            })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com".to_string());

        Ok(OpenAIProvider {
            client: build_client(timeout)?,
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: None,
            max_tokens: None,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, ChefError> {
        if request.has_media() {
            return Err(media_unsupported(self.provider_name()));
        }

        let builder = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key));

        chat_completion(
            "OpenAI",
            builder,
            &self.model,
            request,
            request.temperature.or(self.temperature),
            self.max_tokens,
        )
        .await
    }
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client, ChefError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ChefError::Builder(format!("Failed to create HTTP client: {}", e)))
}

/// Send a JSON-mode chat completion to an OpenAI-compatible endpoint.
pub(crate) async fn chat_completion(
    label: &str,
    builder: RequestBuilder,
    model: &str,
    request: &GenerationRequest<'_>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
) -> Result<String, ChefError> {
    let system = format!(
        "Reply with a single JSON object that follows this JSON schema:\n{}",
        request.response_schema
    );

    let mut body = Map::new();
    body.insert("model".into(), json!(model));
    body.insert(
        "messages".into(),
        json!([
            {"role": "system", "content": system},
            {"role": "user", "content": request.prompt_text()}
        ]),
    );
    body.insert("response_format".into(), json!({"type": "json_object"}));
    if let Some(temperature) = temperature {
        body.insert("temperature".into(), json!(temperature));
    }
    if let Some(max_tokens) = max_tokens {
        body.insert("max_tokens".into(), json!(max_tokens));
    }

    let response = builder.json(&Value::Object(body)).send().await?;
    let status = response.status();
    let text = response.text().await?;
    let response_body: Value = serde_json::from_str(&text).map_err(|_| {
        ChefError::Upstream(format!("{} API error ({}): {}", label, status, text))
    })?;
    debug!("{} response: {:?}", label, response_body);

    if let Some(message) = api_error_message(&response_body) {
        return Err(ChefError::Upstream(format!(
            "{} API error ({}): {}",
            label, status, message
        )));
    }
    if !status.is_success() {
        return Err(ChefError::Upstream(format!("{} API error ({})", label, status)));
    }

    // A null or missing content means the model produced nothing
    Ok(response_body["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or_default()
        .to_string())
}
