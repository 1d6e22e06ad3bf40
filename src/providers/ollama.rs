use crate::config::ProviderConfig;
use crate::error::ChefError;
use crate::providers::open_ai::{build_client, chat_completion};
use crate::providers::{media_unsupported, GenerationRequest, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

impl OllamaProvider {
    /// Create a new Ollama provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ChefError> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "http://localhost:11434".to_string());

        Ok(OllamaProvider {
            client: build_client(timeout)?,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String, model: String) -> Self {
        OllamaProvider {
            client: Client::new(),
            base_url,
            model,
            temperature: None,
            max_tokens: None,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, ChefError> {
        if request.has_media() {
            return Err(media_unsupported(self.provider_name()));
        }

        // Ollama uses OpenAI-compatible API
        let builder = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url));

        chat_completion(
            "Ollama",
            builder,
            &self.model,
            request,
            request.temperature.or(self.temperature),
            self.max_tokens,
        )
        .await
    }
}
