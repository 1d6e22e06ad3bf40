use crate::config::{AiConfig, FlowConfig, ProviderConfig};
use crate::error::ChefError;
use crate::providers::{GoogleProvider, LlmProvider, OllamaProvider, OpenAIProvider};
use log::debug;
use std::time::Duration;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
        timeout: Duration,
    ) -> Result<Box<dyn LlmProvider>, ChefError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(ChefError::Builder(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        match provider_name {
            "google" => Ok(Box::new(GoogleProvider::new(config, timeout)?)),
            "openai" => Ok(Box::new(OpenAIProvider::new(config, timeout)?)),
            "ollama" => Ok(Box::new(OllamaProvider::new(config, timeout)?)),
            _ => Err(ChefError::Builder(format!(
                "Unknown provider: {}",
                provider_name
            ))),
        }
    }

    /// Create the provider a flow should talk to, with the flow's model override applied
    pub fn for_flow(
        config: &AiConfig,
        flow: &FlowConfig,
    ) -> Result<Box<dyn LlmProvider>, ChefError> {
        let provider_name = flow
            .provider
            .as_deref()
            .unwrap_or(config.default_provider.as_str());
        let mut provider_config = config
            .providers
            .get(provider_name)
            .cloned()
            .ok_or_else(|| {
                ChefError::Builder(format!(
                    "Provider '{}' not found in configuration",
                    provider_name
                ))
            })?;

        if let Some(model) = &flow.model {
            provider_config.model = model.clone();
        }
        debug!(
            "Using provider '{}' with model '{}'",
            provider_name, provider_config.model
        );

        Self::create(
            provider_name,
            &provider_config,
            Duration::from_secs(config.timeout),
        )
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google", "openai", "ollama"]
    }
}
