use std::sync::Arc;
use std::time::Duration;

use crate::config::{AiConfig, ProviderConfig};
use crate::flows::{IngredientIdentifier, RecipeSuggester, IDENTIFICATION_TEMPERATURE};
use crate::providers::{LlmProvider, ProviderFactory};
use crate::session::Session;
use crate::{
    ChefError, IdentifyIngredientsInput, IdentifyIngredientsOutput, SuggestRecipesInput,
    SuggestRecipesOutput,
};

/// Hosted model backends selectable from the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    OpenAI,
    Ollama,
}

impl Provider {
    /// Convert to provider name string used by the factory
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::OpenAI => "openai",
            Provider::Ollama => "ollama",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            Provider::Google => "gemini-2.0-flash",
            Provider::OpenAI => "gpt-4o-mini",
            Provider::Ollama => "llama3.2",
        }
    }
}

/// The two flows, wired to their providers
#[derive(Clone)]
pub struct FridgeChef {
    identifier: IngredientIdentifier,
    suggester: RecipeSuggester,
}

impl FridgeChef {
    /// Creates a new builder with default configuration
    ///
    /// # Example
    /// ```
    /// use fridge_chef::FridgeChef;
    ///
    /// let builder = FridgeChef::builder().api_key("your-api-key");
    /// ```
    pub fn builder() -> FridgeChefBuilder {
        FridgeChefBuilder::default()
    }

    /// Build from `fridge-chef.toml` and `FRIDGE_CHEF__*` environment variables
    pub fn from_env() -> Result<Self, ChefError> {
        Self::builder().config(AiConfig::load()?).build()
    }

    /// Wire both flows to explicit providers
    pub fn new(identifier: IngredientIdentifier, suggester: RecipeSuggester) -> Self {
        FridgeChef {
            identifier,
            suggester,
        }
    }

    pub fn identifier(&self) -> &IngredientIdentifier {
        &self.identifier
    }

    pub fn suggester(&self) -> &RecipeSuggester {
        &self.suggester
    }

    pub async fn identify_ingredients(
        &self,
        input: &IdentifyIngredientsInput,
    ) -> Result<IdentifyIngredientsOutput, ChefError> {
        self.identifier.identify(input).await
    }

    pub async fn suggest_recipes(
        &self,
        input: &SuggestRecipesInput,
    ) -> Result<SuggestRecipesOutput, ChefError> {
        self.suggester.suggest(input).await
    }

    /// A fresh, idle interaction state
    pub fn session(&self) -> Session {
        Session::new()
    }
}

/// Builder for configuring the flows
#[derive(Default)]
pub struct FridgeChefBuilder {
    config: Option<AiConfig>,
    provider: Option<Provider>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    vision_model: Option<String>,
    timeout: Option<Duration>,
    identification_backend: Option<Arc<dyn LlmProvider>>,
    suggestion_backend: Option<Arc<dyn LlmProvider>>,
}

impl FridgeChefBuilder {
    /// Start from an explicit configuration instead of the defaults
    pub fn config(mut self, config: AiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use one provider for both flows
    ///
    /// # Example
    /// ```
    /// use fridge_chef::{FridgeChef, Provider};
    ///
    /// let builder = FridgeChef::builder().provider(Provider::OpenAI);
    /// ```
    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the API key for the selected provider
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Point the selected provider at a custom or proxy endpoint
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the model used for recipe suggestions
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the vision-capable model used for ingredient identification
    pub fn vision_model(mut self, model: impl Into<String>) -> Self {
        self.vision_model = Some(model.into());
        self
    }

    /// Set a timeout for model requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Use a ready-made backend for both flows (e.g. a test double)
    pub fn backend(self, backend: Arc<dyn LlmProvider>) -> Self {
        self.identification_backend(backend.clone())
            .suggestion_backend(backend)
    }

    pub fn identification_backend(mut self, backend: Arc<dyn LlmProvider>) -> Self {
        self.identification_backend = Some(backend);
        self
    }

    pub fn suggestion_backend(mut self, backend: Arc<dyn LlmProvider>) -> Self {
        self.suggestion_backend = Some(backend);
        self
    }

    /// Resolve the configuration without creating any provider
    pub fn resolve_config(&self) -> Result<AiConfig, ChefError> {
        let mut config = self.config.clone().unwrap_or_default();

        if let Some(provider) = self.provider {
            let name = provider.as_str();
            config.default_provider = name.to_string();
            config.identification.provider = None;
            config.suggestion.provider = None;
            if provider != Provider::Google {
                // The default vision model is a Gemini model
                config.identification.model = None;
            }
            config
                .providers
                .entry(name.to_string())
                .or_insert_with(|| ProviderConfig {
                    enabled: true,
                    model: provider.default_model().to_string(),
                    temperature: None,
                    max_tokens: None,
                    api_key: None,
                    base_url: None,
                });
        }

        if self.api_key.is_some() || self.base_url.is_some() {
            let name = config.default_provider.clone();
            let entry = config.providers.get_mut(&name).ok_or_else(|| {
                ChefError::Builder(format!("Provider '{}' not found in configuration", name))
            })?;
            if let Some(key) = &self.api_key {
                entry.api_key = Some(key.clone());
            }
            if let Some(url) = &self.base_url {
                entry.base_url = Some(url.clone());
            }
        }

        if let Some(model) = &self.model {
            config.suggestion.model = Some(model.clone());
        }
        if let Some(model) = &self.vision_model {
            config.identification.model = Some(model.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout.as_secs().max(1);
        }

        Ok(config)
    }

    /// Build both flows
    ///
    /// # Errors
    /// Returns `ChefError::Builder` if a provider is unknown, disabled,
    /// missing from the configuration, or has no credential.
    pub fn build(self) -> Result<FridgeChef, ChefError> {
        let config = self.resolve_config()?;

        let identification_backend = match self.identification_backend {
            Some(backend) => backend,
            None => Arc::from(ProviderFactory::for_flow(&config, &config.identification)?),
        };
        let suggestion_backend = match self.suggestion_backend {
            Some(backend) => backend,
            None => Arc::from(ProviderFactory::for_flow(&config, &config.suggestion)?),
        };

        let identifier = IngredientIdentifier::new(identification_backend).with_temperature(
            config
                .identification
                .temperature
                .or(Some(IDENTIFICATION_TEMPERATURE)),
        );
        let suggester =
            RecipeSuggester::new(suggestion_backend).with_temperature(config.suggestion.temperature);

        Ok(FridgeChef::new(identifier, suggester))
    }
}
