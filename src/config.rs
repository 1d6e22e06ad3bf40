use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;

/// Main AI configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// Provider used by a flow that does not name its own
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderConfig>,
    /// Settings for the ingredient identification flow
    #[serde(default = "default_identification")]
    pub identification: FlowConfig,
    /// Settings for the recipe suggestion flow
    #[serde(default)]
    pub suggestion: FlowConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Configuration for a specific AI provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier (e.g., "gemini-2.0-flash", "gpt-4o-mini")
    pub model: String,
    /// Sampling temperature; the model's own default when unset
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate; the model's own default when unset
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

/// Per-flow overrides on top of the provider configuration
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct FlowConfig {
    /// Provider name; `default_provider` when unset
    #[serde(default)]
    pub provider: Option<String>,
    /// Model identifier replacing the provider's model for this flow
    #[serde(default)]
    pub model: Option<String>,
    /// Temperature replacing the provider's temperature for this flow
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: default_providers(),
            identification: default_identification(),
            suggestion: FlowConfig::default(),
            timeout: default_timeout(),
        }
    }
}

const DEFAULT_GOOGLE_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_IDENTIFICATION_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_IDENTIFICATION_TEMPERATURE: f64 = 0.2;

// Default value functions
fn default_provider() -> String {
    "google".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_providers() -> HashMap<String, ProviderConfig> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        ProviderConfig {
            enabled: true,
            model: DEFAULT_GOOGLE_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
            api_key: None,
            base_url: None,
        },
    );
    providers
}

/// Video input needs a vision-capable model; keep the answers near-deterministic.
fn default_identification() -> FlowConfig {
    FlowConfig {
        provider: None,
        model: Some(DEFAULT_IDENTIFICATION_MODEL.to_string()),
        temperature: Some(DEFAULT_IDENTIFICATION_TEMPERATURE),
    }
}

fn default_timeout() -> u64 {
    60
}

impl AiConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with FRIDGE_CHEF__ prefix
    /// 2. fridge-chef.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: FRIDGE_CHEF__PROVIDERS__GOOGLE__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Parse configuration from a TOML document, ignoring the environment
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        with_defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AiConfig::load`] for the precedence rules.
pub fn load_config() -> Result<AiConfig, ConfigError> {
    let settings = with_defaults()?
        // Optional config file (can be missing)
        .add_source(File::with_name("fridge-chef").required(false))
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

/// Builder seeded with the default models so partial tables from the file
/// or the environment merge over them instead of replacing them.
fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("default_provider", default_provider())?
        .set_default("providers.google.model", DEFAULT_GOOGLE_MODEL)?
        .set_default("identification.model", DEFAULT_IDENTIFICATION_MODEL)?
        .set_default("identification.temperature", DEFAULT_IDENTIFICATION_TEMPERATURE)?
        .set_default("timeout", default_timeout() as i64)
}

// Use double underscore for nested: FRIDGE_CHEF__PROVIDERS__GOOGLE__API_KEY
fn environment() -> Environment {
    Environment::with_prefix("FRIDGE_CHEF")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
