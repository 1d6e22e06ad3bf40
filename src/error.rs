use thiserror::Error;

/// Errors that can occur while identifying ingredients or suggesting recipes
#[derive(Error, Debug)]
pub enum ChefError {
    /// Ingredient text was empty or whitespace only
    #[error("Invalid input: {0}")]
    InputValidation(String),

    /// Video payload could not be decoded
    #[error("Could not read video: {0}")]
    MediaRead(String),

    /// The call to the AI model failed (network, auth, quota, API error)
    #[error("AI service error: {0}")]
    Upstream(String),

    /// The AI model replied with something that does not match the expected structure
    #[error("Unexpected AI response: {0}")]
    ResponseShape(String),

    /// Another request is already running for this session
    #[error("Another request is already in progress")]
    Busy,

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ChefError {
    /// Stable tag for logs and HTTP error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            ChefError::InputValidation(_) => "input_validation",
            ChefError::MediaRead(_) => "media_read",
            ChefError::Upstream(_) => "upstream",
            ChefError::ResponseShape(_) => "response_shape",
            ChefError::Busy => "busy",
            ChefError::Builder(_) => "builder",
            ChefError::Config(_) => "config",
        }
    }
}

impl From<reqwest::Error> for ChefError {
    fn from(err: reqwest::Error) -> Self {
        ChefError::Upstream(err.to_string())
    }
}
