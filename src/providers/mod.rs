mod factory;
mod google;
mod ollama;
mod open_ai;
mod prompt;

pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use ollama::OllamaProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::{
    identification_parts, identification_schema, suggestion_prompt, suggestion_schema,
    IDENTIFY_INGREDIENTS_PROMPT, SUGGEST_RECIPES_PROMPT,
};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ChefError;
use crate::model::VideoBlob;

/// One piece of a multimodal prompt
#[derive(Debug, Clone)]
pub enum Part<'a> {
    Text(String),
    Media(&'a VideoBlob),
}

/// A single structured-output request to a model
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    pub parts: Vec<Part<'a>>,
    /// Overrides the provider's configured temperature
    pub temperature: Option<f64>,
    /// JSON schema the reply should follow
    pub response_schema: Value,
}

impl<'a> GenerationRequest<'a> {
    pub fn text(prompt: String, response_schema: Value) -> Self {
        GenerationRequest {
            parts: vec![Part::Text(prompt)],
            temperature: None,
            response_schema,
        }
    }

    pub fn has_media(&self) -> bool {
        self.parts.iter().any(|p| matches!(p, Part::Media(_)))
    }

    /// Concatenated text parts, for providers without multimodal input
    pub fn prompt_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(text) => Some(text.as_str()),
                Part::Media(_) => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Unified trait for all hosted model backends
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// Whether the provider accepts video parts
    fn supports_media(&self) -> bool {
        false
    }

    /// Run one generation and return the raw reply text.
    ///
    /// An empty string means the model produced no content.
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, ChefError>;
}

/// Upstream error for a request carrying video to a text-only provider
pub(crate) fn media_unsupported(provider: &str) -> ChefError {
    ChefError::Upstream(format!(
        "provider '{}' cannot accept video input; use a vision-capable provider",
        provider
    ))
}

/// Pull a readable message out of an API error body
pub(crate) fn api_error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    error
        .as_str()
        .or_else(|| error["message"].as_str())
        .map(|s| s.to_string())
        .or_else(|| Some(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_text_skips_media() {
        let video = VideoBlob {
            media_type: "video/mp4".to_string(),
            data: vec![0],
        };
        let request = GenerationRequest {
            parts: vec![
                Part::Text("before ".to_string()),
                Part::Media(&video),
                Part::Text("after".to_string()),
            ],
            temperature: Some(0.2),
            response_schema: json!({}),
        };
        assert!(request.has_media());
        assert_eq!(request.prompt_text(), "before after");
    }

    #[test]
    fn test_api_error_message() {
        assert_eq!(
            api_error_message(&json!({"error": {"code": 429, "message": "Quota exceeded"}})),
            Some("Quota exceeded".to_string())
        );
        assert_eq!(
            api_error_message(&json!({"error": "model not found"})),
            Some("model not found".to_string())
        );
        assert_eq!(api_error_message(&json!({"choices": []})), None);
    }
}
