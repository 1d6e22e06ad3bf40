use crate::config::ProviderConfig;
use crate::error::ChefError;
use crate::providers::{api_error_message, GenerationRequest, LlmProvider, Part};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ChefError> {
        // Try config first, then fall back to environment variables
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_GENAI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                ChefError::Builder(
                    "GOOGLE_GENAI_API_KEY not found in config or environment".to_string(),
                )
            })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChefError::Builder(format!("Failed to create HTTP client: {}", e)))?;

        Ok(GoogleProvider {
            client,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        GoogleProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: None,
            max_tokens: None,
        }
    }

    fn request_body(&self, request: &GenerationRequest<'_>) -> Value {
        let parts: Vec<Value> = request
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => json!({ "text": text }),
                Part::Media(video) => json!({
                    "inline_data": {
                        "mime_type": video.media_type,
                        "data": STANDARD.encode(&video.data)
                    }
                }),
            })
            .collect();

        let mut generation_config = Map::new();
        generation_config.insert("responseMimeType".into(), json!("application/json"));
        generation_config.insert(
            "responseSchema".into(),
            to_gemini_schema(&request.response_schema),
        );
        if let Some(temperature) = request.temperature.or(self.temperature) {
            generation_config.insert("temperature".into(), json!(temperature));
        }
        if let Some(max_tokens) = self.max_tokens {
            generation_config.insert("maxOutputTokens".into(), json!(max_tokens));
        }

        json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": Value::Object(generation_config)
        })
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    fn supports_media(&self) -> bool {
        true
    }

    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, ChefError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let response_body: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) if !status.is_success() => {
                return Err(ChefError::Upstream(format!(
                    "Google Gemini API error ({}): {}",
                    status, body
                )))
            }
            Err(e) => {
                return Err(ChefError::Upstream(format!(
                    "Google Gemini returned invalid JSON: {}",
                    e
                )))
            }
        };
        debug!("Google Gemini response: {:?}", response_body);

        // Check for API error response
        if let Some(message) = api_error_message(&response_body) {
            return Err(ChefError::Upstream(format!(
                "Google Gemini API error ({}): {}",
                status, message
            )));
        }
        if !status.is_success() {
            return Err(ChefError::Upstream(format!(
                "Google Gemini API error ({})",
                status
            )));
        }
        if let Some(reason) = response_body["promptFeedback"]["blockReason"].as_str() {
            return Err(ChefError::Upstream(format!(
                "Google Gemini blocked the prompt: {}",
                reason
            )));
        }

        // No candidate or no text part means the model produced nothing
        let text = response_body["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(text)
    }
}

/// Gemini schemas spell types in upper case ("OBJECT", "STRING", ...)
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let converted = match (key.as_str(), value) {
                        ("type", Value::String(t)) => Value::String(t.to_uppercase()),
                        ("properties", Value::Object(props)) => Value::Object(
                            props
                                .iter()
                                .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                                .collect(),
                        ),
                        ("items", item) => to_gemini_schema(item),
                        _ => value.clone(),
                    };
                    (key.clone(), converted)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VideoBlob;
    use mockito::{Matcher, Server};

    const PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    fn provider(server: &Server) -> GoogleProvider {
        GoogleProvider::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            "gemini-1.5-flash".to_string(),
        )
    }

    #[test]
    fn test_provider_name() {
        let config = ProviderConfig {
            enabled: true,
            model: "gemini-2.0-flash".to_string(),
            temperature: None,
            max_tokens: None,
            api_key: Some("test-key".to_string()),
            base_url: None,
        };

        let provider = GoogleProvider::new(&config, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.provider_name(), "google");
        assert!(provider.supports_media());
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_gemini_schema_uppercases_types() {
        let schema = to_gemini_schema(&json!({
            "type": "object",
            "properties": {
                "recipes": {
                    "type": "array",
                    "description": "type of dish",
                    "items": { "type": "string" }
                }
            }
        }));
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["recipes"]["type"], "ARRAY");
        assert_eq!(schema["properties"]["recipes"]["items"]["type"], "STRING");
        assert_eq!(schema["properties"]["recipes"]["description"], "type of dish");
    }

    #[tokio::test]
    async fn test_generate_sends_video_inline() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "fake_api_key")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{
                    "parts": [
                        { "text": "look: " },
                        { "inline_data": { "mime_type": "video/mp4", "data": "AQID" } }
                    ]
                }],
                "generationConfig": {
                    "temperature": 0.2,
                    "responseMimeType": "application/json"
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {
                            "parts": [{ "text": "{\"identifiedIngredients\": \"milk, eggs\"}" }]
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let video = VideoBlob {
            media_type: "video/mp4".to_string(),
            data: vec![1, 2, 3],
        };
        let request = GenerationRequest {
            parts: vec![Part::Text("look: ".to_string()), Part::Media(&video)],
            temperature: Some(0.2),
            response_schema: json!({ "type": "object" }),
        };

        let reply = provider(&server).generate(&request).await.unwrap();
        assert_eq!(reply, r#"{"identifiedIngredients": "milk, eggs"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_without_candidates_is_empty() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": [{"finishReason": "STOP"}]}"#)
            .create_async()
            .await;

        let request = GenerationRequest::text("hi".to_string(), json!({}));
        let reply = provider(&server).generate(&request).await.unwrap();
        assert!(reply.is_empty());
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(429)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"code": 429, "message": "Resource has been exhausted"}}"#)
            .create_async()
            .await;

        let request = GenerationRequest::text("hi".to_string(), json!({}));
        let err = provider(&server).generate(&request).await.unwrap_err();
        assert!(matches!(err, ChefError::Upstream(_)));
        assert!(err.to_string().contains("Resource has been exhausted"));
    }

    #[tokio::test]
    async fn test_generate_blocked_prompt() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let request = GenerationRequest::text("hi".to_string(), json!({}));
        let err = provider(&server).generate(&request).await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }
}
