use log::{debug, info};
use std::sync::Arc;

use crate::error::ChefError;
use crate::flows::parse_structured;
use crate::media::decode_data_uri;
use crate::model::{IdentifyIngredientsInput, IdentifyIngredientsOutput, IngredientList, VideoBlob};
use crate::providers::{identification_parts, identification_schema, GenerationRequest, LlmProvider};
use serde::Deserialize;

/// Near-deterministic sampling for listing what is in the video
pub const IDENTIFICATION_TEMPERATURE: f64 = 0.2;

/// What the model is asked to return; the field may be absent or null
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentificationReply {
    #[serde(default)]
    identified_ingredients: Option<String>,
}

/// Lists the food visible in a fridge video.
#[derive(Clone)]
pub struct IngredientIdentifier {
    provider: Arc<dyn LlmProvider>,
    temperature: Option<f64>,
}

impl IngredientIdentifier {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        IngredientIdentifier {
            provider,
            temperature: Some(IDENTIFICATION_TEMPERATURE),
        }
    }

    /// Replace the sampling temperature; `None` leaves it to the provider
    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Decode the video data URI and identify the ingredients in it.
    ///
    /// A malformed data URI fails with `MediaRead` before any network call.
    /// When the model recognizes nothing the result is an empty ingredient string.
    pub async fn identify(
        &self,
        input: &IdentifyIngredientsInput,
    ) -> Result<IdentifyIngredientsOutput, ChefError> {
        let video = decode_data_uri(&input.video_data_uri)?;
        self.identify_video(&video).await
    }

    pub async fn identify_video(
        &self,
        video: &VideoBlob,
    ) -> Result<IdentifyIngredientsOutput, ChefError> {
        if video.data.is_empty() {
            return Err(ChefError::MediaRead("video payload is empty".to_string()));
        }

        info!(
            "Identifying ingredients in {} video ({} bytes) with {}",
            video.media_type,
            video.data.len(),
            self.provider.provider_name()
        );

        let request = GenerationRequest {
            parts: identification_parts(video),
            temperature: self.temperature,
            response_schema: identification_schema(),
        };
        let reply = self.provider.generate(&request).await?;
        debug!("Identification reply: {}", reply);

        let parsed: IdentificationReply = parse_structured(&reply)?;
        let identified_ingredients =
            IngredientList::normalize(&parsed.identified_ingredients.unwrap_or_default());
        info!(
            "Identified {} ingredient(s)",
            identified_ingredients
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .count()
        );

        Ok(IdentifyIngredientsOutput {
            identified_ingredients,
        })
    }
}
