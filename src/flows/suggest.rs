use log::{debug, info};
use std::sync::Arc;

use crate::error::ChefError;
use crate::flows::parse_structured;
use crate::model::{SuggestRecipesInput, SuggestRecipesOutput};
use crate::providers::{suggestion_prompt, suggestion_schema, GenerationRequest, LlmProvider};

/// Suggests recipes for a comma-separated ingredient list.
///
/// The flow accepts any string; rejecting blank input is the caller's job
/// (see [`crate::model::IngredientList::parse`]).
#[derive(Clone)]
pub struct RecipeSuggester {
    provider: Arc<dyn LlmProvider>,
    temperature: Option<f64>,
}

impl RecipeSuggester {
    /// Uses the provider's default generation settings
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        RecipeSuggester {
            provider,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Ask the model for recipes.
    ///
    /// Returns an empty list when the model produced no content and
    /// `ResponseShape` when the reply does not parse into recipes.
    pub async fn suggest(
        &self,
        input: &SuggestRecipesInput,
    ) -> Result<SuggestRecipesOutput, ChefError> {
        info!(
            "Suggesting recipes for \"{}\" with {}",
            input.ingredients,
            self.provider.provider_name()
        );

        let mut request =
            GenerationRequest::text(suggestion_prompt(&input.ingredients), suggestion_schema());
        request.temperature = self.temperature;

        let reply = self.provider.generate(&request).await?;
        debug!("Suggestion reply: {}", reply);

        let output: SuggestRecipesOutput = parse_structured(&reply)?;
        info!("Received {} recipe suggestion(s)", output.recipes.len());
        Ok(output)
    }
}
