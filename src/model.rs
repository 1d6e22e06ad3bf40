use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::ChefError;

/// Comma-separated ingredient text that is non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientList(String);

impl IngredientList {
    /// Validate user or model supplied ingredient text.
    ///
    /// This is the caller-side check that runs before any network call;
    /// the suggestion flow itself accepts any string.
    pub fn parse(text: &str) -> Result<Self, ChefError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChefError::InputValidation(
                "Please list at least one ingredient.".to_string(),
            ));
        }
        Ok(IngredientList(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Individual ingredients, trimmed, without empty entries
    pub fn items(&self) -> Vec<&str> {
        split_items(&self.0).collect()
    }

    /// Canonical comma-separated form: trimmed items, empties and
    /// case-insensitive duplicates removed, joined with ", ".
    pub fn normalize(raw: &str) -> String {
        let mut seen = HashSet::new();
        split_items(raw)
            .filter(|item| seen.insert(item.to_lowercase()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for IngredientList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn split_items(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Decoded video payload: declared media type plus raw bytes.
///
/// Consumed by a single identification call and never retained.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoBlob {
    pub media_type: String,
    pub data: Vec<u8>,
}

impl fmt::Debug for VideoBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoBlob")
            .field("media_type", &self.media_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// A single recipe suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub ingredients: String,
    pub instructions: String,
}

/// Rough dish category derived from keywords in the recipe name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeCategory {
    Poultry,
    Beef,
    Fish,
    Salad,
    Vegetable,
    Fruit,
}

impl RecipeCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RecipeCategory::Poultry => "poultry",
            RecipeCategory::Beef => "beef",
            RecipeCategory::Fish => "fish",
            RecipeCategory::Salad => "salad",
            RecipeCategory::Vegetable => "vegetable",
            RecipeCategory::Fruit => "fruit",
        }
    }
}

impl Recipe {
    /// Ingredients split on commas, for list display
    pub fn ingredient_items(&self) -> Vec<&str> {
        split_items(&self.ingredients).collect()
    }

    /// First matching category; checked in a fixed order so "chicken salad" is poultry.
    pub fn category(&self) -> Option<RecipeCategory> {
        const KEYWORDS: &[(RecipeCategory, &[&str])] = &[
            (RecipeCategory::Poultry, &["chicken"]),
            (RecipeCategory::Beef, &["beef", "steak"]),
            (RecipeCategory::Fish, &["fish", "salmon"]),
            (RecipeCategory::Salad, &["salad"]),
            (
                RecipeCategory::Vegetable,
                &["vegetable", "carrot", "broccoli"],
            ),
            (RecipeCategory::Fruit, &["fruit", "apple", "smoothie"]),
        ];

        let name = self.name.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|word| name.contains(word)))
            .map(|(category, _)| *category)
    }
}

/// Input of the ingredient identification flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyIngredientsInput {
    /// `data:<mimetype>;base64,<encoded_data>`
    pub video_data_uri: String,
}

/// Output of the ingredient identification flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyIngredientsOutput {
    /// Comma-separated ingredients; empty when nothing was recognized
    #[serde(default)]
    pub identified_ingredients: String,
}

/// Input of the recipe suggestion flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestRecipesInput {
    pub ingredients: String,
}

/// Output of the recipe suggestion flow
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestRecipesOutput {
    pub recipes: Vec<Recipe>,
}
