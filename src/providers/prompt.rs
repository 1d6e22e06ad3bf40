use serde_json::{json, Value};

use super::Part;
use crate::model::VideoBlob;

/// Instruction for spotting ingredients in a fridge video.
///
/// The `{{video}}` marker is where the video itself is placed in the request.
pub const IDENTIFY_INGREDIENTS_PROMPT: &str = include_str!("identify_ingredients.txt");

/// Template for recipe suggestions; `{{ingredients}}` is replaced with the user's list.
pub const SUGGEST_RECIPES_PROMPT: &str = include_str!("suggest_recipes.txt");

const VIDEO_MARKER: &str = "{{video}}";
const INGREDIENTS_MARKER: &str = "{{ingredients}}";

/// Request parts for the identification prompt, with the video embedded at its marker.
pub fn identification_parts(video: &VideoBlob) -> Vec<Part<'_>> {
    match IDENTIFY_INGREDIENTS_PROMPT.split_once(VIDEO_MARKER) {
        Some((before, after)) => vec![
            Part::Text(before.to_string()),
            Part::Media(video),
            Part::Text(after.to_string()),
        ],
        None => vec![
            Part::Text(IDENTIFY_INGREDIENTS_PROMPT.to_string()),
            Part::Media(video),
        ],
    }
}

/// Fill the suggestion template with the ingredient text, verbatim.
pub fn suggestion_prompt(ingredients: &str) -> String {
    SUGGEST_RECIPES_PROMPT.replace(INGREDIENTS_MARKER, ingredients)
}

/// Output schema of the identification flow
pub fn identification_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "identifiedIngredients": {
                "type": "string",
                "description": "A comma-separated list of ingredients identified in the video."
            }
        }
    })
}

/// Output schema of the suggestion flow
pub fn suggestion_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "recipes": {
                "type": "array",
                "description": "An array of recipe suggestions.",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": {
                            "type": "string",
                            "description": "The name of the recipe."
                        },
                        "ingredients": {
                            "type": "string",
                            "description": "A list of ingredients required for the recipe."
                        },
                        "instructions": {
                            "type": "string",
                            "description": "Step-by-step instructions for preparing the recipe."
                        }
                    },
                    "required": ["name", "ingredients", "instructions"]
                }
            }
        },
        "required": ["recipes"]
    })
}
