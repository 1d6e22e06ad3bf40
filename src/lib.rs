pub mod builder;
pub mod config;
pub mod error;
pub mod flows;
pub mod media;
pub mod model;
pub mod providers;
pub mod render;
pub mod server;
pub mod session;

pub use builder::{FridgeChef, FridgeChefBuilder, Provider};
pub use config::AiConfig;
pub use error::ChefError;
pub use flows::{IngredientIdentifier, RecipeSuggester};
pub use model::{
    IdentifyIngredientsInput, IdentifyIngredientsOutput, IngredientList, Recipe,
    RecipeCategory, SuggestRecipesInput, SuggestRecipesOutput, VideoBlob,
};
pub use session::{Session, Status};

/// Identify the ingredients in a fridge video given as a base64 data URI.
///
/// Uses configuration from `fridge-chef.toml` and `FRIDGE_CHEF__*` variables.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), fridge_chef::ChefError> {
/// let output = fridge_chef::identify_ingredients_from_video("data:video/mp4;base64,AAAA").await?;
/// println!("{}", output.identified_ingredients);
/// # Ok(())
/// # }
/// ```
pub async fn identify_ingredients_from_video(
    video_data_uri: &str,
) -> Result<IdentifyIngredientsOutput, ChefError> {
    let chef = FridgeChef::from_env()?;
    chef.identify_ingredients(&IdentifyIngredientsInput {
        video_data_uri: video_data_uri.to_string(),
    })
    .await
}

/// Suggest recipes for a comma-separated ingredient list.
///
/// Blank input is rejected with `InputValidation` before any request is made.
pub async fn suggest_recipes(ingredients: &str) -> Result<SuggestRecipesOutput, ChefError> {
    let ingredients = IngredientList::parse(ingredients)?;
    let chef = FridgeChef::from_env()?;
    chef.suggest_recipes(&SuggestRecipesInput {
        ingredients: ingredients.into_inner(),
    })
    .await
}
