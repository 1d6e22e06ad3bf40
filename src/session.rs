//! Interaction state for one user: the ingredient text, what is running,
//! and what to show (errors, results, the last notification).

use log::{error, info};

use crate::error::ChefError;
use crate::flows::{IngredientIdentifier, RecipeSuggester};
use crate::media::decode_data_uri;
use crate::model::{
    IdentifyIngredientsOutput, IngredientList, Recipe, SuggestRecipesInput, SuggestRecipesOutput,
    VideoBlob,
};

/// What the session is currently waiting on. Only one request runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Identifying,
    Suggesting,
}

/// A short user-facing notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

impl Notice {
    fn info(title: &str, description: &str) -> Self {
        Notice {
            title: title.to_string(),
            description: description.to_string(),
            destructive: false,
        }
    }

    fn destructive(title: &str, description: &str) -> Self {
        Notice {
            title: title.to_string(),
            description: description.to_string(),
            destructive: true,
        }
    }
}

pub const NO_RECIPES_MESSAGE: &str =
    "Couldn't find any recipes with those ingredients. Try adding more?";
pub const VIDEO_RETRY_MESSAGE: &str = "Could not read the video. Please try again with another file.";

#[derive(Debug, Default)]
pub struct Session {
    ingredients: String,
    status: Status,
    video_error: Option<String>,
    suggestion_error: Option<String>,
    recipes: Option<Vec<Recipe>>,
    notice: Option<Notice>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingredients(&self) -> &str {
        &self.ingredients
    }

    pub fn set_ingredients(&mut self, text: impl Into<String>) {
        self.ingredients = text.into();
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Both controls are disabled while anything is running
    pub fn is_busy(&self) -> bool {
        self.status != Status::Idle
    }

    pub fn video_error(&self) -> Option<&str> {
        self.video_error.as_deref()
    }

    pub fn suggestion_error(&self) -> Option<&str> {
        self.suggestion_error.as_deref()
    }

    /// `None` until a suggestion has completed
    pub fn recipes(&self) -> Option<&[Recipe]> {
        self.recipes.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Validate the ingredient text and enter `Suggesting`.
    ///
    /// Blank text fails with `InputValidation` and no request should be made.
    pub fn begin_suggestion(&mut self) -> Result<SuggestRecipesInput, ChefError> {
        if self.is_busy() {
            return Err(ChefError::Busy);
        }
        let list = IngredientList::parse(&self.ingredients).map_err(|e| {
            self.suggestion_error = Some(e.to_string());
            e
        })?;

        self.status = Status::Suggesting;
        self.suggestion_error = None;
        self.recipes = None;
        Ok(SuggestRecipesInput {
            ingredients: list.into_inner(),
        })
    }

    /// Record the outcome of a suggestion request and return to `Idle`.
    ///
    /// A failed request is logged, shown to the user, and handed back.
    pub fn finish_suggestion(
        &mut self,
        result: Result<SuggestRecipesOutput, ChefError>,
    ) -> Result<(), ChefError> {
        self.status = Status::Idle;
        match result {
            Ok(output) if output.recipes.is_empty() => {
                self.suggestion_error = Some(NO_RECIPES_MESSAGE.to_string());
                self.recipes = Some(Vec::new());
                self.notice = Some(Notice::destructive(
                    "No Recipes Found",
                    "Try adding more ingredients.",
                ));
                Ok(())
            }
            Ok(output) => {
                info!("Showing {} recipe(s)", output.recipes.len());
                self.recipes = Some(output.recipes);
                self.notice = Some(Notice::info("Recipes Generated!", "Bon appétit!"));
                Ok(())
            }
            Err(e) => {
                error!("Error suggesting recipes: {}", e);
                self.suggestion_error = Some(format!("Failed to generate recipes: {}", e));
                self.notice = Some(Notice::destructive(
                    "Error",
                    &format!("Failed to generate recipes. {}", e),
                ));
                Err(e)
            }
        }
    }

    /// Decode an uploaded video and enter `Identifying`.
    ///
    /// An unreadable video is reported in `video_error` with a retry prompt.
    pub fn begin_identification(&mut self, video_data_uri: &str) -> Result<VideoBlob, ChefError> {
        if self.is_busy() {
            return Err(ChefError::Busy);
        }
        match decode_data_uri(video_data_uri) {
            Ok(video) => {
                self.status = Status::Identifying;
                self.video_error = None;
                Ok(video)
            }
            Err(e) => {
                error!("Error reading video: {}", e);
                self.video_error = Some(format!("{} ({})", VIDEO_RETRY_MESSAGE, e));
                self.notice = Some(Notice::destructive("Video Error", VIDEO_RETRY_MESSAGE));
                Err(e)
            }
        }
    }

    /// Record the outcome of an identification request and return to `Idle`.
    ///
    /// Identified ingredients replace the current text; an empty result
    /// leaves the text alone.
    pub fn finish_identification(
        &mut self,
        result: Result<IdentifyIngredientsOutput, ChefError>,
    ) -> Result<(), ChefError> {
        self.status = Status::Idle;
        match result {
            Ok(output) if output.identified_ingredients.is_empty() => {
                self.notice = Some(Notice::info(
                    "No Ingredients Found",
                    "Nothing recognizable in the video. Try typing your ingredients instead.",
                ));
                Ok(())
            }
            Ok(output) => {
                self.ingredients = output.identified_ingredients;
                self.notice = Some(Notice::info(
                    "Ingredients Identified!",
                    "Review the list, then ask for recipes.",
                ));
                Ok(())
            }
            Err(e) => {
                error!("Error identifying ingredients: {}", e);
                self.video_error = Some(format!("Failed to identify ingredients: {}", e));
                self.notice = Some(Notice::destructive(
                    "Error",
                    &format!("Failed to identify ingredients. {}", e),
                ));
                Err(e)
            }
        }
    }

    /// Run the suggestion flow for the current ingredient text
    pub async fn suggest(&mut self, suggester: &RecipeSuggester) -> Result<(), ChefError> {
        let input = self.begin_suggestion()?;
        let result = suggester.suggest(&input).await;
        self.finish_suggestion(result)
    }

    /// Run the identification flow for an uploaded video
    pub async fn identify(
        &mut self,
        identifier: &IngredientIdentifier,
        video_data_uri: &str,
    ) -> Result<(), ChefError> {
        let video = self.begin_identification(video_data_uri)?;
        let result = identifier.identify_video(&video).await;
        self.finish_identification(result)
    }

    /// Identify ingredients in the video, if any, then suggest recipes.
    ///
    /// Stops at the first failure and returns it; each notice is handed to
    /// `on_notice` as it is raised.
    pub async fn cook(
        &mut self,
        identifier: &IngredientIdentifier,
        suggester: &RecipeSuggester,
        video_data_uri: Option<&str>,
        mut on_notice: impl FnMut(Notice),
    ) -> Result<(), ChefError> {
        if let Some(uri) = video_data_uri {
            let result = self.identify(identifier, uri).await;
            if let Some(notice) = self.take_notice() {
                on_notice(notice);
            }
            result?;
            info!("Ingredients after video: {}", self.ingredients);
        }

        let result = self.suggest(suggester).await;
        if let Some(notice) = self.take_notice() {
            on_notice(notice);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::MockProvider;
    use std::sync::Arc;

    const VIDEO_URI: &str = "data:video/mp4;base64,AAECAw==";
    const RECIPES: &str = r#"{"recipes": [{"name": "Fried Rice", "ingredients": "rice, eggs", "instructions": "Fry."}]}"#;

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new();
        assert_eq!(session.status(), Status::Idle);
        assert!(!session.is_busy());
        assert!(session.recipes().is_none());
        assert!(session.notice().is_none());
    }

    #[test]
    fn test_blank_ingredients_rejected() {
        let mut session = Session::new();
        session.set_ingredients("   ");
        let result = session.begin_suggestion();
        assert!(matches!(result, Err(ChefError::InputValidation(_))));
        assert_eq!(session.status(), Status::Idle);
        assert!(session.suggestion_error().is_some());
    }

    #[test]
    fn test_only_one_request_at_a_time() {
        let mut session = Session::new();
        session.set_ingredients("eggs");
        session.begin_suggestion().unwrap();
        assert_eq!(session.status(), Status::Suggesting);

        assert!(matches!(session.begin_suggestion(), Err(ChefError::Busy)));
        assert!(matches!(
            session.begin_identification(VIDEO_URI),
            Err(ChefError::Busy)
        ));
    }

    #[tokio::test]
    async fn test_suggest_populates_results() {
        let provider = Arc::new(MockProvider::new(vec![Ok(RECIPES)]));
        let suggester = RecipeSuggester::new(provider);

        let mut session = Session::new();
        session.set_ingredients("rice, eggs");
        session.suggest(&suggester).await.unwrap();

        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.recipes().unwrap()[0].name, "Fried Rice");
        assert!(session.suggestion_error().is_none());
        assert_eq!(session.take_notice().unwrap().title, "Recipes Generated!");
        assert!(session.notice().is_none());
    }

    #[tokio::test]
    async fn test_suggest_empty_and_failure() {
        let provider = Arc::new(MockProvider::new(vec![
            Ok(r#"{"recipes": []}"#),
            Err("service unavailable"),
        ]));
        let suggester = RecipeSuggester::new(provider);

        let mut session = Session::new();
        session.set_ingredients("ketchup");

        session.suggest(&suggester).await.unwrap();
        assert_eq!(session.suggestion_error(), Some(NO_RECIPES_MESSAGE));
        assert!(session.notice().unwrap().destructive);

        let err = session.suggest(&suggester).await.unwrap_err();
        assert!(matches!(err, ChefError::Upstream(_)));
        assert_eq!(session.status(), Status::Idle);
        assert!(session
            .suggestion_error()
            .unwrap()
            .starts_with("Failed to generate recipes:"));
        assert!(session.recipes().is_none());
    }

    #[tokio::test]
    async fn test_identify_overwrites_ingredients() {
        let provider = Arc::new(MockProvider::new(vec![Ok(
            r#"{"identifiedIngredients": "milk, eggs"}"#,
        )]));
        let identifier = IngredientIdentifier::new(provider);

        let mut session = Session::new();
        session.set_ingredients("old text");
        session.identify(&identifier, VIDEO_URI).await.unwrap();

        assert_eq!(session.ingredients(), "milk, eggs");
        assert_eq!(session.status(), Status::Idle);
        assert!(session.video_error().is_none());
    }

    #[tokio::test]
    async fn test_identify_nothing_found_keeps_text() {
        let provider = Arc::new(MockProvider::new(vec![Ok("")]));
        let identifier = IngredientIdentifier::new(provider);

        let mut session = Session::new();
        session.set_ingredients("butter");
        session.identify(&identifier, VIDEO_URI).await.unwrap();

        assert_eq!(session.ingredients(), "butter");
        assert_eq!(session.notice().unwrap().title, "No Ingredients Found");
    }

    #[tokio::test]
    async fn test_unreadable_video_reports_error() {
        let provider = Arc::new(MockProvider::new(vec![]));
        let identifier = IngredientIdentifier::new(provider.clone());

        let mut session = Session::new();
        let err = session
            .identify(&identifier, "data:video/mp4;base64,")
            .await
            .unwrap_err();

        assert!(matches!(err, ChefError::MediaRead(_)));
        assert!(session.video_error().unwrap().contains("try again"));
        assert_eq!(session.status(), Status::Idle);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_cook_runs_both_steps() {
        let provider = Arc::new(MockProvider::new(vec![
            Ok(r#"{"identifiedIngredients": "rice, eggs"}"#),
            Ok(RECIPES),
        ]));
        let identifier = IngredientIdentifier::new(provider.clone());
        let suggester = RecipeSuggester::new(provider.clone());

        let mut titles = Vec::new();
        let mut session = Session::new();
        session
            .cook(&identifier, &suggester, Some(VIDEO_URI), |n| titles.push(n.title))
            .await
            .unwrap();

        assert_eq!(titles, vec!["Ingredients Identified!", "Recipes Generated!"]);
        assert_eq!(session.recipes().unwrap().len(), 1);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_cook_stops_at_video_failure() {
        let provider = Arc::new(MockProvider::new(vec![Err("quota exceeded")]));
        let identifier = IngredientIdentifier::new(provider.clone());
        let suggester = RecipeSuggester::new(provider.clone());

        let mut notices = Vec::new();
        let mut session = Session::new();
        session.set_ingredients("rice");
        let err = session
            .cook(&identifier, &suggester, Some(VIDEO_URI), |n| notices.push(n))
            .await
            .unwrap_err();

        assert!(matches!(err, ChefError::Upstream(_)));
        assert!(session.video_error().is_some());
        assert!(session.recipes().is_none());
        assert_eq!(provider.calls(), 1);
        assert!(notices[0].destructive);
    }

    #[tokio::test]
    async fn test_cook_reports_blank_ingredients() {
        let provider = Arc::new(MockProvider::new(vec![]));
        let identifier = IngredientIdentifier::new(provider.clone());
        let suggester = RecipeSuggester::new(provider.clone());

        let mut session = Session::new();
        let result = session.cook(&identifier, &suggester, None, |_| {}).await;

        assert!(matches!(result, Err(ChefError::InputValidation(_))));
        assert!(session.suggestion_error().is_some());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_identified_list_is_accepted_for_suggestion() {
        let provider = Arc::new(MockProvider::new(vec![
            Ok(r#"{"identifiedIngredients": " rice ,eggs,"}"#),
            Ok(RECIPES),
        ]));
        let identifier = IngredientIdentifier::new(provider.clone());
        let suggester = RecipeSuggester::new(provider);

        let mut session = Session::new();
        session.identify(&identifier, VIDEO_URI).await.unwrap();
        session.suggest(&suggester).await.unwrap();

        assert_eq!(session.ingredients(), "rice, eggs");
        assert_eq!(session.recipes().unwrap().len(), 1);
    }
}
