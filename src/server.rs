//! HTTP variant of the two flows: JSON in, JSON out.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, info};
use serde_json::json;
use tokio::net::TcpListener;

use crate::builder::FridgeChef;
use crate::error::ChefError;
use crate::media::MAX_INLINE_BYTES;
use crate::model::{
    IdentifyIngredientsInput, IdentifyIngredientsOutput, IngredientList, SuggestRecipesInput,
    SuggestRecipesOutput,
};

/// Base64 inflates the video by a third; leave room for the JSON around it.
const MAX_BODY_BYTES: usize = MAX_INLINE_BYTES / 3 * 4 + 64 * 1024;

impl ChefError {
    fn status_code(&self) -> StatusCode {
        match self {
            ChefError::InputValidation(_) | ChefError::MediaRead(_) => StatusCode::BAD_REQUEST,
            ChefError::Upstream(_) | ChefError::ResponseShape(_) => StatusCode::BAD_GATEWAY,
            ChefError::Busy => StatusCode::CONFLICT,
            ChefError::Builder(_) | ChefError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ChefError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for ChefError {
    fn from(rejection: JsonRejection) -> Self {
        ChefError::InputValidation(rejection.body_text())
    }
}

/// Routes for both flows plus a health check
pub fn router(chef: FridgeChef) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/identify-ingredients", post(identify_ingredients))
        .route("/api/suggest-recipes", post(suggest_recipes))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(chef)
}

/// Serve until the listener fails
pub async fn serve(listener: TcpListener, chef: FridgeChef) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router(chef)).await
}

async fn health() -> &'static str {
    "ok"
}

async fn identify_ingredients(
    State(chef): State<FridgeChef>,
    payload: Result<Json<IdentifyIngredientsInput>, JsonRejection>,
) -> Result<Json<IdentifyIngredientsOutput>, ChefError> {
    let Json(input) = payload?;
    Ok(Json(chef.identify_ingredients(&input).await?))
}

async fn suggest_recipes(
    State(chef): State<FridgeChef>,
    payload: Result<Json<SuggestRecipesInput>, JsonRejection>,
) -> Result<Json<SuggestRecipesOutput>, ChefError> {
    let Json(input) = payload?;
    // Rejected here so blank input never reaches the model
    let ingredients = IngredientList::parse(&input.ingredients)?;
    let input = SuggestRecipesInput {
        ingredients: ingredients.into_inner(),
    };
    Ok(Json(chef.suggest_recipes(&input).await?))
}
