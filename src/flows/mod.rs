//! The two request/response flows wrapped around a hosted model.
//!
//! Each flow is stateless: it holds a shared provider handle and its own
//! generation settings, and every call is one independent round trip.

mod identify;
mod reply;
mod suggest;

pub use identify::{IngredientIdentifier, IDENTIFICATION_TEMPERATURE};
pub use reply::parse_structured;
pub use suggest::RecipeSuggester;
