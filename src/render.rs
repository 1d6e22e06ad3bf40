use std::fmt::Write;

use crate::model::Recipe;
use crate::session::Session;

/// Plain-text card for one recipe: title, bulleted ingredients, instructions.
pub fn recipe_card(recipe: &Recipe) -> String {
    let mut out = String::new();
    match recipe.category() {
        Some(category) => {
            let _ = writeln!(out, "{} [{}]", recipe.name, category.label());
        }
        None => {
            let _ = writeln!(out, "{}", recipe.name);
        }
    }
    let _ = writeln!(out, "{}", "=".repeat(recipe.name.chars().count().max(3)));

    out.push_str("\nIngredients:\n");
    for item in recipe.ingredient_items() {
        let _ = writeln!(out, "  - {}", item);
    }

    out.push_str("\nInstructions:\n");
    for line in recipe.instructions.lines() {
        let _ = writeln!(out, "  {}", line.trim_end());
    }
    out
}

/// All cards under a heading, separated by blank lines
pub fn results(recipes: &[Recipe]) -> String {
    let cards: Vec<String> = recipes.iter().map(recipe_card).collect();
    format!("Recipe Suggestions\n\n{}", cards.join("\n"))
}

/// What a finished session shows: errors first, then results or a hint.
pub fn session_summary(session: &Session) -> String {
    let mut out = String::new();
    if let Some(error) = session.video_error() {
        let _ = writeln!(out, "Video error: {}", error);
    }
    if let Some(error) = session.suggestion_error() {
        let _ = writeln!(out, "Error: {}", error);
    }
    match session.recipes() {
        Some(recipes) if !recipes.is_empty() => out.push_str(&results(recipes)),
        Some(_) => {}
        None if out.is_empty() => out.push_str("Enter some ingredients to get started!\n"),
        None => {}
    }
    out
}
