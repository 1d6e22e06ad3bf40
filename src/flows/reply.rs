use log::warn;
use serde::de::DeserializeOwned;

use crate::error::ChefError;

/// Parse a model reply into a flow's output record.
///
/// Both flows share this rule: a reply with no content (blank text or JSON
/// `null`) is a soft-empty success and yields `T::default()`; any other reply
/// must deserialize into `T` or the call fails with `ResponseShape`.
pub fn parse_structured<T>(reply: &str) -> Result<T, ChefError>
where
    T: DeserializeOwned + Default,
{
    let body = strip_code_fence(reply);
    if body.is_empty() || body == "null" {
        return Ok(T::default());
    }

    serde_json::from_str(body).map_err(|e| {
        warn!("Model reply did not match the expected structure: {}", e);
        ChefError::ResponseShape(format!("{} in reply {:?}", e, truncate(body, 200)))
    })
}

/// Models sometimes wrap JSON in a Markdown code fence despite the JSON mime type
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
