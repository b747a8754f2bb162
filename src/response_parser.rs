//! # Response Parser Module
//!
//! Turns the raw text of a model answer into [`Recipe`] records.
//!
//! ## Accepted shapes
//!
//! - **Tagged fence**: the first opening fence with a `json` tag
//!   (case-insensitive) up to the next closing fence
//! - **Plain fence**: the first fenced block, with any language tag on its
//!   opening line dropped
//! - **Bare**: the whole text
//!
//! An opening fence without a closing one fails the parse, as does any
//! payload that is not a JSON array of recipe objects.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::errors::ParseError;
use crate::recipe_model::Recipe;

const FENCE: &str = "```";

lazy_static! {
    static ref TAGGED_FENCE: Regex =
        Regex::new(r"(?i)```json\b").expect("Tagged fence pattern should be valid");
    static ref INFO_STRING: Regex =
        Regex::new(r"^[A-Za-z][\w+.\-]*[ \t]*\r?\n").expect("Info string pattern should be valid");
}

/// Locate the JSON payload inside a model answer
///
/// # Examples
///
/// ```rust
/// use recipe_generator::response_parser::extract_json_payload;
///
/// assert_eq!(extract_json_payload("```json\n[1]\n```").unwrap(), "[1]");
/// assert_eq!(extract_json_payload("Here:\n```\n[2]\n```").unwrap(), "[2]");
/// assert_eq!(extract_json_payload("  [3] ").unwrap(), "[3]");
/// ```
pub fn extract_json_payload(raw: &str) -> Result<&str, ParseError> {
    if let Some(open) = TAGGED_FENCE.find(raw) {
        let body = &raw[open.end()..];
        let close = body.find(FENCE).ok_or(ParseError::UnterminatedFence)?;
        debug!("Extracting JSON from tagged code fence");
        return Ok(body[..close].trim());
    }

    if let Some(open) = raw.find(FENCE) {
        let body = &raw[open + FENCE.len()..];
        let close = body.find(FENCE).ok_or(ParseError::UnterminatedFence)?;
        let block = &body[..close];
        let block = match INFO_STRING.find(block) {
            Some(tag) => &block[tag.end()..],
            None => block,
        };
        debug!("Extracting JSON from untagged code fence");
        return Ok(block.trim());
    }

    Ok(raw.trim())
}

/// Parse a model answer into recipes
pub fn parse_recipes(raw: &str) -> Result<Vec<Recipe>, ParseError> {
    let payload = extract_json_payload(raw)?;
    let recipes: Vec<Recipe> = serde_json::from_str(payload).map_err(|e| {
        warn!(error = %e, "Model response is not a JSON array of recipes");
        ParseError::InvalidJson(e.to_string())
    })?;
    debug!(recipes = recipes.len(), "Parsed recipes from response");
    Ok(recipes)
}

/// Remove detail-enrichment fields the model was told not to emit
pub fn clean_recipes(mut recipes: Vec<Recipe>) -> Vec<Recipe> {
    for recipe in &mut recipes {
        if let Some(ingredients) = recipe.ingredients.as_mut() {
            if ingredients.strip_details() {
                debug!(title = recipe.title_text(), "Removed detail fields from model output");
            }
        }
    }
    recipes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tagged_fence() {
        let recipes = parse_recipes("```json\n[{\"title\":\"T\"}]\n```").unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title_text(), "T");
    }

    #[test]
    fn test_tagged_fence_with_surrounding_prose() {
        let raw = "Sure! Here is your recipe:\n```JSON\n[{\"title\":\"Soup\"}]\n```\nEnjoy.";
        assert_eq!(parse_recipes(raw).unwrap()[0].title_text(), "Soup");
    }

    #[test]
    fn test_tagged_fence_wins_over_earlier_plain_fence() {
        let raw = "```\nnot this\n```\n```json\n[{\"title\":\"This\"}]\n```";
        assert_eq!(parse_recipes(raw).unwrap()[0].title_text(), "This");
    }

    #[test]
    fn test_plain_fence_with_and_without_tag() {
        assert_eq!(extract_json_payload("```\n[]\n```").unwrap(), "[]");
        assert_eq!(extract_json_payload("```javascript\n[1]\n```").unwrap(), "[1]");
        assert_eq!(extract_json_payload("```jsonc\n[2]\n```").unwrap(), "[2]");
        assert_eq!(extract_json_payload("```[3]```").unwrap(), "[3]");
    }

    #[test]
    fn test_unterminated_fences_fail_closed() {
        assert_eq!(
            extract_json_payload("```json\n[{\"title\":\"T\"}]"),
            Err(ParseError::UnterminatedFence)
        );
        assert_eq!(
            extract_json_payload("```\n[]"),
            Err(ParseError::UnterminatedFence)
        );
    }

    #[test]
    fn test_bare_json() {
        let raw = r#"[{"title":"Pasta","ingredients":{"necessary_items":[],"optional_items":[]},"procedure":"...","summary":"...","youtube":null}]"#;
        let recipes = parse_recipes(raw).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title_text(), "Pasta");
        assert_eq!(recipes[0].youtube, None);
        assert_eq!(
            recipes[0].ingredients.as_ref().unwrap().necessary_items,
            Some(Vec::new())
        );
    }

    #[test]
    fn test_non_string_text_fields_parse() {
        let raw = r#"[{"title":"Pasta","ingredients":{"necessary_items":["p1"]},"procedure":["Boil water","Cook pasta"],"youtube":null}]"#;
        let recipes = parse_recipes(raw).unwrap();
        assert_eq!(recipes[0].procedure, Some(json!(["Boil water", "Cook pasta"])));

        let recipes =
            parse_recipes(r#"[{"title":"Pasta","youtube":{"url":"https://y"}}]"#).unwrap();
        assert_eq!(recipes[0].youtube, Some(json!({"url": "https://y"})));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_recipes("I could not make a recipe with these ingredients."),
            Err(ParseError::InvalidJson(_))
        ));
        // An object is not an array
        assert!(matches!(
            parse_recipes(r#"{"title":"T"}"#),
            Err(ParseError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_clean_removes_details_and_is_idempotent() {
        let recipes: Vec<Recipe> = serde_json::from_value(json!([
            {
                "title": "A",
                "ingredients": {
                    "necessary_items": ["1"],
                    "necessary_items_details": [{"id": "1"}],
                    "optional_items": [],
                    "optional_items_details": "garbage"
                }
            },
            {"title": "B"}
        ]))
        .unwrap();

        let once = clean_recipes(recipes);
        let ingredients = once[0].ingredients.as_ref().unwrap();
        assert!(ingredients.extra.is_empty());
        assert_eq!(ingredients.necessary_items.as_ref().unwrap().len(), 1);
        assert!(once[1].ingredients.is_none());

        let twice = clean_recipes(once.clone());
        assert_eq!(once, twice);
    }
}
