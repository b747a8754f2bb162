//! Prompt construction for recipe generation.
//!
//! The base template fixes the output shape and the hard constraints; when a
//! catalog context is available the candidate list and the catalog rules are
//! appended after it.

use crate::catalog_model::CandidateIngredient;
use crate::recipe_model::Preferences;

const CATALOG_RULES: &[&str] = &[
    "The necessary_items and optional_items in your response must ONLY contain id values from this list.",
    "DO NOT make up or generate any id values.",
    "Only use the exact id strings provided in the catalog above.",
    "Make sure all ingredients needed for the recipe are available in the catalog.",
    "If you can't make a good recipe with these ingredients, say so rather than making up ingredients.",
];

/// Render the generation prompt
///
/// `candidates` is `None` when catalog integration is disabled, in which case
/// only the base template is returned.
pub fn compose_prompt(
    preferences: &Preferences,
    candidates: Option<&[CandidateIngredient]>,
) -> String {
    let mut prompt = base_prompt(preferences);

    if let Some(candidates) = candidates {
        prompt.push_str("\n\n");
        prompt.push_str(&catalog_block(candidates));
    }

    prompt
}

fn base_prompt(preferences: &Preferences) -> String {
    let preferences_json = pretty_json(preferences);

    format!(
        r#"You are a professional chef and recipe creator. Generate 1 unique recipe based on the following preferences:
{preferences_json}

For each recipe, provide the following information in a structured JSON format:

1. title: A catchy title for the recipe
2. summary: A concise summary of the recipe in maximum 100 words
3. ingredients: A list of ingredients with quantities, separated into:
   - necessary_items: List of essential ingredients with their details (id, item_name, packet_weight_grams, price, quantity)
   - optional_items: List of optional ingredients with their details (id, item_name, packet_weight_grams, price, quantity)
4. procedure: Detailed step-by-step cooking instructions in maximum 500 words with quantity of ingredient to use.
5. youtube: If you know of a relevant YouTube tutorial for a similar recipe, include the link (or null if not applicable)

CRITICAL INSTRUCTIONS:
- You will be provided with a catalog of available ingredients with their id values.
- The necessary_items and optional_items must ONLY contain ingredients from this catalog.
- DO NOT invent or generate any id values.
- Only use the exact id strings provided in the catalog.
- Make sure all ingredients needed for the recipe are available in the catalog.
- If you can't make a good recipe with the available ingredients, say so rather than making up ingredients.
- DO NOT include necessary_items_details or optional_items_details fields in your response.
- Always include id, item_name, packet_weight_grams, price, quantity in necessary_items and optional_items.
- Quantity is the number of packets that should be included.
- A YouTube video must be at least 6 months old and must be accessible.

Return your response as a valid JSON array with 1 recipe object. Each object should have the structure described above.
Do not include any explanations or text outside of the JSON structure."#
    )
}

fn catalog_block(candidates: &[CandidateIngredient]) -> String {
    let rules = CATALOG_RULES
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{}. {rule}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "IMPORTANT: You must ONLY use ingredients from the following catalog in your recipe. \
         DO NOT invent or use any ingredients not listed here.\n\n\
         Available ingredients from the grocery catalog:\n{}\n\n\
         IMPORTANT INSTRUCTIONS:\n{rules}",
        pretty_json(&candidates)
    )
}

fn pretty_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    // Serializing plain maps and structs cannot fail
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(id: &str, name: &str) -> CandidateIngredient {
        CandidateIngredient {
            id: id.to_string(),
            item_name: name.to_string(),
            category: "Vegetables".to_string(),
            packet_weight_grams: 500,
            price: 2.0,
        }
    }

    #[test]
    fn test_prompt_echoes_all_preferences() {
        let prefs = Preferences::new()
            .with("cuisine", "italian")
            .with("dietary", "vegetarian")
            .with("cooking_time", "30 minutes");

        let prompt = compose_prompt(&prefs, None);
        assert!(prompt.contains("professional chef"));
        assert!(prompt.contains("\"dietary\": \"vegetarian\""));
        assert!(prompt.contains("\"cooking_time\": \"30 minutes\""));
        assert!(prompt.contains("JSON array with 1 recipe object"));
        assert!(prompt.contains("at least 6 months old"));
    }

    #[test]
    fn test_prompt_without_catalog_has_no_catalog_block() {
        let prompt = compose_prompt(&Preferences::new(), None);
        assert!(!prompt.contains("Available ingredients from the grocery catalog"));
        assert!(prompt.contains("{}"));
    }

    #[test]
    fn test_prompt_with_catalog_embeds_candidates_and_rules() {
        let candidates = vec![candidate("abc123", "Roma Tomato"), candidate("def456", "Basil")];
        let prefs = Preferences::new().with("ingredients_to_include", json!(["tomato"]));

        let prompt = compose_prompt(&prefs, Some(&candidates));
        assert!(prompt.contains("Available ingredients from the grocery catalog:"));
        assert!(prompt.contains("\"id\": \"abc123\""));
        assert!(prompt.contains("\"item_name\": \"Basil\""));
        assert!(prompt.contains("1. The necessary_items and optional_items"));
        assert!(prompt.contains("5. If you can't make a good recipe"));

        // Catalog block follows the base template
        let base_end = prompt.find("Do not include any explanations").unwrap();
        let catalog_start = prompt.find("Available ingredients").unwrap();
        assert!(catalog_start > base_end);
    }

    #[test]
    fn test_empty_candidate_list_still_renders_block() {
        let prompt = compose_prompt(&Preferences::new(), Some(&[]));
        assert!(prompt.contains("Available ingredients from the grocery catalog:\n[]"));
    }
}
