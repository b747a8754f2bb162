//! # Ingredient Verifier
//!
//! Cross-checks the ingredient references of generated recipes against the
//! catalog and attaches full item records.
//!
//! Each recipe costs one batched store lookup covering both its necessary
//! and optional references. Unknown ids are filtered out silently; a recipe
//! left without any valid necessary ingredient is dropped. Only store
//! failures are reported as errors.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::catalog_model::CatalogItem;
use crate::catalog_store::CatalogStore;
use crate::errors::CatalogError;
use crate::recipe_model::{IngredientRef, Recipe, VerifiedIngredients, VerifiedRecipe};

/// Verify `recipes`, keeping input order for the survivors
pub async fn verify_recipes(
    store: &dyn CatalogStore,
    recipes: Vec<Recipe>,
) -> Result<Vec<VerifiedRecipe>, CatalogError> {
    let total = recipes.len();
    let mut verified = Vec::with_capacity(total);

    for recipe in recipes {
        if let Some(recipe) = verify_recipe(store, recipe).await? {
            verified.push(recipe);
        }
    }

    info!(total, verified = verified.len(), "Recipe verification completed");
    Ok(verified)
}

/// Verify a single recipe; `None` means it was dropped
pub async fn verify_recipe(
    store: &dyn CatalogStore,
    recipe: Recipe,
) -> Result<Option<VerifiedRecipe>, CatalogError> {
    let Recipe {
        title,
        summary,
        ingredients,
        procedure,
        youtube,
        extra,
    } = recipe;

    let Some(mut ingredients) = ingredients else {
        debug!(title = ?title, "Skipping recipe without ingredients");
        return Ok(None);
    };
    ingredients.strip_details();

    let necessary = ingredients.necessary_items.take().unwrap_or_default();
    let optional = ingredients.optional_items.take();

    let mut ids: Vec<String> = necessary
        .iter()
        .chain(optional.iter().flatten())
        .filter_map(IngredientRef::id)
        .map(str::to_string)
        .collect();
    ids.sort();
    ids.dedup();

    let found: HashMap<String, CatalogItem> = store
        .items_by_ids(&ids)
        .await?
        .into_iter()
        .map(|item| (item.id.clone(), item))
        .collect();

    let (necessary_items, necessary_items_details) = resolve(necessary, &found);
    if necessary_items.is_empty() {
        warn!(title = ?title, "Dropping recipe with no valid necessary ingredients");
        return Ok(None);
    }

    let (optional_items, optional_items_details) = match optional {
        Some(refs) => {
            let (items, details) = resolve(refs, &found);
            (Some(items), Some(details))
        }
        None => (None, None),
    };

    Ok(Some(VerifiedRecipe {
        title,
        summary,
        ingredients: VerifiedIngredients {
            necessary_items,
            necessary_items_details,
            optional_items,
            optional_items_details,
            extra: ingredients.extra,
        },
        procedure,
        youtube,
        extra,
    }))
}

/// Keep references that resolved, plus one detail record per distinct id
fn resolve(
    refs: Vec<IngredientRef>,
    found: &HashMap<String, CatalogItem>,
) -> (Vec<IngredientRef>, Vec<CatalogItem>) {
    let mut kept = Vec::new();
    let mut details: Vec<CatalogItem> = Vec::new();

    for reference in refs {
        let Some(item) = reference.id().and_then(|id| found.get(id)) else {
            debug!(reference = ?reference, "Discarding unknown ingredient reference");
            continue;
        };
        if !details.iter().any(|d| d.id == item.id) {
            details.push(item.clone());
        }
        kept.push(reference);
    }

    (kept, details)
}
