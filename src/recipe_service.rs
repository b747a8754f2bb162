//! # Recipe Service
//!
//! The request pipeline: catalog context → prompt → generation → parse →
//! clean, with verification as an optional final pass.
//!
//! Collaborators are injected at construction. The catalog is an optional
//! capability: without it, and whenever building the per-request context
//! fails, prompts go out without catalog constraints.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::context_builder::CatalogContext;
use crate::errors::{CatalogError, RecipeError};
use crate::generation::TextGenerator;
use crate::prompt::compose_prompt;
use crate::recipe_model::{Preferences, Recipe, VerifiedRecipe};
use crate::response_parser::{clean_recipes, parse_recipes};
use crate::verifier::verify_recipes;

const PROMPT_LOG_CHARS: usize = 500;

/// Shared recipe generation pipeline
#[derive(Clone)]
pub struct RecipeService {
    catalog: Option<CatalogContext>,
    generator: Arc<dyn TextGenerator>,
}

impl std::fmt::Debug for RecipeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeService")
            .field("catalog", &self.catalog)
            .field("model", &self.generator.model_name())
            .finish()
    }
}

impl RecipeService {
    pub fn new(catalog: Option<CatalogContext>, generator: Arc<dyn TextGenerator>) -> Self {
        if catalog.is_none() {
            warn!("Catalog integration is not enabled; prompts will not include catalog data");
        }
        Self { catalog, generator }
    }

    pub fn catalog_enabled(&self) -> bool {
        self.catalog.is_some()
    }

    /// Build the prompt for `preferences`, degrading to an unconstrained prompt
    pub async fn build_prompt(&self, preferences: &Preferences) -> String {
        debug!(preferences = ?preferences.as_map(), "Composing prompt");

        let candidates = match &self.catalog {
            Some(catalog) => match catalog.build_context(preferences).await {
                Ok(candidates) => Some(candidates),
                Err(e) => {
                    warn!(
                        error = %e,
                        "Failed to build catalog context; continuing without catalog"
                    );
                    None
                }
            },
            None => None,
        };

        let prompt = compose_prompt(preferences, candidates.as_deref());
        debug!(
            prompt_chars = prompt.len(),
            prompt_head = %truncate_chars(&prompt, PROMPT_LOG_CHARS),
            "Prompt composed"
        );
        prompt
    }

    /// Generate cleaned, unverified recipes
    pub async fn generate_recipes(
        &self,
        preferences: &Preferences,
    ) -> Result<Vec<Recipe>, RecipeError> {
        let prompt = self.build_prompt(preferences).await;

        let raw = self.generator.generate(&prompt).await?;
        let recipes = parse_recipes(&raw)?;
        info!(recipes = recipes.len(), "Parsed recipes from model response");

        Ok(clean_recipes(recipes))
    }

    /// Generate recipes and verify them against the catalog
    ///
    /// Fails with a catalog error when the catalog capability is absent;
    /// verification cannot degrade.
    pub async fn generate_verified_recipes(
        &self,
        preferences: &Preferences,
    ) -> Result<Vec<VerifiedRecipe>, RecipeError> {
        let catalog = self.catalog.as_ref().ok_or_else(|| {
            RecipeError::Catalog(CatalogError::Unavailable(
                "catalog integration is disabled".to_string(),
            ))
        })?;

        let recipes = self.generate_recipes(preferences).await?;
        Ok(verify_recipes(catalog.store().as_ref(), recipes).await?)
    }

    /// Verify already generated recipes
    pub async fn verify(&self, recipes: Vec<Recipe>) -> Result<Vec<VerifiedRecipe>, RecipeError> {
        let catalog = self.catalog.as_ref().ok_or_else(|| {
            RecipeError::Catalog(CatalogError::Unavailable(
                "catalog integration is disabled".to_string(),
            ))
        })?;
        Ok(verify_recipes(catalog.store().as_ref(), recipes).await?)
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
