//! # Catalog Context Builder
//!
//! Assembles the bounded, deduplicated list of catalog items a single
//! generation request may draw from. Selection merges three sources, in
//! priority order:
//!
//! 1. Search matches for the user's `ingredients_to_include` terms
//! 2. Items from the categories associated with the requested cuisine
//! 3. Random fill when fewer than [`MIN_CANDIDATES`] items were selected
//!
//! The result never exceeds [`MAX_CANDIDATES`] entries and holds each
//! catalog id at most once.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

use crate::catalog_model::{CandidateIngredient, CatalogItem};
use crate::catalog_store::CatalogStore;
use crate::errors::CatalogError;
use crate::recipe_model::Preferences;

/// Upper bound on the candidate list
pub const MAX_CANDIDATES: usize = 100;
/// Below this many candidates, random items are added
pub const MIN_CANDIDATES: usize = 50;
/// Items taken from each cuisine category
pub const ITEMS_PER_CATEGORY: usize = 20;

const ITALIAN_CATEGORIES: &[&str] = &["Vegetables", "Dairy", "Grains", "Herbs"];
const ASIAN_CATEGORIES: &[&str] = &["Vegetables", "Seafood", "Grains", "Spices"];
const MEXICAN_CATEGORIES: &[&str] = &["Vegetables", "Meat", "Grains", "Spices"];
const INDIAN_CATEGORIES: &[&str] = &["Vegetables", "Dairy", "Grains", "Spices"];
const DEFAULT_CATEGORIES: &[&str] = &["Vegetables", "Meat", "Grains", "Dairy"];

/// Catalog categories associated with a cuisine (case-insensitive)
///
/// Unknown cuisines fall back to a general-purpose set.
///
/// # Examples
///
/// ```rust
/// use recipe_generator::context_builder::cuisine_categories;
///
/// assert_eq!(cuisine_categories("Italian"), &["Vegetables", "Dairy", "Grains", "Herbs"]);
/// assert_eq!(cuisine_categories("martian"), &["Vegetables", "Meat", "Grains", "Dairy"]);
/// ```
pub fn cuisine_categories(cuisine: &str) -> &'static [&'static str] {
    match cuisine.trim().to_lowercase().as_str() {
        "italian" => ITALIAN_CATEGORIES,
        "asian" => ASIAN_CATEGORIES,
        "mexican" => MEXICAN_CATEGORIES,
        "indian" => INDIAN_CATEGORIES,
        _ => DEFAULT_CATEGORIES,
    }
}

/// Catalog integration capability
///
/// Holds the store handle together with the category set loaded at
/// initialization. A process that fails to build one runs without catalog
/// constraints.
#[derive(Clone)]
pub struct CatalogContext {
    store: Arc<dyn CatalogStore>,
    categories: BTreeSet<String>,
}

impl std::fmt::Debug for CatalogContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogContext")
            .field("categories", &self.categories)
            .finish_non_exhaustive()
    }
}

impl CatalogContext {
    /// Load the known category set from `store`
    pub async fn initialize(store: Arc<dyn CatalogStore>) -> Result<Self, CatalogError> {
        let categories = store.categories().await?;
        info!(
            categories = categories.len(),
            "Catalog integration initialized"
        );
        Ok(Self { store, categories })
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// Items matching a free-text term
    pub async fn search_ingredients(&self, term: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        self.store.search_items(term).await
    }

    /// Every catalog item, optionally scoped to one category
    pub async fn available_ingredients(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        self.store.available_items(category).await
    }

    /// Build the candidate ingredient list for `preferences`
    pub async fn build_context(
        &self,
        preferences: &Preferences,
    ) -> Result<Vec<CandidateIngredient>, CatalogError> {
        let mut collected: Vec<CatalogItem> = Vec::new();

        if let Some(cuisine) = preferences.cuisine() {
            for category in cuisine_categories(cuisine) {
                if !self.categories.contains(*category) {
                    debug!(category, "Cuisine category not present in catalog");
                    continue;
                }
                let items = self.store.items_by_category(category).await?;
                collected.extend(items.into_iter().take(ITEMS_PER_CATEGORY));
            }
        }

        let terms = preferences.ingredients_to_include();
        if !terms.is_empty() {
            let mut matches = Vec::new();
            for term in terms {
                let found = self.store.search_items(term).await?;
                debug!(term, matches = found.len(), "Included ingredient searched");
                matches.extend(found);
            }
            matches.append(&mut collected);
            collected = matches;
        }

        if collected.len() < MIN_CANDIDATES {
            let fill = self.store.sample(None, MIN_CANDIDATES - collected.len()).await?;
            collected.extend(fill);
        }

        let candidates = dedupe_and_project(collected);
        info!(candidates = candidates.len(), "Catalog context built");
        Ok(candidates)
    }
}

/// First-seen-wins dedupe by id, capped at [`MAX_CANDIDATES`]
fn dedupe_and_project(items: Vec<CatalogItem>) -> Vec<CandidateIngredient> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.id.clone()))
        .take(MAX_CANDIDATES)
        .map(CandidateIngredient::from)
        .collect()
}
