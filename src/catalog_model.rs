//! # Catalog Data Model
//!
//! Grocery items as stored in the catalog, and the trimmed projection of
//! them that is shown to the model as its allowed ingredient vocabulary.
//!
//! Identifiers are opaque strings at this boundary. The legacy document key
//! `_id` is accepted when deserializing so that catalog exports and model
//! echoes of older prompts still decode.

use serde::{Deserialize, Serialize};

/// A purchasable grocery item from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Store-native identifier rendered as a string
    #[serde(alias = "_id")]
    pub id: String,

    /// Display name (e.g., "Basmati Rice", "Fresh Basil")
    pub item_name: String,

    /// Catalog category (e.g., "Vegetables", "Dairy")
    pub category: String,

    /// Packet weight in grams
    pub packet_weight_grams: i64,

    /// Packet price
    pub price: f64,
}

/// The projection of a catalog item embedded in prompts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateIngredient {
    pub id: String,
    pub item_name: String,
    pub category: String,
    pub packet_weight_grams: i64,
    pub price: f64,
}

impl From<&CatalogItem> for CandidateIngredient {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            item_name: item.item_name.clone(),
            category: item.category.clone(),
            packet_weight_grams: item.packet_weight_grams,
            price: item.price,
        }
    }
}

impl CatalogItem {
    /// Create a catalog item
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_generator::catalog_model::CatalogItem;
    ///
    /// let basil = CatalogItem::new("64f0", "Fresh Basil", "Herbs", 50, 1.99);
    /// assert_eq!(basil.category, "Herbs");
    /// ```
    pub fn new(
        id: impl Into<String>,
        item_name: impl Into<String>,
        category: impl Into<String>,
        packet_weight_grams: i64,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            item_name: item_name.into(),
            category: category.into(),
            packet_weight_grams,
            price,
        }
    }
}
