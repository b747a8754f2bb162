//! # Recipe Data Model
//!
//! This module defines the request and response shapes of the recipe
//! pipeline: user [`Preferences`], the [`Recipe`] records decoded from model
//! output, and the [`VerifiedRecipe`] records produced by the verifier.
//!
//! ## Leniency
//!
//! Model output is only loosely shaped. Every recipe field is optional or
//! defaulted, unknown keys are preserved in `extra` maps, and an ingredient
//! reference may be a bare id string, an item object, or anything else
//! (kept verbatim as [`IngredientRef::Unresolved`]). Only the outer shape, a
//! JSON array of objects, is required.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog_model::CatalogItem;
use crate::errors::RecipeError;

/// Key under which the model may (wrongly) emit necessary item details
pub const NECESSARY_DETAILS_KEY: &str = "necessary_items_details";
/// Key under which the model may (wrongly) emit optional item details
pub const OPTIONAL_DETAILS_KEY: &str = "optional_items_details";

/// User preferences for a generation request
///
/// A JSON object. `cuisine` and `ingredients_to_include` drive catalog
/// selection; every key, recognized or not, is echoed into the prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(Map<String, Value>);

impl Preferences {
    /// Create empty preferences
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build preferences from an arbitrary JSON value
    ///
    /// `null` is treated as empty preferences. Anything other than an
    /// object is rejected.
    pub fn from_value(value: Value) -> Result<Self, RecipeError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(Self(map)),
            other => Err(RecipeError::InvalidPreferences(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Parse preferences from a JSON string (blank strings are empty preferences)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_generator::recipe_model::Preferences;
    ///
    /// let prefs = Preferences::from_json_str(r#"{"cuisine": "Italian"}"#).unwrap();
    /// assert_eq!(prefs.cuisine(), Some("Italian"));
    /// assert!(Preferences::from_json_str("").unwrap().is_empty());
    /// ```
    pub fn from_json_str(raw: &str) -> Result<Self, RecipeError> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| RecipeError::InvalidPreferences(e.to_string()))?;
        Self::from_value(value)
    }

    /// Builder-style insert, mostly useful in tests
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// The requested cuisine, if given as a string
    pub fn cuisine(&self) -> Option<&str> {
        self.0.get("cuisine").and_then(Value::as_str)
    }

    /// Free-text ingredient terms to prioritize
    ///
    /// Accepts an array of strings or a single string. Blank terms and
    /// non-string entries are ignored.
    pub fn ingredients_to_include(&self) -> Vec<&str> {
        match self.0.get("ingredients_to_include") {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|term| !term.is_empty())
                .collect(),
            Some(Value::String(term)) if !term.trim().is_empty() => vec![term.trim()],
            _ => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// An ingredient object as the model is asked to emit it
///
/// Only the identifier decides whether the reference resolves; the
/// display fields are advisory and kept as whatever JSON the model wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemReference {
    #[serde(alias = "_id")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet_weight_grams: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,

    /// Number of packets (models emit numbers or strings)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A reference from a recipe to a catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientRef {
    /// A bare identifier
    Id(String),
    /// An item object carrying an identifier
    Item(ItemReference),
    /// Anything else the model produced
    Unresolved(Value),
}

impl IngredientRef {
    /// The catalog identifier this reference points at, if it has one
    pub fn id(&self) -> Option<&str> {
        match self {
            IngredientRef::Id(id) => Some(id.as_str()),
            IngredientRef::Item(item) => Some(item.id.as_str()),
            IngredientRef::Unresolved(_) => None,
        }
    }
}

/// A recipe's ingredient block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredients {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub necessary_items: Option<Vec<IngredientRef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_items: Option<Vec<IngredientRef>>,

    /// Any other keys, including detail lists the model should not emit
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecipeIngredients {
    /// Remove detail-enrichment fields, returning whether anything was removed
    pub fn strip_details(&mut self) -> bool {
        let necessary = self.extra.remove(NECESSARY_DETAILS_KEY).is_some();
        let optional = self.extra.remove(OPTIONAL_DETAILS_KEY).is_some();
        necessary || optional
    }
}

/// A recipe as produced by the generative model
///
/// Text fields hold raw JSON: models sometimes answer with a list of steps
/// for `procedure` or an object for `youtube`, and those pass through as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,

    /// Short summary (advisory limit of 100 words)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<RecipeIngredients>,

    /// Step-by-step instructions (advisory limit of 500 words)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure: Option<Value>,

    /// Tutorial link, `null` when the model knows none
    #[serde(default)]
    pub youtube: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Recipe {
    /// The title when it is a string, otherwise `""`
    pub fn title_text(&self) -> &str {
        text_or_empty(self.title.as_ref())
    }
}

fn text_or_empty(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or_default()
}

/// Ingredient block whose references have all been resolved against the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedIngredients {
    pub necessary_items: Vec<IngredientRef>,
    pub necessary_items_details: Vec<CatalogItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_items: Option<Vec<IngredientRef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_items_details: Option<Vec<CatalogItem>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A recipe that passed verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiedRecipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,

    pub ingredients: VerifiedIngredients,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure: Option<Value>,

    #[serde(default)]
    pub youtube: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerifiedRecipe {
    /// The title when it is a string, otherwise `""`
    pub fn title_text(&self) -> &str {
        text_or_empty(self.title.as_ref())
    }
}

impl From<VerifiedRecipe> for Recipe {
    /// Drops the detail lists; they are re-fetched on the next verification
    fn from(verified: VerifiedRecipe) -> Self {
        let ingredients = RecipeIngredients {
            necessary_items: Some(verified.ingredients.necessary_items),
            optional_items: verified.ingredients.optional_items,
            extra: verified.ingredients.extra,
        };
        Recipe {
            title: verified.title,
            summary: verified.summary,
            ingredients: Some(ingredients),
            procedure: verified.procedure,
            youtube: verified.youtube,
            extra: verified.extra,
        }
    }
}
