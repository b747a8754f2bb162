//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use recipe_generator::catalog_model::CatalogItem;
use recipe_generator::catalog_store::{CatalogStore, InMemoryCatalogStore};
use recipe_generator::errors::CatalogError;
use std::collections::BTreeSet;
use std::sync::Mutex;

/// A store call, recorded for assertions
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Categories,
    ItemsByCategory(String),
    Search(String),
    ItemsByIds(Vec<String>),
    ItemById(String),
    Sample(Option<String>, usize),
    Available(Option<String>),
}

/// In-memory store that records every call
pub struct RecordingStore {
    inner: InMemoryCatalogStore,
    calls: Mutex<Vec<StoreCall>>,
}

impl RecordingStore {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            inner: InMemoryCatalogStore::new(items),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CatalogStore for RecordingStore {
    async fn categories(&self) -> Result<BTreeSet<String>, CatalogError> {
        self.record(StoreCall::Categories);
        self.inner.categories().await
    }

    async fn items_by_category(&self, category: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        self.record(StoreCall::ItemsByCategory(category.to_string()));
        self.inner.items_by_category(category).await
    }

    async fn search_items(&self, term: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        self.record(StoreCall::Search(term.to_string()));
        self.inner.search_items(term).await
    }

    async fn items_by_ids(&self, ids: &[String]) -> Result<Vec<CatalogItem>, CatalogError> {
        self.record(StoreCall::ItemsByIds(ids.to_vec()));
        self.inner.items_by_ids(ids).await
    }

    async fn item_by_id(&self, id: &str) -> Result<Option<CatalogItem>, CatalogError> {
        self.record(StoreCall::ItemById(id.to_string()));
        self.inner.item_by_id(id).await
    }

    async fn sample(
        &self,
        category: Option<&str>,
        count: usize,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        self.record(StoreCall::Sample(category.map(str::to_string), count));
        self.inner.sample(category, count).await
    }

    async fn available_items(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        self.record(StoreCall::Available(category.map(str::to_string)));
        self.inner.available_items(category).await
    }
}

/// Store whose category listing works but every item query fails
pub struct BrokenStore {
    pub categories: BTreeSet<String>,
}

impl BrokenStore {
    fn fail<T>() -> Result<T, CatalogError> {
        Err(CatalogError::Unavailable("connection reset".to_string()))
    }
}

#[async_trait]
impl CatalogStore for BrokenStore {
    async fn categories(&self) -> Result<BTreeSet<String>, CatalogError> {
        Ok(self.categories.clone())
    }

    async fn items_by_category(&self, _category: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        Self::fail()
    }

    async fn search_items(&self, _term: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        Self::fail()
    }

    async fn items_by_ids(&self, _ids: &[String]) -> Result<Vec<CatalogItem>, CatalogError> {
        Self::fail()
    }

    async fn item_by_id(&self, _id: &str) -> Result<Option<CatalogItem>, CatalogError> {
        Self::fail()
    }

    async fn sample(
        &self,
        _category: Option<&str>,
        _count: usize,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        Self::fail()
    }

    async fn available_items(
        &self,
        _category: Option<&str>,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        Self::fail()
    }
}

/// A catalog with 30 items in each of seven categories, plus a few named items
pub fn grocery_catalog() -> Vec<CatalogItem> {
    let mut items = Vec::new();
    for category in ["Vegetables", "Dairy", "Grains", "Herbs", "Meat", "Spices", "Seafood"] {
        for n in 0..30 {
            items.push(CatalogItem::new(
                format!("{}-{n}", category.to_lowercase()),
                format!("{category} item {n}"),
                category,
                250,
                1.5,
            ));
        }
    }
    items.push(CatalogItem::new("tomato-roma", "Roma Tomato", "Vegetables", 500, 2.49));
    items.push(CatalogItem::new("basil-fresh", "Fresh Basil", "Herbs", 50, 1.99));
    items.push(CatalogItem::new("penne", "Penne Pasta", "Grains", 500, 1.29));
    items
}

/// Canned model answer from the Italian scenario
pub const PASTA_RESPONSE: &str = r#"[{"title":"Pasta","ingredients":{"necessary_items":[],"optional_items":[]},"procedure":"...","summary":"...","youtube":null}]"#;
