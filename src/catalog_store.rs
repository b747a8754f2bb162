//! # Catalog Store Module
//!
//! Read-only access to the grocery catalog. The [`CatalogStore`] trait is
//! the seam the rest of the pipeline depends on; [`PgCatalogStore`] serves
//! it from PostgreSQL and [`InMemoryCatalogStore`] from a vector (tests and
//! local development).
//!
//! The catalog is populated by external bulk-load tooling. Nothing in this
//! crate writes to it.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info};

use crate::catalog_model::CatalogItem;
use crate::errors::CatalogError;

/// Read operations the pipeline needs from the catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Distinct category names present in the catalog
    async fn categories(&self) -> Result<BTreeSet<String>, CatalogError>;

    /// All items of one category
    async fn items_by_category(&self, category: &str) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Items whose name contains `term`, ignoring case
    async fn search_items(&self, term: &str) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Batched exists-and-fetch. Unknown ids are simply absent from the result.
    async fn items_by_ids(&self, ids: &[String]) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Point lookup by identifier
    async fn item_by_id(&self, id: &str) -> Result<Option<CatalogItem>, CatalogError>;

    /// Up to `count` random items, optionally scoped to a category
    async fn sample(
        &self,
        category: Option<&str>,
        count: usize,
    ) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Every item, optionally scoped to a category
    async fn available_items(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<CatalogItem>, CatalogError>;
}

const ITEM_COLUMNS: &str = "id, item_name, category, packet_weight_grams, price";

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    id: String,
    item_name: String,
    category: String,
    packet_weight_grams: i64,
    price: f64,
}

impl From<CatalogRow> for CatalogItem {
    fn from(row: CatalogRow) -> Self {
        CatalogItem {
            id: row.id,
            item_name: row.item_name,
            category: row.category,
            packet_weight_grams: row.packet_weight_grams,
            price: row.price,
        }
    }
}

/// Escape `%`, `_` and `\` so a search term matches literally inside ILIKE
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// PostgreSQL-backed catalog
///
/// Expects a `catalog_items` table with the columns
/// `id TEXT PRIMARY KEY, item_name TEXT, category TEXT,
/// packet_weight_grams BIGINT, price DOUBLE PRECISION`.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    /// Connect a pool to `database_url`
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, CatalogError> {
        info!(max_connections, "Connecting to catalog database");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        info!("Catalog database connection successful");
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn categories(&self) -> Result<BTreeSet<String>, CatalogError> {
        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM catalog_items")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories.into_iter().collect())
    }

    async fn items_by_category(&self, category: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        let sql =
            format!("SELECT {ITEM_COLUMNS} FROM catalog_items WHERE category = $1 ORDER BY id");
        let rows: Vec<CatalogRow> = sqlx::query_as(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CatalogItem::from).collect())
    }

    async fn search_items(&self, term: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM catalog_items \
             WHERE item_name ILIKE $1 ESCAPE '\\' ORDER BY id"
        );
        let pattern = format!("%{}%", escape_like(term));
        let rows: Vec<CatalogRow> = sqlx::query_as(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        debug!(term, matches = rows.len(), "Catalog search completed");
        Ok(rows.into_iter().map(CatalogItem::from).collect())
    }

    async fn items_by_ids(&self, ids: &[String]) -> Result<Vec<CatalogItem>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {ITEM_COLUMNS} FROM catalog_items WHERE id = ANY($1)");
        let rows: Vec<CatalogRow> = sqlx::query_as(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CatalogItem::from).collect())
    }

    async fn item_by_id(&self, id: &str) -> Result<Option<CatalogItem>, CatalogError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM catalog_items WHERE id = $1");
        let row: Option<CatalogRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(CatalogItem::from))
    }

    async fn sample(
        &self,
        category: Option<&str>,
        count: usize,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM catalog_items \
             WHERE ($1::TEXT IS NULL OR category = $1) \
             ORDER BY random() LIMIT $2"
        );
        let limit = i64::try_from(count).unwrap_or(i64::MAX);
        let rows: Vec<CatalogRow> = sqlx::query_as(&sql)
            .bind(category)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CatalogItem::from).collect())
    }

    async fn available_items(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM catalog_items \
             WHERE ($1::TEXT IS NULL OR category = $1) ORDER BY id"
        );
        let rows: Vec<CatalogRow> = sqlx::query_as(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CatalogItem::from).collect())
    }
}

/// Vector-backed catalog, preserving insertion order for every listing
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    items: Vec<CatalogItem>,
}

impl InMemoryCatalogStore {
    /// Create a store; later duplicates of an id are ignored
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .collect();
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn in_category<'a>(
        &'a self,
        category: Option<&'a str>,
    ) -> impl Iterator<Item = &'a CatalogItem> {
        self.items
            .iter()
            .filter(move |item| category.map_or(true, |c| item.category == c))
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn categories(&self) -> Result<BTreeSet<String>, CatalogError> {
        Ok(self.items.iter().map(|item| item.category.clone()).collect())
    }

    async fn items_by_category(&self, category: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        Ok(self.in_category(Some(category)).cloned().collect())
    }

    async fn search_items(&self, term: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        let needle = term.to_lowercase();
        Ok(self
            .items
            .iter()
            .filter(|item| item.item_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn items_by_ids(&self, ids: &[String]) -> Result<Vec<CatalogItem>, CatalogError> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        Ok(self
            .items
            .iter()
            .filter(|item| wanted.contains(item.id.as_str()))
            .cloned()
            .collect())
    }

    async fn item_by_id(&self, id: &str) -> Result<Option<CatalogItem>, CatalogError> {
        Ok(self.items.iter().find(|item| item.id == id).cloned())
    }

    async fn sample(
        &self,
        category: Option<&str>,
        count: usize,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        let pool: Vec<&CatalogItem> = self.in_category(category).collect();
        let mut rng = rand::thread_rng();
        Ok(pool
            .choose_multiple(&mut rng, count)
            .map(|item| (*item).clone())
            .collect())
    }

    async fn available_items(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        Ok(self.in_category(category).cloned().collect())
    }
}
