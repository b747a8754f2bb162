use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use recipe_generator::api::{router, AppState};
use recipe_generator::catalog_store::{CatalogStore, PgCatalogStore};
use recipe_generator::config::{AppConfig, CatalogConfig};
use recipe_generator::context_builder::CatalogContext;
use recipe_generator::generation::{GeminiClient, TextGenerator};
use recipe_generator::recipe_service::RecipeService;
use recipe_generator::telemetry::init_tracing;

/// Connect the catalog, or run without it when that is not possible
async fn connect_catalog(config: &CatalogConfig) -> Option<CatalogContext> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set; catalog integration disabled");
        return None;
    };

    let store = match PgCatalogStore::connect(database_url, config.max_connections).await {
        Ok(store) => store,
        Err(e) => {
            warn!(error = %e, "Catalog integration service not available");
            return None;
        }
    };

    let store: Arc<dyn CatalogStore> = Arc::new(store);
    match CatalogContext::initialize(store).await {
        Ok(context) => Some(context),
        Err(e) => {
            warn!(error = %e, "Failed to initialize catalog integration");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    info!("Starting recipe generator");

    let generation = &config.generation;
    if generation.api_key.is_none() {
        warn!("GEMINI_API_KEY not set; generation requests will fail");
    }
    let api_key = generation.api_key.clone().unwrap_or_default();
    let mut client =
        GeminiClient::new(api_key, &generation.model).with_base_url(&generation.api_base);
    if let Some(timeout) = generation.timeout {
        client = client.with_timeout(timeout)?;
    }
    let generator: Arc<dyn TextGenerator> = Arc::new(client);

    let catalog = connect_catalog(&config.catalog).await;
    let service = Arc::new(RecipeService::new(catalog, generator));
    let app = router(AppState::new(service, config.verify_recipes));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, verify = config.verify_recipes, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}
