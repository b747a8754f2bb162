//! # Configuration Module
//!
//! Runtime settings for the recipe service, read from the environment (and
//! a `.env` file when present, loaded by the binary before calling
//! [`AppConfig::from_env`]).

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::generation::{DEFAULT_API_BASE, DEFAULT_MODEL};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Generative service settings
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// API key (`GEMINI_API_KEY`, falling back to `GOOGLE_API_KEY`)
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Service base URL
    pub api_base: String,
    /// Client-side request timeout; none by default
    pub timeout: Option<Duration>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: None,
        }
    }
}

/// Catalog store settings
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// PostgreSQL URL; catalog integration is disabled when unset
    pub database_url: Option<String>,
    /// Pool size
    pub max_connections: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub catalog: CatalogConfig,
    pub generation: GenerationConfig,
    /// Run the verifier before responding on the recipe routes
    pub verify_recipes: bool,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            catalog: CatalogConfig::default(),
            generation: GenerationConfig::default(),
            verify_recipes: false,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:5000")?;

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<NonZeroU32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?
                .get(),
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let timeout = match get("GENERATION_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(
                raw.parse::<u64>()
                    .context("GENERATION_TIMEOUT_SECS must be a number of seconds")?,
            )),
            None => None,
        };

        let verify_recipes = match get("VERIFY_RECIPES") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("VERIFY_RECIPES must be true or false, got {raw}"))?,
            None => false,
        };

        let log_format = match get("LOG_FORMAT").as_deref() {
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            bind_addr,
            catalog: CatalogConfig {
                database_url: get("DATABASE_URL"),
                max_connections,
            },
            generation: GenerationConfig {
                api_key: get("GEMINI_API_KEY").or_else(|| get("GOOGLE_API_KEY")),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_base: get("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
                timeout,
            },
            verify_recipes,
            log_format,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
