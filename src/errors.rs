//! # Error Types Module
//!
//! This module defines the error taxonomy of the recipe pipeline. Every
//! stage has its own error type so call sites can decide between degrading
//! (catalog failures) and aborting the request (generation and parse
//! failures). At the HTTP layer they all collapse into a flat
//! `{"error": message}` body.

/// Catalog store failures (connection loss, query errors, bad rows)
#[derive(Debug, Clone)]
pub enum CatalogError {
    /// The store could not be reached or the pool could not be created
    Unavailable(String),
    /// A query was issued but failed
    Query(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Unavailable(msg) => write!(f, "Catalog unavailable: {msg}"),
            CatalogError::Query(msg) => write!(f, "Catalog query failed: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => CatalogError::Unavailable(err.to_string()),
            other => CatalogError::Query(other.to_string()),
        }
    }
}

/// Generative text service failures
#[derive(Debug, Clone)]
pub enum GenerationError {
    /// The HTTP request could not be sent or the body could not be read
    RequestFailed(String),
    /// The service answered with a non-success status
    Api { status: u16, message: String },
    /// The service body was not the expected envelope
    InvalidResponse(String),
    /// The service answered without any text
    EmptyResponse,
    /// The client is missing required configuration (API key)
    NotConfigured(String),
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::RequestFailed(msg) => write!(f, "Generation request failed: {msg}"),
            GenerationError::Api { status, message } => {
                write!(f, "Generation service returned {status}: {message}")
            }
            GenerationError::InvalidResponse(msg) => {
                write!(f, "Generation service response could not be decoded: {msg}")
            }
            GenerationError::EmptyResponse => write!(f, "Generation service returned no text"),
            GenerationError::NotConfigured(msg) => {
                write!(f, "Generation client not configured: {msg}")
            }
        }
    }
}

impl std::error::Error for GenerationError {}

/// Failures turning model text into recipe records
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// An opening code fence was found without a closing one
    UnterminatedFence,
    /// The extracted payload is not a JSON array of recipe objects
    InvalidJson(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnterminatedFence => {
                write!(f, "Failed to parse model response: unterminated code fence")
            }
            ParseError::InvalidJson(msg) => {
                write!(f, "Failed to parse model response as JSON: {msg}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Pipeline-level error returned to the HTTP layer
#[derive(Debug, Clone)]
pub enum RecipeError {
    /// Preferences were not a JSON object
    InvalidPreferences(String),
    /// Catalog failure on a path that cannot degrade (verification)
    Catalog(CatalogError),
    Generation(GenerationError),
    Parse(ParseError),
}

impl std::fmt::Display for RecipeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipeError::InvalidPreferences(msg) => {
                write!(f, "Recipe generation failed: invalid preferences: {msg}")
            }
            RecipeError::Catalog(err) => write!(f, "Recipe generation failed: {err}"),
            RecipeError::Generation(err) => write!(f, "Recipe generation failed: {err}"),
            RecipeError::Parse(err) => write!(f, "Recipe generation failed: {err}"),
        }
    }
}

impl std::error::Error for RecipeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecipeError::InvalidPreferences(_) => None,
            RecipeError::Catalog(err) => Some(err),
            RecipeError::Generation(err) => Some(err),
            RecipeError::Parse(err) => Some(err),
        }
    }
}

impl From<CatalogError> for RecipeError {
    fn from(err: CatalogError) -> Self {
        RecipeError::Catalog(err)
    }
}

impl From<GenerationError> for RecipeError {
    fn from(err: GenerationError) -> Self {
        RecipeError::Generation(err)
    }
}

impl From<ParseError> for RecipeError {
    fn from(err: ParseError) -> Self {
        RecipeError::Parse(err)
    }
}
