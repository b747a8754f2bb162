//! # HTTP API Module
//!
//! Routes:
//!
//! - `POST /api/recipes`: JSON preferences in the body
//! - `GET /api/recipes`: deprecated, JSON preferences in the `preferences`
//!   query parameter (defaults to `{}`)
//! - `GET /api/health`: liveness probe, answers `OK`
//!
//! Every failure is reported as HTTP 500 with a `{"error": message}` body.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::errors::RecipeError;
use crate::recipe_model::Preferences;
use crate::recipe_service::RecipeService;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    service: Arc<RecipeService>,
    verify_recipes: bool,
}

impl AppState {
    pub fn new(service: Arc<RecipeService>, verify_recipes: bool) -> Self {
        Self {
            service,
            verify_recipes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ErrorBody {
    error: String,
}

/// Caller-facing error; always rendered as a 500
#[derive(Debug)]
pub struct ApiError(String);

impl From<RecipeError> for ApiError {
    fn from(err: RecipeError) -> Self {
        ApiError(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody { error: self.0 }),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
struct RecipesQuery {
    preferences: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/recipes", post(create_recipes).get(get_recipes))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn create_recipes(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let preferences = preferences_from_body(&body)?;
    respond(&state, &preferences).await
}

async fn get_recipes(
    State(state): State<AppState>,
    query: Result<Query<RecipesQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError(e.body_text()))?;
    let raw = query.preferences.unwrap_or_else(|| "{}".to_string());
    let preferences = Preferences::from_json_str(&raw)?;
    respond(&state, &preferences).await
}

/// Empty bodies and `null` mean "no preferences"
fn preferences_from_body(body: &[u8]) -> Result<Preferences, RecipeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Preferences::new());
    }
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| RecipeError::InvalidPreferences(e.to_string()))?;
    Preferences::from_value(value)
}

async fn respond(state: &AppState, preferences: &Preferences) -> Result<Response, ApiError> {
    if state.verify_recipes {
        let recipes = state.service.generate_verified_recipes(preferences).await?;
        info!(recipes = recipes.len(), "Returning verified recipes");
        Ok(Json(recipes).into_response())
    } else {
        let recipes = state.service.generate_recipes(preferences).await?;
        info!(recipes = recipes.len(), "Returning recipes without verification");
        Ok(Json(recipes).into_response())
    }
}
