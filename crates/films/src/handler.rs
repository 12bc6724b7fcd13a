use crate::models::{Category, Film, FilmFilters, FilmListResponse, DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::service::{FilmError, FilmService};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use common::ApiError;
use serde::Deserialize;
use std::sync::Arc;

impl FilmError {
    /// `summary` is only used for backend failures; other kinds have fixed summaries.
    pub fn into_api_error(self, summary: &str) -> ApiError {
        let details = self.to_string();
        match self {
            FilmError::NotFound => ApiError::not_found("Film not found", details),
            FilmError::InvalidInput(_) => ApiError::bad_request("Validation failed", details),
            FilmError::Infrastructure(_) => ApiError::internal(summary, details),
        }
    }
}

/// Parses a path segment into a film id, rejecting anything non-numeric.
pub fn parse_film_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|e| ApiError::bad_request("Invalid film ID", e))
}

#[derive(Debug, Default, Deserialize)]
pub struct FilmListParams {
    pub title: Option<String>,
    pub rating: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl FilmListParams {
    // Missing, malformed or non-positive pagination falls back to the defaults here,
    // so only ranges the service rejects (e.g. limit > 100) reach it as errors.
    pub fn into_filters(self) -> FilmFilters {
        FilmFilters {
            title: self.title.filter(|t| !t.is_empty()),
            rating: self.rating.filter(|r| !r.is_empty()),
            category: self.category.filter(|c| !c.is_empty()),
            page: positive_or(self.page.as_deref(), DEFAULT_PAGE),
            limit: positive_or(self.limit.as_deref(), DEFAULT_LIMIT),
        }
    }
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

pub fn films_router(service: Arc<dyn FilmService>) -> Router {
    Router::new()
        .route("/films", get(list_films))
        .route("/films/{id}", get(get_film))
        .route("/categories", get(list_categories))
        .with_state(service)
}

async fn list_films(
    State(service): State<Arc<dyn FilmService>>,
    Query(params): Query<FilmListParams>,
) -> Result<Json<FilmListResponse>, ApiError> {
    let films = service
        .get_films(params.into_filters())
        .await
        .map_err(|e| e.into_api_error("Failed to retrieve films"))?;
    Ok(Json(films))
}

async fn get_film(
    State(service): State<Arc<dyn FilmService>>,
    Path(id): Path<String>,
) -> Result<Json<Film>, ApiError> {
    let film_id = parse_film_id(&id)?;
    let film = service
        .get_film_by_id(film_id)
        .await
        .map_err(|e| e.into_api_error("Failed to retrieve film"))?;
    Ok(Json(film))
}

async fn list_categories(
    State(service): State<Arc<dyn FilmService>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = service
        .get_categories()
        .await
        .map_err(|e| e.into_api_error("Failed to retrieve categories"))?;
    Ok(Json(categories))
}
