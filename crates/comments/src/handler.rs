use crate::models::{Comment, CommentRequest};
use crate::service::{CommentError, CommentService};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use common::ApiError;
use films::handler::parse_film_id;
use std::sync::Arc;
use validator::Validate;

impl CommentError {
    pub fn into_api_error(self, summary: &str) -> ApiError {
        let details = self.to_string();
        match self {
            CommentError::FilmNotFound => ApiError::not_found("Film not found", details),
            CommentError::InvalidInput(_) => ApiError::bad_request("Validation failed", details),
            CommentError::Infrastructure(_) => ApiError::internal(summary, details),
        }
    }
}

pub fn comments_router(service: Arc<dyn CommentService>) -> Router {
    Router::new()
        .route("/films/{id}/comments", get(list_comments).post(add_comment))
        .with_state(service)
}

async fn add_comment(
    State(service): State<Arc<dyn CommentService>>,
    Path(id): Path<String>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let film_id = parse_film_id(&id)?;

    let Json(request) = payload.map_err(|e| ApiError::bad_request("Invalid request body", e.body_text()))?;
    request
        .validate()
        .map_err(|e| ApiError::bad_request("Validation failed", e))?;

    let comment = service
        .add_comment(film_id, request)
        .await
        .map_err(|e| e.into_api_error("Failed to add comment"))?;

    Ok((StatusCode::CREATED, Json(comment)))
}

async fn list_comments(
    State(service): State<Arc<dyn CommentService>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let film_id = parse_film_id(&id)?;
    let comments = service
        .get_comments_by_film_id(film_id)
        .await
        .map_err(|e| e.into_api_error("Failed to retrieve comments"))?;
    Ok(Json(comments))
}
