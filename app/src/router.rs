use crate::handlers::info;
use axum::{
    Router,
    http::{Method, StatusCode, header::CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use comments::CommentService;
use common::ApiError;
use films::FilmService;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub fn build_router(
    film_service: Arc<dyn FilmService>,
    comment_service: Arc<dyn CommentService>,
    request_timeout: Duration,
) -> Router {
    let api = Router::new()
        .route("/", get(info::api_info))
        .merge(films::handler::films_router(film_service))
        .merge(comments::handler::comments_router(comment_service));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(info::welcome))
        .nest("/api/v1", api)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(middleware::map_response(timeout_body))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// The timeout layer answers with an empty body; give it the usual error shape.
async fn timeout_body(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT && !response.headers().contains_key(CONTENT_TYPE) {
        return ApiError::new(StatusCode::REQUEST_TIMEOUT, "Request timed out", "the server took too long to respond")
            .into_response();
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::info::{ApiInfoResponse, WelcomeResponse};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use comments::{Comment, DefaultCommentService, testutils::InMemoryCommentRepository};
    use common::ErrorResponse;
    use films::{DefaultFilmService, FilmListResponse, testutils::sample_catalog};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn app() -> Router {
        let catalog = Arc::new(sample_catalog());
        let films = Arc::new(DefaultFilmService::new(catalog.clone()));
        let comments = Arc::new(DefaultCommentService::new(
            Arc::new(InMemoryCommentRepository::new([1, 2])),
            catalog,
        ));
        build_router(films, comments, Duration::from_secs(5))
    }

    async fn send<T: DeserializeOwned>(app: Router, request: Request<Body>) -> (StatusCode, T) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_welcome() {
        let (status, body): (_, WelcomeResponse) = send(app(), get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.message, "Welcome to Mockbuster Movie API!");
    }

    #[tokio::test]
    async fn test_api_info() {
        let (status, body): (_, ApiInfoResponse) = send(app(), get("/api/v1")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.name, "Mockbuster Movie API");
        assert_eq!(body.endpoints.len(), 5);
    }

    #[tokio::test]
    async fn test_routes_are_nested_under_api_v1() {
        let (status, body): (_, FilmListResponse) = send(app(), get("/api/v1/films?limit=5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.total, 2);
        assert_eq!(body.limit, 5);

        let (status, body): (_, ErrorResponse) = send(app(), get("/api/v1/films/99999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.details, "film not found");
    }

    #[tokio::test]
    async fn test_comment_round_trip_through_api() {
        let app = app();

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/films/1/comments")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"customer_name":"John Doe","comment":"Great movie!"}"#))
            .unwrap();
        let (status, created): (_, Comment) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, comments): (_, Vec<Comment>) = send(app, get("/api/v1/films/1/comments")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(comments, vec![created]);
    }

    #[tokio::test]
    async fn test_timeout_returns_error_body() {
        let slow = Router::new()
            .route(
                "/slow",
                axum::routing::get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_millis(10)))
            .layer(middleware::map_response(timeout_body));

        let (status, body): (_, ErrorResponse) = send(slow, get("/slow")).await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body.error, "Request timed out");
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let request = Request::builder()
            .uri("/api/v1/categories")
            .header("origin", "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
