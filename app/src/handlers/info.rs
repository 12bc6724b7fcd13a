use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiInfoResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<String>,
}

const ENDPOINTS: [&str; 5] = [
    "GET /api/v1/films - List films with filtering and pagination",
    "GET /api/v1/films/{id} - Get detailed film information",
    "GET /api/v1/categories - List all available categories",
    "POST /api/v1/films/{id}/comments - Add a comment to a film",
    "GET /api/v1/films/{id}/comments - Get comments for a film",
];

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to Mockbuster Movie API!".to_string(),
    })
}

pub async fn api_info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        name: "Mockbuster Movie API".to_string(),
        version: "1.0".to_string(),
        description: "A RESTful API for the Mockbuster DVD rental business".to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}
