//! Liveness endpoints.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
}

#[derive(Serialize)]
pub struct Banner {
    pub message: String,
    pub status: String,
}

/// Health check endpoint.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

/// Service banner at `/`.
pub async fn root() -> Json<Banner> {
    Json(Banner {
        message: "Vertex AI Tech Customer Support API".to_string(),
        status: "online".to_string(),
    })
}
