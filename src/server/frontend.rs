//! HTTP frontend.
//!
//! # Endpoints
//! - `GET /health`: liveness
//! - `GET /api/v1/namespaces`: namespaces in creation order
//! - `GET /api/v1/search-attributes`: registered search attributes by name

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::config::search_attributes::SearchAttributes;
use crate::server::persistence::Catalog;

/// Build the frontend router over a catalog snapshot.
pub fn router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/namespaces", get(list_namespaces))
        .route("/api/v1/search-attributes", get(list_search_attributes))
        .with_state(catalog)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_namespaces(State(catalog): State<Arc<Catalog>>) -> Json<Vec<String>> {
    Json(catalog.namespaces.clone())
}

async fn list_search_attributes(State(catalog): State<Arc<Catalog>>) -> Json<SearchAttributes> {
    Json(catalog.search_attributes.clone())
}
