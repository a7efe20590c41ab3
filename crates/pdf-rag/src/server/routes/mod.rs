//! Routes for the RAG server

pub mod query;
pub mod ui;

use axum::{routing::post, Router};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/query", post(query::query_rag))
}
