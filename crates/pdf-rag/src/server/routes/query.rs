//! Query endpoint

use axum::{extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

/// POST /api/query - Answer a question with page citations
pub async fn query_rag(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(Error::InvalidRequest("question must not be empty".to_string()));
    }

    tracing::info!("Query: \"{}\"", question);
    let response = state.chain().ask(question).await?;

    Ok(Json(response))
}
