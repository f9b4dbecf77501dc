//! Document routes: `/documents`, `/documents/{name}`, `/doc/{name}`.
//!
//! Both single-document paths serve the same thing; older clients request
//! `/documents/{name}`, newer ones `/doc/{name}`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Build the document router.
///
/// Paths:
/// - `GET /documents` — list document file names
/// - `GET /documents/{name}` — read one document
/// - `GET /doc/{name}` — read one document
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/documents", get(list_documents))
        .route("/documents/{name}", get(read_document))
        .route("/doc/{name}", get(read_document))
        .route("/doc/", get(missing_name))
}

// ── Response types ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub documents: Vec<String>,
    pub count: usize,
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn list_documents(State(state): State<Arc<AppState>>) -> Result<Json<ListResponse>, AppError> {
    let documents = state.store.list().await?;
    Ok(Json(ListResponse {
        count: documents.len(),
        documents,
    }))
}

/// Serve a document's bytes as stored.
async fn read_document(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let data = state.store.read(&name).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], data).into_response())
}

async fn missing_name() -> AppError {
    AppError::BadRequest("no filename specified".to_owned())
}
