//! Public key route: `/publickey`.
//!
//! Publishes the configured PEM public key so clients can detect encryption
//! support. Servers without a key answer 400.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/publickey", get(public_key))
}

async fn public_key(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let pem = state
        .public_key
        .clone()
        .ok_or_else(|| AppError::BadRequest("public key not available".to_owned()))?;

    Ok(([(header::CONTENT_TYPE, "text/plain")], pem).into_response())
}
