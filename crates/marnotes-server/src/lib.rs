//! marnotes document server.
//!
//! Serves every `*.json` file in a documents directory over a small JSON
//! API: list documents, read one document, health check, and an optional
//! public key for clients probing encryption support.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::middleware::{self as axum_mw, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

/// How many ports past the requested one to try when it is taken.
pub const PORT_SEARCH_RANGE: u16 = 100;

/// Maximum concurrent requests across all document routes together.
const DOCUMENT_CONCURRENCY: usize = 64;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS — the browser front end is served from a different port.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    // `layer` clones the service per route; the global variant shares one
    // semaphore between the clones.
    let document_routes = routes::documents::router().layer(
        tower::limit::GlobalConcurrencyLimitLayer::new(DOCUMENT_CONCURRENCY),
    );

    Router::new()
        .merge(routes::health::router())
        .merge(document_routes)
        .merge(routes::publickey::router())
        .layer(axum_mw::from_fn(answer_options))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Answer every `OPTIONS` request with 200. CORS preflights are handled by
/// the outer `CorsLayer` before reaching this.
async fn answer_options(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(req).await
}

/// Bind `addr`, or with `search` the first free port among the next
/// [`PORT_SEARCH_RANGE`] ports when `addr` is already taken.
///
/// # Errors
///
/// Returns the original bind error if no port could be bound.
pub async fn bind(addr: SocketAddr, search: bool) -> io::Result<TcpListener> {
    let err = match TcpListener::bind(addr).await {
        Ok(listener) => return Ok(listener),
        Err(e) => e,
    };

    if !search || err.kind() != io::ErrorKind::AddrInUse || addr.port() == 0 {
        return Err(err);
    }

    let first = addr.port().saturating_add(1);
    let last = addr.port().saturating_add(PORT_SEARCH_RANGE);
    for port in first..=last {
        let candidate = SocketAddr::new(addr.ip(), port);
        if let Ok(listener) = TcpListener::bind(candidate).await {
            warn!(requested = %addr, using = %candidate, "port is in use, using another");
            return Ok(listener);
        }
    }

    Err(err)
}
