//! Shared application state for the marnotes server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`.

use crate::store::DocumentStore;

/// Shared application state passed to all HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    /// The documents directory.
    pub store: DocumentStore,
    /// PEM public key published at `/publickey` (None if not configured).
    pub public_key: Option<String>,
}

impl AppState {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            public_key: None,
        }
    }

    #[must_use]
    pub fn with_public_key(mut self, pem: String) -> Self {
        self.public_key = Some(pem);
        self
    }
}
