//! Client for the marnotes JSON document server.
//!
//! Lists and fetches JSON documents, classifies document content for display,
//! and tracks each fetch through a small idle/loading/success/error state
//! machine. The server's optional public key is probed best-effort.
//!
//! # Example
//!
//! ```rust,no_run
//! use marnotes_client::{ClientConfig, DocumentBrowser, DocumentClient};
//!
//! # async fn example() -> Result<(), marnotes_client::ClientError> {
//! let client = DocumentClient::new(ClientConfig {
//!     port: Some("8080".to_owned()),
//!     ..Default::default()
//! })?;
//! let mut browser = DocumentBrowser::new(client);
//! browser.refresh().await;
//! if let Some(first) = browser.documents.value().and_then(|l| l.documents.first()).cloned() {
//!     browser.open(first).await;
//! }
//! # Ok(())
//! # }
//! ```

mod browser;
mod client;
mod error;
mod state;
mod types;

pub use browser::DocumentBrowser;
pub use error::ClientError;
pub use state::FetchState;
pub use types::{
    DocumentContent, DocumentId, DocumentList, EncryptionCapability, HealthStatus,
    RenderedContent, JSON_SUFFIX,
};

use std::time::Duration;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: &str = "80";

/// Which document route the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteVariant {
    /// `/doc/{id}`.
    #[default]
    Doc,
    /// `/documents/{id}`.
    Documents,
}

impl RouteVariant {
    /// Path prefix for single-document requests.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Doc => "/doc",
            Self::Documents => "/documents",
        }
    }
}

/// Configuration for the document client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server host. Default: `localhost`.
    pub host: String,
    /// Explicitly configured server port. Takes priority when non-empty.
    pub port: Option<String>,
    /// Port of the page or process the client runs alongside. Used when no
    /// port is configured.
    pub page_port: Option<String>,
    /// Single-document route shape.
    pub route: RouteVariant,
    /// Request timeout. `None` leaves timeouts to the transport.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: None,
            page_port: None,
            route: RouteVariant::default(),
            timeout: None,
        }
    }
}

/// Client for the document server.
#[derive(Debug, Clone)]
pub struct DocumentClient {
    base_url: String,
    route: RouteVariant,
    client: reqwest::Client,
}
