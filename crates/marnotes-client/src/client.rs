//! Document client implementation.

use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::types::{
    DocumentContent, DocumentId, DocumentList, DocumentListResponse, EncryptionCapability,
    HealthResponse, HealthStatus,
};
use crate::{ClientConfig, DocumentClient, RouteVariant, DEFAULT_PORT};

const PEM_HEADER: &str = "-----BEGIN";

impl DocumentClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the resolved port is not a valid
    /// port number, or `ClientError::Network` if the HTTP client cannot be
    /// built.
    pub fn new(cfg: ClientConfig) -> Result<Self, ClientError> {
        let port = resolve_port(cfg.port.as_deref(), cfg.page_port.as_deref())?;
        let host = cfg.host.trim();
        if host.is_empty() {
            return Err(ClientError::Config("host must not be empty".to_owned()));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("marnotes-client/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ClientError::Network)?;

        Ok(Self {
            base_url: format!("http://{host}:{port}"),
            route: cfg.route,
            client,
        })
    }

    /// Base URL every request is issued against, e.g. `http://localhost:8080`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Route variant used for single-document requests.
    pub fn route(&self) -> RouteVariant {
        self.route
    }

    /// List the documents on the server, in server order.
    ///
    /// A response without a `documents` field (or with `null`) is an empty
    /// list.
    ///
    /// # Errors
    ///
    /// `Network` if the server is unreachable, `Http` on a non-success
    /// status, `Decode` if the body is not a document list.
    pub async fn list_documents(&self) -> Result<DocumentList, ClientError> {
        let resp: DocumentListResponse = self.get_json("/documents").await?;
        let documents = resp.documents.unwrap_or_default();

        if let Some(reported) = resp.count.filter(|&c| c != documents.len()) {
            warn!(
                reported,
                actual = documents.len(),
                "document count does not match listed documents"
            );
        }
        let count = resp.count.unwrap_or(documents.len());

        Ok(DocumentList { documents, count })
    }

    /// Fetch the raw JSON content of one document.
    ///
    /// A trailing `.json` on `id` is stripped before the request. The body
    /// is returned as decoded, whatever its shape.
    ///
    /// # Errors
    ///
    /// Same as [`list_documents`](Self::list_documents).
    pub async fn get_document(&self, id: &DocumentId) -> Result<DocumentContent, ClientError> {
        let path = self.document_path(id);
        self.get_json(&path).await
    }

    /// Request path for a document under the configured route variant.
    pub fn document_path(&self, id: &DocumentId) -> String {
        format!("{}/{}", self.route.prefix(), urlencoding::encode(id.stem()))
    }

    /// Probe the server for an encryption public key.
    ///
    /// Never fails: any problem means the capability is absent.
    pub async fn fetch_public_key(&self) -> EncryptionCapability {
        let url = self.url("/publickey");
        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                debug!(error = %e, "public key probe failed, encryption unsupported");
                return EncryptionCapability::Unsupported;
            }
        };

        let status = resp.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "no public key offered, encryption unsupported");
            return EncryptionCapability::Unsupported;
        }

        match resp.text().await {
            Ok(text) if text.trim_start().starts_with(PEM_HEADER) => {
                EncryptionCapability::PublicKey(text)
            }
            Ok(_) => {
                debug!("public key response is not PEM, encryption unsupported");
                EncryptionCapability::Unsupported
            }
            Err(e) => {
                debug!(error = %e, "failed to read public key, encryption unsupported");
                EncryptionCapability::Unsupported
            }
        }
    }

    /// Check if the server is reachable and healthy.
    pub async fn health(&self) -> HealthStatus {
        let start = Instant::now();
        let result = self.get_json::<HealthResponse>("/health").await;
        let latency_ms = start.elapsed().as_millis();

        match result {
            Ok(resp) => HealthStatus {
                ok: true,
                status: resp.status,
                docs_dir: resp.docs_dir,
                latency_ms,
            },
            Err(e) => {
                debug!(error = %e, "health check failed");
                HealthStatus {
                    ok: false,
                    status: None,
                    docs_dir: None,
                    latency_ms,
                }
            }
        }
    }

    // --- Private ---

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(%url, "GET");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "request failed");
            return Err(ClientError::Http {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Resolve the server port: configured value, then the page port, then `80`.
/// Empty strings count as absent.
///
/// # Errors
///
/// Returns `ClientError::Config` if the chosen value is not a port number.
pub(crate) fn resolve_port(
    configured: Option<&str>,
    page_port: Option<&str>,
) -> Result<u16, ClientError> {
    let raw = [configured, page_port]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or(DEFAULT_PORT);

    // Accept the `:8080` listen-address form as well.
    let digits = raw.strip_prefix(':').unwrap_or(raw);
    digits
        .parse()
        .map_err(|_| ClientError::Config(format!("invalid port {raw:?}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn configured_port_wins() {
        assert_eq!(resolve_port(Some("8080"), Some("3000")).unwrap(), 8080);
    }

    #[test]
    fn falls_back_to_page_port() {
        assert_eq!(resolve_port(None, Some("3000")).unwrap(), 3000);
        assert_eq!(resolve_port(Some(""), Some("3000")).unwrap(), 3000);
    }

    #[test]
    fn falls_back_to_80() {
        assert_eq!(resolve_port(None, None).unwrap(), 80);
        assert_eq!(resolve_port(Some(""), Some("  ")).unwrap(), 80);
    }

    #[test]
    fn accepts_listen_address_form() {
        assert_eq!(resolve_port(Some(":8081"), None).unwrap(), 8081);
    }

    #[test]
    fn rejects_garbage_port() {
        let err = resolve_port(Some("eighty"), None).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert!(resolve_port(Some("70000"), None).is_err());
    }

    #[test]
    fn base_url_uses_host_and_port() {
        let client = DocumentClient::new(ClientConfig {
            port: Some("9000".to_owned()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
    }

    #[test]
    fn empty_host_is_rejected() {
        let err = DocumentClient::new(ClientConfig {
            host: " ".to_owned(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn document_path_strips_suffix_per_variant() {
        let doc = DocumentClient::new(ClientConfig::default()).unwrap();
        assert_eq!(doc.document_path(&"a.json".into()), "/doc/a");

        let documents = DocumentClient::new(ClientConfig {
            route: RouteVariant::Documents,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(documents.document_path(&"a.json".into()), "/documents/a");
        assert_eq!(documents.document_path(&"a".into()), "/documents/a");
    }

    #[test]
    fn document_path_is_percent_encoded() {
        let client = DocumentClient::new(ClientConfig::default()).unwrap();
        assert_eq!(
            client.document_path(&"my notes.json".into()),
            "/doc/my%20notes"
        );
    }
}
