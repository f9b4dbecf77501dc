//! Document browsing session.
//!
//! A [`DocumentBrowser`] holds the state a document browser view renders:
//! the document list, the selected document and its content, and whether
//! the server offers encryption. Each fetch goes through its own
//! [`FetchState`] slot, so a failed content fetch never clobbers the list
//! and vice versa.

use tracing::{debug, info};

use crate::error::ClientError;
use crate::state::FetchState;
use crate::types::{
    is_encrypted_envelope, DocumentContent, DocumentId, DocumentList, EncryptionCapability,
    RenderedContent,
};
use crate::DocumentClient;

/// Per-session browsing state over a [`DocumentClient`].
#[derive(Debug)]
pub struct DocumentBrowser {
    client: DocumentClient,
    /// The document list.
    pub documents: FetchState<DocumentList>,
    /// Content of the most recently opened document.
    pub content: FetchState<DocumentContent>,
    selected: Option<DocumentId>,
    capability: EncryptionCapability,
}

impl DocumentBrowser {
    pub fn new(client: DocumentClient) -> Self {
        Self {
            client,
            documents: FetchState::Idle,
            content: FetchState::Idle,
            selected: None,
            capability: EncryptionCapability::Unsupported,
        }
    }

    pub fn client(&self) -> &DocumentClient {
        &self.client
    }

    /// Currently selected document, set when its content loads.
    pub fn selected(&self) -> Option<&DocumentId> {
        self.selected.as_ref()
    }

    pub fn capability(&self) -> &EncryptionCapability {
        &self.capability
    }

    /// Whether `id` names the selected document. Suffix-insensitive.
    pub fn is_selected(&self, id: &DocumentId) -> bool {
        self.selected.as_ref().is_some_and(|s| s.correlates(id))
    }

    /// Reload the document list.
    ///
    /// A successful reload clears the selection and the shown content.
    pub async fn refresh(&mut self) {
        self.documents.begin();
        let result = self.client.list_documents().await;

        if let Ok(list) = &result {
            info!(count = list.len(), "document list loaded");
            self.selected = None;
            self.content.reset();
        }
        self.documents.settle("failed to fetch documents", result);
    }

    /// Load a document and make it the selection.
    pub async fn open(&mut self, id: DocumentId) {
        self.begin_open();
        let result = self.client.get_document(&id).await;
        self.apply_document(id, result);
    }

    /// First half of [`open`](Self::open): mark the content slot loading.
    pub fn begin_open(&mut self) {
        self.content.begin();
    }

    /// Second half of [`open`](Self::open): store a settled content fetch.
    ///
    /// Results are applied in the order they arrive. There is no check that
    /// `result` belongs to the most recently started request.
    ///
    /// Once the server has published a public key, an `{"encrypted": ..}`
    /// envelope is reported as `Unsupported` instead of shown as content.
    pub fn apply_document(&mut self, id: DocumentId, result: Result<DocumentContent, ClientError>) {
        let result = result.and_then(|content| self.check_envelope(content));
        match &result {
            Ok(_) => {
                debug!(document = %id, "document loaded");
                self.selected = Some(id);
            }
            Err(e) => debug!(document = %id, error = %e, "document fetch failed"),
        }
        self.content.settle("failed to fetch document", result);
    }

    /// Probe the server for encryption support. Never reports an error.
    pub async fn probe_capabilities(&mut self) -> &EncryptionCapability {
        self.capability = self.client.fetch_public_key().await;
        &self.capability
    }

    fn check_envelope(&self, content: DocumentContent) -> Result<DocumentContent, ClientError> {
        if self.capability.is_supported() && is_encrypted_envelope(&content) {
            return Err(ClientError::Unsupported(
                "server sent an encrypted document; decryption is not implemented".to_owned(),
            ));
        }
        Ok(content)
    }

    /// Display form of the loaded content, if any.
    pub fn rendered(&self) -> Option<RenderedContent> {
        self.content.value().map(RenderedContent::classify)
    }
}
