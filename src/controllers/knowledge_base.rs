use super::ErrorState;
use crate::api::{ApiClient, Confirmation, NewDocument};
use crate::error::Result;
use crate::models::Document;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct DocumentsState {
    pub documents: Vec<Document>,
    pub loading: bool,
    pub error: Option<ErrorState>,
    pub continuation_token: String,
}

impl DocumentsState {
    pub fn has_more(&self) -> bool {
        !self.continuation_token.is_empty()
    }
}

/// Knowledge-base listing for one client, paged by continuation token.
#[derive(Clone)]
pub struct DocumentsController {
    api: Arc<ApiClient>,
    client_id: String,
    state: Arc<RwLock<DocumentsState>>,
}

impl DocumentsController {
    pub fn new(api: Arc<ApiClient>, client_id: impl Into<String>) -> Self {
        Self {
            api,
            client_id: client_id.into(),
            state: Arc::new(RwLock::new(DocumentsState::default())),
        }
    }

    pub async fn snapshot(&self) -> DocumentsState {
        self.state.read().await.clone()
    }

    /// Fetch the page at `token`. An empty token replaces the held documents, any other appends.
    pub async fn load_documents(&self, token: &str) {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let result = self
            .api
            .list_knowledge_base_docs(&self.client_id, token)
            .await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(page) => {
                debug!(
                    count = page.objects.len(),
                    has_more = page.has_more(),
                    "loaded documents"
                );
                if token.is_empty() {
                    state.documents = page.objects;
                } else {
                    state.documents.extend(page.objects);
                }
                state.continuation_token = page.continuation_token;
            }
            Err(err) => {
                state.error = Some(ErrorState::record(&err, "load knowledge base documents"));
            }
        }
    }

    /// Load the next page, if there is one and nothing is loading.
    pub async fn load_more(&self) {
        let token = {
            let state = self.state.read().await;
            if state.loading || state.continuation_token.is_empty() {
                return;
            }
            state.continuation_token.clone()
        };
        self.load_documents(&token).await;
    }

    /// Drop everything held and reload the first page.
    pub async fn refresh(&self) {
        {
            let mut state = self.state.write().await;
            state.documents.clear();
            state.continuation_token.clear();
        }
        self.load_documents("").await;
    }

    pub async fn get_document_content(&self, key: &str) -> Result<String> {
        match self.api.get_knowledge_base_doc(&self.client_id, key).await {
            Ok(doc) => Ok(doc.content),
            Err(err) => {
                self.state.write().await.error =
                    Some(ErrorState::record(&err, "get document content"));
                Err(err)
            }
        }
    }

    /// Create, ingest or overwrite a document. The listing is left alone; refresh to see it.
    pub async fn create_document(&self, document: &NewDocument) -> Result<Confirmation> {
        self.state.write().await.error = None;

        match self
            .api
            .create_knowledge_base_doc(&self.client_id, document)
            .await
        {
            Ok(confirmation) => {
                info!(kind = document.kind(), "document submitted");
                Ok(confirmation)
            }
            Err(err) => {
                self.state.write().await.error =
                    Some(ErrorState::record(&err, "create knowledge base document"));
                Err(err)
            }
        }
    }

    /// Delete by key, removing the entry once the server has confirmed.
    pub async fn delete_document(&self, key: &str) -> Result<Confirmation> {
        self.state.write().await.error = None;

        match self.api.delete_knowledge_base_doc(&self.client_id, key).await {
            Ok(confirmation) => {
                self.state
                    .write()
                    .await
                    .documents
                    .retain(|doc| doc.key != key);
                info!(key, "document deleted");
                Ok(confirmation)
            }
            Err(err) => {
                self.state.write().await.error =
                    Some(ErrorState::record(&err, "delete knowledge base document"));
                Err(err)
            }
        }
    }
}
