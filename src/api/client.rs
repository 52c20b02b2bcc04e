use crate::api::executor::{ApiRequest, DelayFn, RequestExecutor, RetryPolicy};
use crate::api::models::{
    Confirmation, DocumentContent, DocumentPage, GapPage, HealthStatus, MessagePage, NewDocument,
    PageRequest, RawDocumentPage, SessionPage,
};
use crate::error::{ApiError, Result};
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const DEFAULT_ALLOWED_DOMAIN: &str = "homespice";

/// Typed access to the support backend. Every method validates its arguments before
/// anything goes on the wire.
#[derive(Debug, Clone)]
pub struct ApiClient {
    executor: RequestExecutor,
    allowed_domain: String,
    health_timeout: Duration,
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::invalid_field(
            field,
            format!("{} is required and must be a non-empty string", field),
        ));
    }
    Ok(())
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self::with_executor(RequestExecutor::new(base_url)?))
    }

    pub fn with_executor(executor: RequestExecutor) -> Self {
        Self {
            executor,
            allowed_domain: DEFAULT_ALLOWED_DOMAIN.to_string(),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }

    pub fn with_allowed_domain(mut self, domain: &str) -> Self {
        self.allowed_domain = domain.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.executor = self.executor.with_timeout(timeout);
        self
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.executor = self.executor.with_retry_policy(retry);
        self
    }

    pub fn with_delay_fn(mut self, delay: DelayFn) -> Self {
        self.executor = self.executor.with_delay_fn(delay);
        self
    }

    pub fn base_url(&self) -> &str {
        self.executor.base_url()
    }

    pub fn allowed_domain(&self) -> &str {
        &self.allowed_domain
    }

    /// GET /availableSessions
    pub async fn get_available_sessions(
        &self,
        client_id: &str,
        page: PageRequest,
    ) -> Result<SessionPage> {
        require("client_id", client_id)?;

        let request = ApiRequest::get("/availableSessions")
            .query("client_id", client_id)
            .query("limit", page.clamped_limit())
            .query("offset", page.offset);
        self.executor.execute(&request).await?.parse()
    }

    /// GET /sessionHistory
    pub async fn get_session_history(
        &self,
        session_id: &str,
        page: PageRequest,
    ) -> Result<MessagePage> {
        require("session_id", session_id)?;

        let request = ApiRequest::get("/sessionHistory")
            .query("session_id", session_id)
            .query("limit", page.clamped_limit())
            .query("offset", page.offset);
        self.executor.execute(&request).await?.parse()
    }

    /// POST /listKnowledgeBaseDocs. Pass an empty token for the first page.
    pub async fn list_knowledge_base_docs(
        &self,
        client_id: &str,
        continuation_token: &str,
    ) -> Result<DocumentPage> {
        require("client_id", client_id)?;

        let request = ApiRequest::post(
            "/listKnowledgeBaseDocs",
            json!({
                "client_id": client_id,
                "continuation_token": continuation_token,
            }),
        );
        let raw: RawDocumentPage = self.executor.execute(&request).await?.parse()?;
        Ok(raw.into())
    }

    /// POST /getKnowledgeBaseDoc
    pub async fn get_knowledge_base_doc(&self, client_id: &str, key: &str) -> Result<DocumentContent> {
        require("client_id", client_id)?;
        require("key", key)?;

        let request = ApiRequest::post(
            "/getKnowledgeBaseDoc",
            json!({ "client_id": client_id, "key": key }),
        );
        self.executor.execute(&request).await?.parse()
    }

    /// POST /deleteKnowledgeBaseDoc
    pub async fn delete_knowledge_base_doc(&self, client_id: &str, key: &str) -> Result<Confirmation> {
        require("client_id", client_id)?;
        require("key", key)?;

        let request = ApiRequest::post(
            "/deleteKnowledgeBaseDoc",
            json!({ "client_id": client_id, "key": key }),
        );
        Ok(Confirmation::from_payload(
            self.executor.execute(&request).await?,
        ))
    }

    /// POST /createKnowledgeBaseDoc
    ///
    /// The server answers with a confirmation only; the new listing entry shows up on
    /// the next listing call.
    pub async fn create_knowledge_base_doc(
        &self,
        client_id: &str,
        document: &NewDocument,
    ) -> Result<Confirmation> {
        require("client_id", client_id)?;
        self.validate_new_document(document)?;

        let mut body = serde_json::to_value(document)?;
        if let Some(fields) = body.as_object_mut() {
            fields.insert("client_id".to_string(), json!(client_id));
        }

        let request = ApiRequest::post("/createKnowledgeBaseDoc", body);
        Ok(Confirmation::from_payload(
            self.executor.execute(&request).await?,
        ))
    }

    fn validate_new_document(&self, document: &NewDocument) -> Result<()> {
        match document {
            NewDocument::Url { url } => {
                require("url", url)?;
                if !url.contains(&self.allowed_domain) {
                    return Err(ApiError::invalid_field(
                        "url",
                        "We only accept your domain's URL.",
                    ));
                }
            }
            NewDocument::Doc { filename, content } => {
                require("filename", filename)?;
                require("content", content)?;
            }
            NewDocument::Edit { key, content } => {
                require("key", key)?;
                require("content", content)?;
            }
        }
        Ok(())
    }

    /// POST /getKnowledgeBaseGaps
    pub async fn get_knowledge_base_gaps(&self, client_id: &str, page: PageRequest) -> Result<GapPage> {
        require("client_id", client_id)?;

        let request = ApiRequest::post(
            "/getKnowledgeBaseGaps",
            json!({
                "client_id": client_id,
                "limit": page.clamped_limit(),
                "offset": page.offset,
            }),
        );
        self.executor.execute(&request).await?.parse()
    }

    /// POST /answerKnowledgeBaseGap
    pub async fn answer_knowledge_base_gap(
        &self,
        client_id: &str,
        gap_id: &str,
        answer: &str,
    ) -> Result<Confirmation> {
        require("client_id", client_id)?;
        require("gap_id", gap_id)?;
        require("answer", answer)?;

        let request = ApiRequest::post(
            "/answerKnowledgeBaseGap",
            json!({
                "client_id": client_id,
                "gap_id": gap_id,
                "answer": answer.trim(),
            }),
        );
        Ok(Confirmation::from_payload(
            self.executor.execute(&request).await?,
        ))
    }

    /// POST /deleteKnowledgeBaseGap
    pub async fn delete_knowledge_base_gap(&self, client_id: &str, gap_id: &str) -> Result<Confirmation> {
        require("client_id", client_id)?;
        require("gap_id", gap_id)?;

        let request = ApiRequest::post(
            "/deleteKnowledgeBaseGap",
            json!({ "client_id": client_id, "gap_id": gap_id }),
        );
        Ok(Confirmation::from_payload(
            self.executor.execute(&request).await?,
        ))
    }

    /// GET /health, bounded by the shorter health timeout.
    pub async fn health_check(&self) -> Result<HealthStatus> {
        let request = ApiRequest::get("/health").timeout(self.health_timeout);
        Ok(HealthStatus::from_payload(
            self.executor.execute(&request).await?,
        ))
    }
}
