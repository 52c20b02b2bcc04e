use crate::api::response::{extract_confirmation, Payload};
use crate::models::{Document, KnowledgeGap, Message, PageCursor, Session};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MAX_PAGE_LIMIT: u32 = 100;

/// Offset window for the paged listings. Out-of-range values are clamped, not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

impl PageRequest {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    pub fn clamped_limit(&self) -> u32 {
        self.limit.clamp(1, MAX_PAGE_LIMIT)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionPage {
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub pagination: Option<PageCursor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePage {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub pagination: Option<PageCursor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GapPage {
    #[serde(default)]
    pub gaps: Vec<KnowledgeGap>,
    #[serde(default)]
    pub pagination: Option<PageCursor>,
}

/// One page of the document listing. An empty token means the listing is exhausted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPage {
    pub objects: Vec<Document>,
    pub continuation_token: String,
}

#[derive(Deserialize)]
pub(crate) struct RawDocumentPage {
    #[serde(default)]
    objects: Option<Vec<Document>>,
    #[serde(default)]
    continuation_token: Option<String>,
}

impl From<RawDocumentPage> for DocumentPage {
    fn from(raw: RawDocumentPage) -> Self {
        Self {
            objects: raw.objects.unwrap_or_default(),
            continuation_token: raw.continuation_token.unwrap_or_default(),
        }
    }
}

impl DocumentPage {
    pub fn has_more(&self) -> bool {
        !self.continuation_token.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DocumentContent {
    #[serde(default)]
    pub content: String,
}

/// Acknowledgement of a mutation. Servers vary in what they send back, so the raw body is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub message: Option<String>,
    pub body: Value,
}

impl Confirmation {
    pub(crate) fn from_payload(payload: Payload) -> Self {
        let body = match payload {
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
        };
        Self {
            message: extract_confirmation(&body),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub body: Value,
}

impl HealthStatus {
    pub(crate) fn from_payload(payload: Payload) -> Self {
        match payload {
            Payload::Json(body) => {
                let status = body
                    .get("status")
                    .and_then(Value::as_str)
                    .unwrap_or("ok")
                    .to_string();
                Self { status, body }
            }
            Payload::Text(text) => {
                let status = if text.trim().is_empty() {
                    "ok".to_string()
                } else {
                    text.trim().to_string()
                };
                Self {
                    status,
                    body: Value::String(text),
                }
            }
        }
    }
}

/// A knowledge-base document to ingest or overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NewDocument {
    /// Crawl a page. The URL must belong to the operator's allowed domain.
    Url { url: String },
    /// Raw text stored under `filename`.
    Doc { filename: String, content: String },
    /// Overwrite an existing document in place.
    Edit { key: String, content: String },
}

impl NewDocument {
    pub fn kind(&self) -> &'static str {
        match self {
            NewDocument::Url { .. } => "url",
            NewDocument::Doc { .. } => "doc",
            NewDocument::Edit { .. } => "edit",
        }
    }
}
