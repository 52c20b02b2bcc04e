use super::ErrorState;
use crate::api::{ApiClient, PageRequest};
use crate::error::{ApiError, Result};
use crate::models::{GapOrigin, KnowledgeGap, Pagination};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

pub const DEFAULT_GAP_PAGE_LIMIT: u32 = 10;

#[derive(Debug, Clone)]
pub struct GapsState {
    pub gaps: Vec<KnowledgeGap>,
    pub loading: bool,
    pub error: Option<ErrorState>,
    pub pagination: Pagination,
}

impl GapsState {
    fn new(limit: u32) -> Self {
        Self {
            gaps: Vec::new(),
            loading: false,
            error: None,
            pagination: Pagination::new(limit, 0),
        }
    }

    /// More gaps exist server-side than are held.
    pub fn has_more(&self) -> bool {
        (self.gaps.len() as u64) < u64::from(self.pagination.count)
    }

    fn remove(&mut self, gap_id: &str) {
        self.gaps.retain(|gap| gap.id != gap_id);
        self.pagination.count = self.pagination.count.saturating_sub(1);
    }
}

/// Open knowledge gaps for one client, paged by offset.
#[derive(Clone)]
pub struct GapsController {
    api: Arc<ApiClient>,
    client_id: String,
    state: Arc<RwLock<GapsState>>,
}

impl GapsController {
    pub fn new(api: Arc<ApiClient>, client_id: impl Into<String>) -> Self {
        Self::with_page_limit(api, client_id, DEFAULT_GAP_PAGE_LIMIT)
    }

    pub fn with_page_limit(api: Arc<ApiClient>, client_id: impl Into<String>, limit: u32) -> Self {
        Self {
            api,
            client_id: client_id.into(),
            state: Arc::new(RwLock::new(GapsState::new(limit))),
        }
    }

    pub async fn snapshot(&self) -> GapsState {
        self.state.read().await.clone()
    }

    /// Load one page, replacing whatever is held.
    pub async fn load_gaps(&self, page: PageRequest) {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let result = self.api.get_knowledge_base_gaps(&self.client_id, page).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(response) => {
                debug!(count = response.gaps.len(), offset = page.offset, "loaded gaps");
                state.gaps = response.gaps;
                state.pagination = response.pagination.unwrap_or_default().resolve(
                    page.clamped_limit(),
                    page.offset,
                    0,
                );
            }
            Err(err) => {
                state.error = Some(ErrorState::record(&err, "load knowledge base gaps"));
            }
        }
    }

    /// Append the next offset window. Does nothing while another load is in flight.
    pub async fn load_more(&self) {
        let page = {
            let mut state = self.state.write().await;
            if state.loading {
                debug!("gap load already in flight, skipping");
                return;
            }
            state.loading = true;
            state.error = None;
            PageRequest::new(state.pagination.limit, state.pagination.next_offset())
        };

        let result = self.api.get_knowledge_base_gaps(&self.client_id, page).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(response) => {
                state.gaps.extend(response.gaps);
                let count = state.pagination.count;
                state.pagination = response.pagination.unwrap_or_default().resolve(
                    page.clamped_limit(),
                    page.offset,
                    count,
                );
            }
            Err(err) => {
                state.error = Some(ErrorState::record(&err, "load more knowledge base gaps"));
            }
        }
    }

    /// Reload the first page with the current page size.
    pub async fn refresh(&self) {
        let limit = self.state.read().await.pagination.limit;
        self.load_gaps(PageRequest::new(limit, 0)).await;
    }

    /// Answer a gap and drop it from the open list. Local gaps never touch the server.
    pub async fn answer_gap(&self, gap_id: &str, answer: &str) -> Result<()> {
        let origin = self.begin_mutation(gap_id).await;

        if answer.trim().is_empty() {
            let err = ApiError::invalid_field("answer", "answer is required and must be a non-empty string");
            self.state.write().await.error = Some(ErrorState::record(&err, "answer knowledge base gap"));
            return Err(err);
        }

        if origin == GapOrigin::Server {
            if let Err(err) = self
                .api
                .answer_knowledge_base_gap(&self.client_id, gap_id, answer)
                .await
            {
                self.state.write().await.error =
                    Some(ErrorState::record(&err, "answer knowledge base gap"));
                return Err(err);
            }
        }

        self.state.write().await.remove(gap_id);
        Ok(())
    }

    /// Dismiss a gap. Same local/server split as [`answer_gap`](Self::answer_gap).
    pub async fn delete_gap(&self, gap_id: &str) -> Result<()> {
        let origin = self.begin_mutation(gap_id).await;

        if origin == GapOrigin::Server {
            if let Err(err) = self
                .api
                .delete_knowledge_base_gap(&self.client_id, gap_id)
                .await
            {
                self.state.write().await.error =
                    Some(ErrorState::record(&err, "delete knowledge base gap"));
                return Err(err);
            }
        }

        self.state.write().await.remove(gap_id);
        Ok(())
    }

    /// Add an operator-authored gap to the top of the list.
    pub async fn add_custom_gap(&self, question: &str, answer: Option<&str>) -> Result<KnowledgeGap> {
        if question.trim().is_empty() {
            let err = ApiError::invalid_field("question", "question is required and must be a non-empty string");
            self.state.write().await.error = Some(ErrorState::record(&err, "add knowledge base gap"));
            return Err(err);
        }

        let gap = KnowledgeGap::custom(
            question.trim(),
            answer.map(str::trim).filter(|a| !a.is_empty()).map(str::to_string),
        );

        let mut state = self.state.write().await;
        state.gaps.insert(0, gap.clone());
        state.pagination.count = state.pagination.count.saturating_add(1);
        Ok(gap)
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    // Clears the previous error and reports where the gap lives. Unknown ids are
    // assumed to be server-side.
    async fn begin_mutation(&self, gap_id: &str) -> GapOrigin {
        let mut state = self.state.write().await;
        state.error = None;
        state
            .gaps
            .iter()
            .find(|gap| gap.id == gap_id)
            .map(|gap| gap.origin)
            .unwrap_or_default()
    }
}
