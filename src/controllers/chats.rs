use super::ErrorState;
use crate::api::{ApiClient, PageRequest};
use crate::dates::{compare_timestamps, today_string};
use crate::models::{Message, Pagination, Session};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

pub const DEFAULT_SESSION_PAGE_LIMIT: u32 = 100;
pub const DEFAULT_MESSAGE_PAGE_LIMIT: u32 = 50;

#[derive(Debug, Clone)]
pub struct ChatsState {
    /// Every session fetched so far, unfiltered.
    pub all_sessions: Vec<Session>,
    /// `all_sessions` restricted to `selected_date`.
    pub sessions: Vec<Session>,
    pub selected_date: Option<String>,
    pub selected_session: Option<Session>,
    /// Messages of the selected session, oldest first.
    pub messages: Vec<Message>,
    pub loading: bool,
    pub messages_loading: bool,
    pub error: Option<ErrorState>,
    pub session_pagination: Pagination,
    pub message_pagination: Pagination,
}

impl ChatsState {
    fn new(session_limit: u32, message_limit: u32) -> Self {
        Self {
            all_sessions: Vec::new(),
            sessions: Vec::new(),
            selected_date: Some(today_string()),
            selected_session: None,
            messages: Vec::new(),
            loading: false,
            messages_loading: false,
            error: None,
            session_pagination: Pagination::new(session_limit, 0),
            message_pagination: Pagination::new(message_limit, 0),
        }
    }

    pub fn has_more_sessions(&self) -> bool {
        self.session_pagination.has_more()
    }

    pub fn has_more_messages(&self) -> bool {
        self.message_pagination.has_more()
    }

    fn refilter(&mut self) {
        self.sessions = filter_sessions_by_date(&self.all_sessions, self.selected_date.as_deref());
    }

    fn is_selected(&self, session_id: &str) -> bool {
        self.selected_session
            .as_ref()
            .map(|s| s.id == session_id)
            .unwrap_or(false)
    }
}

/// Sessions whose `created_at` starts with `date` (`YYYY-MM-DD`). `None` keeps everything.
pub fn filter_sessions_by_date(sessions: &[Session], date: Option<&str>) -> Vec<Session> {
    match date {
        None => sessions.to_vec(),
        Some(date) => sessions
            .iter()
            .filter(|s| s.created_date() == Some(date))
            .cloned()
            .collect(),
    }
}

/// Merge `incoming` into `held`: duplicates by id are dropped and the result is sorted
/// oldest first. The sort is stable, so equal timestamps keep their arrival order.
pub fn merge_messages(held: &mut Vec<Message>, incoming: Vec<Message>) {
    let mut seen: HashSet<String> = held
        .iter()
        .filter(|m| !m.id.is_empty())
        .map(|m| m.id.clone())
        .collect();
    for message in incoming {
        if message.id.is_empty() || seen.insert(message.id.clone()) {
            held.push(message);
        }
    }
    held.sort_by(|a, b| compare_timestamps(&a.created_at, &b.created_at));
}

fn merge_sessions(held: &mut Vec<Session>, incoming: Vec<Session>) {
    let mut seen: HashSet<String> = held.iter().map(|s| s.id.clone()).collect();
    held.extend(incoming.into_iter().filter(|s| seen.insert(s.id.clone())));
}

/// Sessions by calendar date, plus the transcript of the selected one.
#[derive(Clone)]
pub struct ChatsController {
    api: Arc<ApiClient>,
    client_id: String,
    state: Arc<RwLock<ChatsState>>,
}

impl ChatsController {
    pub fn new(api: Arc<ApiClient>, client_id: impl Into<String>) -> Self {
        Self::with_page_limits(
            api,
            client_id,
            DEFAULT_SESSION_PAGE_LIMIT,
            DEFAULT_MESSAGE_PAGE_LIMIT,
        )
    }

    pub fn with_page_limits(
        api: Arc<ApiClient>,
        client_id: impl Into<String>,
        session_limit: u32,
        message_limit: u32,
    ) -> Self {
        Self {
            api,
            client_id: client_id.into(),
            state: Arc::new(RwLock::new(ChatsState::new(session_limit, message_limit))),
        }
    }

    pub async fn snapshot(&self) -> ChatsState {
        self.state.read().await.clone()
    }

    /// Load the first session window, replacing what is held.
    pub async fn load_sessions(&self) {
        let limit = self.state.read().await.session_pagination.limit;
        self.fetch_sessions(PageRequest::new(limit, 0), false).await;
    }

    /// Fetch the next session window and merge it into `all_sessions`.
    pub async fn load_more_sessions(&self) {
        let page = {
            let state = self.state.read().await;
            PageRequest::new(
                state.session_pagination.limit,
                state.session_pagination.next_offset(),
            )
        };
        self.fetch_sessions(page, true).await;
    }

    async fn fetch_sessions(&self, page: PageRequest, append: bool) {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let result = self.api.get_available_sessions(&self.client_id, page).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(response) => {
                debug!(count = response.sessions.len(), offset = page.offset, "loaded sessions");
                if append {
                    merge_sessions(&mut state.all_sessions, response.sessions);
                } else {
                    state.all_sessions = response.sessions;
                }
                let count = state.session_pagination.count;
                state.session_pagination = response.pagination.unwrap_or_default().resolve(
                    page.clamped_limit(),
                    page.offset,
                    count,
                );
                state.refilter();
            }
            Err(err) => {
                state.error = Some(ErrorState::record(&err, "load sessions"));
            }
        }
    }

    /// Change the date filter. No request is made; the selection and its transcript are cleared.
    pub async fn set_date(&self, date: Option<&str>) {
        let mut state = self.state.write().await;
        state.selected_date = date.map(str::to_string);
        state.selected_session = None;
        state.messages.clear();
        state.message_pagination.offset = 0;
        state.message_pagination.count = 0;
        state.refilter();
    }

    /// Select `session` and load the newest page of its transcript.
    pub async fn select_session(&self, session: Session) {
        let session_id = session.id.clone();
        let limit = {
            let mut state = self.state.write().await;
            state.selected_session = Some(session);
            state.messages.clear();
            state.message_pagination.offset = 0;
            state.message_pagination.count = 0;
            state.message_pagination.limit
        };
        self.fetch_messages(&session_id, PageRequest::new(limit, 0), false)
            .await;
    }

    /// Fetch the next (older) message window and merge it in.
    pub async fn load_more_messages(&self) {
        let (session_id, page) = {
            let state = self.state.read().await;
            let Some(session) = &state.selected_session else {
                return;
            };
            (
                session.id.clone(),
                PageRequest::new(
                    state.message_pagination.limit,
                    state.message_pagination.next_offset(),
                ),
            )
        };
        self.fetch_messages(&session_id, page, true).await;
    }

    async fn fetch_messages(&self, session_id: &str, page: PageRequest, append: bool) {
        {
            let mut state = self.state.write().await;
            state.messages_loading = true;
            state.error = None;
        }

        let result = self.api.get_session_history(session_id, page).await;

        let mut state = self.state.write().await;
        state.messages_loading = false;

        // The operator may have moved on while this page was in flight.
        if !state.is_selected(session_id) {
            debug!(session_id, "discarding messages for deselected session");
            return;
        }

        match result {
            Ok(response) => {
                if !append {
                    state.messages.clear();
                }
                merge_messages(&mut state.messages, response.messages);
                let count = state.message_pagination.count;
                state.message_pagination = response.pagination.unwrap_or_default().resolve(
                    page.clamped_limit(),
                    page.offset,
                    count,
                );
            }
            Err(err) => {
                state.error = Some(ErrorState::record(&err, "load messages"));
            }
        }
    }

    /// Reload the first session window and, if a session is selected, its newest messages.
    pub async fn refresh(&self) {
        self.load_sessions().await;

        let selected = {
            let state = self.state.read().await;
            state
                .selected_session
                .as_ref()
                .map(|s| (s.id.clone(), state.message_pagination.limit))
        };
        if let Some((session_id, limit)) = selected {
            self.fetch_messages(&session_id, PageRequest::new(limit, 0), false)
                .await;
        }
    }
}
