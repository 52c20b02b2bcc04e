use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

pub const CUSTOM_GAP_PREFIX: &str = "custom-";

static LAST_CUSTOM_MILLIS: AtomicI64 = AtomicI64::new(0);

// Two gaps added within the same millisecond still get distinct ids.
fn next_custom_millis(now: i64) -> i64 {
    let mut last = LAST_CUSTOM_MILLIS.load(Ordering::Relaxed);
    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST_CUSTOM_MILLIS.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// Where a gap came from. Local gaps were added by the operator and never reached the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GapOrigin {
    #[default]
    Server,
    Local,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGap {
    pub id: String,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(skip)]
    pub origin: GapOrigin,
}

impl KnowledgeGap {
    /// Build an operator-authored gap. The id is `custom-<epoch millis>`.
    pub fn custom(question: impl Into<String>, answer: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!(
                "{}{}",
                CUSTOM_GAP_PREFIX,
                next_custom_millis(now.timestamp_millis())
            ),
            question: question.into(),
            answer,
            suggestions: None,
            created_at: now.to_rfc3339(),
            origin: GapOrigin::Local,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.origin == GapOrigin::Local
    }
}
