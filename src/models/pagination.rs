use serde::{Deserialize, Serialize};

/// Offset cursor held by the session, message and gap views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
    #[serde(default)]
    pub count: u32,
}

impl Pagination {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit,
            offset,
            count: 0,
        }
    }

    /// True while `offset + limit < count`.
    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.count
    }

    pub fn next_offset(&self) -> u32 {
        self.offset.saturating_add(self.limit)
    }
}

/// Cursor as the server sends it. Servers are inconsistent about which fields they
/// include, so every field is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub count: Option<u32>,
}

impl PageCursor {
    /// Fill missing fields from the window that was requested. A missing count keeps `count`.
    pub fn resolve(&self, limit: u32, offset: u32, count: u32) -> Pagination {
        Pagination {
            limit: self.limit.unwrap_or(limit),
            offset: self.offset.unwrap_or(offset),
            count: self.count.unwrap_or(count),
        }
    }
}
