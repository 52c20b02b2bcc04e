mod document;
mod gap;
mod pagination;
mod session;

pub use document::Document;
pub use gap::{GapOrigin, KnowledgeGap, CUSTOM_GAP_PREFIX};
pub use pagination::{PageCursor, Pagination};
pub use session::{ContentItem, Message, MessageContent, Product, Role, Session};
