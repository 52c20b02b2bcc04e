pub mod client;
pub mod executor;
pub mod models;
pub mod response;

pub use client::ApiClient;
pub use executor::{sleep_delay, ApiRequest, DelayFn, RequestExecutor, RetryPolicy};
pub use models::{
    Confirmation, DocumentContent, DocumentPage, GapPage, HealthStatus, MessagePage, NewDocument,
    PageRequest, SessionPage,
};
pub use response::Payload;
