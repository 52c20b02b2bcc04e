#![allow(dead_code)]

use futures::FutureExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use supportctl::api::{ApiClient, DelayFn};
use wiremock::MockServer;

/// A delay function that records what it was asked to wait and returns immediately.
pub fn recording_delay() -> (DelayFn, Arc<Mutex<Vec<Duration>>>) {
    let delays = Arc::new(Mutex::new(Vec::new()));
    let sink = delays.clone();
    let delay: DelayFn = Arc::new(move |d| {
        sink.lock().unwrap().push(d);
        futures::future::ready(()).boxed()
    });
    (delay, delays)
}

pub fn test_client(server: &MockServer) -> ApiClient {
    let (delay, _) = recording_delay();
    ApiClient::new(&server.uri()).unwrap().with_delay_fn(delay)
}

pub fn shared_client(server: &MockServer) -> Arc<ApiClient> {
    Arc::new(test_client(server))
}

pub async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}
