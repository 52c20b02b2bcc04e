mod common;

use common::test_client;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use supportctl::api::PageRequest;
use supportctl::controllers::{DocumentsController, ErrorCategory, GapsController};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_timeout_in_one_controller_does_not_affect_another() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/getKnowledgeBaseGaps"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "gaps": [] }))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/listKnowledgeBaseDocs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [ { "key": "faq.md", "size": 10, "last_modified": "2024-03-01T08:00:00Z" } ],
            "continuation_token": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = Arc::new(test_client(&server).with_timeout(Duration::from_millis(100)));
    let gaps = GapsController::new(api.clone(), "cid-1");
    let docs = DocumentsController::new(api, "cid-1");

    tokio::join!(gaps.load_gaps(PageRequest::default()), docs.load_documents(""));

    let gap_state = gaps.snapshot().await;
    let error = gap_state.error.unwrap();
    assert_eq!(error.category, ErrorCategory::Timeout);
    assert_eq!(error.message, "Request timed out. Please try again.");
    assert!(!gap_state.loading);

    let doc_state = docs.snapshot().await;
    assert!(doc_state.error.is_none());
    assert_eq!(doc_state.documents.len(), 1);
}

#[tokio::test]
async fn test_state_is_readable_while_request_is_in_flight() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/getKnowledgeBaseGaps"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "gaps": [] }))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let gaps = GapsController::new(Arc::new(test_client(&server)), "cid-1");
    let loader = gaps.clone();
    let pending = tokio::spawn(async move { loader.load_gaps(PageRequest::default()).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(gaps.snapshot().await.loading);

    pending.await.unwrap();
    assert!(!gaps.snapshot().await.loading);
}
