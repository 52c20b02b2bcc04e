mod common;

use common::{request_count, shared_client};
use serde_json::json;
use supportctl::api::NewDocument;
use supportctl::controllers::{DocumentsController, ErrorCategory};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn doc(key: &str) -> serde_json::Value {
    json!({ "key": key, "size": 100, "last_modified": "2024-03-01T08:00:00Z" })
}

async fn mount_page(server: &MockServer, token: &str, keys: &[&str], next: &str) {
    Mock::given(method("POST"))
        .and(path("/listKnowledgeBaseDocs"))
        .and(body_json(json!({ "client_id": "cid-1", "continuation_token": token })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": keys.iter().map(|k| doc(k)).collect::<Vec<_>>(),
            "continuation_token": next
        })))
        .mount(server)
        .await;
}

fn keys(controller_docs: &[supportctl::models::Document]) -> Vec<&str> {
    controller_docs.iter().map(|d| d.key.as_str()).collect()
}

#[tokio::test]
async fn test_first_page_replaces_and_later_pages_append() {
    let server = MockServer::start().await;
    mount_page(&server, "", &["a.md", "b.md"], "t1").await;
    mount_page(&server, "t1", &["c.md"], "").await;

    let docs = DocumentsController::new(shared_client(&server), "cid-1");

    docs.load_documents("").await;
    let state = docs.snapshot().await;
    assert_eq!(keys(&state.documents), vec!["a.md", "b.md"]);
    assert_eq!(state.continuation_token, "t1");
    assert!(state.has_more());

    docs.load_documents("t1").await;
    let state = docs.snapshot().await;
    assert_eq!(keys(&state.documents), vec!["a.md", "b.md", "c.md"]);
    assert!(!state.has_more());
    assert!(!state.loading);

    // Loading the first page again replaces rather than duplicating.
    docs.load_documents("").await;
    let state = docs.snapshot().await;
    assert_eq!(keys(&state.documents), vec!["a.md", "b.md"]);
}

#[tokio::test]
async fn test_load_more_follows_token_and_stops_at_end() {
    let server = MockServer::start().await;
    mount_page(&server, "", &["a.md"], "t1").await;
    mount_page(&server, "t1", &["b.md"], "").await;

    let docs = DocumentsController::new(shared_client(&server), "cid-1");
    docs.load_documents("").await;
    docs.load_more().await;
    assert_eq!(request_count(&server).await, 2);

    // Empty token: nothing further to fetch.
    docs.load_more().await;
    assert_eq!(request_count(&server).await, 2);
    assert_eq!(keys(&docs.snapshot().await.documents), vec!["a.md", "b.md"]);
}

#[tokio::test]
async fn test_load_more_without_token_makes_no_request() {
    let server = MockServer::start().await;
    let docs = DocumentsController::new(shared_client(&server), "cid-1");

    docs.load_more().await;

    assert_eq!(request_count(&server).await, 0);
    assert!(docs.snapshot().await.documents.is_empty());
}

#[tokio::test]
async fn test_refresh_starts_over() {
    let server = MockServer::start().await;
    mount_page(&server, "", &["a.md"], "t1").await;
    mount_page(&server, "t1", &["b.md"], "").await;

    let docs = DocumentsController::new(shared_client(&server), "cid-1");
    docs.load_documents("").await;
    docs.load_more().await;
    docs.refresh().await;

    let state = docs.snapshot().await;
    assert_eq!(keys(&state.documents), vec!["a.md"]);
    assert_eq!(state.continuation_token, "t1");
}

#[tokio::test]
async fn test_delete_removes_only_after_success() {
    let server = MockServer::start().await;
    mount_page(&server, "", &["a.md", "b.md"], "").await;
    Mock::given(method("POST"))
        .and(path("/deleteKnowledgeBaseDoc"))
        .and(body_json(json!({ "client_id": "cid-1", "key": "a.md" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/deleteKnowledgeBaseDoc"))
        .and(body_json(json!({ "client_id": "cid-1", "key": "b.md" })))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "detail": "forbidden" })))
        .expect(1)
        .mount(&server)
        .await;

    let docs = DocumentsController::new(shared_client(&server), "cid-1");
    docs.load_documents("").await;

    let confirmation = docs.delete_document("a.md").await.unwrap();
    assert_eq!(confirmation.message.as_deref(), Some("deleted"));
    assert_eq!(keys(&docs.snapshot().await.documents), vec!["b.md"]);

    assert!(docs.delete_document("b.md").await.is_err());
    let state = docs.snapshot().await;
    assert_eq!(keys(&state.documents), vec!["b.md"]);
    let error = state.error.unwrap();
    assert_eq!(error.category, ErrorCategory::Auth);
    assert_eq!(error.message, "You do not have permission to perform this action.");
}

#[tokio::test]
async fn test_created_document_is_not_inserted() {
    let server = MockServer::start().await;
    mount_page(&server, "", &["a.md"], "").await;
    Mock::given(method("POST"))
        .and(path("/createKnowledgeBaseDoc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Document created" })))
        .expect(1)
        .mount(&server)
        .await;

    let docs = DocumentsController::new(shared_client(&server), "cid-1");
    docs.load_documents("").await;

    let confirmation = docs
        .create_document(&NewDocument::Doc {
            filename: "new.md".to_string(),
            content: "hello".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(confirmation.message.as_deref(), Some("Document created"));
    assert_eq!(keys(&docs.snapshot().await.documents), vec!["a.md"]);
}

#[tokio::test]
async fn test_invalid_document_records_validation_error() {
    let server = MockServer::start().await;
    let docs = DocumentsController::new(shared_client(&server), "cid-1");

    let err = docs
        .create_document(&NewDocument::Url {
            url: "https://elsewhere.com/page".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.message, "We only accept your domain's URL.");
    let error = docs.snapshot().await.error.unwrap();
    assert_eq!(error.category, ErrorCategory::Validation);
    assert_eq!(error.message, "We only accept your domain's URL.");
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_failed_load_keeps_documents() {
    let server = MockServer::start().await;
    mount_page(&server, "", &["a.md"], "t1").await;
    Mock::given(method("POST"))
        .and(path("/listKnowledgeBaseDocs"))
        .and(body_json(json!({ "client_id": "cid-1", "continuation_token": "t1" })))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "gone" })))
        .mount(&server)
        .await;

    let docs = DocumentsController::new(shared_client(&server), "cid-1");
    docs.load_documents("").await;
    docs.load_more().await;

    let state = docs.snapshot().await;
    assert_eq!(keys(&state.documents), vec!["a.md"]);
    assert_eq!(state.continuation_token, "t1");
    assert!(!state.loading);
    let error = state.error.unwrap();
    assert_eq!(error.category, ErrorCategory::NotFound);
    assert_eq!(error.message, "The requested resource was not found.");
}

#[tokio::test]
async fn test_document_content_and_missing_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/getKnowledgeBaseDoc"))
        .and(body_json(json!({ "client_id": "cid-1", "key": "a.md" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "content": "Hours: 9-5" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/getKnowledgeBaseDoc"))
        .and(body_json(json!({ "client_id": "cid-1", "key": "missing.md" })))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let docs = DocumentsController::new(shared_client(&server), "cid-1");
    assert_eq!(docs.get_document_content("a.md").await.unwrap(), "Hours: 9-5");
    assert!(docs.snapshot().await.error.is_none());

    assert!(docs.get_document_content("missing.md").await.is_err());
    assert_eq!(
        docs.snapshot().await.error.unwrap().category,
        ErrorCategory::NotFound
    );
}
