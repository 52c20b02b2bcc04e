use serde_json::json;
use supportctl::controllers::{ErrorCategory, ErrorState};
use supportctl::models::{ContentItem, Document, GapOrigin, KnowledgeGap, Message, MessageContent, Role, Session};
use supportctl::ui::{render_documents, render_error, render_gaps, render_message, render_sessions, render_transcript, short_id};

fn plain() {
    colored::control::set_override(false);
}

fn session() -> Session {
    Session {
        id: "sess-1a2b3c4d5e6f".to_string(),
        customer_id: "cust-99887766aa".to_string(),
        created_at: "2024-01-01T09:30:00Z".to_string(),
    }
}

#[test]
fn test_short_id() {
    assert_eq!(short_id("sess-1a2b3c4d5e6f"), "1a2b3c4d");
    assert_eq!(short_id("cust-abc"), "abc");
    assert_eq!(short_id("noseparator"), "Unknown");
    assert_eq!(short_id("trailing-"), "Unknown");
}

#[test]
fn test_sessions_listing() {
    plain();
    let out = render_sessions(&[session()], Some("2024-01-01"), true);
    assert!(out.contains("Sessions on 2024-01-01 (1)"));
    assert!(out.contains("sess-1a2b3c4d5e6f"));
    assert!(out.contains("customer 99887766"));
    assert!(out.contains("More sessions are available."));

    let out = render_sessions(&[], Some("2024-01-02"), false);
    assert!(out.contains("No sessions for this date."));
}

#[test]
fn test_empty_transcript() {
    plain();
    let out = render_transcript(&session(), &[], false);
    assert!(out.contains("Session 1a2b3c4d"));
    assert!(out.contains("This session doesn't have any messages yet."));
}

#[test]
fn test_assistant_text_is_cleaned_and_user_text_is_not() {
    plain();
    let bot = Message {
        id: "m1".to_string(),
        role: Role::Assistant,
        content: MessageContent::Text("<thinking>hmm</thinking><response>Hello!</response>".to_string()),
        created_at: "2024-01-01T09:31:00Z".to_string(),
    };
    let out = render_message(&bot);
    assert!(out.contains("Bot"));
    assert!(out.contains("09:31"));
    assert!(out.contains("Hello!"));
    assert!(!out.contains("hmm"));

    let user = Message {
        id: "m2".to_string(),
        role: Role::User,
        content: MessageContent::Text("<response>as typed</response>".to_string()),
        created_at: String::new(),
    };
    assert!(render_message(&user).contains("<response>as typed</response>"));
}

#[test]
fn test_structured_content() {
    plain();
    let message = Message {
        id: "m3".to_string(),
        role: Role::Assistant,
        content: MessageContent::Items(vec![
            ContentItem::ToolUse {
                id: "tu1".to_string(),
                name: "product_search".to_string(),
                server_name: Some("shop".to_string()),
                input: json!({ "query": "saffron" }),
            },
            ContentItem::ToolResult {
                tool_use_id: "tu1".to_string(),
                is_error: false,
                content: json!({ "products": [
                    { "title": "Saffron 1g", "price": 12.5, "link": "https://homespice.com/saffron" },
                    { "name": "Saffron 5g" }
                ] }),
            },
            ContentItem::ToolResult {
                tool_use_id: "tu2".to_string(),
                is_error: true,
                content: json!("inventory service down"),
            },
            ContentItem::Unsupported,
        ]),
        created_at: "2024-01-01T09:32:00Z".to_string(),
    };

    let out = render_message(&message);
    assert!(out.contains("[tool call] product_search via shop"));
    assert!(out.contains("\"query\": \"saffron\""));
    assert!(out.contains("[tool result] 2 products"));
    assert!(out.contains("1. Saffron 1g  12.5"));
    assert!(out.contains("https://homespice.com/saffron"));
    assert!(out.contains("2. Saffron 5g  -"));
    assert!(out.contains("[tool error]"));
    assert!(out.contains("inventory service down"));
    assert!(out.contains("[unsupported content]"));
}

#[test]
fn test_documents_listing() {
    plain();
    let docs = vec![Document {
        key: "cid-1/faq.MD".to_string(),
        size: 1536,
        last_modified: "2024-03-01T08:00:00Z".to_string(),
    }];
    let out = render_documents(&docs, false);
    assert!(out.contains("Knowledge base (1 documents)"));
    assert!(out.contains("cid-1/faq.MD  md  1.5 KB  Mar 01, 2024 08:00"));
}

#[test]
fn test_gaps_listing_marks_custom_gaps() {
    plain();
    let gaps = vec![
        KnowledgeGap {
            id: "custom-1".to_string(),
            question: "Parking?".to_string(),
            answer: Some("Behind the shop".to_string()),
            suggestions: None,
            created_at: String::new(),
            origin: GapOrigin::Local,
        },
        KnowledgeGap {
            id: "gap-7".to_string(),
            question: "Do you ship abroad?".to_string(),
            answer: None,
            suggestions: Some("EU only".to_string()),
            created_at: "2024-02-01T12:00:00Z".to_string(),
            origin: GapOrigin::Server,
        },
    ];
    let out = render_gaps(&gaps, 12, true);
    assert!(out.contains("Knowledge gaps (2 of 12)"));
    assert!(out.contains("custom-1 (custom)"));
    assert!(!out.contains("gap-7 (custom)"));
    assert!(out.contains("Q: Do you ship abroad?"));
    assert!(out.contains("Suggested: EU only"));
    assert!(out.contains("A: Behind the shop"));
    assert!(out.contains("More gaps are available."));
}

#[test]
fn test_error_line() {
    plain();
    let error = ErrorState {
        message: "Request timed out. Please try again.".to_string(),
        category: ErrorCategory::Timeout,
    };
    assert_eq!(render_error(&error), "Error: Request timed out. Please try again.");
    assert_eq!(error.to_string(), "Request timed out. Please try again. (timeout)");
}

#[test]
fn test_error_state_survives_anyhow_for_rendering() {
    plain();
    let error = ErrorState {
        message: "The requested resource was not found.".to_string(),
        category: ErrorCategory::NotFound,
    };
    let err: anyhow::Error = error.clone().into();

    let state = err.downcast_ref::<ErrorState>().unwrap();
    assert_eq!(state, &error);
    assert_eq!(render_error(state), "Error: The requested resource was not found.");
}
