use crate::config::Config;
use crate::controllers::ErrorState;
use crate::dates::{format_date_time, format_time, smart_date};
use crate::models::{ContentItem, Document, KnowledgeGap, Message, MessageContent, Product, Role, Session};
use crate::text::{file_extension, format_file_size, process_chat_text};
use colored::*;
use serde_json::Value;
use std::fmt::Write;

/// Eight characters after the first `-` of an id, e.g. `sess-1a2b3c4d5e` -> `1a2b3c4d`.
pub fn short_id(id: &str) -> String {
    id.split('-')
        .nth(1)
        .filter(|part| !part.is_empty())
        .map(|part| part.chars().take(8).collect())
        .unwrap_or_else(|| "Unknown".to_string())
}

pub fn render_sessions(sessions: &[Session], date: Option<&str>, has_more: bool) -> String {
    let mut out = String::new();
    let heading = match date {
        Some(date) => format!("Sessions on {} ({})", date, sessions.len()),
        None => format!("All sessions ({})", sessions.len()),
    };
    let _ = writeln!(out, "{}", heading.bold());

    if sessions.is_empty() {
        let _ = writeln!(out, "{}", "No sessions for this date.".dimmed());
    }
    for session in sessions {
        let _ = writeln!(
            out,
            "  {}  {}  {}",
            session.id.cyan(),
            format!("customer {}", short_id(&session.customer_id)).dimmed(),
            format_date_time(&session.created_at)
        );
    }
    if has_more {
        let _ = writeln!(out, "{}", "More sessions are available.".yellow());
    }
    out
}

pub fn render_transcript(session: &Session, messages: &[Message], has_more: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  {}",
        format!("Session {}", short_id(&session.id)).bold(),
        format!(
            "Customer: {} | {} | {} messages",
            short_id(&session.customer_id),
            smart_date(&session.created_at),
            messages.len()
        )
        .dimmed()
    );
    if has_more {
        let _ = writeln!(out, "{}", "(earlier messages available)".yellow());
    }
    if messages.is_empty() {
        let _ = writeln!(out, "{}", "This session doesn't have any messages yet.".dimmed());
    }
    for message in messages {
        out.push_str(&render_message(message));
    }
    out
}

pub fn render_message(message: &Message) -> String {
    let mut out = String::new();
    let speaker = match message.role {
        Role::User => "User".blue().bold(),
        Role::Assistant => "Bot".green().bold(),
    };
    let _ = writeln!(
        out,
        "{} {}",
        speaker,
        format_time(&message.created_at).dimmed()
    );

    match &message.content {
        MessageContent::Text(text) => {
            let _ = writeln!(out, "{}", indent(&render_text(message.role, text)));
        }
        MessageContent::Items(items) => {
            for item in items {
                out.push_str(&render_content_item(message.role, item));
            }
        }
    }
    out
}

fn render_text(role: Role, text: &str) -> String {
    match role {
        Role::Assistant => process_chat_text(text),
        Role::User => text.to_string(),
    }
}

fn render_content_item(role: Role, item: &ContentItem) -> String {
    let mut out = String::new();
    match item {
        ContentItem::Text { text } => {
            let _ = writeln!(out, "{}", indent(&render_text(role, text)));
        }
        ContentItem::ToolUse {
            name,
            server_name,
            input,
            ..
        } => {
            let origin = server_name
                .as_deref()
                .map(|s| format!(" via {}", s))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {} {}{}",
                "[tool call]".magenta(),
                name.bold(),
                origin.dimmed()
            );
            if !input.is_null() {
                let _ = writeln!(out, "{}", indent(&pretty_json(input)).dimmed());
            }
        }
        ContentItem::ToolResult {
            is_error, content, ..
        } => {
            if *is_error {
                let _ = writeln!(out, "  {}", "[tool error]".red());
                let _ = writeln!(out, "{}", indent(&ContentItem::result_text(content)));
            } else if let Some(products) = ContentItem::products(content) {
                let _ = writeln!(
                    out,
                    "  {} {}",
                    "[tool result]".magenta(),
                    format!("{} products", products.len()).dimmed()
                );
                out.push_str(&render_products(&products));
            } else {
                let _ = writeln!(out, "  {}", "[tool result]".magenta());
                let text = ContentItem::result_text(content);
                let body = match serde_json::from_str::<Value>(text.trim()) {
                    Ok(value) if value.is_object() || value.is_array() => pretty_json(&value),
                    _ => text,
                };
                let _ = writeln!(out, "{}", indent(&body));
            }
        }
        ContentItem::Unsupported => {
            let _ = writeln!(out, "  {}", "[unsupported content]".dimmed());
        }
    }
    out
}

fn render_products(products: &[Product]) -> String {
    let mut out = String::new();
    for (i, product) in products.iter().enumerate() {
        let price = match &product.price {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => other.to_string(),
            None => "-".to_string(),
        };
        let _ = writeln!(out, "    {}. {}  {}", i + 1, product.name.bold(), price.green());
        if let Some(url) = &product.url {
            let _ = writeln!(out, "       {}", url.dimmed());
        }
    }
    out
}

pub fn render_documents(documents: &[Document], has_more: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!("Knowledge base ({} documents)", documents.len()).bold()
    );
    if documents.is_empty() {
        let _ = writeln!(out, "{}", "No documents yet.".dimmed());
    }
    for doc in documents {
        let ext = file_extension(&doc.key);
        let _ = writeln!(
            out,
            "  {}  {}  {}  {}",
            doc.key.cyan(),
            if ext.is_empty() { "-".to_string() } else { ext },
            format_file_size(doc.size),
            format_date_time(&doc.last_modified).dimmed()
        );
    }
    if has_more {
        let _ = writeln!(out, "{}", "More documents are available.".yellow());
    }
    out
}

pub fn render_gaps(gaps: &[KnowledgeGap], total: u32, has_more: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!("Knowledge gaps ({} of {})", gaps.len(), total).bold()
    );
    if gaps.is_empty() {
        let _ = writeln!(out, "{}", "No open knowledge gaps.".dimmed());
    }
    for gap in gaps {
        let marker = if gap.is_custom() { " (custom)" } else { "" };
        let _ = writeln!(
            out,
            "  {}{}  {}",
            gap.id.cyan(),
            marker.yellow(),
            format_date_time(&gap.created_at).dimmed()
        );
        let _ = writeln!(out, "    Q: {}", gap.question);
        if let Some(suggestions) = gap.suggestions.as_deref().filter(|s| !s.is_empty()) {
            let _ = writeln!(out, "    {}", format!("Suggested: {}", suggestions).dimmed());
        }
        if let Some(answer) = gap.answer.as_deref().filter(|a| !a.is_empty()) {
            let _ = writeln!(out, "    A: {}", answer);
        }
    }
    if has_more {
        let _ = writeln!(out, "{}", "More gaps are available.".yellow());
    }
    out
}

pub fn render_error(error: &ErrorState) -> String {
    format!("{} {}", "Error:".red(), error.message)
}

pub fn render_settings(config: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Bot".bold());
    let _ = writeln!(out, "  name:             {}", config.bot.name);
    let _ = writeln!(out, "  welcome message:  {}", config.bot.welcome_message);
    let _ = writeln!(out, "  response delay:   {}s", config.bot.response_delay_secs);
    let _ = writeln!(out, "{}", "API".bold());
    let _ = writeln!(out, "  base url:         {}", config.api_base_url);
    let _ = writeln!(out, "  client id:        {}", config.client_id);
    let _ = writeln!(out, "  timeout:          {}ms", config.timeout.as_millis());
    let _ = writeln!(out, "  health timeout:   {}ms", config.health_timeout.as_millis());
    let _ = writeln!(
        out,
        "  retry:            {} attempts, {}ms base delay",
        config.retry.max_attempts,
        config.retry.base_delay.as_millis()
    );
    let _ = writeln!(out, "{}", "Knowledge base".bold());
    let _ = writeln!(out, "  allowed domain:   {}", config.allowed_domain);
    let _ = writeln!(
        out,
        "  page sizes:       sessions {}, messages {}, gaps {}",
        config.pagination.sessions, config.pagination.messages, config.pagination.gaps
    );
    out
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
