use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One customer conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub created_at: String,
}

impl Session {
    /// The `YYYY-MM-DD` prefix of `created_at`, if it has one.
    pub fn created_date(&self) -> Option<&str> {
        let date = self.created_at.get(..10)?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        Some(date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: String,
    pub role: Role,
    pub content: MessageContent,
    #[serde(default)]
    pub created_at: String,
}

/// Message body: either plain text or a list of typed items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Items(Vec<ContentItem>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentItem {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "mcp_tool_use")]
    ToolUse {
        #[serde(default)]
        id: String,
        name: String,
        #[serde(default)]
        server_name: Option<String>,
        #[serde(default)]
        input: Value,
    },
    #[serde(rename = "mcp_tool_result")]
    ToolResult {
        #[serde(default)]
        tool_use_id: String,
        #[serde(default)]
        is_error: bool,
        #[serde(default)]
        content: Value,
    },
    #[serde(other)]
    Unsupported,
}

/// Product entry carried by a product-search tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default, alias = "link")]
    pub url: Option<String>,
}

impl ContentItem {
    /// Plain text carried by a tool result. Text blocks are joined with newlines.
    pub fn result_text(content: &Value) -> String {
        match content {
            Value::String(s) => s.clone(),
            Value::Array(blocks) => blocks
                .iter()
                .filter_map(|block| match block {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(_) => block
                        .get("text")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Products from a product-search result, when the result carries a `products` array
    /// either directly or as JSON inside a text block.
    pub fn products(content: &Value) -> Option<Vec<Product>> {
        fn from_value(value: &Value) -> Option<Vec<Product>> {
            let list = value.get("products")?.as_array()?;
            let products: Vec<Product> = list
                .iter()
                .filter_map(|p| serde_json::from_value(p.clone()).ok())
                .collect();
            Some(products)
        }

        if let Some(products) = from_value(content) {
            return Some(products);
        }
        let text = Self::result_text(content);
        let parsed: Value = serde_json::from_str(text.trim()).ok()?;
        from_value(&parsed)
    }
}

impl MessageContent {
    /// Flattened text view, used for previews and search.
    pub fn plain_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Items(items) => items
                .iter()
                .filter_map(|item| match item {
                    ContentItem::Text { text } => Some(text.clone()),
                    ContentItem::ToolUse { .. }
                    | ContentItem::ToolResult { .. }
                    | ContentItem::Unsupported => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}
