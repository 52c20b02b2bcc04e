use crate::error::{ApiError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parsed body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// JSON view of the payload. Text bodies are parsed, since some endpoints
    /// answer JSON without declaring it.
    pub fn into_json(self) -> Result<Value> {
        match self {
            Payload::Json(value) => Ok(value),
            Payload::Text(text) if text.trim().is_empty() => Ok(Value::Null),
            Payload::Text(text) => serde_json::from_str(&text)
                .map_err(|e| ApiError::decode(format!("Expected JSON body: {}", e))),
        }
    }

    pub fn parse<T: DeserializeOwned>(self) -> Result<T> {
        let value = self.into_json()?;
        serde_json::from_value(value).map_err(|e| ApiError::decode(e.to_string()))
    }
}

/// Human-readable message from an error body.
///
/// Looks at `detail`, `message` and `error`, in that order. A `detail` array (the shape
/// FastAPI uses for 422s) is flattened into `loc: msg` pairs.
pub fn extract_error_message(body: &Value) -> Option<String> {
    for field in ["detail", "message", "error"] {
        match body.get(field) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Array(items)) if !items.is_empty() => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|item| {
                        let msg = item
                            .get("msg")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| item.to_string());
                        match item.get("loc").and_then(Value::as_array) {
                            Some(loc) => {
                                let path: Vec<String> = loc
                                    .iter()
                                    .map(|p| match p {
                                        Value::String(s) => s.clone(),
                                        other => other.to_string(),
                                    })
                                    .collect();
                                format!("{}: {}", path.join("."), msg)
                            }
                            None => msg,
                        }
                    })
                    .collect();
                return Some(parts.join("; "));
            }
            Some(Value::Object(inner)) => {
                if let Some(Value::String(s)) = inner.get("message") {
                    return Some(s.clone());
                }
            }
            _ => {}
        }
    }
    None
}

/// Confirmation text from a mutation response, if the server sent one.
pub fn extract_confirmation(body: &Value) -> Option<String> {
    match body {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(_) => body
            .get("message")
            .or_else(|| body.get("status"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
