use regex::Regex;
use std::sync::OnceLock;

fn unicode_escape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\u([0-9a-fA-F]{4})").expect("valid regex"))
}

fn response_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<response>(.*?)</response>").expect("valid regex"))
}

fn thinking_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<thinking>.*?</thinking>").expect("valid regex"))
}

/// Prepare bot output for display.
///
/// Escaped sequences (`\uXXXX`, `\n`, `\t`, `\r`, quotes, backslashes) are decoded. If the
/// text has a `<response>` block only its trimmed body is kept; otherwise `<thinking>`
/// blocks are stripped.
pub fn process_chat_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let decoded = unicode_escape().replace_all(text, |caps: &regex::Captures| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map(|c| c.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    });
    let decoded = unescape(&decoded);

    if let Some(caps) = response_block().captures(&decoded) {
        return caps[1].trim().to_string();
    }

    if decoded.contains("<thinking>") {
        return thinking_block().replace_all(&decoded, "").trim().to_string();
    }

    decoded
}

// Single left-to-right pass so `\\n` stays a backslash followed by `n`.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            _ => {
                out.push('\\');
                continue;
            }
        }
        chars.next();
    }
    out
}

/// Lowercased extension of a document key, or "" when it has none.
pub fn file_extension(key: &str) -> String {
    let name = key.rsplit('/').next().unwrap_or(key);
    match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}

/// Human-readable size: "0 Bytes", "512 Bytes", "1.5 KB", "2 MB".
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
