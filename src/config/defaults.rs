pub const DEFAULT_CLIENT_ID: &str = "cid-83f1d585a5e842249c1fd1f177c2dfac";

pub fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

pub fn default_timeout_ms() -> u64 {
    30_000
}

pub fn default_health_timeout_ms() -> u64 {
    5_000
}

pub fn default_max_attempts() -> u32 {
    3
}

pub fn default_retry_base_delay_ms() -> u64 {
    1_000
}

pub fn default_allowed_domain() -> String {
    "homespice".to_string()
}

pub fn default_session_page_limit() -> u32 {
    100
}

pub fn default_message_page_limit() -> u32 {
    50
}

pub fn default_gap_page_limit() -> u32 {
    10
}

pub fn default_bot_name() -> String {
    "Darban AI Assistant".to_string()
}

pub fn default_welcome_message() -> String {
    "Hello! I'm here to help you with any questions you might have. How can I assist you today?"
        .to_string()
}

pub fn default_response_delay_secs() -> u32 {
    1
}
