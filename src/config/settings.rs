use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    default_allowed_domain, default_bot_name, default_gap_page_limit, default_message_page_limit,
    default_response_delay_secs, default_session_page_limit, default_welcome_message,
};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct KnowledgeBaseConfig {
    /// Substring every ingested URL must contain.
    #[serde(default = "default_allowed_domain")]
    pub allowed_domain: String,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            allowed_domain: default_allowed_domain(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaginationConfig {
    #[serde(default = "default_session_page_limit")]
    pub sessions: u32,
    #[serde(default = "default_message_page_limit")]
    pub messages: u32,
    #[serde(default = "default_gap_page_limit")]
    pub gaps: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            sessions: default_session_page_limit(),
            messages: default_message_page_limit(),
            gaps: default_gap_page_limit(),
        }
    }
}

/// Display settings for the bot, shown by `config show`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BotConfig {
    #[serde(default = "default_bot_name")]
    pub name: String,
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
    #[serde(default = "default_response_delay_secs")]
    pub response_delay_secs: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            welcome_message: default_welcome_message(),
            response_delay_secs: default_response_delay_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}
