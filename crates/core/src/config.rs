//! Shared client configuration types.
//!
//! The TUI reads/writes `vidsage.toml` using these types; file I/O lives in
//! the TUI crate.

use serde::{Deserialize, Serialize};

/// Top-level client configuration (persisted as `vidsage.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub history: HistorySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_server_url")]
    pub url: String,
    /// Bearer token from the hosted auth provider. Empty means anonymous.
    #[serde(default)]
    pub access_token: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            access_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Per-character delay of the streaming reveal, in milliseconds.
    #[serde(default = "default_reveal_char_delay_ms")]
    pub reveal_char_delay_ms: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            reveal_char_delay_ms: default_reveal_char_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Maximum number of prior videos fetched for the history panel.
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            limit: default_history_limit(),
        }
    }
}

// ── Serde default functions ─────────────────────────────────────────────

fn default_server_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_reveal_char_delay_ms() -> u64 {
    18
}
fn default_history_limit() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_every_section() {
        let config = AppConfig::default();
        assert_eq!(config.server.url, "http://localhost:8000");
        assert!(config.server.access_token.is_empty());
        assert_eq!(config.chat.reveal_char_delay_ms, 18);
        assert_eq!(config.history.limit, 10);
    }

    #[test]
    fn partial_json_uses_field_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"server": {"url": "https://api.example.com"}}"#).unwrap();
        assert_eq!(config.server.url, "https://api.example.com");
        assert!(config.server.access_token.is_empty());
        assert_eq!(config.history.limit, 10);
    }
}
