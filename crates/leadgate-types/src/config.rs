//! Application configuration, deserialized from `config.toml`.
//!
//! Every field carries a serde default so a missing or partial file still
//! yields a runnable configuration. Secrets (JWT signing key, provider API
//! keys) are never read from this file -- they come from the environment
//! (see the loader in leadgate-infra).

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub chat: ChatConfig,
    pub speech: SpeechConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Access-token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Fixed TTL embedded into every issued token.
    pub token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_minutes: 30,
        }
    }
}

/// Conversation orchestrator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Case-insensitive substring that advances the conversation stage.
    pub trigger_phrase: String,
    /// Exact hand-off sentence: when the model reply contains it, the turn
    /// short-circuits and returns only this sentence.
    pub handoff_sentinel: String,
    /// Sector value that enables the topical prompt suffix.
    pub sector_hint: String,
    /// Maximum transcript entries kept per session (oldest dropped first).
    pub transcript_cap: usize,
    /// Sessions idle longer than this are evicted.
    pub session_ttl_minutes: i64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            trigger_phrase: "já uso ia".to_string(),
            handoff_sentinel:
                "Entendido, um de nossos assistentes irá falar com você o mais breve possível!"
                    .to_string(),
            sector_hint: "contabilidade".to_string(),
            transcript_cap: 80,
            session_ttl_minutes: 30,
        }
    }
}

/// Speech provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub language_code: String,
    pub voice_name: String,
    pub sample_rate_hertz: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language_code: "pt-PT".to_string(),
            voice_name: "pt-PT-Wavenet-B".to_string(),
            sample_rate_hertz: 16_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.auth.token_ttl_minutes, 30);
        assert_eq!(config.chat.model, "gpt-4");
        assert_eq!(config.chat.transcript_cap, 80);
        assert_eq!(config.speech.sample_rate_hertz, 16_000);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[chat]
model = "gpt-4o-mini"
trigger_phrase = "already use ai"
"#,
        )
        .unwrap();
        assert_eq!(config.chat.model, "gpt-4o-mini");
        assert_eq!(config.chat.trigger_phrase, "already use ai");
        // Untouched sections keep their defaults.
        assert_eq!(config.chat.temperature, 0.7);
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_sentinel_default_is_exact() {
        let config = ChatConfig::default();
        assert!(config.handoff_sentinel.starts_with("Entendido"));
        assert!(config.handoff_sentinel.ends_with('!'));
    }
}
