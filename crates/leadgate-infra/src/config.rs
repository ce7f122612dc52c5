//! Configuration and secret loading.
//!
//! Reads `config.toml` from the data directory (`~/.leadgate/` in
//! production) and deserializes it into [`AppConfig`]. Falls back to
//! defaults when the file is missing or malformed.
//!
//! Secrets never live in the file: the JWT signing key and provider API
//! keys come from environment variables only.

use std::path::Path;

use secrecy::SecretString;
use thiserror::Error;

use leadgate_types::config::AppConfig;

/// Environment variable holding the JWT signing secret. Required.
pub const JWT_SECRET_VAR: &str = "LEADGATE_JWT_SECRET";
/// Environment variable holding the OpenAI API key. Required.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the Google Cloud API key. Required for the
/// voice endpoints.
pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Errors from secret resolution.
#[derive(Debug, Error)]
pub enum SecretLoadError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
}

/// Secrets resolved from the environment at startup.
pub struct Secrets {
    pub jwt_secret: SecretString,
    pub openai_api_key: SecretString,
    pub google_api_key: SecretString,
}

impl Secrets {
    /// Resolve all required secrets, failing fast on the first missing one.
    pub fn from_env() -> Result<Self, SecretLoadError> {
        Ok(Self {
            jwt_secret: require(JWT_SECRET_VAR)?,
            openai_api_key: require(OPENAI_API_KEY_VAR)?,
            google_api_key: require(GOOGLE_API_KEY_VAR)?,
        })
    }
}

fn require(var: &'static str) -> Result<SecretString, SecretLoadError> {
    match std::env::var(var) {
        Ok(val) if !val.is_empty() => Ok(SecretString::from(val)),
        _ => Err(SecretLoadError::Missing(var)),
    }
}

/// Load application configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Returns the data directory from `LEADGATE_DATA_DIR`, falling back to
/// `~/.leadgate`.
pub fn default_data_dir() -> std::path::PathBuf {
    std::env::var("LEADGATE_DATA_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            std::path::PathBuf::from(home).join(".leadgate")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_app_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.chat.model, "gpt-4");
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
    }

    #[tokio::test]
    async fn load_app_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
[server]
bind_addr = "0.0.0.0:9000"

[chat]
model = "gpt-4o-mini"
"#,
        )
        .await
        .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.chat.model, "gpt-4o-mini");
        // Unspecified sections fall back to defaults.
        assert_eq!(config.auth.token_ttl_minutes, 30);
    }

    #[tokio::test]
    async fn load_app_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_app_config(tmp.path()).await;
        assert_eq!(config.chat.model, "gpt-4");
    }

    #[test]
    fn secrets_missing_var_fails_with_its_name() {
        // SAFETY: test-local removal of a variable nothing else reads.
        unsafe { std::env::remove_var(JWT_SECRET_VAR) };
        // Secrets has no Debug impl (it wraps SecretString), so take the
        // error out of the Option side.
        let err = Secrets::from_env().err().expect("must fail without the variable");
        assert!(err.to_string().contains(JWT_SECRET_VAR));
    }
}
