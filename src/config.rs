use crate::error::{AppError, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-lite";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub spotify_redirect_uri: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let spotify_client_id = std::env::var("SPOTIFY_CLIENT_ID")
            .map_err(|_| AppError::Config("SPOTIFY_CLIENT_ID not set".into()))?;

        let spotify_client_secret = std::env::var("SPOTIFY_CLIENT_SECRET")
            .map_err(|_| AppError::Config("SPOTIFY_CLIENT_SECRET not set".into()))?;

        let spotify_redirect_uri = std::env::var("SPOTIFY_REDIRECT_URI")
            .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string());

        // Only generate and suggest need the key; see `missing_gemini_config`.
        let gemini_api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();

        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());

        Ok(Self {
            gemini_api_key,
            gemini_model,
            spotify_client_id,
            spotify_client_secret,
            spotify_redirect_uri,
        })
    }

    /// Every unset key, for commands that use both Gemini and Spotify.
    pub fn get_missing_config(&self) -> Vec<String> {
        let mut missing = self.missing_gemini_config();
        missing.extend(self.missing_spotify_config());
        missing
    }

    pub fn missing_gemini_config(&self) -> Vec<String> {
        if self.validate_gemini_config() {
            Vec::new()
        } else {
            vec!["GEMINI_API_KEY".to_string()]
        }
    }

    pub fn missing_spotify_config(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if self.spotify_client_id.is_empty() {
            missing.push("SPOTIFY_CLIENT_ID".to_string());
        }
        if self.spotify_client_secret.is_empty() {
            missing.push("SPOTIFY_CLIENT_SECRET".to_string());
        }

        missing
    }

    pub fn validate_spotify_config(&self) -> bool {
        !self.spotify_client_id.is_empty() && !self.spotify_client_secret.is_empty()
    }

    pub fn validate_gemini_config(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }
}

#[cfg(test)]
impl Config {
    pub fn mock() -> Self {
        Self {
            gemini_api_key: "gemini-key".to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            spotify_client_id: "client-id".to_string(),
            spotify_client_secret: "client-secret".to_string(),
            spotify_redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_lists_empty_keys() {
        let mut config = Config::mock();
        assert!(config.get_missing_config().is_empty());

        config.gemini_api_key.clear();
        config.spotify_client_secret.clear();

        assert_eq!(
            config.get_missing_config(),
            vec!["GEMINI_API_KEY".to_string(), "SPOTIFY_CLIENT_SECRET".to_string()]
        );
        assert!(!config.validate_gemini_config());
        assert!(!config.validate_spotify_config());
    }

    #[test]
    fn test_spotify_commands_do_not_need_gemini_key() {
        let mut config = Config::mock();
        config.gemini_api_key.clear();

        assert!(config.missing_spotify_config().is_empty());
        assert!(config.validate_spotify_config());
        assert_eq!(config.missing_gemini_config(), vec!["GEMINI_API_KEY".to_string()]);
        assert_eq!(config.get_missing_config(), vec!["GEMINI_API_KEY".to_string()]);
    }
}
