use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Playlist generation failed: {0}")]
    Generation(String),

    #[error("Gemini API error: {0}")]
    ModelApi(String),

    #[error("Spotify API error ({status}): {message}")]
    SpotifyApi { status: StatusCode, message: String },

    #[error("Spotify authorization expired, please reconnect your account")]
    ReauthRequired,

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl AppError {
    /// The user has to authorize the app again before the call can succeed.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, AppError::ReauthRequired)
    }

    /// Transient failures where repeating the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Http(e) => e.is_timeout() || e.is_connect(),
            AppError::SpotifyApi { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reauth_is_distinct_from_retry() {
        let err = AppError::ReauthRequired;
        assert!(err.requires_reauth());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_server_errors_are_retryable() {
        let throttled = AppError::SpotifyApi {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "slow down".into(),
        };
        let unavailable = AppError::SpotifyApi {
            status: StatusCode::BAD_GATEWAY,
            message: "upstream".into(),
        };
        let bad_request = AppError::SpotifyApi {
            status: StatusCode::BAD_REQUEST,
            message: "bad".into(),
        };

        assert!(throttled.is_retryable());
        assert!(unavailable.is_retryable());
        assert!(!bad_request.is_retryable());
        assert!(!bad_request.requires_reauth());
    }
}
