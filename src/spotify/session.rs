use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Result;

/// Tokens are refreshed this long before their stated expiry.
pub const EXPIRY_SKEW_SECS: i64 = 30;

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: String, expires_in_secs: i64) -> Self {
        Self {
            value,
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_SKEW_SECS) < self.expires_at
    }
}

/// App-level catalog token shared by concurrent lookups.
///
/// The check-and-refresh sequence runs under one lock, so callers racing on
/// an expired token trigger a single fetch.
#[derive(Debug, Default)]
pub struct CatalogSession {
    token: Mutex<Option<AccessToken>>,
}

impl CatalogSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached token value, or the result of `fetch` stored for later callers.
    pub async fn bearer<F, Fut>(&self, fetch: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AccessToken>>,
    {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
            debug!("Catalog token expired at {}, refreshing", token.expires_at);
        }

        let token = fetch().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Drop the cached token, e.g. after the API rejected it.
    pub async fn invalidate(&self) {
        self.token.lock().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_token_freshness_includes_skew() {
        let now = Utc::now();
        let token = AccessToken {
            value: "t".into(),
            expires_at: now + Duration::seconds(20),
        };
        assert!(!token.is_fresh(now));

        let token = AccessToken::new("t".into(), 3600);
        assert!(token.is_fresh(Utc::now()));
    }

    #[tokio::test]
    async fn test_token_is_reused_until_expiry() {
        let session = CatalogSession::new();
        let counter = AtomicUsize::new(0);
        let fetches = &counter;

        for _ in 0..3 {
            let value = session
                .bearer(|| async move {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok(AccessToken::new("first".into(), 3600))
                })
                .await
                .unwrap();
            assert_eq!(value, "first");
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_token_is_replaced() {
        let session = CatalogSession::new();
        session
            .bearer(|| async { Ok(AccessToken::new("stale".into(), 0)) })
            .await
            .unwrap();

        let value = session
            .bearer(|| async { Ok(AccessToken::new("fresh".into(), 3600)) })
            .await
            .unwrap();
        assert_eq!(value, "fresh");
    }

    #[tokio::test]
    async fn test_concurrent_callers_fetch_once() {
        let session = Arc::new(CatalogSession::new());
        let fetches = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let session = Arc::clone(&session);
                let fetches = Arc::clone(&fetches);
                tokio::spawn(async move {
                    session
                        .bearer(|| async move {
                            fetches.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                            Ok(AccessToken::new("shared".into(), 3600))
                        })
                        .await
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "shared");
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_cache_empty() {
        let session = CatalogSession::new();

        let err = session
            .bearer(|| async { Err(AppError::Auth("bad client".into())) })
            .await;
        assert!(err.is_err());

        let value = session
            .bearer(|| async { Ok(AccessToken::new("retry".into(), 3600)) })
            .await
            .unwrap();
        assert_eq!(value, "retry");

        session.invalidate().await;
        let value = session
            .bearer(|| async { Ok(AccessToken::new("after-invalidate".into(), 3600)) })
            .await
            .unwrap();
        assert_eq!(value, "after-invalidate");
    }
}
