use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::spotify::session::EXPIRY_SKEW_SECS;

/// Catalog metadata for one resolved track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub preview_url: Option<String>,
    pub duration_ms: u64,
    pub album: Option<String>,
    pub image_url: Option<String>,
}

impl CatalogTrack {
    /// Duration in whole seconds, e.g. `"215s"`.
    pub fn display_duration(&self) -> String {
        format!("{}s", self.duration_ms / 1000)
    }
}

pub fn track_uri(id: &str) -> String {
    format!("spotify:track:{}", id)
}

/// Credentials granted by a user through the authorization-code flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default = "Utc::now")]
    pub obtained_at: DateTime<Utc>,
}

impl UserToken {
    /// Counts as expired once fewer than `EXPIRY_SKEW_SECS` remain.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let expires_at = self.obtained_at + Duration::seconds(self.expires_in as i64);
        now + Duration::seconds(EXPIRY_SKEW_SECS) >= expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub images: Vec<ApiImage>,
}

/// Playlist created on the user's account by an export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemotePlaylist {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub tracks_added: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub tracks: Option<Paging<ApiTrack>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiTrack {
    pub id: Option<String>,
    pub preview_url: Option<String>,
    pub duration_ms: u64,
    pub album: Option<ApiAlbum>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<ApiImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiImage {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub public: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiPlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExternalUrls {
    pub spotify: Option<String>,
}

impl ApiTrack {
    /// Local or unavailable tracks come back without an id and are useless here.
    pub fn into_catalog_track(self) -> Option<CatalogTrack> {
        let id = self.id?;
        let (album, image_url) = match self.album {
            Some(album) => {
                let image = album.images.into_iter().next().map(|i| i.url);
                (Some(album.name), image)
            }
            None => (None, None),
        };

        Some(CatalogTrack {
            id,
            preview_url: self.preview_url,
            duration_ms: self.duration_ms,
            album,
            image_url,
        })
    }
}

#[cfg(test)]
impl CatalogTrack {
    pub fn mock(id: &str) -> Self {
        Self {
            id: id.to_string(),
            preview_url: Some(format!("https://p.scdn.co/mp3-preview/{}", id)),
            duration_ms: 215_000,
            album: Some("Mock Album".to_string()),
            image_url: Some("https://i.scdn.co/image/mock".to_string()),
        }
    }
}
