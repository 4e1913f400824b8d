pub mod export;
pub mod orchestrator;

use async_trait::async_trait;

use crate::error::Result;
use crate::spotify::models::{CatalogTrack, RemotePlaylist, UserProfile};
use crate::spotify::session::CatalogSession;

pub use export::{export_playlist, export_to_current_user};
pub use orchestrator::{Enrichment, PlaylistAssembler};

/// Resolves a (track, artist) pair to catalog metadata.
#[async_trait]
pub trait TrackCatalog: Send + Sync + 'static {
    async fn lookup(
        &self,
        session: &CatalogSession,
        name: &str,
        artist: &str,
    ) -> Result<Option<CatalogTrack>>;
}

/// Playlist operations performed with a user's delegated access token.
#[async_trait]
pub trait PlaylistService: Send + Sync {
    async fn current_user(&self, access_token: &str) -> Result<UserProfile>;

    async fn create_playlist(
        &self,
        access_token: &str,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<RemotePlaylist>;

    async fn add_tracks(&self, access_token: &str, playlist_id: &str, uris: &[String]) -> Result<()>;
}
