use tracing::{info, warn};

use crate::assembler::PlaylistService;
use crate::error::Result;
use crate::models::{EnrichedSong, GeneratedPlaylist};
use crate::spotify::models::{RemotePlaylist, track_uri};

const DEFAULT_DESCRIPTION: &str = "Created with AI Playlist Maker";

/// Spotify caps how many tracks one add request may carry.
const ADD_TRACKS_BATCH: usize = 100;

/// Catalog URIs for the songs that were resolved, in playlist order.
pub fn track_uris(songs: &[EnrichedSong]) -> Vec<String> {
    songs
        .iter()
        .filter_map(|song| song.spotify_id.as_deref())
        .filter(|id| !id.is_empty())
        .map(track_uri)
        .collect()
}

/// Create a private playlist on the user's account and fill it with every
/// song that has a catalog id. Errors are returned as-is so callers can tell
/// a revoked authorization from other failures.
pub async fn export_playlist<S: PlaylistService + ?Sized>(
    service: &S,
    access_token: &str,
    user_id: &str,
    name: &str,
    description: &str,
    songs: &[EnrichedSong],
) -> Result<RemotePlaylist> {
    let description = if description.trim().is_empty() {
        DEFAULT_DESCRIPTION
    } else {
        description
    };

    let mut playlist = service
        .create_playlist(access_token, user_id, name, description)
        .await?;

    let uris = track_uris(songs);
    let skipped = songs.len() - uris.len();
    if skipped > 0 {
        warn!("Skipping {} songs without a Spotify id", skipped);
    }

    for chunk in uris.chunks(ADD_TRACKS_BATCH) {
        service.add_tracks(access_token, &playlist.id, chunk).await?;
        playlist.tracks_added += chunk.len();
    }

    info!(
        "Exported {} with {}/{} tracks",
        playlist.name,
        playlist.tracks_added,
        songs.len()
    );

    Ok(playlist)
}

/// Export a generated playlist to the account the access token belongs to.
pub async fn export_to_current_user<S: PlaylistService + ?Sized>(
    service: &S,
    access_token: &str,
    playlist: &GeneratedPlaylist,
) -> Result<RemotePlaylist> {
    let profile = service.current_user(access_token).await?;

    export_playlist(
        service,
        access_token,
        &profile.id,
        &playlist.name,
        &playlist.description,
        &playlist.songs,
    )
    .await
}
