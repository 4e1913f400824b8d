use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::Result;
use crate::models::GeneratedPlaylist;
use crate::spotify::models::{RemotePlaylist, UserToken};

pub const PLAYLISTS_DIR: &str = "playlists";
pub const SESSION_FILE: &str = "spotify_session.json";

/// Delegated Spotify access kept between CLI runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub spotify_user_id: String,
    pub display_name: Option<String>,
    pub token: UserToken,
}

pub fn save_playlist(dir: &Path, playlist: &GeneratedPlaylist) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    fs::create_dir_all(dir)?;

    let filename = dir.join(format!("playlist_{}.json", timestamp));
    let json = serde_json::to_string_pretty(playlist)?;

    fs::write(&filename, json)?;

    info!("Playlist saved to: {}", filename.display());

    Ok(filename)
}

pub fn load_playlist(path: &Path) -> Result<GeneratedPlaylist> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Remember the remote playlist on the saved file so it is not exported twice.
pub fn record_export(
    path: &Path,
    playlist: &mut GeneratedPlaylist,
    remote: &RemotePlaylist,
) -> Result<()> {
    playlist.spotify_playlist_id = Some(remote.id.clone());
    fs::write(path, serde_json::to_string_pretty(playlist)?)?;
    Ok(())
}

/// Saved playlists in `dir`, newest first. Files that do not parse are skipped.
pub fn list_playlists(dir: &Path) -> Result<Vec<(PathBuf, GeneratedPlaylist)>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut playlists = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        match load_playlist(&path) {
            Ok(playlist) => playlists.push((path, playlist)),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    playlists.sort_by(|a, b| b.1.generated_at.cmp(&a.1.generated_at));
    Ok(playlists)
}

pub fn save_session(path: &Path, session: &StoredSession) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(session)?)?;
    info!("Spotify session saved to: {}", path.display());
    Ok(())
}

/// `None` when no account has been connected yet.
pub fn load_session(path: &Path) -> Result<Option<StoredSession>> {
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&json)?))
}

/// Forget the connected account. Returns whether one was stored.
pub fn delete_session(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(path)?;
    info!("Removed Spotify session {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnrichedSong, Language, SongCount};
    use chrono::Utc;

    fn sample_playlist() -> GeneratedPlaylist {
        GeneratedPlaylist {
            name: "Garba Night".to_string(),
            description: "Festive".to_string(),
            mood: "Upbeat".to_string(),
            genre: "Folk".to_string(),
            prompt: "garba night".to_string(),
            language: Language::Gujarati,
            song_count: SongCount::Ten,
            songs: vec![EnrichedSong {
                id: "1-0".to_string(),
                name: "Pankhida".to_string(),
                artist: "Falguni Pathak".to_string(),
                mood: "Festival".to_string(),
                reason: "Navratri classic".to_string(),
                preview_url: None,
                spotify_id: Some("xyz".to_string()),
                duration: Some("300s".to_string()),
                album: None,
                image: None,
            }],
            generated_at: Utc::now(),
            ai_provider: "Google Gemini".to_string(),
            spotify_playlist_id: None,
        }
    }

    #[test]
    fn test_saved_playlist_can_be_exported_later() {
        let dir = tempfile::tempdir().unwrap();
        let playlist = sample_playlist();

        let path = save_playlist(&dir.path().join(PLAYLISTS_DIR), &playlist).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("playlist_"));

        let loaded = load_playlist(&path).unwrap();
        assert_eq!(loaded, playlist);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["songCount"], 10);
        assert_eq!(raw["aiProvider"], "Google Gemini");
    }

    #[test]
    fn test_missing_session_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE);
        assert!(load_session(&path).unwrap().is_none());

        let session = StoredSession {
            spotify_user_id: "user-1".to_string(),
            display_name: Some("Asha".to_string()),
            token: serde_json::from_str(
                r#"{"access_token": "a", "refresh_token": "r", "expires_in": 3600}"#,
            )
            .unwrap(),
        };
        save_session(&path, &session).unwrap();

        let loaded = load_session(&path).unwrap().unwrap();
        assert_eq!(loaded.spotify_user_id, "user-1");
        assert_eq!(loaded.token.refresh_token.as_deref(), Some("r"));

        assert!(delete_session(&path).unwrap());
        assert!(load_session(&path).unwrap().is_none());
        assert!(!delete_session(&path).unwrap());
    }

    #[test]
    fn test_export_is_recorded_on_the_saved_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut playlist = sample_playlist();
        let path = save_playlist(dir.path(), &playlist).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("spotifyPlaylistId"));

        let remote = RemotePlaylist {
            id: "37i9dQZF1DX".to_string(),
            name: playlist.name.clone(),
            url: None,
            tracks_added: 1,
        };
        record_export(&path, &mut playlist, &remote).unwrap();

        let reloaded = load_playlist(&path).unwrap();
        assert_eq!(reloaded.spotify_playlist_id.as_deref(), Some("37i9dQZF1DX"));
        assert_eq!(reloaded.songs, playlist.songs);
    }

    #[test]
    fn test_list_playlists_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_playlists(&dir.path().join("missing")).unwrap().is_empty());

        let mut older = sample_playlist();
        older.name = "Older".to_string();
        older.generated_at = Utc::now() - chrono::Duration::days(1);
        let newer = sample_playlist();

        fs::write(
            dir.path().join("a.json"),
            serde_json::to_string(&older).unwrap(),
        )
        .unwrap();
        fs::write(
            dir.path().join("b.json"),
            serde_json::to_string(&newer).unwrap(),
        )
        .unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let listed = list_playlists(dir.path()).unwrap();
        let names: Vec<_> = listed.iter().map(|(_, p)| p.name.as_str()).collect();
        assert_eq!(names, vec!["Garba Night", "Older"]);
    }
}
