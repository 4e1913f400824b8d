use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::ops::RangeInclusive;
use thiserror::Error;

use crate::models::{PlaylistDraft, SongSuggestion};

/// How far the model may stray from the requested song count.
const SONG_COUNT_SLACK: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftOutcome {
    Accepted(PlaylistDraft),
    Rejected(RejectReason),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("response is not valid JSON: {0}")]
    Unparseable(String),

    #[error("missing playlist name")]
    MissingName,

    #[error("missing description")]
    MissingDescription,

    #[error("expected {min} to {max} songs, got {got}")]
    SongCountOutOfRange { got: usize, min: usize, max: usize },

    #[error("song #{index} is missing a name or artist")]
    IncompleteSong { index: usize },
}

#[derive(Debug, Deserialize)]
struct RawDraft {
    #[serde(rename = "playlistName", default, deserialize_with = "text_only")]
    playlist_name: Option<String>,
    #[serde(default, deserialize_with = "text_only")]
    description: Option<String>,
    #[serde(default, deserialize_with = "text_only")]
    mood: Option<String>,
    #[serde(default, deserialize_with = "text_only")]
    genre: Option<String>,
    songs: Option<Vec<RawSong>>,
}

#[derive(Debug, Deserialize)]
struct RawSong {
    #[serde(default, deserialize_with = "text_only")]
    name: Option<String>,
    #[serde(default, deserialize_with = "text_only")]
    artist: Option<String>,
    #[serde(default, deserialize_with = "text_only")]
    mood: Option<String>,
    #[serde(default, deserialize_with = "text_only")]
    reason: Option<String>,
}

/// Keep string values; numbers, arrays and the like count as absent.
fn text_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

/// Song counts accepted for a request of `requested` songs.
pub fn accepted_song_range(requested: usize) -> RangeInclusive<usize> {
    requested.saturating_sub(SONG_COUNT_SLACK).max(1)..=requested + SONG_COUNT_SLACK
}

/// Remove markdown code fences (```json / ```) the model tends to wrap JSON in.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse and validate a raw model response against the requested song count.
pub fn evaluate_response(raw: &str, requested: usize) -> DraftOutcome {
    let cleaned = strip_code_fences(raw);

    match serde_json::from_str::<RawDraft>(&cleaned) {
        Ok(draft) => validate_draft(draft, requested),
        Err(e) => DraftOutcome::Rejected(RejectReason::Unparseable(e.to_string())),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn validate_draft(draft: RawDraft, requested: usize) -> DraftOutcome {
    let Some(playlist_name) = non_empty(draft.playlist_name) else {
        return DraftOutcome::Rejected(RejectReason::MissingName);
    };
    let Some(description) = non_empty(draft.description) else {
        return DraftOutcome::Rejected(RejectReason::MissingDescription);
    };

    let raw_songs = draft.songs.unwrap_or_default();
    let range = accepted_song_range(requested);
    if !range.contains(&raw_songs.len()) {
        return DraftOutcome::Rejected(RejectReason::SongCountOutOfRange {
            got: raw_songs.len(),
            min: *range.start(),
            max: *range.end(),
        });
    }

    let mut songs = Vec::with_capacity(raw_songs.len());
    for (index, song) in raw_songs.into_iter().enumerate() {
        match (non_empty(song.name), non_empty(song.artist)) {
            (Some(name), Some(artist)) => songs.push(SongSuggestion {
                name,
                artist,
                mood: non_empty(song.mood),
                reason: non_empty(song.reason),
            }),
            _ => return DraftOutcome::Rejected(RejectReason::IncompleteSong { index }),
        }
    }

    DraftOutcome::Accepted(PlaylistDraft {
        playlist_name,
        description,
        mood: non_empty(draft.mood),
        genre: non_empty(draft.genre),
        songs,
    })
}
