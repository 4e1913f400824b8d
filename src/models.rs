use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, Result};

pub const PROVIDER_LABEL: &str = "Google Gemini";

const PROMPT_MIN_CHARS: usize = 3;
const PROMPT_MAX_CHARS: usize = 500;
const IDEA_PROMPT_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Hindi,
    Gujarati,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Gujarati];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Gujarati => "Gujarati",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                AppError::InvalidRequest(format!(
                    "Language must be English, Hindi, or Gujarati (got '{}')",
                    s
                ))
            })
    }
}

/// Number of songs a caller may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SongCount {
    Ten,
    Twenty,
    Thirty,
}

impl SongCount {
    pub fn get(self) -> usize {
        match self {
            SongCount::Ten => 10,
            SongCount::Twenty => 20,
            SongCount::Thirty => 30,
        }
    }
}

impl TryFrom<u32> for SongCount {
    type Error = AppError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            10 => Ok(SongCount::Ten),
            20 => Ok(SongCount::Twenty),
            30 => Ok(SongCount::Thirty),
            other => Err(AppError::InvalidRequest(format!(
                "Song count must be 10, 20, or 30 (got {})",
                other
            ))),
        }
    }
}

impl From<SongCount> for u32 {
    fn from(count: SongCount) -> Self {
        count.get() as u32
    }
}

impl fmt::Display for SongCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

fn validated_prompt(prompt: &str, max_chars: usize) -> Result<String> {
    let prompt = prompt.trim();
    let chars = prompt.chars().count();

    if !(PROMPT_MIN_CHARS..=max_chars).contains(&chars) {
        return Err(AppError::InvalidRequest(format!(
            "Prompt must be between {} and {} characters",
            PROMPT_MIN_CHARS, max_chars
        )));
    }

    Ok(prompt.to_string())
}

/// Validated input for a full playlist generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    language: Language,
    song_count: SongCount,
}

impl GenerationRequest {
    pub fn new(prompt: &str, language: Language, song_count: SongCount) -> Result<Self> {
        Ok(Self {
            prompt: validated_prompt(prompt, PROMPT_MAX_CHARS)?,
            language,
            song_count,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn song_count(&self) -> SongCount {
        self.song_count
    }
}

/// Validated input for the playlist-name suggestion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaRequest {
    prompt: String,
    language: Language,
}

impl IdeaRequest {
    pub fn new(prompt: &str, language: Language) -> Result<Self> {
        Ok(Self {
            prompt: validated_prompt(prompt, IDEA_PROMPT_MAX_CHARS)?,
            language,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSuggestion {
    pub name: String,
    pub artist: String,
    pub mood: Option<String>,
    pub reason: Option<String>,
}

/// Playlist skeleton produced by the suggestion generator, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDraft {
    pub playlist_name: String,
    pub description: String,
    pub mood: Option<String>,
    pub genre: Option<String>,
    pub songs: Vec<SongSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedSong {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub mood: String,
    pub reason: String,
    pub preview_url: Option<String>,
    pub spotify_id: Option<String>,
    pub duration: Option<String>,
    pub album: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlaylist {
    pub name: String,
    pub description: String,
    pub mood: String,
    pub genre: String,
    pub prompt: String,
    pub language: Language,
    pub song_count: SongCount,
    pub songs: Vec<EnrichedSong>,
    pub generated_at: DateTime<Utc>,
    pub ai_provider: String,
    /// Set once the playlist has been exported to a Spotify account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify_playlist_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistIdea {
    pub name: String,
    pub theme: String,
    pub mood: String,
}

#[cfg(test)]
impl SongSuggestion {
    pub fn mock(name: &str, artist: &str) -> Self {
        Self {
            name: name.to_string(),
            artist: artist.to_string(),
            mood: Some("Pop".to_string()),
            reason: Some("Mock reason".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parses_case_insensitively() {
        assert_eq!("hindi".parse::<Language>().unwrap(), Language::Hindi);
        assert_eq!(" GUJARATI ".parse::<Language>().unwrap(), Language::Gujarati);
        assert!("French".parse::<Language>().is_err());
    }

    #[test]
    fn test_song_count_accepts_only_supported_sizes() {
        assert_eq!(SongCount::try_from(20u32).unwrap(), SongCount::Twenty);
        assert!(SongCount::try_from(15u32).is_err());

        let parsed: SongCount = serde_json::from_str("30").unwrap();
        assert_eq!(parsed, SongCount::Thirty);
        assert_eq!(serde_json::to_string(&SongCount::Ten).unwrap(), "10");
    }

    #[test]
    fn test_prompt_length_bounds() {
        assert!(GenerationRequest::new("ab", Language::English, SongCount::Ten).is_err());
        assert!(GenerationRequest::new(&"x".repeat(501), Language::English, SongCount::Ten).is_err());
        assert!(IdeaRequest::new(&"x".repeat(201), Language::English).is_err());

        let request =
            GenerationRequest::new("  rainy day  ", Language::English, SongCount::Ten).unwrap();
        assert_eq!(request.prompt(), "rainy day");
    }

    #[test]
    fn test_enriched_song_uses_camel_case_fields() {
        let song = EnrichedSong {
            id: "1-0".to_string(),
            name: "Heat Waves".to_string(),
            artist: "Glass Animals".to_string(),
            mood: "Indie Pop".to_string(),
            reason: "Dreamy".to_string(),
            preview_url: None,
            spotify_id: Some("abc".to_string()),
            duration: Some("238s".to_string()),
            album: None,
            image: None,
        };

        let json = serde_json::to_value(&song).unwrap();
        assert_eq!(json["spotifyId"], "abc");
        assert!(json["previewUrl"].is_null());
    }
}
