use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::assembler::TrackCatalog;
use crate::error::{AppError, Result};
use crate::generator::{SuggestionGenerator, TextModel};
use crate::models::{
    EnrichedSong, GeneratedPlaylist, GenerationRequest, IdeaRequest, PROVIDER_LABEL,
    PlaylistIdea, SongSuggestion,
};
use crate::spotify::models::CatalogTrack;
use crate::spotify::session::CatalogSession;

const DEFAULT_PLAYLIST_MOOD: &str = "Mixed";
const DEFAULT_GENRE: &str = "Various";
const DEFAULT_SONG_MOOD: &str = "Unknown";
const DEFAULT_REASON: &str = "AI curated for your playlist";

/// Outcome of one catalog lookup, kept by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    Enriched(CatalogTrack),
    Unenriched,
}

pub struct PlaylistAssembler<M, C> {
    generator: SuggestionGenerator<M>,
    catalog: Arc<C>,
    session: Arc<CatalogSession>,
}

impl<M: TextModel, C: TrackCatalog> PlaylistAssembler<M, C> {
    pub fn new(model: M, catalog: C) -> Self {
        Self {
            generator: SuggestionGenerator::new(model),
            catalog: Arc::new(catalog),
            session: Arc::new(CatalogSession::new()),
        }
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedPlaylist> {
        info!(
            "Generating playlist: \"{}\" ({}, {} songs)",
            request.prompt(),
            request.language(),
            request.song_count()
        );

        let draft = self.generator.generate(request).await;
        if draft.songs.is_empty() {
            return Err(AppError::Generation("no songs were suggested".into()));
        }

        let enrichments = self.enrich(&draft.songs).await;
        let matched = enrichments
            .iter()
            .filter(|e| matches!(e, Enrichment::Enriched(_)))
            .count();

        let generated_at = Utc::now();
        let stamp = generated_at.timestamp_millis();

        let songs: Vec<EnrichedSong> = draft
            .songs
            .into_iter()
            .zip(enrichments)
            .enumerate()
            .map(|(index, (suggestion, enrichment))| {
                merge_song(format!("{}-{}", stamp, index), suggestion, enrichment)
            })
            .collect();

        info!(
            "Playlist ready: {} - {}/{} songs found on Spotify",
            draft.playlist_name,
            matched,
            songs.len()
        );

        Ok(GeneratedPlaylist {
            name: draft.playlist_name,
            description: draft.description,
            mood: draft.mood.unwrap_or_else(|| DEFAULT_PLAYLIST_MOOD.to_string()),
            genre: draft.genre.unwrap_or_else(|| DEFAULT_GENRE.to_string()),
            prompt: request.prompt().to_string(),
            language: request.language(),
            song_count: request.song_count(),
            songs,
            generated_at,
            ai_provider: PROVIDER_LABEL.to_string(),
            spotify_playlist_id: None,
        })
    }

    pub async fn suggest(&self, request: &IdeaRequest) -> Vec<PlaylistIdea> {
        self.generator.suggest(request).await
    }

    /// Look up every song concurrently. The result has one entry per input,
    /// in input order; a failed or panicked lookup becomes `Unenriched`.
    pub async fn enrich(&self, songs: &[SongSuggestion]) -> Vec<Enrichment> {
        let handles: Vec<_> = songs
            .iter()
            .map(|song| {
                let catalog = Arc::clone(&self.catalog);
                let session = Arc::clone(&self.session);
                let name = song.name.clone();
                let artist = song.artist.clone();
                tokio::spawn(async move { catalog.lookup(&session, &name, &artist).await })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .zip(songs)
            .map(|(outcome, song)| match outcome {
                Ok(Ok(Some(track))) => Enrichment::Enriched(track),
                Ok(Ok(None)) => {
                    debug!("No catalog match for {} by {}", song.name, song.artist);
                    Enrichment::Unenriched
                }
                Ok(Err(e)) => {
                    warn!("Spotify search failed for {} by {}: {}", song.name, song.artist, e);
                    Enrichment::Unenriched
                }
                Err(e) => {
                    warn!("Lookup task for {} by {} aborted: {}", song.name, song.artist, e);
                    Enrichment::Unenriched
                }
            })
            .collect()
    }
}

fn merge_song(id: String, suggestion: SongSuggestion, enrichment: Enrichment) -> EnrichedSong {
    let mut song = EnrichedSong {
        id,
        name: suggestion.name,
        artist: suggestion.artist,
        mood: suggestion.mood.unwrap_or_else(|| DEFAULT_SONG_MOOD.to_string()),
        reason: suggestion.reason.unwrap_or_else(|| DEFAULT_REASON.to_string()),
        preview_url: None,
        spotify_id: None,
        duration: None,
        album: None,
        image: None,
    };

    if let Enrichment::Enriched(track) = enrichment {
        song.duration = Some(track.display_duration());
        song.preview_url = track.preview_url;
        song.album = track.album;
        song.image = track.image_url;
        song.spotify_id = Some(track.id);
    }

    song
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::testing::{ScriptedModel, playlist_json};
    use crate::generator::validation::accepted_song_range;
    use crate::models::{Language, SongCount};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Clone)]
    enum Behavior {
        Found(u64),
        Missing,
        Fails,
        Panics,
    }

    /// Catalog whose answer per track name is scripted; the number is a delay
    /// in milliseconds so later songs can finish first.
    struct FakeCatalog {
        behaviors: HashMap<String, Behavior>,
    }

    impl FakeCatalog {
        fn new(behaviors: &[(&str, Behavior)]) -> Self {
            Self {
                behaviors: behaviors
                    .iter()
                    .map(|(name, b)| (name.to_string(), b.clone()))
                    .collect(),
            }
        }

        fn finding_everything() -> Self {
            Self::new(&[])
        }
    }

    #[async_trait]
    impl TrackCatalog for FakeCatalog {
        async fn lookup(
            &self,
            _session: &CatalogSession,
            name: &str,
            _artist: &str,
        ) -> Result<Option<CatalogTrack>> {
            match self.behaviors.get(name).cloned().unwrap_or(Behavior::Found(0)) {
                Behavior::Found(delay_ms) => {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    Ok(Some(CatalogTrack::mock(&format!("id-{}", name))))
                }
                Behavior::Missing => Ok(None),
                Behavior::Fails => Err(AppError::Auth("token endpoint down".into())),
                Behavior::Panics => panic!("catalog exploded"),
            }
        }
    }

    fn suggestions(names: &[&str]) -> Vec<SongSuggestion> {
        names
            .iter()
            .map(|n| SongSuggestion::mock(n, &format!("{} Artist", n)))
            .collect()
    }

    #[tokio::test]
    async fn test_one_failed_lookup_does_not_affect_siblings() {
        let assembler = PlaylistAssembler::new(
            ScriptedModel::failing("unused"),
            FakeCatalog::new(&[("B", Behavior::Fails)]),
        );

        let result = assembler.enrich(&suggestions(&["A", "B", "C"])).await;

        assert_eq!(
            result,
            vec![
                Enrichment::Enriched(CatalogTrack::mock("id-A")),
                Enrichment::Unenriched,
                Enrichment::Enriched(CatalogTrack::mock("id-C")),
            ]
        );
    }

    #[tokio::test]
    async fn test_enrichment_keeps_input_order_under_uneven_latency() {
        let assembler = PlaylistAssembler::new(
            ScriptedModel::failing("unused"),
            FakeCatalog::new(&[
                ("first", Behavior::Found(60)),
                ("second", Behavior::Missing),
                ("third", Behavior::Found(0)),
                ("fourth", Behavior::Panics),
                ("fifth", Behavior::Found(20)),
            ]),
        );

        let result = assembler
            .enrich(&suggestions(&["first", "second", "third", "fourth", "fifth"]))
            .await;

        assert_eq!(result.len(), 5);
        assert_eq!(result[0], Enrichment::Enriched(CatalogTrack::mock("id-first")));
        assert_eq!(result[1], Enrichment::Unenriched);
        assert_eq!(result[2], Enrichment::Enriched(CatalogTrack::mock("id-third")));
        assert_eq!(result[3], Enrichment::Unenriched);
        assert_eq!(result[4], Enrichment::Enriched(CatalogTrack::mock("id-fifth")));
    }

    #[tokio::test]
    async fn test_generate_merges_in_suggestion_order() {
        let assembler = PlaylistAssembler::new(
            ScriptedModel::replying(&playlist_json("Gym Fuel", 10)),
            FakeCatalog::new(&[("Track 2", Behavior::Fails), ("Track 7", Behavior::Missing)]),
        );
        let request =
            GenerationRequest::new("upbeat workout songs", Language::English, SongCount::Ten)
                .unwrap();

        let playlist = assembler.generate(&request).await.unwrap();

        assert_eq!(playlist.name, "Gym Fuel");
        assert_eq!(playlist.ai_provider, "Google Gemini");
        assert_eq!(playlist.song_count, SongCount::Ten);
        assert_eq!(playlist.prompt, "upbeat workout songs");

        let names: Vec<_> = playlist.songs.iter().map(|s| s.name.as_str()).collect();
        let expected: Vec<_> = (1..=10).map(|i| format!("Track {}", i)).collect();
        assert_eq!(names, expected);

        let second = &playlist.songs[1];
        assert_eq!(second.spotify_id, None);
        assert_eq!(second.duration, None);
        assert_eq!(second.artist, "Artist 2");

        let first = &playlist.songs[0];
        assert_eq!(first.spotify_id.as_deref(), Some("id-Track 1"));
        assert_eq!(first.duration.as_deref(), Some("215s"));
        assert!(first.id.ends_with("-0"));
        assert!(playlist.songs[9].id.ends_with("-9"));
        assert!(playlist.songs[6].spotify_id.is_none());
    }

    #[tokio::test]
    async fn test_end_to_end_workout_playlist_with_model_down() {
        let assembler = PlaylistAssembler::new(
            ScriptedModel::failing("network unreachable"),
            FakeCatalog::finding_everything(),
        );
        let request =
            GenerationRequest::new("upbeat workout songs", Language::English, SongCount::Ten)
                .unwrap();

        let playlist = assembler.generate(&request).await.unwrap();

        assert!(!playlist.name.is_empty());
        assert!(!playlist.description.is_empty());
        assert!(accepted_song_range(10).contains(&playlist.songs.len()));
        assert!(
            playlist
                .songs
                .iter()
                .all(|s| !s.name.is_empty() && !s.artist.is_empty())
        );
        assert_eq!(playlist.mood, "Upbeat");
        assert_eq!(playlist.genre, "Mixed");
    }

    #[test]
    fn test_merge_song_defaults() {
        let suggestion = SongSuggestion {
            name: "Tum Hi Ho".to_string(),
            artist: "Arijit Singh".to_string(),
            mood: None,
            reason: None,
        };

        let song = merge_song("1-0".to_string(), suggestion, Enrichment::Unenriched);

        assert_eq!(song.mood, "Unknown");
        assert_eq!(song.reason, "AI curated for your playlist");
        assert!(song.preview_url.is_none() && song.album.is_none() && song.image.is_none());
    }
}
