pub mod assembler;
pub mod config;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod models;
pub mod spotify;
pub mod storage;

pub use assembler::{Enrichment, PlaylistAssembler, PlaylistService, TrackCatalog};
pub use config::Config;
pub use error::{AppError, Result};
pub use gemini::GeminiClient;
pub use generator::{SuggestionGenerator, TextModel};
pub use models::{
    EnrichedSong, GeneratedPlaylist, GenerationRequest, IdeaRequest, Language, PlaylistIdea,
    SongCount, SongSuggestion,
};
pub use spotify::{CatalogSession, SpotifyClient};
