pub mod fallback;
pub mod ideas;
pub mod prompt;
pub mod validation;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{GenerationRequest, IdeaRequest, PlaylistDraft, PlaylistIdea};

pub use validation::{DraftOutcome, RejectReason};

/// A generative text model that answers one instruction with free-form text.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Turns a request into a playlist skeleton, using the model when it behaves
/// and the curated tables when it does not.
pub struct SuggestionGenerator<M> {
    model: M,
}

impl<M: TextModel> SuggestionGenerator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Never fails: model errors, unparseable output and invalid shapes all
    /// end in the fallback draft.
    pub async fn generate(&self, request: &GenerationRequest) -> PlaylistDraft {
        let outcome = self.draft_from_model(request).await;

        match outcome {
            DraftOutcome::Accepted(draft) => {
                info!(
                    "Model playlist accepted: {} with {} songs",
                    draft.playlist_name,
                    draft.songs.len()
                );
                draft
            }
            DraftOutcome::Rejected(reason) => {
                warn!("Model playlist rejected ({}), using fallback", reason);
                fallback_for(request)
            }
        }
    }

    async fn draft_from_model(&self, request: &GenerationRequest) -> DraftOutcome {
        let instruction = prompt::playlist_instruction(
            request.prompt(),
            request.language(),
            request.song_count().get(),
        );

        match self.model.complete(&instruction).await {
            Ok(raw) => {
                let outcome = validation::evaluate_response(&raw, request.song_count().get());
                if let DraftOutcome::Rejected(RejectReason::Unparseable(_)) = &outcome {
                    debug!("Raw model response: {}", raw);
                }
                outcome
            }
            Err(e) => DraftOutcome::Rejected(RejectReason::ModelUnavailable(e.to_string())),
        }
    }

    /// Up to three name/theme/mood ideas, templated ones on any failure.
    pub async fn suggest(&self, request: &IdeaRequest) -> Vec<PlaylistIdea> {
        let instruction = prompt::idea_instruction(request.prompt(), request.language());

        match self.model.complete(&instruction).await {
            Ok(raw) => match ideas::parse_ideas(&raw) {
                Some(found) => found,
                None => {
                    warn!("Could not parse playlist ideas, using templates");
                    debug!("Raw model response: {}", raw);
                    ideas::fallback_ideas(request.prompt(), request.language())
                }
            },
            Err(e) => {
                warn!("Playlist idea request failed: {}", e);
                ideas::fallback_ideas(request.prompt(), request.language())
            }
        }
    }
}

fn fallback_for(request: &GenerationRequest) -> PlaylistDraft {
    let mut rng = rand::rng();
    fallback::fallback_draft(
        request.prompt(),
        request.language().as_str(),
        request.song_count().get(),
        &mut rng,
    )
}
