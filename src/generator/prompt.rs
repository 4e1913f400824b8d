use crate::models::Language;

/// Instruction asking the model for a complete playlist as a single JSON object.
pub fn playlist_instruction(prompt: &str, language: Language, song_count: usize) -> String {
    format!(
        r#"You are an expert music curator and DJ who knows music across every genre and language. Build a personalized playlist for the request below.

INSTRUCTIONS:
- Suggest exactly {count} songs in the {language} language
- Read the mood, occasion or theme from the user's request
- Mix well-known hits with lesser-known tracks where it fits
- Only suggest real songs that actually exist
- Vary the artists, avoid repeating the same artist too often
- Follow the language requirement strictly

RESPONSE FORMAT (JSON only):
{{
  "playlistName": "Creative, engaging playlist name",
  "description": "Short description of the playlist's mood, theme or purpose",
  "mood": "Overall mood of the playlist",
  "genre": "Primary genre or style",
  "songs": [
    {{
      "name": "Exact song title",
      "artist": "Artist name",
      "mood": "Mood or energy of this song",
      "reason": "Why this song fits the playlist"
    }}
  ]
}}

USER REQUEST: Create a playlist for "{prompt}" in {language} with {count} songs.

Respond with valid JSON only, no additional text."#,
        count = song_count,
        language = language,
        prompt = prompt,
    )
}

/// Instruction asking for three short playlist name ideas.
pub fn idea_instruction(prompt: &str, language: Language) -> String {
    format!(
        r#"Based on the user prompt "{prompt}", suggest 3 creative playlist names and themes in {language}.

Respond in JSON format:
{{
  "suggestions": [
    {{
      "name": "Playlist Name",
      "theme": "Brief theme description",
      "mood": "Overall mood"
    }}
  ]
}}"#,
        prompt = prompt,
        language = language,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_instruction_embeds_request() {
        let text = playlist_instruction("rainy sunday", Language::Hindi, 20);

        assert!(text.contains("exactly 20 songs in the Hindi language"));
        assert!(text.contains(r#"Create a playlist for "rainy sunday" in Hindi with 20 songs."#));
        assert!(text.contains(r#""playlistName""#));
        assert!(text.trim_end().ends_with("no additional text."));
    }

    #[test]
    fn test_idea_instruction_requests_three() {
        let text = idea_instruction("road trip", Language::Gujarati);
        assert!(text.contains("suggest 3 creative playlist names"));
        assert!(text.contains("in Gujarati"));
        assert!(text.contains(r#""suggestions""#));
    }
}
