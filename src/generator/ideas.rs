use serde::Deserialize;

use crate::generator::validation::strip_code_fences;
use crate::models::{Language, PlaylistIdea};

const MAX_IDEAS: usize = 3;

#[derive(Debug, Deserialize)]
struct IdeaResponse {
    #[serde(default)]
    suggestions: Vec<PlaylistIdea>,
}

/// Ideas from a raw model response, or `None` when there is nothing usable.
pub fn parse_ideas(raw: &str) -> Option<Vec<PlaylistIdea>> {
    let response: IdeaResponse = serde_json::from_str(&strip_code_fences(raw)).ok()?;

    let ideas: Vec<_> = response
        .suggestions
        .into_iter()
        .filter(|idea| !idea.name.trim().is_empty())
        .take(MAX_IDEAS)
        .collect();

    if ideas.is_empty() { None } else { Some(ideas) }
}

pub fn fallback_ideas(prompt: &str, language: Language) -> Vec<PlaylistIdea> {
    let idea = |name: String, theme: &str, mood: &str| PlaylistIdea {
        name,
        theme: theme.to_string(),
        mood: mood.to_string(),
    };

    vec![
        idea(format!("{} Mix", prompt), "Based on your request", "Varied"),
        idea(
            format!("{} Vibes", language),
            "Language-specific selection",
            "Cultural",
        ),
        idea("AI Curated".to_string(), "Algorithmically selected", "Diverse"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ideas_caps_at_three() {
        let raw = r#"```json
{"suggestions": [
  {"name": "One", "theme": "a", "mood": "x"},
  {"name": "Two", "theme": "b", "mood": "y"},
  {"name": "Three", "theme": "c", "mood": "z"},
  {"name": "Four", "theme": "d", "mood": "w"}
]}
```"#;

        let ideas = parse_ideas(raw).unwrap();
        assert_eq!(ideas.len(), 3);
        assert_eq!(ideas[0].name, "One");
        assert_eq!(ideas[2].name, "Three");
    }

    #[test]
    fn test_parse_ideas_rejects_garbage_and_empty() {
        assert!(parse_ideas("no json here").is_none());
        assert!(parse_ideas(r#"{"suggestions": []}"#).is_none());
        assert!(parse_ideas(r#"{"other": 1}"#).is_none());
    }

    #[test]
    fn test_fallback_ideas_templates() {
        let ideas = fallback_ideas("monsoon", Language::Hindi);

        assert_eq!(ideas.len(), 3);
        assert_eq!(ideas[0].name, "monsoon Mix");
        assert_eq!(ideas[1].name, "Hindi Vibes");
        assert_eq!(ideas[1].mood, "Cultural");
        assert_eq!(ideas[2].name, "AI Curated");
    }
}
