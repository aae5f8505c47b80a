//! Ideas and the legacy delimiter fallback.
//!
//! The idea generator's output contract is a JSON array of `{title, body}`
//! objects (possibly wrapped in an `ideas` envelope). An earlier contract
//! was plain markdown with numbered `### IDÉE n` headings; [`legacy_split`]
//! keeps that format readable as a documented fallback.

use crate::extract::extract;
use serde::{Deserialize, Serialize};

/// One candidate idea. Ephemeral: rebuilt per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl Idea {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Parse a caller selection serialized as `"title\n\nbody"`.
    pub fn from_selection(text: &str) -> Self {
        match text.split_once("\n\n") {
            Some((title, body)) => Idea::new(title.trim(), body.trim()),
            None => Idea::new(text.trim(), ""),
        }
    }

    /// The serialized form a caller sends back as its selection.
    pub fn to_selection(&self) -> String {
        if self.body.is_empty() {
            self.title.clone()
        } else {
            format!("{}\n\n{}", self.title, self.body)
        }
    }
}

/// A candidate plus its scorer verdict.
///
/// `index` is the position in the original candidate list, assigned by the
/// scorer and carried through explicitly. Scores within one scoring response
/// are comparable; ties keep original candidate order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredIdea {
    pub index: usize,
    /// Weighted total, 0–100.
    pub total: u8,
    /// Free-form diagnostic flags from the scorer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<String>,
}

#[derive(Deserialize)]
struct IdeaEnvelope {
    ideas: Vec<Idea>,
}

/// Parse the idea generator's raw output into candidates.
///
/// Tries the structured contract first (bare array, then `ideas` envelope),
/// then falls back to the legacy markdown split. Ideas without a title are
/// dropped.
pub fn parse_ideas(raw: &str) -> Vec<Idea> {
    let parsed = extract::<Vec<Idea>>(raw, true)
        .or_else(|| extract::<IdeaEnvelope>(raw, true).map(|e| e.ideas));

    let ideas: Vec<Idea> = parsed
        .unwrap_or_default()
        .into_iter()
        .filter(|idea| !idea.title.trim().is_empty())
        .collect();

    if ideas.is_empty() {
        legacy_split(raw)
    } else {
        ideas
    }
}

const LEGACY_MARKERS: [&str; 3] = ["IDÉE", "IDEE", "IDEA"];

/// Split legacy markdown output on numbered idea headings.
///
/// Recognizes headings of the form `### IDÉE 1 — Title` (and ASCII
/// variants), takes up to 3 segments, title = heading remainder, body =
/// the lines until the next heading. Backward compatibility with the
/// pre-JSON output contract; not used when structured extraction succeeds.
pub fn legacy_split(raw: &str) -> Vec<Idea> {
    let mut ideas: Vec<Idea> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in raw.lines() {
        if let Some(title) = legacy_heading(line) {
            if let Some((title, body)) = current.take() {
                ideas.push(Idea::new(title, body.join("\n").trim()));
            }
            if ideas.len() == 3 {
                current = None;
                break;
            }
            current = Some((title, Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }

    if let Some((title, body)) = current {
        ideas.push(Idea::new(title, body.join("\n").trim()));
    }

    ideas.truncate(3);
    ideas
}

/// Match a numbered idea heading and return its title text.
fn legacy_heading(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if !trimmed.starts_with('#') {
        return None;
    }
    let rest = trimmed.trim_start_matches('#').trim_start();
    let upper = rest.to_uppercase();

    let marker = LEGACY_MARKERS
        .iter()
        .find(|marker| upper.starts_with(*marker))?;
    let after = rest[marker.len()..].trim_start();

    // Require the numbered form: "IDÉE 2", "IDEA 1 — ...".
    let digits: String = after.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let title = after[digits.len()..]
        .trim_start_matches([' ', '\t', '—', '–', '-', ':', '.'])
        .trim();

    if title.is_empty() {
        // A bare "### IDÉE 2" heading still needs a non-empty title.
        Some(format!("{} {}", marker, digits))
    } else {
        Some(title.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_round_trip() {
        let idea = Idea::new("Héritage vivant", "Une campagne sur la transmission.");
        let selection = idea.to_selection();
        assert_eq!(Idea::from_selection(&selection), idea);
    }

    #[test]
    fn selection_without_body() {
        let idea = Idea::from_selection("Juste un titre");
        assert_eq!(idea.title, "Juste un titre");
        assert!(idea.body.is_empty());
    }

    #[test]
    fn parses_structured_array() {
        let raw = r#"[{"title": "A", "body": "a"}, {"title": "B", "body": "b"}]"#;
        let ideas = parse_ideas(raw);
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].title, "A");
    }

    #[test]
    fn parses_enveloped_array_in_fences() {
        let raw = "Voici mes idées :\n```json\n{\"ideas\": [{\"title\": \"A\", \"body\": \"a\"}]}\n```";
        let ideas = parse_ideas(raw);
        assert_eq!(ideas.len(), 1);
    }

    #[test]
    fn untitled_ideas_are_dropped() {
        let raw = r#"[{"title": "", "body": "x"}, {"title": "Kept", "body": "y"}]"#;
        let ideas = parse_ideas(raw);
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].title, "Kept");
    }

    #[test]
    fn legacy_markdown_falls_back_to_split() {
        let raw = "\
Intro du générateur.

### IDÉE 1 — Racines urbaines
Un pop-up éphémère dans trois villes.
Deuxième ligne.

### IDÉE 2 — Matière brute
Série documentaire sur l'atelier.

### IDÉE 3 : Seconde vie
Programme de reprise et restauration.
";
        let ideas = parse_ideas(raw);
        assert_eq!(ideas.len(), 3);
        assert_eq!(ideas[0].title, "Racines urbaines");
        assert!(ideas[0].body.contains("pop-up"));
        assert!(ideas[0].body.contains("Deuxième ligne."));
        assert_eq!(ideas[2].title, "Seconde vie");
        assert!(ideas.iter().all(|i| !i.title.is_empty()));
    }

    #[test]
    fn legacy_split_caps_at_three() {
        let raw = "### IDEA 1 - One\na\n### IDEA 2 - Two\nb\n### IDEA 3 - Three\nc\n### IDEA 4 - Four\nd";
        let ideas = legacy_split(raw);
        assert_eq!(ideas.len(), 3);
        assert_eq!(ideas[2].title, "Three");
    }

    #[test]
    fn bare_numbered_heading_gets_a_marker_title() {
        let ideas = legacy_split("### IDEE 1\nCorps de l'idée.");
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].title, "IDEE 1");
        assert_eq!(ideas[0].body, "Corps de l'idée.");
    }

    #[test]
    fn unnumbered_headings_are_not_markers() {
        assert!(legacy_split("### IDÉES\nrien à voir").is_empty());
        assert!(legacy_split("plain text, no headings").is_empty());
    }

    #[test]
    fn garbage_yields_empty_list() {
        assert!(parse_ideas("rien de structuré ici").is_empty());
    }
}
