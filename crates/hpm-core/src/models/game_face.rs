use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Upper bound on power words per game face.
pub const MAX_POWER_WORDS: usize = 3;

/// Where the game face was drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameFaceSource {
    #[default]
    Memory,
    Imagination,
    Perception,
}

impl GameFaceSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Imagination => "imagination",
            Self::Perception => "perception",
        }
    }
}

impl fmt::Display for GameFaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for GameFaceSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "imagination" => Ok(Self::Imagination),
            "perception" => Ok(Self::Perception),
            other => Err(format!("unknown game face source: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewGameFace {
    pub name: String,
    pub power_words: Vec<String>,
    pub model_person: Option<String>,
    pub source: GameFaceSource,
}

/// A pre-performance cue: a name, a few power words, a role model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameFace {
    pub id: String,
    pub name: String,
    #[serde(alias = "words")]
    pub power_words: Vec<String>,
    #[serde(default, deserialize_with = "non_blank")]
    pub model_person: Option<String>,
    #[serde(default)]
    pub source: GameFaceSource,
    /// Unix milliseconds.
    #[serde(alias = "created")]
    pub created_at: u64,
}

/// Older records stored "no role model" as an empty string.
fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

impl GameFace {
    pub fn summary(&self) -> String {
        format!("{}: {}", self.name, self.power_words.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_parse_and_display() {
        assert_eq!("Imagination".parse::<GameFaceSource>(), Ok(GameFaceSource::Imagination));
        assert!("dream".parse::<GameFaceSource>().is_err());
        assert_eq!(GameFaceSource::Perception.to_string(), "perception");
    }

    #[test]
    fn test_legacy_game_face_fields() {
        let json = r#"{
            "id": "gf1",
            "name": "Closer",
            "words": ["Bold", "Calm"],
            "modelPerson": "",
            "source": "memory",
            "created": 1700000000000
        }"#;
        let face: GameFace = serde_json::from_str(json).unwrap();
        assert_eq!(face.power_words, vec!["Bold", "Calm"]);
        assert!(face.model_person.is_none());
        assert_eq!(face.created_at, 1700000000000);
        assert_eq!(face.summary(), "Closer: Bold + Calm");
    }
}
