use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Self-talk and body techniques applied against a thought.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechniquesUsed {
    #[serde(default)]
    pub self_talk: Vec<String>,
    #[serde(default)]
    pub body: Vec<String>,
}

impl TechniquesUsed {
    /// Build from raw lists, dropping repeated names within each list.
    pub fn new<S, B>(self_talk: S, body: B) -> Self
    where
        S: IntoIterator<Item = String>,
        B: IntoIterator<Item = String>,
    {
        Self {
            self_talk: dedup_preserving_order(self_talk),
            body: dedup_preserving_order(body),
        }
    }

    pub fn any(&self) -> bool {
        !self.self_talk.is_empty() || !self.body.is_empty()
    }

    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.self_talk.iter().chain(self.body.iter()).map(String::as_str)
    }
}

pub(crate) fn dedup_preserving_order<I: IntoIterator<Item = String>>(items: I) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Fields supplied by the caller when logging an ANT.
#[derive(Debug, Clone, Default)]
pub struct NewAntEvent {
    pub category: String,
    pub intensity: u8,
    pub attempted: bool,
    pub notes: String,
    pub context: String,
    pub techniques_used: TechniquesUsed,
    pub game_face_id: Option<String>,
}

/// A logged intrusive-thought occurrence. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AntEvent {
    pub id: String,
    pub date: NaiveDate,
    /// Unix milliseconds.
    #[serde(alias = "ts")]
    pub timestamp: u64,
    #[serde(alias = "ant")]
    pub category: String,
    pub intensity: u8,
    #[serde(default)]
    pub attempted: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default, alias = "performanceContext")]
    pub context: String,
    #[serde(default, alias = "usedControllers")]
    pub techniques_used: TechniquesUsed,
    #[serde(default, alias = "gameFace")]
    pub game_face_id: Option<String>,
    /// Countered with at least one technique. Fixed at creation.
    #[serde(default, alias = "antSquashed")]
    pub resolved: bool,
}

impl AntEvent {
    pub fn new(input: NewAntEvent, id: String, date: NaiveDate, timestamp: u64) -> Self {
        let techniques_used = TechniquesUsed::new(
            input.techniques_used.self_talk,
            input.techniques_used.body,
        );
        let resolved = input.attempted && techniques_used.any();
        Self {
            id,
            date,
            timestamp,
            category: input.category,
            intensity: input.intensity,
            attempted: input.attempted,
            notes: input.notes.trim().to_string(),
            context: input.context.trim().to_string(),
            techniques_used,
            game_face_id: input.game_face_id.filter(|id| !id.is_empty()),
            resolved,
        }
    }

    pub fn has_game_face(&self) -> bool {
        self.game_face_id.is_some()
    }
}
