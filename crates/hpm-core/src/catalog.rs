//! Static reference data.
//!
//! The catalog is read-only for the lifetime of a session. It ships with a
//! built-in set of tables and may be replaced by a JSON file at startup; any
//! table missing from that file falls back to the built-in one.
//!
//! Stored state refers into the catalog by id (scenario ids, reward days, rule
//! ids). Lookups return `Option` and callers treat `None` as a stale reference
//! that contributes nothing.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtCategory {
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    /// Broad grouping shown next to the name (e.g. "Energy", "Identity").
    #[serde(default)]
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technique {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechniqueCatalog {
    pub self_talk: Vec<Technique>,
    pub body: Vec<Technique>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScenario {
    pub id: String,
    pub name: String,
    /// Perceived risk on a 1-5 scale.
    pub risk: u8,
    pub xp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakReward {
    pub days: u32,
    pub bonus: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub name: String,
    pub xp: u64,
    pub level: u8,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpfRule {
    pub id: String,
    pub statement: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub anti_patterns: Vec<String>,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpfScript {
    pub id: String,
    pub audience: String,
    pub trigger: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpfExposure {
    pub id: String,
    pub difficulty: u8,
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpfMetric {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub description: String,
}

/// All reference tables consumed by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Catalog {
    pub thought_categories: Vec<ThoughtCategory>,
    pub techniques: TechniqueCatalog,
    /// Power-word bank, grouped in columns.
    pub power_words: Vec<Vec<String>>,
    pub risk_scenarios: Vec<RiskScenario>,
    /// Ascending by `days`.
    pub streak_rewards: Vec<StreakReward>,
    /// Ascending by `xp`, strictly increasing.
    pub ranks: Vec<Rank>,
    pub rules: Vec<SpfRule>,
    pub scripts: Vec<SpfScript>,
    pub exposures: Vec<SpfExposure>,
    pub metrics: Vec<SpfMetric>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// Load a catalog file. Tables absent from the file keep their built-in values.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Rank progress divides by the gap between consecutive thresholds, so
    /// thresholds must be strictly increasing.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.ranks.is_empty() {
            return Err(CatalogError::Invalid("rank table is empty".to_string()));
        }
        if let Some(pair) = self.ranks.windows(2).find(|w| w[0].xp >= w[1].xp) {
            return Err(CatalogError::Invalid(format!(
                "rank thresholds must increase: {} ({}) then {} ({})",
                pair[0].name, pair[0].xp, pair[1].name, pair[1].xp
            )));
        }
        if let Some(pair) = self.streak_rewards.windows(2).find(|w| w[0].days >= w[1].days) {
            return Err(CatalogError::Invalid(format!(
                "streak reward days must increase: {} then {}",
                pair[0].days, pair[1].days
            )));
        }
        Ok(())
    }

    // ===== Lookups =====

    pub fn risk_scenario(&self, id: &str) -> Option<&RiskScenario> {
        self.risk_scenarios.iter().find(|s| s.id == id)
    }

    pub fn streak_reward(&self, days: u32) -> Option<&StreakReward> {
        self.streak_rewards.iter().find(|r| r.days == days)
    }

    pub fn rule(&self, id: &str) -> Option<&SpfRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn script(&self, id: &str) -> Option<&SpfScript> {
        self.scripts.iter().find(|s| s.id == id)
    }

    pub fn exposure(&self, id: &str) -> Option<&SpfExposure> {
        self.exposures.iter().find(|e| e.id == id)
    }

    pub fn metric(&self, id: &str) -> Option<&SpfMetric> {
        self.metrics.iter().find(|m| m.id == id)
    }

    pub fn thought_category(&self, name: &str) -> Option<&ThoughtCategory> {
        self.thought_categories.iter().find(|c| c.name == name)
    }

    /// The power-word bank flattened in column order.
    pub fn all_power_words(&self) -> Vec<String> {
        self.power_words.iter().flatten().cloned().collect()
    }

    pub fn default_rule_toggles(&self) -> BTreeMap<String, bool> {
        self.rules
            .iter()
            .map(|rule| (rule.id.clone(), rule.default))
            .collect()
    }

    // ===== Built-in tables =====

    pub fn builtin() -> Self {
        Self {
            thought_categories: builtin_thought_categories(),
            techniques: builtin_techniques(),
            power_words: builtin_power_words(),
            risk_scenarios: builtin_risk_scenarios(),
            streak_rewards: builtin_streak_rewards(),
            ranks: builtin_ranks(),
            rules: builtin_rules(),
            scripts: builtin_scripts(),
            exposures: builtin_exposures(),
            metrics: builtin_metrics(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_thought_categories() -> Vec<ThoughtCategory> {
    [
        ("Sleep-Deprivation ANT", "😴", "Energy"),
        ("Identity-Attack ANT", "🎭", "Identity"),
        ("Exposure ANT", "👁️", "Vulnerability"),
        ("Hostile Environment ANT", "⚡", "Environment"),
        ("They're Onto You ANT", "🕵️", "Paranoia"),
        ("Catastrophic Failure ANT", "💥", "Fear"),
        ("Territorial Exile ANT", "🏝️", "Belonging"),
        ("Self-Resentment ANT", "😤", "Self"),
        ("Approval-Seeking ANT", "👍", "Validation"),
        ("Approval-Vulnerability ANT", "💔", "Validation"),
        ("Let Everyone Down ANT", "😔", "Responsibility"),
        ("Outed ANT", "🎯", "Exposure"),
        ("Anxious ANT", "😰", "Anxiety"),
        ("Doubting ANT", "🤔", "Confidence"),
        ("Frustrated ANT", "😤", "Emotion"),
    ]
    .into_iter()
    .map(|(name, emoji, group)| ThoughtCategory {
        name: name.to_string(),
        emoji: emoji.to_string(),
        group: group.to_string(),
    })
    .collect()
}

fn builtin_techniques() -> TechniqueCatalog {
    let technique = |(name, description): (&str, &str)| Technique {
        name: name.to_string(),
        description: description.to_string(),
    };
    TechniqueCatalog {
        self_talk: [
            ("Instructionally", "Give yourself clear directions"),
            ("Positively", "Use affirming language"),
            ("Motivationally", "Push yourself forward"),
            ("Energetically", "Pump yourself up"),
        ]
        .into_iter()
        .map(technique)
        .collect(),
        body: [
            ("Posture", "Stand tall and open"),
            ("Movement/Actions", "Move with purpose"),
            ("Gestures", "Use confident hand movements"),
            ("Communication", "Speak clearly and strongly"),
            ("Breathing", "Deep, controlled breaths"),
            ("Scanning", "Eye contact and awareness"),
        ]
        .into_iter()
        .map(technique)
        .collect(),
    }
}

fn builtin_power_words() -> Vec<Vec<String>> {
    vec![
        strings(&[
            "Curious", "Dominant", "Alert", "Lively", "Immersed", "Confident", "Strong",
            "Focused", "Belief", "Assertive", "Playful",
        ]),
        strings(&[
            "Upbeat", "Positive", "Ready", "Relaxed", "Interested", "Impact", "Tall", "Decisive",
            "Brave", "Cool", "Intense",
        ]),
        strings(&[
            "Bold", "Calm", "Decisive", "Committed", "Free", "Relentless", "Loud", "Big",
            "Energy", "Powerful", "Alive",
        ]),
    ]
}

fn builtin_risk_scenarios() -> Vec<RiskScenario> {
    [
        ("meeting", "Led/Spoke in Meeting", 3, 20),
        ("stranger", "Started Conversation with Stranger", 4, 25),
        ("presentation", "Gave Presentation", 5, 30),
        ("challenge", "Challenged Authority/Status Quo", 5, 30),
        ("vulnerable", "Shared Vulnerable Story", 4, 25),
        ("rejection", "Asked for Something (Risk Rejection)", 3, 20),
        ("spotlight", "Put Myself in Spotlight", 5, 30),
        ("disagreed", "Publicly Disagreed", 4, 25),
        ("initiated", "Initiated Group Activity", 3, 20),
        ("performed", "Performed in Front of Others", 5, 35),
    ]
    .into_iter()
    .map(|(id, name, risk, xp)| RiskScenario {
        id: id.to_string(),
        name: name.to_string(),
        risk,
        xp,
    })
    .collect()
}

fn builtin_streak_rewards() -> Vec<StreakReward> {
    [
        (3, 50, "Warming Up"),
        (7, 100, "On Fire"),
        (14, 200, "Unstoppable"),
        (30, 500, "HPM Legend"),
        (60, 1000, "Elite Mindset"),
        (100, 2000, "Mental Titan"),
    ]
    .into_iter()
    .map(|(days, bonus, title)| StreakReward {
        days,
        bonus,
        title: title.to_string(),
    })
    .collect()
}

fn builtin_ranks() -> Vec<Rank> {
    [
        ("Contender", 0, 4, "gray"),
        ("Operator", 150, 5, "blue"),
        ("Commander", 450, 6, "purple"),
        ("Field Marshal", 900, 7, "amber"),
        ("Elite Competitor", 1500, 8, "red"),
        ("HPM Master", 2500, 9, "pink"),
    ]
    .into_iter()
    .map(|(name, xp, level, color)| Rank {
        name: name.to_string(),
        xp,
        level,
        color: color.to_string(),
    })
    .collect()
}

fn builtin_rules() -> Vec<SpfRule> {
    vec![
        SpfRule {
            id: "min_justify".to_string(),
            statement: "Minimum-justification rule".to_string(),
            description: "One-sentence reason, then act".to_string(),
            examples: strings(&[
                "I'm at capacity",
                "That's outside scope",
                "Prioritizing existing commitments",
            ]),
            anti_patterns: strings(&["Long explanations", "Multiple reasons", "Apologizing"]),
            default: true,
        },
        SpfRule {
            id: "owner_date".to_string(),
            statement: "Owner/Date rule".to_string(),
            description: "No task without clear owner and deadline".to_string(),
            examples: strings(&[
                "Who owns this and when is it due?",
                "I'll need owner and date first",
            ]),
            anti_patterns: strings(&["Taking on vague requests", "Assuming ownership"]),
            default: true,
        },
        SpfRule {
            id: "no_postmortem".to_string(),
            statement: "No post-mortems".to_string(),
            description: "Stop explaining past decisions".to_string(),
            examples: strings(&["Decision was made with available info", "Moving forward"]),
            anti_patterns: strings(&["Rehashing decisions", "Justifying past choices"]),
            default: false,
        },
        SpfRule {
            id: "audience_shrink".to_string(),
            statement: "Audience shrink".to_string(),
            description: "Optimize for: Future-You, Family, Best Client only".to_string(),
            examples: strings(&["Would my best client care?", "Does this serve my family?"]),
            anti_patterns: strings(&["Trying to please everyone", "Imagined critics"]),
            default: false,
        },
    ]
}

fn builtin_scripts() -> Vec<SpfScript> {
    [
        (
            "boss_boundary",
            "Boss",
            "New request outside scope",
            "That's outside my remaining scope. If it's critical, what should drop?",
        ),
        (
            "client_leaving",
            "Client",
            "Announcing departure",
            "After three years I'm moving to a narrower, sustainable remit. Transition details below.",
        ),
        (
            "finance_wording",
            "Finance",
            "Asked to send misleading language",
            "I won't send language I can't stand behind. If policy differs, confirm in writing.",
        ),
        (
            "meeting_decline",
            "Team",
            "Non-essential meeting invite",
            "Declining - not required for my deliverables. Notes welcome if relevant.",
        ),
        (
            "scope_creep",
            "Stakeholder",
            "Feature request during exit",
            "New features are post-handover. Current scope only through [DATE].",
        ),
        (
            "status_facts",
            "Leadership",
            "Status update request",
            "[METRIC]: [NUMBER]. On track for [DATE]. Blocker: [ITEM or 'None'].",
        ),
    ]
    .into_iter()
    .map(|(id, audience, trigger, text)| SpfScript {
        id: id.to_string(),
        audience: audience.to_string(),
        trigger: trigger.to_string(),
        text: text.to_string(),
    })
    .collect()
}

fn builtin_exposures() -> Vec<SpfExposure> {
    vec![
        SpfExposure {
            id: "no_softeners".to_string(),
            difficulty: 1,
            description: "Say 'no' without softeners".to_string(),
            examples: strings(&["No", "Can't do that", "Not available"]),
        },
        SpfExposure {
            id: "facts_only".to_string(),
            difficulty: 2,
            description: "Ship a status with facts only and dates".to_string(),
            examples: strings(&["3 tasks complete. 2 remaining. Due Friday."]),
        },
        SpfExposure {
            id: "undefended".to_string(),
            difficulty: 3,
            description: "Leave a message un-defended for 24h".to_string(),
            examples: strings(&["Send decision, don't reply to pushback for a day"]),
        },
        SpfExposure {
            id: "ask_owner".to_string(),
            difficulty: 4,
            description: "Ask 'owner + date?' - if absent, decline".to_string(),
            examples: strings(&["Who owns this and when is it due?"]),
        },
        SpfExposure {
            id: "publish_handover".to_string(),
            difficulty: 5,
            description: "Publish one-page handover with risks/mitigations".to_string(),
            examples: strings(&["Clear documentation, no over-explaining"]),
        },
    ]
}

fn builtin_metrics() -> Vec<SpfMetric> {
    [
        (
            "one_sentence",
            "Used one-sentence rule",
            "Daily",
            "Gave brief explanation without elaborating",
        ),
        (
            "declined_scope",
            "Declined off-scope ask",
            "When applicable",
            "Said no to request outside boundaries",
        ),
        (
            "shipped_artifact",
            "Shipped without perfecting",
            "Daily",
            "Delivered work without overthinking",
        ),
        (
            "no_justification",
            "Acted without justifying",
            "Daily",
            "Made decision without explaining to imagined critics",
        ),
    ]
    .into_iter()
    .map(|(id, name, target, description)| SpfMetric {
        id: id.to_string(),
        name: name.to_string(),
        target: target.to_string(),
        description: description.to_string(),
    })
    .collect()
}
