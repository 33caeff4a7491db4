use super::lenient;
use crate::catalog::Catalog;
use crate::models::{AntEvent, GameFace, MetricScore, Policy, RiskEvent, WorryEntry};
use chrono::NaiveDate;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Everything the user has recorded, persisted as one JSON object.
///
/// Every field reads independently: a missing or malformed field falls back
/// to its zero value without affecting the others. Keys written by a newer
/// schema are kept in `extra` and written back untouched.
///
/// Older records used different names for several fields; those are accepted
/// on load and rewritten under the current names on the next save. A record
/// carrying both names keeps the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Newest first.
    pub events: Vec<AntEvent>,
    /// Newest first.
    pub game_faces: Vec<GameFace>,
    /// Newest first.
    pub risk_events: Vec<RiskEvent>,
    pub daily_positives: BTreeMap<NaiveDate, String>,
    pub last_login_date: Option<NaiveDate>,
    pub login_streak_days: u32,
    pub claimed_streak_reward_days: BTreeSet<u32>,
    pub rule_toggles: BTreeMap<String, bool>,
    pub exposures_by_date: BTreeMap<NaiveDate, Vec<String>>,
    pub metrics_by_date: BTreeMap<NaiveDate, BTreeMap<String, MetricScore>>,
    pub policy: Option<Policy>,
    /// Append order, oldest first.
    pub worry_entries: Vec<WorryEntry>,
    pub dark_mode_enabled: bool,
    /// Unrecognised top-level keys, preserved across saves.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Remove a field by its current name, falling back to its legacy name.
fn take_field(fields: &mut Map<String, Value>, key: &str, legacy: Option<&str>) -> Option<Value> {
    let legacy_value = legacy.and_then(|name| fields.remove(name).map(|v| (name, v)));
    match (fields.remove(key), legacy_value) {
        (Some(Value::Null), Some((_, old))) => Some(old),
        (Some(current), Some((name, _))) => {
            warn!("state: both {} and legacy {} present, keeping {}", key, name, key);
            Some(current)
        }
        (Some(current), None) => Some(current),
        (None, old) => old.map(|(_, v)| v),
    }
}

fn read_field<T, F>(
    fields: &mut Map<String, Value>,
    key: &str,
    legacy: Option<&str>,
    read: F,
) -> Result<T, serde_json::Error>
where
    T: Default,
    F: FnOnce(Value) -> Result<T, serde_json::Error>,
{
    match take_field(fields, key, legacy) {
        Some(value) => read(value),
        None => Ok(T::default()),
    }
}

fn plain<T: DeserializeOwned + Default>(
    fields: &mut Map<String, Value>,
    key: &str,
    legacy: Option<&str>,
) -> Result<T, serde_json::Error> {
    read_field(fields, key, legacy, |v| lenient::or_default(v))
}

fn state_from_fields(mut fields: Map<String, Value>) -> Result<AppState, serde_json::Error> {
    let f = &mut fields;
    let mut game_faces: Vec<GameFace> = read_field(f, "gameFaces", None, |v| lenient::seq(v))?;
    // Browser-era records appended faces; keep newest first.
    game_faces.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let dark_mode_enabled = match take_field(f, "darkModeEnabled", Some("darkMode")) {
        Some(value) => lenient::dark_mode(value)?,
        None => lenient::default_dark_mode(),
    };

    Ok(AppState {
        events: read_field(f, "events", Some("entries"), |v| lenient::seq(v))?,
        game_faces,
        risk_events: read_field(f, "riskEvents", Some("risksTaken"), |v| lenient::seq(v))?,
        daily_positives: read_field(f, "dailyPositives", None, |v| lenient::map(v))?,
        last_login_date: plain(f, "lastLoginDate", None)?,
        login_streak_days: plain(f, "loginStreakDays", Some("loginStreak"))?,
        claimed_streak_reward_days: plain(
            f,
            "claimedStreakRewardDays",
            Some("streakRewardsClaimed"),
        )?,
        rule_toggles: plain(f, "ruleToggles", Some("spfRules"))?,
        exposures_by_date: read_field(f, "exposuresByDate", Some("spfExposures"), |v| {
            lenient::map(v)
        })?,
        metrics_by_date: read_field(f, "metricsByDate", Some("spfMetrics"), |v| {
            lenient::map(v)
        })?,
        policy: plain(f, "policy", Some("spfPolicy"))?,
        worry_entries: read_field(f, "worryEntries", Some("worryWindow"), |v| lenient::seq(v))?,
        dark_mode_enabled,
        extra: fields,
    })
}

impl<'de> Deserialize<'de> for AppState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        state_from_fields(fields).map_err(de::Error::custom)
    }
}

impl AppState {
    /// Zero-value state for a first run.
    pub fn fresh(catalog: &Catalog) -> Self {
        Self {
            events: Vec::new(),
            game_faces: Vec::new(),
            risk_events: Vec::new(),
            daily_positives: BTreeMap::new(),
            last_login_date: None,
            login_streak_days: 0,
            claimed_streak_reward_days: BTreeSet::new(),
            rule_toggles: catalog.default_rule_toggles(),
            exposures_by_date: BTreeMap::new(),
            metrics_by_date: BTreeMap::new(),
            policy: None,
            worry_entries: Vec::new(),
            dark_mode_enabled: lenient::default_dark_mode(),
            extra: Map::new(),
        }
    }

    /// Fill in catalog-derived defaults the stored record lacks.
    ///
    /// Returns true when anything changed.
    pub fn reconcile(&mut self, catalog: &Catalog) -> bool {
        let mut changed = false;
        for rule in &catalog.rules {
            if !self.rule_toggles.contains_key(&rule.id) {
                self.rule_toggles.insert(rule.id.clone(), rule.default);
                changed = true;
            }
        }
        changed
    }

    pub fn game_face(&self, id: &str) -> Option<&GameFace> {
        self.game_faces.iter().find(|face| face.id == id)
    }

    pub fn exposures_on(&self, date: NaiveDate) -> &[String] {
        self.exposures_by_date
            .get(&date)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn metrics_on(&self, date: NaiveDate) -> Option<&BTreeMap<String, MetricScore>> {
        self.metrics_by_date.get(&date)
    }

    pub fn is_rule_active(&self, rule_id: &str) -> bool {
        self.rule_toggles.get(rule_id).copied().unwrap_or(false)
    }
}
