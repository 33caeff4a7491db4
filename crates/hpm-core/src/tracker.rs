//! The owned session state and the operations allowed to change it.
//!
//! A `Tracker` exclusively owns the `AppState`. Every mutation validates its
//! input first, applies in full, then writes the whole record back. Rejected
//! input leaves the state untouched and is reported as a `MutationError`.
//!
//! If a write fails the tracker keeps working from memory and stops trying to
//! persist for the rest of the session.

use crate::catalog::{Catalog, StreakReward};
use crate::clock::{Clock, LocalClock};
use crate::config::CoreConfig;
use crate::derive::{self, DaySummary, LoginStreakOutcome, RankProgress};
use crate::error::{CatalogError, MutationError};
use crate::models::{
    AntEvent, GameFace, MetricScore, NewAntEvent, NewGameFace, Policy, PolicyFields, RiskEvent,
    WorryEntry, MAX_POWER_WORDS,
};
use crate::models::ant_event::dedup_preserving_order;
use crate::store::{self, AppState, FileStorage, Storage};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub struct Tracker {
    state: AppState,
    catalog: Catalog,
    storage: Box<dyn Storage>,
    clock: Box<dyn Clock>,
    persistent: bool,
}

/// Everything the main screen shows, computed in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard<'a> {
    pub xp: u64,
    pub rank: RankProgress<'a>,
    pub performance_streak: u32,
    pub login_streak: u32,
    pub next_reward: Option<&'a StreakReward>,
    pub mindset_level: u8,
    pub today: DaySummary,
    pub exposures_today: Vec<String>,
    pub metrics_today: BTreeMap<String, MetricScore>,
}

impl Tracker {
    /// Open the tracker described by `config`: its catalog (built-in unless a
    /// catalog file is configured), file storage in the data directory, and
    /// the local wall clock.
    pub fn open(config: &CoreConfig) -> Result<Self, CatalogError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin(),
        };
        let storage = FileStorage::new(&config.data_dir);
        debug!("tracker: opening {}", storage.path().display());
        Self::with_parts(catalog, Box::new(storage), Box::new(LocalClock))
    }

    /// Assemble a tracker from its parts. The catalog is validated first, so
    /// rank lookups always have a ladder to stand on.
    pub fn with_parts(
        catalog: Catalog,
        storage: Box<dyn Storage>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CatalogError> {
        catalog.validate()?;
        let state = store::load_state(storage.as_ref(), &catalog);
        Ok(Self {
            state,
            catalog,
            storage,
            clock,
            persistent: true,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// False once a write has failed this session.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn persist(&mut self) {
        if !self.persistent {
            return;
        }
        if let Err(e) = store::save_state(self.storage.as_mut(), &self.state) {
            warn!(
                "tracker: failed to save state, continuing in memory only: {}",
                e
            );
            self.persistent = false;
        }
    }

    // ===== Mutations =====

    /// Log an ANT for today. Returns the stored event.
    pub fn append_event(&mut self, input: NewAntEvent) -> Result<&AntEvent, MutationError> {
        if !(1..=5).contains(&input.intensity) {
            return Err(MutationError::IntensityOutOfRange(input.intensity));
        }
        let event = AntEvent::new(
            input,
            Self::new_id(),
            self.clock.today(),
            self.clock.now_millis(),
        );
        debug!(
            category = %event.category,
            attempted = event.attempted,
            resolved = event.resolved,
            "tracker: event logged"
        );
        self.state.events.insert(0, event);
        self.persist();
        Ok(&self.state.events[0])
    }

    /// Record a risk taken today. Unknown scenario ids are stored as-is and
    /// simply earn nothing.
    pub fn append_risk_event(&mut self, scenario_id: &str) -> &RiskEvent {
        if self.catalog.risk_scenario(scenario_id).is_none() {
            debug!("tracker: risk logged for unknown scenario {}", scenario_id);
        }
        let risk = RiskEvent {
            id: Self::new_id(),
            date: self.clock.today(),
            timestamp: self.clock.now_millis(),
            scenario_id: scenario_id.to_string(),
        };
        self.state.risk_events.insert(0, risk);
        self.persist();
        &self.state.risk_events[0]
    }

    pub fn create_game_face(&mut self, input: NewGameFace) -> Result<&GameFace, MutationError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(MutationError::EmptyGameFaceName);
        }
        let power_words = dedup_preserving_order(
            input
                .power_words
                .into_iter()
                .map(|w| w.trim().to_string())
                .filter(|w| !w.is_empty()),
        );
        if power_words.is_empty() {
            return Err(MutationError::NoPowerWords);
        }
        if power_words.len() > MAX_POWER_WORDS {
            return Err(MutationError::TooManyPowerWords {
                max: MAX_POWER_WORDS,
                got: power_words.len(),
            });
        }

        let face = GameFace {
            id: Self::new_id(),
            name: name.to_string(),
            power_words,
            model_person: input
                .model_person
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            source: input.source,
            created_at: self.clock.now_millis(),
        };
        debug!("tracker: game face {} created", face.name);
        self.state.game_faces.insert(0, face);
        self.persist();
        Ok(&self.state.game_faces[0])
    }

    /// Claim the bonus for a streak threshold. Each threshold pays out once.
    pub fn claim_streak_reward(&mut self, days: u32) -> Result<StreakReward, MutationError> {
        if self.state.claimed_streak_reward_days.contains(&days) {
            return Err(MutationError::RewardAlreadyClaimed(days));
        }
        let Some(reward) = self.catalog.streak_reward(days).cloned() else {
            return Err(MutationError::UnknownReward(days));
        };
        self.state.claimed_streak_reward_days.insert(days);
        info!("tracker: claimed {}-day streak reward (+{} XP)", days, reward.bonus);
        self.persist();
        Ok(reward)
    }

    /// Flip a rule toggle; a missing toggle counts as off. Returns the new value.
    pub fn toggle_rule(&mut self, rule_id: &str) -> bool {
        let toggle = self
            .state
            .rule_toggles
            .entry(rule_id.to_string())
            .or_insert(false);
        *toggle = !*toggle;
        let enabled = *toggle;
        self.persist();
        enabled
    }

    pub fn log_exposure(&mut self, exposure_id: &str, date: NaiveDate) {
        self.state
            .exposures_by_date
            .entry(date)
            .or_default()
            .push(exposure_id.to_string());
        self.persist();
    }

    /// Set the day's score for a metric, replacing any earlier score that day.
    pub fn log_metric(
        &mut self,
        metric_id: &str,
        date: NaiveDate,
        score: u8,
    ) -> Result<(), MutationError> {
        if score > 1 {
            return Err(MutationError::InvalidScore(score));
        }
        let entry = MetricScore {
            score,
            timestamp: self.clock.now_millis(),
        };
        self.state
            .metrics_by_date
            .entry(date)
            .or_default()
            .insert(metric_id.to_string(), entry);
        self.persist();
        Ok(())
    }

    pub fn save_positive_of_day(&mut self, date: NaiveDate, text: &str) -> Result<(), MutationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MutationError::EmptyText);
        }
        self.state.daily_positives.insert(date, text.to_string());
        self.persist();
        Ok(())
    }

    pub fn log_worry(&mut self, text: &str) -> Result<(), MutationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MutationError::EmptyText);
        }
        let entry = WorryEntry {
            text: text.to_string(),
            date: self.clock.today(),
            timestamp: self.clock.now_millis(),
        };
        self.state.worry_entries.push(entry);
        self.persist();
        Ok(())
    }

    /// Replace the policy wholesale.
    pub fn generate_policy(
        &mut self,
        fields: PolicyFields,
        chosen_script_id: Option<String>,
    ) -> Policy {
        let policy = Policy::new(fields, chosen_script_id, self.clock.now_millis());
        self.state.policy = Some(policy.clone());
        self.persist();
        policy
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.state.dark_mode_enabled = enabled;
        self.persist();
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        let enabled = !self.state.dark_mode_enabled;
        self.set_dark_mode(enabled);
        enabled
    }

    /// Session-start login check against the clock's today.
    pub fn check_in(&mut self) -> LoginStreakOutcome {
        let today = self.clock.today();
        self.check_in_on(today)
    }

    /// Login-streak transition for `today`. Applied at most once per day.
    pub fn check_in_on(&mut self, today: NaiveDate) -> LoginStreakOutcome {
        let outcome = derive::compute_login_streak(
            self.state.last_login_date,
            self.state.login_streak_days,
            &self.state.claimed_streak_reward_days,
            today,
            &self.catalog,
        );
        if outcome.changed {
            self.state.last_login_date = Some(today);
            self.state.login_streak_days = outcome.new_streak;
            info!("tracker: login streak now {} days", outcome.new_streak);
            if let Some(reward) = &outcome.reward_unlocked {
                info!(
                    "tracker: {}-day reward '{}' unlocked, pending claim",
                    reward.days, reward.title
                );
            }
            self.persist();
        }
        outcome
    }

    // ===== Derived views =====

    pub fn xp(&self) -> u64 {
        derive::compute_xp(
            &self.state.events,
            &self.state.risk_events,
            &self.state.claimed_streak_reward_days,
            &self.catalog,
        )
    }

    pub fn rank(&self) -> RankProgress<'_> {
        derive::compute_rank(self.xp(), &self.catalog)
    }

    pub fn performance_streak(&self) -> u32 {
        derive::compute_performance_streak(&self.state.events, self.clock.today())
    }

    pub fn mindset_level(&self) -> u8 {
        derive::compute_mindset_level(&self.state.events)
    }

    /// Resolve an event's game face; `None` for stale references.
    pub fn game_face(&self, id: &str) -> Option<&GameFace> {
        self.state.game_face(id)
    }

    pub fn dashboard(&self) -> Dashboard<'_> {
        let today = self.clock.today();
        let xp = self.xp();
        Dashboard {
            xp,
            rank: derive::compute_rank(xp, &self.catalog),
            performance_streak: derive::compute_performance_streak(&self.state.events, today),
            login_streak: self.state.login_streak_days,
            next_reward: derive::next_streak_reward(self.state.login_streak_days, &self.catalog),
            mindset_level: derive::compute_mindset_level(&self.state.events),
            today: derive::today_summary(&self.state.events, today),
            exposures_today: self.state.exposures_on(today).to_vec(),
            metrics_today: self.state.metrics_on(today).cloned().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::StorageError;
    use crate::models::TechniquesUsed;
    use crate::store::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    /// Storage handle shared with the test so it can inspect what was written.
    #[derive(Clone, Default)]
    struct SharedStorage(Rc<RefCell<MemoryStorage>>);

    impl Storage for SharedStorage {
        fn read(&self) -> Result<Option<String>, StorageError> {
            self.0.borrow().read()
        }

        fn write(&mut self, contents: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().write(contents)
        }
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn read(&self) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn write(&mut self, _contents: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    fn tracker_on(today: NaiveDate) -> (Tracker, SharedStorage) {
        let storage = SharedStorage::default();
        let tracker = Tracker::with_parts(
            Catalog::builtin(),
            Box::new(storage.clone()),
            Box::new(FixedClock::new(today)),
        )
        .unwrap();
        (tracker, storage)
    }

    fn reopen(storage: &SharedStorage, today: NaiveDate) -> Tracker {
        Tracker::with_parts(
            Catalog::builtin(),
            Box::new(storage.clone()),
            Box::new(FixedClock::new(today)),
        )
        .unwrap()
    }

    fn attempted(intensity: u8, self_talk: &[&str]) -> NewAntEvent {
        NewAntEvent {
            category: "Anxious ANT".to_string(),
            intensity,
            attempted: true,
            techniques_used: TechniquesUsed::new(
                self_talk.iter().map(|s| s.to_string()),
                Vec::new(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn test_append_event_prepends_and_persists() {
        let (mut tracker, storage) = tracker_on(day(10));
        tracker.append_event(attempted(2, &[])).unwrap();
        let id = tracker
            .append_event(attempted(4, &["Positively"]))
            .unwrap()
            .id
            .clone();

        assert_eq!(tracker.state().events[0].id, id);
        assert!(tracker.state().events[0].resolved);
        assert_eq!(tracker.state().events[0].date, day(10));

        let reopened = reopen(&storage, day(10));
        assert_eq!(reopened.state(), tracker.state());
    }

    #[test]
    fn test_append_event_rejects_bad_intensity() {
        let (mut tracker, storage) = tracker_on(day(10));
        assert_eq!(
            tracker.append_event(attempted(0, &[])).unwrap_err(),
            MutationError::IntensityOutOfRange(0)
        );
        assert_eq!(
            tracker.append_event(attempted(6, &[])).unwrap_err(),
            MutationError::IntensityOutOfRange(6)
        );
        assert!(tracker.state().events.is_empty());
        assert!(storage.0.borrow().contents().is_none());
    }

    #[test]
    fn test_end_to_end_xp() {
        let (mut tracker, _) = tracker_on(day(10));
        tracker.append_event(attempted(4, &["Positively"])).unwrap();
        assert_eq!(tracker.xp(), 27);
        tracker.append_risk_event("meeting");
        assert_eq!(tracker.xp(), 47);
        tracker.claim_streak_reward(3).unwrap();
        assert_eq!(tracker.xp(), 97);
    }

    #[test]
    fn test_unknown_risk_scenario_tolerated() {
        let (mut tracker, _) = tracker_on(day(10));
        let risk = tracker.append_risk_event("retired");
        assert_eq!(risk.scenario_id, "retired");
        assert_eq!(tracker.xp(), 0);
        assert_eq!(tracker.state().risk_events.len(), 1);
    }

    #[test]
    fn test_claim_reward_twice_counts_once() {
        let (mut tracker, _) = tracker_on(day(10));
        tracker.claim_streak_reward(7).unwrap();
        assert_eq!(
            tracker.claim_streak_reward(7).unwrap_err(),
            MutationError::RewardAlreadyClaimed(7)
        );
        assert_eq!(tracker.state().claimed_streak_reward_days.len(), 1);
        assert_eq!(tracker.xp(), 100);
    }

    #[test]
    fn test_claim_unknown_reward_rejected() {
        let (mut tracker, _) = tracker_on(day(10));
        assert_eq!(
            tracker.claim_streak_reward(5).unwrap_err(),
            MutationError::UnknownReward(5)
        );
        assert!(tracker.state().claimed_streak_reward_days.is_empty());
    }

    #[test]
    fn test_game_face_validation() {
        let (mut tracker, _) = tracker_on(day(10));
        let empty_name = NewGameFace {
            name: "   ".to_string(),
            power_words: vec!["Bold".to_string()],
            ..Default::default()
        };
        assert_eq!(
            tracker.create_game_face(empty_name).unwrap_err(),
            MutationError::EmptyGameFaceName
        );

        let no_words = NewGameFace {
            name: "Closer".to_string(),
            ..Default::default()
        };
        assert_eq!(
            tracker.create_game_face(no_words).unwrap_err(),
            MutationError::NoPowerWords
        );

        let too_many = NewGameFace {
            name: "Closer".to_string(),
            power_words: ["Bold", "Calm", "Free", "Loud"].map(String::from).to_vec(),
            ..Default::default()
        };
        assert!(matches!(
            tracker.create_game_face(too_many),
            Err(MutationError::TooManyPowerWords { max: 3, got: 4 })
        ));
        assert!(tracker.state().game_faces.is_empty());

        let face = tracker
            .create_game_face(NewGameFace {
                name: " Closer ".to_string(),
                power_words: ["Bold", "Bold", "Calm"].map(String::from).to_vec(),
                model_person: Some("".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(face.name, "Closer");
        assert_eq!(face.power_words, vec!["Bold", "Calm"]);
        assert!(face.model_person.is_none());
    }

    #[test]
    fn test_game_face_attached_to_event() {
        let (mut tracker, _) = tracker_on(day(10));
        let face_id = tracker
            .create_game_face(NewGameFace {
                name: "Closer".to_string(),
                power_words: vec!["Bold".to_string(), "Calm".to_string()],
                ..Default::default()
            })
            .unwrap()
            .id
            .clone();
        let mut input = attempted(1, &[]);
        input.game_face_id = Some(face_id.clone());
        tracker.append_event(input).unwrap();
        assert_eq!(tracker.xp(), 10 + 3 + 5);
        assert_eq!(
            tracker.game_face(&face_id).map(|f| f.name.as_str()),
            Some("Closer")
        );
        assert!(tracker.game_face("deleted").is_none());
    }

    #[test]
    fn test_toggle_rule() {
        let (mut tracker, _) = tracker_on(day(10));
        assert!(!tracker.toggle_rule("min_justify"));
        assert!(tracker.toggle_rule("min_justify"));
        assert!(tracker.toggle_rule("brand_new_rule"));
    }

    #[test]
    fn test_exposures_allow_duplicates() {
        let (mut tracker, _) = tracker_on(day(10));
        tracker.log_exposure("no_softeners", day(10));
        tracker.log_exposure("no_softeners", day(10));
        tracker.log_exposure("facts_only", day(9));
        assert_eq!(tracker.state().exposures_on(day(10)).len(), 2);
        assert_eq!(tracker.dashboard().exposures_today.len(), 2);
    }

    #[test]
    fn test_metric_overwrites_same_day() {
        let (mut tracker, _) = tracker_on(day(10));
        tracker.log_metric("one_sentence", day(10), 0).unwrap();
        tracker.log_metric("one_sentence", day(10), 1).unwrap();
        assert_eq!(
            tracker.log_metric("one_sentence", day(10), 2).unwrap_err(),
            MutationError::InvalidScore(2)
        );
        let metrics = tracker.state().metrics_on(day(10)).unwrap();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics["one_sentence"].score, 1);
    }

    #[test]
    fn test_positive_of_day_trims_and_overwrites() {
        let (mut tracker, _) = tracker_on(day(10));
        assert_eq!(
            tracker.save_positive_of_day(day(10), "   ").unwrap_err(),
            MutationError::EmptyText
        );
        tracker.save_positive_of_day(day(10), " first ").unwrap();
        tracker.save_positive_of_day(day(10), "second").unwrap();
        assert_eq!(tracker.state().daily_positives[&day(10)], "second");
        assert_eq!(tracker.state().daily_positives.len(), 1);
    }

    #[test]
    fn test_worry_appends_in_order() {
        let (mut tracker, _) = tracker_on(day(10));
        assert!(tracker.log_worry("").is_err());
        tracker.log_worry("deadline").unwrap();
        tracker.log_worry("review").unwrap();
        let texts: Vec<&str> = tracker
            .state()
            .worry_entries
            .iter()
            .map(|w| w.text.as_str())
            .collect();
        assert_eq!(texts, vec!["deadline", "review"]);
        assert_eq!(tracker.state().worry_entries[0].date, day(10));
    }

    #[test]
    fn test_generate_policy_overwrites() {
        let (mut tracker, _) = tracker_on(day(10));
        tracker.generate_policy(
            PolicyFields {
                will_do: "Ship handover".to_string(),
                ..Default::default()
            },
            Some("boss_boundary".to_string()),
        );
        let policy = tracker.generate_policy(PolicyFields::default(), None);
        assert_eq!(policy.will_do, "");
        assert!(policy.chosen_script_id.is_none());
    }

    #[test]
    fn test_check_in_once_per_day() {
        let (mut tracker, storage) = tracker_on(day(10));
        let first = tracker.check_in();
        assert_eq!(first.new_streak, 1);
        assert!(first.changed);

        let again = tracker.check_in();
        assert!(!again.changed);
        assert_eq!(again.new_streak, 1);

        let mut next_day = reopen(&storage, day(11));
        assert_eq!(next_day.check_in().new_streak, 2);
        let mut third_day = reopen(&storage, day(12));
        let outcome = third_day.check_in();
        assert_eq!(outcome.new_streak, 3);
        assert_eq!(outcome.reward_unlocked.map(|r| r.days), Some(3));
        assert_eq!(third_day.state().last_login_date, Some(day(12)));

        let mut after_gap = reopen(&storage, day(20));
        assert_eq!(after_gap.check_in().new_streak, 1);
    }

    #[test]
    fn test_write_failure_degrades_to_memory() {
        let mut tracker = Tracker::with_parts(
            Catalog::builtin(),
            Box::new(FailingStorage),
            Box::new(FixedClock::new(day(10))),
        )
        .unwrap();
        assert!(tracker.is_persistent());
        tracker.append_event(attempted(3, &[])).unwrap();
        assert!(!tracker.is_persistent());
        tracker.log_worry("still works").unwrap();
        assert_eq!(tracker.state().events.len(), 1);
        assert_eq!(tracker.state().worry_entries.len(), 1);
    }

    #[test]
    fn test_dashboard() {
        let (mut tracker, _) = tracker_on(day(10));
        tracker.check_in();
        tracker.append_event(attempted(2, &["Positively"])).unwrap();
        tracker.log_metric("shipped_artifact", day(10), 1).unwrap();

        let dashboard = tracker.dashboard();
        assert_eq!(dashboard.xp, 21);
        assert_eq!(dashboard.rank.current.name, "Contender");
        assert_eq!(dashboard.performance_streak, 1);
        assert_eq!(dashboard.login_streak, 1);
        assert_eq!(dashboard.next_reward.map(|r| r.days), Some(3));
        assert_eq!(dashboard.today.total, 1);
        assert_eq!(dashboard.metrics_today.len(), 1);
        assert_eq!(dashboard.mindset_level, 5 + 2 + 1);
    }

    #[test]
    fn test_dark_mode_toggle() {
        let (mut tracker, _) = tracker_on(day(10));
        assert!(tracker.state().dark_mode_enabled);
        assert!(!tracker.toggle_dark_mode());
        tracker.set_dark_mode(true);
        assert!(tracker.state().dark_mode_enabled);
    }

    #[test]
    fn test_catalog_without_ranks_is_refused() {
        let mut catalog = Catalog::builtin();
        catalog.ranks.clear();
        let result = Tracker::with_parts(
            catalog,
            Box::new(MemoryStorage::new()),
            Box::new(FixedClock::new(day(10))),
        );
        assert!(matches!(result, Err(CatalogError::Invalid(_))));
    }
}
