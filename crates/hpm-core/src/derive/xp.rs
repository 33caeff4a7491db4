use crate::catalog::Catalog;
use crate::models::{AntEvent, RiskEvent};

/// Base XP for any attempted event.
pub const ATTEMPT_BASE_XP: u64 = 10;
/// XP per intensity point of an attempted event.
pub const INTENSITY_XP: u64 = 3;
/// Bonus for countering with at least one technique.
pub const TECHNIQUE_BONUS_XP: u64 = 5;
/// Bonus for going in with a game face.
pub const GAME_FACE_BONUS_XP: u64 = 5;

/// XP earned by a single event. Unattempted events earn nothing.
pub fn event_xp(event: &AntEvent) -> u64 {
    if !event.attempted {
        return 0;
    }
    let mut xp = ATTEMPT_BASE_XP + INTENSITY_XP * u64::from(event.intensity);
    if event.techniques_used.any() {
        xp += TECHNIQUE_BONUS_XP;
    }
    if event.has_game_face() {
        xp += GAME_FACE_BONUS_XP;
    }
    xp
}

/// Total XP from the event log, risks taken and claimed streak rewards.
///
/// Risk scenarios and reward days no longer in the catalog count as zero.
pub fn compute_xp<'a, C>(
    events: &[AntEvent],
    risk_events: &[RiskEvent],
    claimed_reward_days: C,
    catalog: &Catalog,
) -> u64
where
    C: IntoIterator<Item = &'a u32>,
{
    let from_events: u64 = events.iter().map(event_xp).sum();

    let from_risks: u64 = risk_events
        .iter()
        .filter_map(|risk| catalog.risk_scenario(&risk.scenario_id))
        .map(|scenario| scenario.xp)
        .sum();

    let from_rewards: u64 = claimed_reward_days
        .into_iter()
        .filter_map(|days| catalog.streak_reward(*days))
        .map(|reward| reward.bonus)
        .sum();

    from_events + from_risks + from_rewards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAntEvent, TechniquesUsed};
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn event(intensity: u8, attempted: bool, self_talk: &[&str], game_face: bool) -> AntEvent {
        AntEvent::new(
            NewAntEvent {
                category: "Doubting ANT".to_string(),
                intensity,
                attempted,
                techniques_used: TechniquesUsed::new(
                    self_talk.iter().map(|s| s.to_string()),
                    Vec::new(),
                ),
                game_face_id: game_face.then(|| "gf".to_string()),
                ..Default::default()
            },
            "id".to_string(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            0,
        )
    }

    fn risk(scenario_id: &str) -> RiskEvent {
        RiskEvent {
            id: "r".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            timestamp: 0,
            scenario_id: scenario_id.to_string(),
        }
    }

    #[test]
    fn test_event_xp_components() {
        assert_eq!(event_xp(&event(4, true, &["Positively"], false)), 27);
        assert_eq!(event_xp(&event(4, true, &[], false)), 22);
        assert_eq!(event_xp(&event(1, true, &["Positively"], true)), 23);
        assert_eq!(event_xp(&event(5, false, &["Positively"], true)), 0);
    }

    #[test]
    fn test_worked_example() {
        let catalog = Catalog::builtin();
        let events = vec![event(4, true, &["Positively"], false)];
        let mut claimed = BTreeSet::new();

        assert_eq!(compute_xp(&events, &[], &claimed, &catalog), 27);

        let risks = vec![risk("meeting")];
        assert_eq!(compute_xp(&events, &risks, &claimed, &catalog), 47);

        claimed.insert(3);
        assert_eq!(compute_xp(&events, &risks, &claimed, &catalog), 97);
    }

    #[test]
    fn test_stale_references_contribute_zero() {
        let catalog = Catalog::builtin();
        let risks = vec![risk("retired"), risk("performed")];
        let claimed = BTreeSet::from([5, 7]);
        assert_eq!(compute_xp(&[], &risks, &claimed, &catalog), 35 + 100);
    }

    #[test]
    fn test_duplicate_risks_each_count() {
        let catalog = Catalog::builtin();
        let risks = vec![risk("meeting"), risk("meeting")];
        assert_eq!(compute_xp(&[], &risks, &BTreeSet::new(), &catalog), 40);
    }

    #[test]
    fn test_xp_never_decreases_as_log_grows() {
        let catalog = Catalog::builtin();
        let mut events = Vec::new();
        let mut risks = Vec::new();
        let mut claimed = BTreeSet::new();
        let mut last = compute_xp(&events, &risks, &claimed, &catalog);

        for step in 0..30u8 {
            match step % 4 {
                0 => events.insert(0, event(step % 5 + 1, step % 3 != 0, &["Positively"], false)),
                1 => risks.insert(0, risk(if step % 2 == 0 { "meeting" } else { "unknown" })),
                2 => {
                    claimed.insert([3, 7, 14, 30, 60, 100][usize::from(step) % 6]);
                }
                _ => events.insert(0, event(2, false, &[], true)),
            }
            let xp = compute_xp(&events, &risks, &claimed, &catalog);
            assert!(xp >= last, "xp dropped from {} to {} at step {}", last, xp, step);
            last = xp;
        }
    }
}
