use crate::catalog::{Catalog, StreakReward};
use crate::clock::previous_day;
use crate::models::AntEvent;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Consecutive days, ending today, with at least one attempted event.
pub fn compute_performance_streak(events: &[AntEvent], today: NaiveDate) -> u32 {
    let active_days: HashSet<NaiveDate> = events
        .iter()
        .filter(|e| e.attempted)
        .map(|e| e.date)
        .collect();

    let mut streak = 0;
    let mut cursor = today;
    while active_days.contains(&cursor) {
        streak += 1;
        let prev = previous_day(cursor);
        if prev == cursor {
            break;
        }
        cursor = prev;
    }
    streak
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginStreakOutcome {
    pub new_streak: u32,
    /// False when today's check-in was already recorded.
    pub changed: bool,
    /// A reward whose threshold the new streak just hit and that is unclaimed.
    pub reward_unlocked: Option<StreakReward>,
}

/// Login-streak transition for a check-in on `today`.
///
/// Checking in again on the same day changes nothing and surfaces nothing.
/// Checking in the day after the last login extends the streak; any other gap
/// (or a first login) restarts it at 1. Claiming the surfaced reward is left to
/// the caller; a reward left unclaimed when the streak resets is lost.
pub fn compute_login_streak<'a, C>(
    last_login: Option<NaiveDate>,
    current_streak: u32,
    claimed_reward_days: C,
    today: NaiveDate,
    catalog: &Catalog,
) -> LoginStreakOutcome
where
    C: IntoIterator<Item = &'a u32>,
{
    if last_login == Some(today) {
        return LoginStreakOutcome {
            new_streak: current_streak,
            changed: false,
            reward_unlocked: None,
        };
    }

    let new_streak = if last_login == Some(previous_day(today)) {
        current_streak.saturating_add(1)
    } else {
        1
    };

    let claimed: HashSet<u32> = claimed_reward_days.into_iter().copied().collect();
    let reward_unlocked = catalog
        .streak_rewards
        .iter()
        .filter(|reward| reward.days == new_streak && !claimed.contains(&reward.days))
        .min_by_key(|reward| reward.days)
        .cloned();

    LoginStreakOutcome {
        new_streak,
        changed: true,
        reward_unlocked,
    }
}

/// The first reward the current login streak has not yet reached.
pub fn next_streak_reward(login_streak: u32, catalog: &Catalog) -> Option<&StreakReward> {
    catalog
        .streak_rewards
        .iter()
        .find(|reward| reward.days > login_streak)
}
