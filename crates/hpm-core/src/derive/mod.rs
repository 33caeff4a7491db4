//! Pure derivations over the recorded state. Nothing here reads the clock or
//! touches storage; "today" is always passed in.

pub mod mindset;
pub mod rank;
pub mod streak;
pub mod summary;
pub mod xp;

pub use mindset::compute_mindset_level;
pub use rank::{compute_rank, RankProgress};
pub use streak::{
    compute_login_streak, compute_performance_streak, next_streak_reward, LoginStreakOutcome,
};
pub use summary::{active_rules, category_breakdown, today_summary, CategoryStats, DaySummary};
pub use xp::{compute_xp, event_xp};
