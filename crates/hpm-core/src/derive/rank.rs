use crate::catalog::{Catalog, Rank};

#[derive(Debug, Clone, PartialEq)]
pub struct RankProgress<'a> {
    pub current: &'a Rank,
    pub next: Option<&'a Rank>,
    pub xp_to_next: u64,
    /// 0..=100; 100 at the top rank.
    pub progress_percent: f64,
}

/// Place `xp` on the rank ladder.
///
/// Below every threshold the first rank is current.
///
/// # Panics
///
/// If the catalog has no ranks. `Catalog::validate` rejects such a catalog
/// and `Tracker` only accepts validated ones.
pub fn compute_rank(xp: u64, catalog: &Catalog) -> RankProgress<'_> {
    let ranks = &catalog.ranks;
    let current_index = ranks.iter().rposition(|rank| rank.xp <= xp).unwrap_or(0);
    let current = &ranks[current_index];
    let next = ranks.get(current_index + 1);

    match next {
        Some(next) => {
            let span = next.xp.saturating_sub(current.xp);
            let progress_percent = if span == 0 {
                100.0
            } else {
                (xp.saturating_sub(current.xp) as f64 / span as f64 * 100.0).clamp(0.0, 100.0)
            };
            RankProgress {
                current,
                next: Some(next),
                xp_to_next: next.xp.saturating_sub(xp),
                progress_percent,
            }
        }
        None => RankProgress {
            current,
            next: None,
            xp_to_next: 0,
            progress_percent: 100.0,
        },
    }
}
