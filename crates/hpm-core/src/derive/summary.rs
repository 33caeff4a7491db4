use crate::catalog::{Catalog, SpfRule};
use crate::models::AntEvent;
use crate::store::AppState;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub category: String,
    pub attempted: usize,
    pub total: usize,
    pub win_rate_percent: f64,
}

/// Attempt rate per thought category, in catalog order, skipping categories
/// with no events.
pub fn category_breakdown(events: &[AntEvent], catalog: &Catalog) -> Vec<CategoryStats> {
    catalog
        .thought_categories
        .iter()
        .filter_map(|category| {
            let matching = events.iter().filter(|e| e.category == category.name);
            let (total, attempted) =
                matching.fold((0, 0), |(total, attempted), e| {
                    (total + 1, attempted + usize::from(e.attempted))
                });
            if total == 0 {
                return None;
            }
            Some(CategoryStats {
                category: category.name.clone(),
                attempted,
                total,
                win_rate_percent: attempted as f64 / total as f64 * 100.0,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaySummary {
    pub attempted: usize,
    pub total: usize,
}

pub fn today_summary(events: &[AntEvent], today: NaiveDate) -> DaySummary {
    events
        .iter()
        .filter(|e| e.date == today)
        .fold(DaySummary::default(), |acc, e| DaySummary {
            attempted: acc.attempted + usize::from(e.attempted),
            total: acc.total + 1,
        })
}

/// Catalog rules currently switched on.
pub fn active_rules<'a>(state: &AppState, catalog: &'a Catalog) -> Vec<&'a SpfRule> {
    catalog
        .rules
        .iter()
        .filter(|rule| state.is_rule_active(&rule.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewAntEvent;

    fn event(category: &str, date: NaiveDate, attempted: bool) -> AntEvent {
        AntEvent::new(
            NewAntEvent {
                category: category.to_string(),
                intensity: 2,
                attempted,
                ..Default::default()
            },
            "id".to_string(),
            date,
            0,
        )
    }

    #[test]
    fn test_category_breakdown() {
        let catalog = Catalog::builtin();
        let day = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let events = vec![
            event("Anxious ANT", day, true),
            event("Anxious ANT", day, false),
            event("Doubting ANT", day, true),
            event("Retired ANT", day, true),
        ];
        let stats = category_breakdown(&events, &catalog);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].category, "Anxious ANT");
        assert_eq!((stats[0].attempted, stats[0].total), (1, 2));
        assert_eq!(stats[0].win_rate_percent, 50.0);
        assert_eq!(stats[1].category, "Doubting ANT");
    }

    #[test]
    fn test_today_summary() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 2).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let events = vec![
            event("Anxious ANT", today, true),
            event("Anxious ANT", today, false),
            event("Anxious ANT", yesterday, true),
        ];
        assert_eq!(
            today_summary(&events, today),
            DaySummary {
                attempted: 1,
                total: 2
            }
        );
    }

    #[test]
    fn test_active_rules_follow_toggles() {
        let catalog = Catalog::builtin();
        let mut state = AppState::fresh(&catalog);
        let ids: Vec<&str> = active_rules(&state, &catalog)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["min_justify", "owner_date"]);

        state.rule_toggles.insert("min_justify".to_string(), false);
        state.rule_toggles.insert("audience_shrink".to_string(), true);
        let ids: Vec<&str> = active_rules(&state, &catalog)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["owner_date", "audience_shrink"]);
    }
}
