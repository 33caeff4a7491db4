use crate::models::AntEvent;

/// How many of the most recent events the mindset level looks at.
pub const MINDSET_WINDOW: usize = 10;
pub const NEUTRAL_MINDSET_LEVEL: u8 = 5;

/// Heuristic 1-10 mindset score over the most recent events.
///
/// The window is the latest `MINDSET_WINDOW` stored events (newest first),
/// of which only the attempted ones are scored.
pub fn compute_mindset_level(events: &[AntEvent]) -> u8 {
    let recent: Vec<&AntEvent> = events
        .iter()
        .take(MINDSET_WINDOW)
        .filter(|e| e.attempted)
        .collect();

    if recent.is_empty() {
        return NEUTRAL_MINDSET_LEVEL;
    }

    let count = recent.len() as f64;
    let avg_intensity = recent.iter().map(|e| f64::from(e.intensity)).sum::<f64>() / count;
    let squash_rate = recent.iter().filter(|e| e.resolved).count() as f64 / count;
    let game_face_rate = recent.iter().filter(|e| e.has_game_face()).count() as f64 / count;

    let mut level: i32 = i32::from(NEUTRAL_MINDSET_LEVEL);
    if squash_rate > 0.7 {
        level += 2;
    } else if squash_rate > 0.4 {
        level += 1;
    }
    if game_face_rate > 0.5 {
        level += 1;
    }
    if avg_intensity < 3.0 {
        level += 1;
    }

    level.clamp(1, 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewAntEvent, TechniquesUsed};
    use chrono::NaiveDate;

    fn event(intensity: u8, attempted: bool, technique: bool, game_face: bool) -> AntEvent {
        let techniques_used = if technique {
            TechniquesUsed::new(vec![], vec!["Breathing".to_string()])
        } else {
            TechniquesUsed::default()
        };
        AntEvent::new(
            NewAntEvent {
                category: "Anxious ANT".to_string(),
                intensity,
                attempted,
                techniques_used,
                game_face_id: game_face.then(|| "gf".to_string()),
                ..Default::default()
            },
            "id".to_string(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            0,
        )
    }

    #[test]
    fn test_no_attempted_events_is_neutral() {
        assert_eq!(compute_mindset_level(&[]), 5);
        let unattempted = vec![event(5, false, true, true); 4];
        assert_eq!(compute_mindset_level(&unattempted), 5);
    }

    #[test]
    fn test_best_case_is_nine() {
        let events = vec![event(1, true, true, true); 10];
        assert_eq!(compute_mindset_level(&events), 9);
    }

    #[test]
    fn test_moderate_squash_rate() {
        // 2 of 4 resolved: rate 0.5, intensity average 4
        let events = vec![
            event(4, true, true, false),
            event(4, true, true, false),
            event(4, true, false, false),
            event(4, true, false, false),
        ];
        assert_eq!(compute_mindset_level(&events), 6);
    }

    #[test]
    fn test_only_latest_ten_considered() {
        // Newest ten are unattempted; older attempted events are outside the window
        let mut events = vec![event(1, false, false, false); 10];
        events.extend(vec![event(1, true, true, true); 5]);
        assert_eq!(compute_mindset_level(&events), 5);
    }

    #[test]
    fn test_level_always_in_bounds() {
        for intensity in 1..=5 {
            for technique in [false, true] {
                for game_face in [false, true] {
                    for attempted in [false, true] {
                        let events = vec![event(intensity, attempted, technique, game_face); 7];
                        let level = compute_mindset_level(&events);
                        assert!((1..=10).contains(&level));
                    }
                }
            }
        }
    }
}
