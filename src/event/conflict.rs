//! Scheduling conflict detection.

use super::types::Event;

/// All existing events whose time range overlaps the candidate's,
/// in original collection order.
///
/// Overlap is open-interval (`candidate.start < existing.end &&
/// candidate.end > existing.start`), so an event ending exactly when
/// another starts is not a conflict. Records without an end compare as
/// zero-length; storage is never mutated.
pub fn find_conflicts(candidate: &Event, existing: &[Event]) -> Vec<Event> {
    existing
        .iter()
        .filter(|event| candidate.overlaps_with(event))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 11, hour, minute, 0).unwrap()
    }

    fn event(title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
        Event::new(title, start).with_end(end)
    }

    #[test]
    fn test_overlapping_event_is_reported() {
        let existing = vec![event("Standup", at(14, 0), at(15, 0))];
        let candidate = event("Sync", at(14, 30), at(15, 30));

        let conflicts = find_conflicts(&candidate, &existing);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].title, "Standup");
    }

    #[test]
    fn test_conflict_is_symmetric() {
        let a = event("A", at(14, 0), at(15, 0));
        let b = event("B", at(14, 30), at(15, 30));

        assert_eq!(find_conflicts(&a, std::slice::from_ref(&b)).len(), 1);
        assert_eq!(find_conflicts(&b, std::slice::from_ref(&a)).len(), 1);
    }

    #[test]
    fn test_shared_boundary_is_not_a_conflict() {
        let existing = vec![event("First", at(14, 0), at(15, 0))];
        let candidate = event("Second", at(13, 0), at(14, 0));

        assert!(find_conflicts(&candidate, &existing).is_empty());
    }

    #[test]
    fn test_all_matches_in_collection_order() {
        let existing = vec![
            event("One", at(14, 0), at(15, 0)),
            event("Free", at(18, 0), at(19, 0)),
            event("Two", at(14, 15), at(14, 45)),
        ];
        let candidate = event("Busy", at(14, 0), at(16, 0));

        let conflicts = find_conflicts(&candidate, &existing);
        let titles: Vec<_> = conflicts.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["One", "Two"]);
    }

    #[test]
    fn test_missing_end_treated_as_start() {
        let open_ended = Event::new("Legacy", at(14, 30));
        let candidate = event("New", at(14, 0), at(15, 0));

        // The zero-length record sits strictly inside the candidate.
        let conflicts = find_conflicts(&candidate, std::slice::from_ref(&open_ended));
        assert_eq!(conflicts.len(), 1);
    }
}
