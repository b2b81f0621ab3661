//! Decides, on every poll, whether a freshly scraped bulletin is materially
//! new and still fresh enough to broadcast.

use chrono::{DateTime, Duration, Utc};
use crate::domain::Announcement;

/// Outcome of feeding one scraped candidate into the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Candidate is not new; stored state stays as it was.
    Unchanged,
    /// Accepted, but there was no valid prior alert: store without
    /// broadcasting so a cold start never replays an old bulletin.
    StoredSilently(Announcement),
    /// Accepted on top of a valid prior alert: store and fan out.
    Broadcast(Announcement),
}

#[derive(Clone, Copy)]
pub struct AlertStateMachine {
    freshness_window: Duration,
}

impl AlertStateMachine {
    pub fn new(freshness_window: Duration) -> Self {
        Self { freshness_window }
    }

    pub fn advance(
        &self,
        last: Option<&Announcement>,
        candidate: Announcement,
        now: DateTime<Utc>,
    ) -> Transition {
        if !has_prior_alert(last) {
            return Transition::StoredSilently(candidate)
        }
        let last = last.expect("prior alert must be present here");
        if self.is_new_event(last, &candidate, now) {
            Transition::Broadcast(candidate)
        } else {
            Transition::Unchanged
        }
    }

    /// A candidate is new when it differs from the last alert in display
    /// time, content AND instant, and is younger than the freshness window.
    /// The window guards against broadcasting a stale bulletin recovered
    /// from a delayed source.
    pub fn is_new_event(&self, last: &Announcement, event: &Announcement, now: DateTime<Utc>) -> bool {
        if event.display_time == last.display_time {
            return false
        }
        if event.content == last.content {
            return false
        }
        if event.timestamp <= last.timestamp {
            return false
        }
        now - event.timestamp < self.freshness_window
    }
}

/// True iff the stored alert exists and all three fields are populated.
/// Legacy persisted records may carry a timestamp alone; those do not count
/// as prior state.
pub fn has_prior_alert(last: Option<&Announcement>) -> bool {
    last.map(Announcement::is_populated).unwrap_or(false)
}

#[cfg(test)]
mod test {
    use chrono::{Duration, TimeZone, Utc};
    use crate::domain::Announcement;
    use super::{has_prior_alert, AlertStateMachine, Transition};

    fn machine() -> AlertStateMachine {
        AlertStateMachine::new(Duration::minutes(180))
    }

    fn bulletin(display_time: &str, content: &str) -> Announcement {
        Announcement::new(display_time.to_string(), content.to_string(), 7)
            .expect("test display time must parse")
    }

    #[test]
    fn is_new_event_is_irreflexive() {
        let event = bulletin("08:00 01/03/2020", "A");
        let now = event.timestamp + Duration::minutes(5);
        assert!(!machine().is_new_event(&event, &event, now));
    }

    #[test]
    fn same_display_time_rejects_even_with_new_content() {
        let last = bulletin("08:00 01/03/2020", "A");
        let mut event = bulletin("08:00 01/03/2020", "B");
        event.timestamp = last.timestamp + Duration::minutes(1);
        let now = last.timestamp + Duration::minutes(2);
        assert!(!machine().is_new_event(&last, &event, now));
    }

    #[test]
    fn same_content_rejects() {
        let last = bulletin("08:00 01/03/2020", "A");
        let event = bulletin("09:00 01/03/2020", "A");
        let now = event.timestamp + Duration::minutes(5);
        assert!(!machine().is_new_event(&last, &event, now));
    }

    #[test]
    fn non_increasing_timestamp_rejects() {
        let last = bulletin("09:00 01/03/2020", "A");
        let event = bulletin("08:00 01/03/2020", "B");
        let now = last.timestamp + Duration::minutes(5);
        assert!(!machine().is_new_event(&last, &event, now));
    }

    #[test]
    fn stale_event_rejects_regardless_of_other_fields() {
        let last = bulletin("08:00 01/03/2020", "A");
        let event = bulletin("09:00 01/03/2020", "B");
        let now = event.timestamp + Duration::minutes(180);
        assert!(!machine().is_new_event(&last, &event, now));
    }

    #[test]
    fn fresh_differing_event_accepts() {
        let last = bulletin("08:00 01/03/2020", "A");
        let event = bulletin("09:00 01/03/2020", "B");
        let now = event.timestamp + Duration::minutes(179);
        assert!(machine().is_new_event(&last, &event, now));
    }

    #[test]
    fn prior_alert_requires_all_fields() {
        assert!(!has_prior_alert(None));

        let full = bulletin("08:00 01/03/2020", "A");
        assert!(has_prior_alert(Some(&full)));

        let mut legacy = full.clone();
        legacy.content = String::new();
        assert!(!has_prior_alert(Some(&legacy)));
    }

    #[test]
    fn cold_start_stores_silently() {
        let event = bulletin("08:00 01/03/2020", "A");
        let now = event.timestamp + Duration::minutes(5);
        let transition = machine().advance(None, event.clone(), now);
        assert_eq!(transition, Transition::StoredSilently(event));
    }

    #[test]
    fn new_event_after_prior_alert_broadcasts() {
        let last = bulletin("08:00 01/03/2020", "A");
        let event = bulletin("09:00 01/03/2020", "B");
        let now = event.timestamp + Duration::minutes(5);
        let transition = machine().advance(Some(&last), event.clone(), now);
        assert_eq!(transition, Transition::Broadcast(event));
    }

    #[test]
    fn duplicate_after_prior_alert_is_unchanged() {
        let last = bulletin("08:00 01/03/2020", "A");
        let now = last.timestamp + Duration::minutes(5);
        let transition = machine().advance(Some(&last), last.clone(), now);
        assert_eq!(transition, Transition::Unchanged);
    }
}
