pub mod rank;
pub mod reconcile;

use std::sync::{Arc, RwLock};
use chrono::{DateTime, Utc};
use crate::domain::{AuthoritativeFigure, CountryRow, GlobalStats};

const SNAPSHOT_LOCK_POISONED_MSG: &str = "snapshot lock was poisoned";

/// One poll cycle's worth of reconciled data. Rebuilt wholesale every
/// cycle; only the prior day's table is kept alongside for delta display.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub rows: Vec<CountryRow>,
    pub yesterday: Option<Vec<CountryRow>>,
    pub global: Option<GlobalStats>,
    pub authoritative: Option<AuthoritativeFigure>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn home_row(&self, home_country: &str) -> Option<&CountryRow> {
        self.rows.iter().find(|row| row.country.eq_ignore_ascii_case(home_country))
    }
}

/// Shared handle to the latest snapshot. Replacement is wholesale: readers
/// hold an `Arc` to whichever snapshot was current when they asked, never a
/// partially updated one.
#[derive(Clone, Default)]
pub struct SnapshotStore {
    current: Arc<RwLock<Arc<Snapshot>>>,
}

impl SnapshotStore {
    pub fn get(&self) -> Arc<Snapshot> {
        self.current.read().expect(SNAPSHOT_LOCK_POISONED_MSG).clone()
    }

    pub fn replace(&self, snapshot: Snapshot) {
        *self.current.write().expect(SNAPSHOT_LOCK_POISONED_MSG) = Arc::new(snapshot);
    }
}

#[cfg(test)]
mod test {
    use crate::domain::CountryRow;
    use super::{Snapshot, SnapshotStore};

    #[test]
    fn replacement_is_wholesale() {
        let store = SnapshotStore::default();
        let before = store.get();
        assert!(!before.has_data());

        store.replace(Snapshot {
            rows: vec![CountryRow { country: "Vietnam".to_string(), ..Default::default() }],
            ..Default::default()
        });

        let after = store.get();
        assert!(after.has_data());
        // the handle taken earlier still sees the old snapshot in full
        assert!(!before.has_data());
    }

    #[test]
    fn home_row_lookup_ignores_case() {
        let snapshot = Snapshot {
            rows: vec![CountryRow { country: "Vietnam".to_string(), cases: 1, ..Default::default() }],
            ..Default::default()
        };
        assert!(snapshot.home_row("vietnam").is_some());
        assert!(snapshot.home_row("Laos").is_none());
    }
}
