//! Persisted date ranges.

use chrono::{DateTime, Days, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StoreError};

const KEY_PREFIX: &str = "date_ranges/";

/// An inclusive from/to instant pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// The trailing `weeks` full weeks ending now.
    ///
    /// The default window date-range consumers start from when neither the
    /// ambient params nor the store have a range for their key.
    pub fn trailing_weeks(weeks: u64) -> Self {
        let to = Utc::now();
        let from = to.checked_sub_days(Days::new(weeks * 7)).unwrap_or(to);
        Self { from, to }
    }
}

/// Persisted mapping from an arbitrary string key to a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DateRangeStore {
    store: KeyValueStore,
}

impl DateRangeStore {
    /// Create over a shared key-value store.
    pub fn new(store: KeyValueStore) -> Self {
        Self { store }
    }

    fn storage_key(key: &str) -> String {
        format!("{KEY_PREFIX}{key}")
    }

    /// Read the stored range for a key, if any.
    pub fn get(&self, key: &str) -> Option<DateRange> {
        match self.store.get(&Self::storage_key(key)) {
            Ok(range) => range,
            Err(err) => {
                warn!("date range read failed for {key}: {err}");
                None
            }
        }
    }

    /// Store a range for a key.
    pub fn set(&self, key: &str, range: DateRange) -> Result<(), StoreError> {
        self.store.set(&Self::storage_key(key), &range)
    }

    /// Remove the stored range for a key.
    pub fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.store.delete(&Self::storage_key(key))
    }
}
