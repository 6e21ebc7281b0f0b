//! # Tide Clock State
//!
//! [`TideClock`] owns everything that survives between refreshes: the
//! reference high tide, the text it was entered as, and the store it is
//! persisted to. Ticks only read it; commits are the only writers.

use crate::{
    config::Config,
    display::DisplayFrame,
    format::format_entry,
    input::{parse_reference, InputError},
    predictor::predict_with_margin,
    store::ReferenceStore,
    Prediction, DEFAULT_MARGIN_MINUTES,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::fmt;

/// Reference high tide plus its persistence.
pub struct TideClock {
    reference: Option<DateTime<Utc>>,
    entry: String,
    margin: Duration,
    store: Box<dyn ReferenceStore>,
}

impl TideClock {
    /// Create a clock with no reference, without reading the store.
    pub fn new(store: Box<dyn ReferenceStore>) -> Self {
        Self {
            reference: None,
            entry: String::new(),
            margin: Duration::minutes(DEFAULT_MARGIN_MINUTES),
            store,
        }
    }

    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    /// Load the saved reference, committing the configured default when the
    /// store is empty.
    ///
    /// A store that cannot be read is logged and treated as empty.
    pub fn bootstrap<Tz>(store: Box<dyn ReferenceStore>, config: &Config, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut clock = Self::new(store).with_margin(config.margin());

        let stored = clock.store.load().unwrap_or_else(|e| {
            log::warn!("could not load saved reference, starting without one: {}", e);
            None
        });

        match stored.map(|ms| (ms, DateTime::<Utc>::from_timestamp_millis(ms))) {
            Some((_, Some(reference))) => {
                log::info!("loaded reference high tide {}", reference);
                clock.reference = Some(reference);
                clock.entry = format_entry(&reference.with_timezone(tz));
            }
            Some((ms, None)) => {
                log::warn!("saved reference {} ms is out of range, ignoring it", ms);
            }
            None => {
                if let Some(default) = &config.reference.default_reference {
                    log::info!("no saved reference, using default {}", default);
                    if let Err(e) = clock.commit(default, tz) {
                        log::warn!("default reference {:?} rejected: {}", default, e);
                    }
                }
            }
        }

        clock
    }

    /// Validate `text` and make it the new reference.
    ///
    /// On error nothing changes. A failed save is logged; the new reference
    /// still applies for this session.
    pub fn commit<Tz: TimeZone>(&mut self, text: &str, tz: &Tz) -> Result<DateTime<Utc>, InputError> {
        let reference = parse_reference(text, tz)?;

        self.reference = Some(reference);
        self.entry = text.trim().to_string();

        if let Err(e) = self.store.save(reference.timestamp_millis()) {
            log::error!("failed to persist reference high tide: {}", e);
        }

        Ok(reference)
    }

    pub fn reference(&self) -> Option<DateTime<Utc>> {
        self.reference
    }

    /// Reference as it was last entered (or pre-filled from the store).
    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn margin(&self) -> Duration {
        self.margin
    }

    pub fn store(&self) -> &dyn ReferenceStore {
        self.store.as_ref()
    }

    pub fn predict(&self, now: DateTime<Utc>) -> Prediction {
        predict_with_margin(self.reference, now, self.margin)
    }

    /// Predict and format one display refresh.
    pub fn frame<Tz>(&self, now: DateTime<Utc>, tz: &Tz) -> DisplayFrame
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        DisplayFrame::new(&self.predict(now), now, &self.entry, tz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, MemoryStore, StoreError};
    use crate::TideStatus;
    use std::fs;
    use tempfile::tempdir;

    struct FailingStore;

    impl ReferenceStore for FailingStore {
        fn load(&self) -> Result<Option<i64>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("unreadable")))
        }

        fn save(&mut self, _epoch_ms: i64) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("read-only")))
        }
    }

    fn no_default() -> Config {
        let mut config = Config::default();
        config.reference.default_reference = None;
        config
    }

    #[test]
    fn test_commit_updates_and_persists() {
        let mut clock = TideClock::new(Box::new(MemoryStore::default()));
        let reference = clock.commit("2025-08-11T13:15", &Utc).unwrap();

        assert_eq!(clock.reference(), Some(reference));
        assert_eq!(clock.entry(), "2025-08-11T13:15");
        assert_eq!(
            clock.store().load().unwrap(),
            Some(reference.timestamp_millis())
        );
    }

    #[test]
    fn test_rejected_commit_leaves_state() {
        let mut clock = TideClock::new(Box::new(MemoryStore::default()));
        let reference = clock.commit("2025-08-11T13:15", &Utc).unwrap();

        assert_eq!(clock.commit("", &Utc), Err(InputError::Empty));
        assert!(matches!(
            clock.commit("high tide at noon", &Utc),
            Err(InputError::Invalid(_))
        ));

        assert_eq!(clock.reference(), Some(reference));
        assert_eq!(clock.entry(), "2025-08-11T13:15");
        assert_eq!(
            clock.store().load().unwrap(),
            Some(reference.timestamp_millis())
        );
    }

    #[test]
    fn test_failed_save_keeps_reference() {
        let mut clock = TideClock::new(Box::new(FailingStore));
        let reference = clock.commit("2025-08-11T13:15", &Utc).unwrap();
        assert_eq!(clock.reference(), Some(reference));
    }

    #[test]
    fn test_bootstrap_loads_saved_reference() {
        let saved = Utc.with_ymd_and_hms(2025, 9, 1, 6, 30, 0).unwrap();
        let store = MemoryStore::with_value(saved.timestamp_millis());
        let clock = TideClock::bootstrap(Box::new(store), &Config::default(), &Utc);

        assert_eq!(clock.reference(), Some(saved));
        assert_eq!(clock.entry(), "2025-09-01T06:30");
    }

    #[test]
    fn test_bootstrap_commits_default() {
        let clock = TideClock::bootstrap(Box::new(MemoryStore::default()), &Config::default(), &Utc);
        let expected = Utc.with_ymd_and_hms(2025, 8, 11, 13, 15, 0).unwrap();

        assert_eq!(clock.reference(), Some(expected));
        assert_eq!(
            clock.store().load().unwrap(),
            Some(expected.timestamp_millis())
        );
    }

    #[test]
    fn test_bootstrap_without_default() {
        let clock = TideClock::bootstrap(Box::new(MemoryStore::default()), &no_default(), &Utc);
        assert_eq!(clock.reference(), None);
        assert_eq!(clock.predict(Utc::now()), Prediction::NoReference);
    }

    #[test]
    fn test_bootstrap_with_corrupt_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{\"referenceHighTideEpochMs\": \"soon\"}").unwrap();

        let clock = TideClock::bootstrap(Box::new(JsonFileStore::new(&path)), &no_default(), &Utc);
        assert_eq!(clock.reference(), None);

        let clock = TideClock::bootstrap(Box::new(FailingStore), &no_default(), &Utc);
        assert_eq!(clock.reference(), None);
    }

    #[test]
    fn test_margin_from_config() {
        let mut config = no_default();
        config.clock.margin_minutes = 20;
        let mut clock = TideClock::bootstrap(Box::new(MemoryStore::default()), &config, &Utc);
        let reference = clock.commit("2025-08-11T13:15", &Utc).unwrap();

        // 15 minutes before low water is inside a 20 minute margin
        let now = reference + Duration::minutes(372) - Duration::minutes(15);
        assert_eq!(
            clock.predict(now).state().map(|s| s.status),
            Some(TideStatus::LowTide)
        );
    }
}
