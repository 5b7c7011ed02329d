//! Latest-value store for sensor readings.
//!
//! Provides thread-safe shared state that is written by the MQTT ingest task
//! and read by HTTP handlers. Each channel holds only the most recently
//! received raw text; there is no history and no ordering correction, so a
//! late duplicate simply overwrites a newer value.

use super::Channel;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Owned copy of the known-channel readings, taken under a single read lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Readings {
    values: HashMap<Channel, String>,
}

impl Readings {
    /// Raw value for a channel, if one has ever been received.
    pub fn get(&self, channel: Channel) -> Option<&str> {
        self.values.get(&channel).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Channel, String)> for Readings {
    fn from_iter<I: IntoIterator<Item = (Channel, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[derive(Default)]
struct Tables {
    known: HashMap<Channel, String>,
    /// Keys that are not a [`Channel`]. Kept, never reported.
    unrecognized: HashMap<String, String>,
}

/// Thread-safe latest-value store.
///
/// # Example
/// ```ignore
/// let store = Arc::new(SensorStore::new());
///
/// // From the MQTT ingest task
/// store.update(Channel::Distance, "42.5");
///
/// // From an HTTP handler
/// let readings = store.readings();
/// ```
#[derive(Default)]
pub struct SensorStore {
    tables: RwLock<Tables>,
    version: AtomicU64,
}

impl SensorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the value for `channel`. Always succeeds.
    pub fn update(&self, channel: Channel, raw: impl Into<String>) {
        self.tables.write().known.insert(channel, raw.into());
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    /// Store a value by topic key. Unknown keys are kept aside and are never
    /// part of [`Readings`].
    pub fn update_key(&self, key: &str, raw: impl Into<String>) {
        match Channel::from_key(key) {
            Some(channel) => self.update(channel, raw),
            None => {
                self.tables
                    .write()
                    .unrecognized
                    .insert(key.to_string(), raw.into());
                self.version.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    pub fn get(&self, channel: Channel) -> Option<String> {
        self.tables.read().known.get(&channel).cloned()
    }

    /// Look up any stored key, recognized or not.
    pub fn get_key(&self, key: &str) -> Option<String> {
        let tables = self.tables.read();
        match Channel::from_key(key) {
            Some(channel) => tables.known.get(&channel).cloned(),
            None => tables.unrecognized.get(key).cloned(),
        }
    }

    /// Copy of every known channel's latest value.
    pub fn readings(&self) -> Readings {
        Readings {
            values: self.tables.read().known.clone(),
        }
    }

    /// Number of writes applied since creation.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_initially_empty() {
        let store = SensorStore::new();
        assert!(store.readings().is_empty());
        assert_eq!(store.version(), 0);
        for channel in Channel::all() {
            assert_eq!(store.get(channel), None);
        }
    }

    #[test]
    fn test_last_write_wins() {
        let store = SensorStore::new();
        store.update(Channel::Temperature, "21.5");
        store.update(Channel::Temperature, "22.0");
        // Duplicate delivery is just another write
        store.update(Channel::Temperature, "22.0");

        assert_eq!(store.get(Channel::Temperature).as_deref(), Some("22.0"));
        assert_eq!(store.readings().len(), 1);
        assert_eq!(store.version(), 3);
    }

    #[test]
    fn test_no_value_validation() {
        let store = SensorStore::new();
        store.update(Channel::Distance, "not a number");
        store.update(Channel::Window, "");

        let readings = store.readings();
        assert_eq!(readings.get(Channel::Distance), Some("not a number"));
        assert_eq!(readings.get(Channel::Window), Some(""));
    }

    #[test]
    fn test_update_key_routes_known_channels() {
        let store = SensorStore::new();
        store.update_key("window_motor_state", "opening");

        assert_eq!(
            store.get(Channel::WindowMotorState).as_deref(),
            Some("opening")
        );
        assert_eq!(store.get_key("window_motor_state").as_deref(), Some("opening"));
    }

    #[test]
    fn test_unknown_keys_stored_but_not_reported() {
        let store = SensorStore::new();
        store.update_key("pressure", "1013");

        assert_eq!(store.get_key("pressure").as_deref(), Some("1013"));
        assert!(store.readings().is_empty());
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_readings_are_a_copy() {
        let store = SensorStore::new();
        store.update(Channel::Humidity, "40");
        let before = store.readings();
        store.update(Channel::Humidity, "55");

        assert_eq!(before.get(Channel::Humidity), Some("40"));
        assert_eq!(store.readings().get(Channel::Humidity), Some("55"));
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let store = Arc::new(SensorStore::new());
        let channels: Vec<Channel> = Channel::all().collect();
        let rounds = 500;

        let writers: Vec<_> = channels
            .iter()
            .copied()
            .map(|channel| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..rounds {
                        store.update(channel, format!("{}-{}", channel.key(), i));
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..rounds {
                        let readings = store.readings();
                        for channel in Channel::all() {
                            if let Some(value) = readings.get(channel) {
                                // Never a torn value from another channel
                                let (prefix, index) = value.rsplit_once('-').unwrap();
                                assert_eq!(prefix, channel.key());
                                assert!(index.parse::<usize>().unwrap() < rounds);
                            }
                        }
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().unwrap();
        }

        let readings = store.readings();
        for channel in channels {
            let expected = format!("{}-{}", channel.key(), rounds - 1);
            assert_eq!(readings.get(channel), Some(expected.as_str()));
        }
        assert_eq!(store.version(), (9 * rounds) as u64);
    }
}
