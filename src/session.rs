//! In-memory history of harvested records for the running session.
//!
//! The store is an owned value: construct one per session and hand a
//! reference to whatever needs it. Nothing is written to disk.

use crate::features::capture::ExifData;
use crate::features::risk::RiskLevel;
use crate::structs::Metadata;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestEntry {
    pub id: u64,
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// Aggregate counts over the current history, recomputed on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatistics {
    pub total_images: usize,
    pub images_with_location: usize,
    pub images_with_exif: usize,
    pub unique_devices: usize,
    pub critical_risks: usize,
    pub high_risks: usize,
}

#[derive(Debug, Default)]
struct SessionState {
    entries: Vec<HarvestEntry>,
    last_id: u64,
    current_image: Option<String>,
    current_metadata: Option<Metadata>,
    processed_image: Option<String>,
}

impl SessionState {
    fn push(&mut self, metadata: Metadata) -> u64 {
        self.last_id += 1;
        self.entries.push(HarvestEntry {
            id: self.last_id,
            metadata,
        });
        self.last_id
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    state: Mutex<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and returns its id. Ids start at 1, only grow, and
    /// are not reused after [`Self::clear`].
    pub fn append(&self, metadata: Metadata) -> u64 {
        self.state.lock().push(metadata)
    }

    /// Appends a record and makes it the current metadata in one step.
    pub fn record(&self, metadata: Metadata) -> u64 {
        let mut state = self.state.lock();
        state.current_metadata = Some(metadata.clone());
        state.push(metadata)
    }

    /// Selects a new image; any earlier processed result no longer applies.
    pub fn set_current_image(&self, uri: impl Into<String>) {
        let mut state = self.state.lock();
        state.current_image = Some(uri.into());
        state.processed_image = None;
    }

    pub fn set_processed_image(&self, uri: impl Into<String>) {
        self.state.lock().processed_image = Some(uri.into());
    }

    pub fn current_image(&self) -> Option<String> {
        self.state.lock().current_image.clone()
    }

    pub fn current_metadata(&self) -> Option<Metadata> {
        self.state.lock().current_metadata.clone()
    }

    pub fn processed_image(&self) -> Option<String> {
        self.state.lock().processed_image.clone()
    }

    /// All entries in arrival order.
    pub fn entries(&self) -> Vec<HarvestEntry> {
        self.state.lock().entries.clone()
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<HarvestEntry> {
        self.state
            .lock()
            .entries
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Drops the history together with the current image, metadata and
    /// processed image.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.current_image = None;
        state.current_metadata = None;
        state.processed_image = None;
        log::info!("Session history cleared");
    }

    pub fn statistics(&self) -> SessionStatistics {
        let state = self.state.lock();
        let records = || state.entries.iter().map(|e| &e.metadata);
        let count_level = |level: RiskLevel| {
            records()
                .flat_map(|m| &m.risk_assessment)
                .filter(|r| r.level == level)
                .count()
        };

        // A device counts only when both make and model are known.
        let unique_devices = records()
            .filter_map(Metadata::exif)
            .filter_map(|exif| {
                let make = ExifData::known(&exif.make)?;
                let model = ExifData::known(&exif.model)?;
                Some(format!("{make} {model}"))
            })
            .collect::<HashSet<_>>()
            .len();

        SessionStatistics {
            total_images: state.entries.len(),
            images_with_location: records().filter(|m| m.location_data.is_some()).count(),
            images_with_exif: records().filter(|m| m.exif().is_some()).count(),
            unique_devices,
            critical_risks: count_level(RiskLevel::Critical),
            high_risks: count_level(RiskLevel::High),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::capture::{ImageSelection, normalize_extracted};
    use crate::features::location::LocationData;
    use crate::features::risk::assess_risks;
    use chrono::{DateTime, Utc};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::thread;

    fn record(exif: Option<Value>, located: bool) -> Metadata {
        let mut metadata = Metadata::empty(DateTime::<Utc>::UNIX_EPOCH);
        let selection = ImageSelection {
            exif: exif.map(|v| match v {
                Value::Object(map) => map,
                _ => panic!("fixture must be an object"),
            }),
            ..Default::default()
        };
        metadata.extracted_data = Some(normalize_extracted(&selection));
        if located {
            metadata.location_data = Some(LocationData {
                latitude: 1.0,
                longitude: 2.0,
                altitude: None,
                accuracy: None,
                timestamp: DateTime::<Utc>::UNIX_EPOCH,
                address: Some(Default::default()),
            });
        }
        metadata.risk_assessment = assess_risks(&metadata);
        metadata
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let store = SessionStore::new();
        let a = store.append(record(None, false));
        let b = store.append(record(None, false));
        let c = store.append(record(None, false));

        assert!(a < b && b < c);
        assert_eq!(store.statistics().total_images, 3);
        let ids: Vec<u64> = store.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn test_clear_resets_history_and_current_pointers() {
        let store = SessionStore::new();
        store.set_current_image("file:///a.jpg");
        store.record(record(None, true));
        store.set_processed_image("file:///a.jpg");
        store.append(record(None, false));

        store.clear();

        assert_eq!(store.statistics().total_images, 0);
        assert!(store.is_empty());
        assert!(store.current_metadata().is_none());
        assert!(store.current_image().is_none());
        assert!(store.processed_image().is_none());

        let next = store.append(record(None, false));
        assert_eq!(next, 3, "Ids keep counting after a clear");
    }

    #[test]
    fn test_record_sets_current_metadata() {
        let store = SessionStore::new();
        let metadata = record(Some(json!({"Make": "Sony"})), false);
        store.record(metadata.clone());

        assert_eq!(store.current_metadata(), Some(metadata));
        assert_eq!(store.entries().len(), 1);
    }

    #[test]
    fn test_new_image_resets_processed_image() {
        let store = SessionStore::new();
        store.set_current_image("file:///a.jpg");
        store.set_processed_image("file:///a.jpg");
        store.set_current_image("file:///b.jpg");

        assert_eq!(store.current_image().as_deref(), Some("file:///b.jpg"));
        assert!(store.processed_image().is_none());
    }

    #[test]
    fn test_recent_is_newest_first() {
        let store = SessionStore::new();
        for _ in 0..7 {
            store.append(record(None, false));
        }
        let ids: Vec<u64> = store.recent(5).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_statistics() {
        let store = SessionStore::new();
        store.append(record(
            Some(json!({"Make": "Apple", "Model": "iPhone 15", "GPSLatitude": 1.0})),
            true,
        ));
        store.append(record(Some(json!({"Make": "Apple", "Model": "iPhone 15"})), false));
        store.append(record(Some(json!({"Make": "Google", "Model": "Pixel 8"})), false));
        // Make without model must not count as a device.
        store.append(record(Some(json!({"Make": "Canon"})), false));
        store.append(record(Some(json!({})), false));
        store.append(record(None, true));

        let stats = store.statistics();

        assert_eq!(
            stats,
            SessionStatistics {
                total_images: 6,
                images_with_location: 2,
                images_with_exif: 5,
                unique_devices: 2,
                critical_risks: 2,
                // Two location findings plus one photo location.
                high_risks: 3,
            }
        );
    }

    #[test]
    fn test_concurrent_appends_get_distinct_ids() {
        let store = Arc::new(SessionStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..25)
                        .map(|_| store.append(record(None, false)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 200);
        assert_eq!(store.statistics().total_images, 200);
    }
}
