//! Per-file best records and the monotonic-improvement merge rule.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::stats::StatsSnapshot;

/// Best completed attempt for one file. Serialized shape is fixed:
/// integer WPMs, accuracy to 1 decimal, elapsed time to 2 decimals.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BestRecord {
    pub net: u32,
    pub gross: u32,
    pub acc: f64,
    pub time: f64,
}

impl BestRecord {
    /// Build a record from a finished run, applying the stored format's
    /// rounding up front so comparisons happen on what would be persisted.
    pub fn from_run(stats: &StatsSnapshot, elapsed_secs: f64) -> Self {
        Self {
            net: stats.net_wpm.max(0.0).round() as u32,
            gross: stats.gross_wpm.max(0.0).round() as u32,
            acc: (stats.accuracy.clamp(0.0, 100.0) * 10.0).round() / 10.0,
            time: (elapsed_secs * 100.0).round() / 100.0,
        }
    }

    /// Strict lexicographic preference: net speed, then accuracy, then
    /// lower elapsed time. Equal on all three is not an improvement.
    pub fn dominates(&self, prev: &BestRecord) -> bool {
        self.net > prev.net
            || (self.net == prev.net && self.acc > prev.acc)
            || (self.net == prev.net && self.acc == prev.acc && self.time < prev.time)
    }
}

/// Key-value persistence capability for best records, injected so the
/// file-backed store can be swapped for an in-memory one in tests.
pub trait RecordStore {
    fn get(&self, key: &str) -> Option<BestRecord>;
    fn set(&mut self, key: &str, record: BestRecord);

    /// Merge a finished run into the store: the record is replaced only if
    /// the new result dominates, or no (parseable) previous record exists.
    /// Returns the record now held and whether it changed.
    fn merge(&mut self, key: &str, current: BestRecord) -> (BestRecord, bool) {
        match self.get(key) {
            Some(prev) if !current.dominates(&prev) => (prev, false),
            _ => {
                self.set(key, current);
                (current, true)
            }
        }
    }
}

pub struct MemoryRecordStore {
    records: HashMap<String, BestRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, key: &str) -> Option<BestRecord> {
        self.records.get(key).copied()
    }

    fn set(&mut self, key: &str, record: BestRecord) {
        self.records.insert(key.to_string(), record);
    }
}

/// One JSON file per identifier under the user data dir. A record that no
/// longer parses is treated as absent and overwritten on the next finish.
pub struct JsonRecordStore {
    base_dir: PathBuf,
}

impl JsonRecordStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("labtype")
            .join("best");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn record_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_dir.join(format!("{name}.json"))
    }

    fn save(&self, key: &str, record: &BestRecord) -> Result<()> {
        let path = self.record_path(key);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(record)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl RecordStore for JsonRecordStore {
    fn get(&self, key: &str) -> Option<BestRecord> {
        let content = fs::read_to_string(self.record_path(key)).ok()?;
        serde_json::from_str(&content).ok()
    }

    fn set(&mut self, key: &str, record: BestRecord) {
        // Persistence failure degrades to an in-session record only.
        let _ = self.save(key, &record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(net: u32, acc: f64, time: f64) -> BestRecord {
        BestRecord {
            net,
            gross: net + 5,
            acc,
            time,
        }
    }

    #[test]
    fn higher_net_wins() {
        let prev = record(50, 95.0, 60.0);
        let current = record(55, 90.0, 70.0);
        assert!(current.dominates(&prev));
        assert!(!prev.dominates(&current));
    }

    #[test]
    fn equal_net_falls_back_to_accuracy() {
        let prev = record(50, 95.0, 60.0);
        assert!(record(50, 96.0, 65.0).dominates(&prev));
        assert!(!record(50, 94.0, 10.0).dominates(&prev));
    }

    #[test]
    fn equal_net_and_accuracy_prefers_lower_time() {
        let prev = record(50, 95.0, 60.0);
        assert!(record(50, 95.0, 55.0).dominates(&prev));
        assert!(!record(50, 95.0, 60.0).dominates(&prev));
        assert!(!record(50, 95.0, 61.0).dominates(&prev));
    }

    #[test]
    fn from_run_rounds_to_the_stored_precision() {
        let stats = StatsSnapshot {
            net_wpm: 61.49,
            gross_wpm: 72.5,
            accuracy: 96.55,
            ..Default::default()
        };
        let rec = BestRecord::from_run(&stats, 59.987);
        assert_eq!(rec.net, 61);
        assert_eq!(rec.gross, 73);
        assert_eq!(rec.acc, 96.6);
        assert_eq!(rec.time, 59.99);
    }

    #[test]
    fn merge_keeps_the_better_record() {
        let mut store = MemoryRecordStore::new();
        let (held, changed) = store.merge("a.cpp", record(50, 95.0, 60.0));
        assert!(changed);
        assert_eq!(held.net, 50);

        let (held, changed) = store.merge("a.cpp", record(45, 99.0, 30.0));
        assert!(!changed);
        assert_eq!(held.net, 50);
        assert_eq!(store.get("a.cpp").unwrap().net, 50);

        let (held, changed) = store.merge("a.cpp", record(55, 90.0, 70.0));
        assert!(changed);
        assert_eq!(held.net, 55);
    }

    #[test]
    fn records_are_independent_per_identifier() {
        let mut store = MemoryRecordStore::new();
        store.merge("a.cpp", record(50, 95.0, 60.0));
        store.merge("b.cpp", record(20, 80.0, 60.0));
        assert_eq!(store.get("a.cpp").unwrap().net, 50);
        assert_eq!(store.get("b.cpp").unwrap().net, 20);
    }

    #[test]
    fn json_store_round_trips_across_instances() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = JsonRecordStore::with_base_dir(dir.path().to_path_buf()).unwrap();
            store.set("lab02/main.cpp", record(62, 97.3, 120.55));
        }
        let store = JsonRecordStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let held = store.get("lab02/main.cpp").unwrap();
        assert_eq!(held.net, 62);
        assert_eq!(held.acc, 97.3);
        assert_eq!(held.time, 120.55);
    }

    #[test]
    fn corrupt_record_is_treated_as_absent_and_overwritten() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonRecordStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(store.record_path("a.cpp"), "{not json").unwrap();

        assert!(store.get("a.cpp").is_none());

        let (held, changed) = store.merge("a.cpp", record(30, 90.0, 45.0));
        assert!(changed);
        assert_eq!(held.net, 30);
        assert_eq!(store.get("a.cpp").unwrap().net, 30);
    }
}
