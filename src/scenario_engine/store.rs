//! Persistence port for scenario snapshots.
//!
//! The engine only hands over and takes back [`ScenarioSnapshot`] copies;
//! where they live is up to the adapter.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::scenario_engine::{error::StoreError, scenario::ScenarioSnapshot};

pub trait ScenarioStore {
    /// Save a snapshot, replacing any earlier one with the same id.
    fn save(&self, snapshot: &ScenarioSnapshot) -> Result<(), StoreError>;

    /// Load the snapshot stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if nothing is stored under `id`.
    fn load(&self, id: &str) -> Result<ScenarioSnapshot, StoreError>;

    fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Ids of every stored scenario, sorted.
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory adapter
// ---------------------------------------------------------------------------

/// Keeps serialized snapshots in a shared map. Clones share storage.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    storage: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // a poisoned map still holds complete entries
        self.storage.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ScenarioStore for InMemoryStore {
    fn save(&self, snapshot: &ScenarioSnapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string(snapshot)?;
        self.lock().insert(snapshot.id.clone(), json);
        Ok(())
    }

    fn load(&self, id: &str) -> Result<ScenarioSnapshot, StoreError> {
        let storage = self.lock();
        let json = storage.get(id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(serde_json::from_str(json)?)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut ids: Vec<String> = self.lock().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

// ---------------------------------------------------------------------------
// JSON file adapter
// ---------------------------------------------------------------------------

/// One pretty-printed `<id>.json` file per scenario in `dir`.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn io(operation: String) -> impl FnOnce(std::io::Error) -> StoreError {
        move |source| StoreError::Io { operation, source }
    }
}

impl ScenarioStore for JsonFileStore {
    fn save(&self, snapshot: &ScenarioSnapshot) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)
            .map_err(Self::io(format!("create {}", self.dir.display())))?;
        let path = self.path_for(&snapshot.id);
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json).map_err(Self::io(format!("write {}", path.display())))?;
        log::debug!("saved scenario {} to {}", snapshot.id, path.display());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<ScenarioSnapshot, StoreError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let json = fs::read_to_string(&path)
            .map_err(Self::io(format!("read {}", path.display())))?;
        Ok(serde_json::from_str(&json)?)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        fs::remove_file(&path).map_err(Self::io(format!("remove {}", path.display())))
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.dir)
            .map_err(Self::io(format!("list {}", self.dir.display())))?;
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.map_err(Self::io(format!("list {}", self.dir.display())))?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario_engine::{
        models::{Action, NodeId, Position, RangeRef, Round},
        scenario::{Scenario, ScenarioRequest},
        sizing::SizingTable,
    };

    fn saved_scenario(seed: u64) -> Scenario {
        let mut s = Scenario::new(ScenarioRequest::new("CO vs BTN 3-bet").with_seed(seed));
        let utg = NodeId::new(&Round::Initial, Position::UTG);
        let hj = NodeId::new(&Round::Initial, Position::HJ);
        let co = NodeId::new(&Round::Initial, Position::CO);
        s.apply_action(&utg, Action::Fold, None).unwrap();
        s.apply_action(&hj, Action::Fold, None).unwrap();
        s.apply_action(&co, Action::Open, None).unwrap();
        s.link_range(&co, RangeRef("co-open".into())).unwrap();
        s
    }

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("preflop_scenario_{}_{}", name, std::process::id()))
    }

    #[test]
    fn in_memory_store_round_trips_and_shares_storage() {
        let store = InMemoryStore::new();
        let shared = store.clone();
        let s = saved_scenario(41);

        store.save(&s.snapshot()).unwrap();
        assert_eq!(shared.count(), 1);
        assert_eq!(shared.list().unwrap(), [s.id().to_string()]);

        let restored = Scenario::restore(shared.load(s.id()).unwrap(), SizingTable::default()).unwrap();
        assert_eq!(restored, s);

        store.delete(s.id()).unwrap();
        assert!(matches!(shared.load(s.id()), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn json_file_store_writes_one_file_per_scenario() {
        let dir = temp_dir("files");
        let _ = fs::remove_dir_all(&dir);
        let store = JsonFileStore::new(&dir);
        assert!(store.list().unwrap().is_empty());

        let a = saved_scenario(42);
        let b = saved_scenario(43);
        store.save(&a.snapshot()).unwrap();
        store.save(&b.snapshot()).unwrap();

        let mut expected = vec![a.id().to_string(), b.id().to_string()];
        expected.sort();
        assert_eq!(store.list().unwrap(), expected);
        assert_eq!(store.load(a.id()).unwrap(), a.snapshot());

        store.delete(a.id()).unwrap();
        assert!(matches!(store.delete(a.id()), Err(StoreError::NotFound(_))));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("SC-BROKEN.json"), "{ not json").unwrap();
        let store = JsonFileStore::new(&dir);
        assert!(matches!(store.load("SC-BROKEN"), Err(StoreError::Serialization(_))));
        let _ = fs::remove_dir_all(&dir);
    }
}
