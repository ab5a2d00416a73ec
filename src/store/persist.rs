//! Whole-collection JSON snapshots.
//!
//! Each collection persists as one pretty-printed JSON array in its own
//! file under the data root, named by its storage key
//! (`pmo-projects.json`, `pmo-tasks.json`, ...). A mutation re-serializes
//! the touched collection(s) in full; there is no transactionality or
//! partial-write protection beyond what the filesystem provides. Dates are
//! ISO-8601 strings on disk and are revived to `DateTime<Utc>` by serde on
//! load.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::StoreError;
use crate::seed::seed_store;
use crate::store::{Applied, Collection, Command, PmoStore};

/// Default data root: `~/.pmodesk`.
pub fn default_data_dir() -> Result<PathBuf, StoreError> {
    dirs::home_dir()
        .map(|home| home.join(".pmodesk"))
        .ok_or(StoreError::NoDataDir)
}

fn snapshot_path(root: &Path, collection: Collection) -> PathBuf {
    root.join(format!("{}.json", collection.storage_key()))
}

/// Serialize one collection to its snapshot file, creating the data root
/// on first write.
pub fn save_collection(
    root: &Path,
    store: &PmoStore,
    collection: Collection,
) -> Result<(), StoreError> {
    fs::create_dir_all(root)?;
    let json = match collection {
        Collection::Initiatives => serde_json::to_string_pretty(store.initiatives())?,
        Collection::Tasks => serde_json::to_string_pretty(store.tasks())?,
        Collection::Goals => serde_json::to_string_pretty(store.goals())?,
        Collection::Meetings => serde_json::to_string_pretty(store.meetings())?,
    };
    fs::write(snapshot_path(root, collection), json)?;
    Ok(())
}

/// Serialize all four collections.
pub fn save_all(root: &Path, store: &PmoStore) -> Result<(), StoreError> {
    for collection in Collection::ALL {
        save_collection(root, store, collection)?;
    }
    Ok(())
}

fn load_collection<T: serde::de::DeserializeOwned>(
    root: &Path,
    collection: Collection,
) -> Result<Vec<T>, StoreError> {
    let path = snapshot_path(root, collection);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load a store from the snapshots under `root`. Missing files read as
/// empty collections; a malformed file is an error, not a silent reset.
pub fn load_store(root: &Path) -> Result<PmoStore, StoreError> {
    Ok(PmoStore::from_collections(
        load_collection(root, Collection::Initiatives)?,
        load_collection(root, Collection::Tasks)?,
        load_collection(root, Collection::Goals)?,
        load_collection(root, Collection::Meetings)?,
    ))
}

/// True when no snapshot file exists yet (first run).
pub fn has_snapshots(root: &Path) -> bool {
    Collection::ALL
        .iter()
        .any(|c| snapshot_path(root, *c).exists())
}

/// A store coupled to its data root. Commands applied here re-serialize
/// each touched collection before returning, so the snapshots always
/// reflect the last applied command.
///
/// Single-writer by construction: the store sits behind a non-poisoning
/// mutex and every write happens under it.
pub struct Workspace {
    root: PathBuf,
    store: Mutex<PmoStore>,
}

impl Workspace {
    /// Open the workspace at `root`, loading whatever snapshots exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let store = load_store(&root)?;
        Ok(Workspace {
            root,
            store: Mutex::new(store),
        })
    }

    /// Open the workspace at `root`; on first run (no snapshot files),
    /// seed the demo portfolio and persist it.
    pub fn open_or_seed(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if has_snapshots(&root) {
            return Self::open(root);
        }
        log::info!("No snapshots under {}, seeding demo data", root.display());
        let store = seed_store();
        save_all(&root, &store)?;
        Ok(Workspace {
            root,
            store: Mutex::new(store),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run a read-only closure against the store.
    pub fn read<R>(&self, f: impl FnOnce(&PmoStore) -> R) -> R {
        f(&self.store.lock())
    }

    /// Apply a command and persist the touched collections.
    pub fn apply(&self, command: Command) -> Result<Applied, StoreError> {
        let mut store = self.store.lock();
        let applied = store.apply(command)?;
        for collection in &applied.touched {
            save_collection(&self.root, &store, *collection)?;
        }
        Ok(applied)
    }

    /// Replace the entire store (import path) and persist everything.
    pub fn replace(&self, new_store: PmoStore) -> Result<(), StoreError> {
        let mut store = self.store.lock();
        save_all(&self.root, &new_store)?;
        *store = new_store;
        Ok(())
    }

    /// Drop all data and restore the seed portfolio.
    pub fn reset_to_seed(&self) -> Result<(), StoreError> {
        self.replace(seed_store())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NewMeeting, NewTask};
    use crate::types::{MeetingScope, TaskPriority, TaskStatus};
    use chrono::{Duration, Utc};

    #[test]
    fn save_and_load_round_trips_all_collections() {
        let dir = tempfile::tempdir().unwrap();
        let store = seed_store();
        save_all(dir.path(), &store).unwrap();

        let loaded = load_store(dir.path()).unwrap();
        assert_eq!(loaded.initiatives().len(), store.initiatives().len());
        assert_eq!(loaded.tasks().len(), store.tasks().len());
        assert_eq!(loaded.goals().len(), store.goals().len());
        assert_eq!(loaded.meetings().len(), store.meetings().len());

        let first = &store.initiatives()[0];
        let reloaded = loaded.initiative(&first.id).unwrap();
        assert_eq!(reloaded.name, first.name);
        assert_eq!(reloaded.due_date, first.due_date);
        assert_eq!(reloaded.department, first.department);
    }

    #[test]
    fn missing_snapshots_load_as_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_store(dir.path()).unwrap();
        assert!(store.initiatives().is_empty());
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pmo-tasks.json"), "{not json").unwrap();
        assert!(load_store(dir.path()).is_err());
    }

    #[test]
    fn workspace_persists_each_applied_command() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(dir.path()).unwrap();
        ws.apply(Command::AddMeeting {
            draft: NewMeeting {
                department: MeetingScope::All,
                date: Utc::now(),
                attendees: "Jane Executive".to_string(),
            },
        })
        .unwrap();

        // A fresh load sees the write.
        let reloaded = load_store(dir.path()).unwrap();
        assert_eq!(reloaded.meetings().len(), 1);
        assert_eq!(reloaded.meetings()[0].attendees, "Jane Executive");
    }

    #[test]
    fn workspace_cascade_persists_both_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open_or_seed(dir.path()).unwrap();
        let (initiative_id, task_count) = ws.read(|s| {
            let id = s.initiatives()[0].id.clone();
            (id.clone(), s.tasks_for_initiative(&id).len())
        });
        assert!(task_count > 0);

        ws.apply(Command::DeleteInitiative {
            id: initiative_id.clone(),
        })
        .unwrap();

        let reloaded = load_store(dir.path()).unwrap();
        assert!(reloaded.initiative(&initiative_id).is_none());
        assert!(reloaded.tasks_for_initiative(&initiative_id).is_empty());
    }

    #[test]
    fn open_or_seed_seeds_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open_or_seed(dir.path()).unwrap();
        let id = ws
            .apply(Command::AddTask {
                draft: NewTask {
                    project_id: ws.read(|s| s.initiatives()[0].id.clone()),
                    title: "Extra task".to_string(),
                    description: String::new(),
                    status: TaskStatus::Todo,
                    priority: TaskPriority::Low,
                    assignee: String::new(),
                    due_date: Utc::now() + Duration::days(30),
                    tags: Vec::new(),
                    dependencies: Vec::new(),
                    parent_task_id: None,
                },
            })
            .unwrap()
            .id;
        drop(ws);

        let reopened = Workspace::open_or_seed(dir.path()).unwrap();
        assert!(reopened.read(|s| s.task(&id).is_some()));
    }
}
