//! JSON file event store.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EventStore;
use crate::error::{CalGridError, CalGridResult};
use crate::event::{Event, NewEvent};

/// On-disk layout: a single document keyed by `calendarEvents`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(rename = "calendarEvents", default)]
    events: Vec<Event>,
}

/// Event store backed by one JSON file.
///
/// The file is reread on every call, so edits made by another process are
/// picked up. Writes go to a sibling temp file which is then renamed over the
/// original.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> CalGridResult<Vec<Event>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let document: StoreDocument = serde_json::from_str(&content).map_err(|e| {
            CalGridError::Serialization(format!("{}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), count = document.events.len(), "Loaded events");
        Ok(document.events)
    }

    fn write(&self, events: Vec<Event>) -> CalGridResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let document = StoreDocument { events };
        let content = serde_json::to_string_pretty(&document)
            .map_err(|e| CalGridError::Serialization(e.to_string()))?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;

        debug!(path = %self.path.display(), count = document.events.len(), "Saved events");
        Ok(())
    }

    /// Read, apply `change`, and write back while holding the write lock.
    fn modify<T>(
        &self,
        change: impl FnOnce(&mut Vec<Event>) -> CalGridResult<T>,
    ) -> CalGridResult<T> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut events = self.read()?;
        let result = change(&mut events)?;
        self.write(events)?;
        Ok(result)
    }
}

impl EventStore for JsonFileStore {
    fn list(&self) -> CalGridResult<Vec<Event>> {
        self.read()
    }

    fn create(&self, new_event: NewEvent) -> CalGridResult<Event> {
        self.modify(|events| super::insert(events, new_event))
    }

    fn update(&self, event: &Event) -> CalGridResult<()> {
        self.modify(|events| super::replace(events, event))
    }

    fn delete(&self, id: &str) -> CalGridResult<()> {
        self.modify(|events| super::remove(events, id))
    }
}
