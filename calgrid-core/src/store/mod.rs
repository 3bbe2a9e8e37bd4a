//! Event storage.
//!
//! Base event records live behind the `EventStore` trait so the calendar
//! queries and the CLI never depend on a concrete persistence mechanism.
//! Generated occurrences are never stored.

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::{CalGridError, CalGridResult};
use crate::event::{Event, NewEvent};

/// Create/read/update/delete access to base event records.
pub trait EventStore: Send + Sync {
    /// All base events, in insertion order.
    fn list(&self) -> CalGridResult<Vec<Event>>;

    fn get(&self, id: &str) -> CalGridResult<Option<Event>> {
        Ok(self.list()?.into_iter().find(|e| e.id == id))
    }

    /// Validate and store a new event, returning it with its assigned id.
    fn create(&self, new_event: NewEvent) -> CalGridResult<Event>;

    /// Replace the stored event that has the same id.
    fn update(&self, event: &Event) -> CalGridResult<()>;

    fn delete(&self, id: &str) -> CalGridResult<()>;
}

/// Generate a fresh event id.
pub fn new_event_id() -> String {
    format!("evt-{}", uuid::Uuid::new_v4())
}

fn insert(events: &mut Vec<Event>, new_event: NewEvent) -> CalGridResult<Event> {
    let event = new_event.into_event(new_event_id())?;
    events.push(event.clone());
    Ok(event)
}

fn replace(events: &mut [Event], event: &Event) -> CalGridResult<()> {
    if event.recurrence_of.is_some() {
        return Err(CalGridError::Validation(format!(
            "'{}' is a generated occurrence; update its base event instead",
            event.id
        )));
    }
    if event.title.trim().is_empty() {
        return Err(CalGridError::Validation("title must not be empty".into()));
    }

    let slot = events
        .iter_mut()
        .find(|e| e.id == event.id)
        .ok_or_else(|| CalGridError::EventNotFound(event.id.clone()))?;
    *slot = event.clone();
    Ok(())
}

fn remove(events: &mut Vec<Event>, id: &str) -> CalGridResult<()> {
    let before = events.len();
    events.retain(|e| e.id != id);
    if events.len() == before {
        return Err(CalGridError::EventNotFound(id.to_string()));
    }
    Ok(())
}
