//! In-memory event store.

use std::sync::{PoisonError, RwLock};

use super::EventStore;
use crate::error::CalGridResult;
use crate::event::{Event, NewEvent};

/// Event store held entirely in memory. Useful for tests and for embedding
/// the calendar where persistence is handled elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        MemoryStore {
            events: RwLock::new(events),
        }
    }
}

impl EventStore for MemoryStore {
    fn list(&self) -> CalGridResult<Vec<Event>> {
        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        Ok(events.clone())
    }

    fn create(&self, new_event: NewEvent) -> CalGridResult<Event> {
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        super::insert(&mut events, new_event)
    }

    fn update(&self, event: &Event) -> CalGridResult<()> {
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        super::replace(&mut events, event)
    }

    fn delete(&self, id: &str) -> CalGridResult<()> {
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        super::remove(&mut events, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalGridError;
    use chrono::{NaiveDate, NaiveTime};

    fn new_event(title: &str) -> NewEvent {
        NewEvent::new(
            title,
            NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_create_list_update_delete() {
        let store = MemoryStore::new();
        let a = store.create(new_event("Gym")).unwrap();
        let b = store.create(new_event("Dinner")).unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("evt-"));

        let titles: Vec<String> = store.list().unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Gym", "Dinner"]);

        let mut edited = a.clone();
        edited.title = "Swim".into();
        store.update(&edited).unwrap();
        assert_eq!(store.get(&a.id).unwrap().unwrap().title, "Swim");

        store.delete(&b.id).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
        assert!(store.get(&b.id).unwrap().is_none());
    }

    #[test]
    fn test_unknown_ids_are_reported() {
        let store = MemoryStore::new();
        assert!(matches!(store.delete("nope"), Err(CalGridError::EventNotFound(_))));

        let ghost = new_event("Ghost").into_event("ghost".into()).unwrap();
        assert!(matches!(store.update(&ghost), Err(CalGridError::EventNotFound(_))));
    }

    #[test]
    fn test_rejects_occurrences_and_blank_titles() {
        let store = MemoryStore::new();
        let base = store.create(new_event("Standup")).unwrap();

        let mut occurrence = base.clone();
        occurrence.recurrence_of = Some(base.id.clone());
        assert!(matches!(store.update(&occurrence), Err(CalGridError::Validation(_))));

        let mut blank = base.clone();
        blank.title = " ".into();
        assert!(matches!(store.update(&blank), Err(CalGridError::Validation(_))));

        assert!(matches!(store.create(new_event("")), Err(CalGridError::Validation(_))));
    }
}
