//! Core types for calgrid.
//!
//! - `event`: event records and recurrence rules
//! - `recurrence`: expansion of recurring events into dated occurrences
//! - `store`: the `EventStore` trait with JSON-file and in-memory stores
//! - `calendar`: window, day and conflict queries over a snapshot of events

pub mod calendar;
pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod event;
pub mod recurrence;
pub mod store;

pub use error::{CalGridError, CalGridResult};
pub use event::{Event, NewEvent, Recurrence, RecurrenceKind};
pub use recurrence::{Expansion, describe, expand};
