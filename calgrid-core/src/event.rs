//! Event records and recurrence rules.
//!
//! These are the types persisted by the event store and consumed by the
//! recurrence engine. Field names serialize in camelCase so stored documents
//! keep the shape `{"id","title","date","time","recurrence":{"type",...}}`.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CATEGORY, DEFAULT_COLOR};
use crate::error::{CalGridError, CalGridResult};

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// A base event record, or an occurrence generated from one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Anchor date as written by the user (YYYY-MM-DD). Parsed lazily so a
    /// malformed record still loads and can be shown or repaired.
    pub date: String,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    /// Set on generated occurrences: the id of the base event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_of: Option<String>,
}

impl Event {
    /// Parse the anchor date.
    pub fn anchor_date(&self) -> CalGridResult<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        self.anchor_date().ok().map(|d| d.and_time(self.time))
    }

    /// True when the event carries a rule that actually repeats.
    pub fn is_recurring(&self) -> bool {
        self.recurrence.as_ref().is_some_and(|r| !r.is_none())
    }

    /// Id of the stored record this event came from.
    pub fn base_id(&self) -> &str {
        self.recurrence_of.as_deref().unwrap_or(&self.id)
    }

    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&needle)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Input for creating a new event. The store assigns the id.
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub category: Option<String>,
    pub color: Option<String>,
    pub recurrence: Option<Recurrence>,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, date: NaiveDate, time: NaiveTime) -> Self {
        NewEvent {
            title: title.into(),
            date,
            time,
            ..Default::default()
        }
    }

    /// Validate and turn into a stored event with the given id.
    pub fn into_event(self, id: String) -> CalGridResult<Event> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(CalGridError::Validation("title must not be empty".into()));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Event {
            id,
            title,
            description,
            date: format_date(self.date),
            time: self.time,
            category: non_empty_or(self.category, DEFAULT_CATEGORY),
            color: non_empty_or(self.color, DEFAULT_COLOR),
            recurrence: self.recurrence.filter(|r| !r.is_none()),
            recurrence_of: None,
        })
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// How a recurring event repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    #[serde(rename = "type")]
    pub kind: RecurrenceKind,
    /// Step size. Missing, zero or negative values count as 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    /// Weekday indices, 0 = Sunday .. 6 = Saturday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<i64>,
    /// Inclusive last date on which an occurrence may fall.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Recurrence {
    pub fn new(kind: RecurrenceKind) -> Self {
        Recurrence {
            kind,
            interval: None,
            days_of_week: None,
            day_of_month: None,
            end_date: None,
        }
    }

    pub fn daily(interval: i64) -> Self {
        Self::new(RecurrenceKind::Daily).with_interval(interval)
    }

    pub fn weekly(interval: i64) -> Self {
        Self::new(RecurrenceKind::Weekly).with_interval(interval)
    }

    /// Weekly on the given Sunday-based weekday indices.
    pub fn weekly_on(days: &[i64]) -> Self {
        Recurrence {
            days_of_week: Some(days.to_vec()),
            ..Self::new(RecurrenceKind::Weekly)
        }
    }

    pub fn monthly_on(day: i64) -> Self {
        Recurrence {
            day_of_month: Some(day),
            ..Self::new(RecurrenceKind::Monthly)
        }
    }

    pub fn custom(interval: i64) -> Self {
        Self::new(RecurrenceKind::Custom).with_interval(interval)
    }

    pub fn with_interval(mut self, interval: i64) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn is_none(&self) -> bool {
        self.kind == RecurrenceKind::None
    }

    /// The step size, never less than 1.
    pub fn step(&self) -> u32 {
        self.interval
            .filter(|i| *i >= 1)
            .map(|i| u32::try_from(i).unwrap_or(u32::MAX))
            .unwrap_or(1)
    }

    /// Selected weekdays, deduplicated, in Monday-first order.
    /// Indices outside 0..=6 are ignored.
    pub fn weekdays(&self) -> Vec<Weekday> {
        let mut days: Vec<Weekday> = self
            .days_of_week
            .iter()
            .flatten()
            .filter_map(|i| weekday_from_sunday_index(*i))
            .collect();
        days.sort_by_key(|d| d.num_days_from_monday());
        days.dedup();
        days
    }

    /// Day of the month a monthly rule lands on, before clamping.
    /// Falls back from `day_of_month` to `interval` to the anchor's day.
    pub fn monthly_day(&self, anchor: NaiveDate) -> u32 {
        use chrono::Datelike;

        self.day_of_month
            .filter(|d| *d >= 1)
            .or(self.interval.filter(|i| *i >= 1))
            .map(|d| u32::try_from(d.min(31)).unwrap_or(31))
            .unwrap_or_else(|| anchor.day())
    }
}

/// Map a Sunday-based index (0 = Sunday) to a weekday.
pub fn weekday_from_sunday_index(index: i64) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Recurrence type. Unrecognised strings are kept as `Unknown` so that a
/// record written by a newer client still round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecurrenceKind {
    None,
    Daily,
    Weekly,
    Monthly,
    Custom,
    Unknown(String),
}

impl From<String> for RecurrenceKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "none" => RecurrenceKind::None,
            "daily" => RecurrenceKind::Daily,
            "weekly" => RecurrenceKind::Weekly,
            "monthly" => RecurrenceKind::Monthly,
            "custom" => RecurrenceKind::Custom,
            _ => RecurrenceKind::Unknown(s),
        }
    }
}

impl From<RecurrenceKind> for String {
    fn from(kind: RecurrenceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl RecurrenceKind {
    pub fn as_str(&self) -> &str {
        match self {
            RecurrenceKind::None => "none",
            RecurrenceKind::Daily => "daily",
            RecurrenceKind::Weekly => "weekly",
            RecurrenceKind::Monthly => "monthly",
            RecurrenceKind::Custom => "custom",
            RecurrenceKind::Unknown(s) => s,
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a YYYY-MM-DD date.
pub fn parse_date(s: &str) -> CalGridResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| CalGridError::InvalidDate(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse an HH:MM time of day.
pub fn parse_time(s: &str) -> CalGridResult<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| CalGridError::InvalidTime(s.to_string()))
}

/// Serde adapter storing a `NaiveTime` as "HH:MM".
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
