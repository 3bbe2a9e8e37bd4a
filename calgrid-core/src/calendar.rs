//! Calendar views over a snapshot of base events.
//!
//! A `Calendar` holds the base records read once from an `EventStore` and
//! answers the questions the month grid, list and day views ask: which
//! occurrences fall in a window, what happens on a given day, what is coming
//! up next, and which events clash with a proposed time.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::constants::{DEFAULT_CONFLICT_MINUTES, DEFAULT_MAX_OCCURRENCES, UPCOMING_HORIZON_DAYS};
use crate::date_range::DateWindow;
use crate::error::CalGridResult;
use crate::event::{Event, RecurrenceKind, format_date};
use crate::recurrence::Expansion;
use crate::store::EventStore;

/// Search and category filter applied to expanded occurrences.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Case-insensitive substring of title or description.
    pub search: Option<String>,
    /// Exact category name.
    pub category: Option<String>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => event.matches_text(needle),
            _ => true,
        };
        let category_ok = match self.category.as_deref() {
            Some(category) if !category.is_empty() => event.category == category,
            _ => true,
        };
        search_ok && category_ok
    }
}

/// Snapshot of base events plus the expansion settings used to query them.
#[derive(Debug, Clone)]
pub struct Calendar {
    events: Vec<Event>,
    limit: usize,
    conflict_minutes: i64,
}

impl Calendar {
    pub fn new(events: Vec<Event>) -> Self {
        Calendar {
            events,
            limit: DEFAULT_MAX_OCCURRENCES,
            conflict_minutes: DEFAULT_CONFLICT_MINUTES,
        }
    }

    pub fn load(store: &dyn EventStore) -> CalGridResult<Self> {
        Ok(Self::new(store.list()?))
    }

    /// Cap on occurrences generated per event per query.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_conflict_minutes(mut self, minutes: i64) -> Self {
        self.conflict_minutes = minutes;
        self
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Look up a base event by its own id or by the id of one of its
    /// occurrences.
    pub fn resolve(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id).or_else(|| {
            self.events.iter().find(|e| {
                id.strip_prefix(e.id.as_str())
                    .and_then(|rest| rest.strip_prefix('-'))
                    .is_some_and(|millis| millis.parse::<i64>().is_ok())
            })
        })
    }

    /// Every occurrence dated inside `window` that passes `filter`, sorted by
    /// date then time.
    pub fn in_window(&self, window: DateWindow, filter: &EventFilter) -> Vec<Event> {
        let expansion = Expansion::new(window).limit(self.limit);

        let mut occurrences: Vec<Event> = self
            .events
            .iter()
            .flat_map(|event| expansion.expand(event))
            .filter(|event| {
                event
                    .anchor_date()
                    .is_ok_and(|date| window.contains(date))
            })
            .filter(|event| filter.matches(event))
            .collect();

        occurrences.sort_by_key(|e| e.starts_at());
        occurrences
    }

    /// A single day's occurrences, sorted by time.
    pub fn on_day(&self, date: NaiveDate, filter: &EventFilter) -> Vec<Event> {
        self.in_window(DateWindow::day(date), filter)
    }

    /// The next `count` occurrences starting at or after `now`.
    pub fn upcoming(&self, now: NaiveDateTime, count: usize) -> Vec<Event> {
        let today = now.date();
        let window = DateWindow::new(today, today + Duration::days(UPCOMING_HORIZON_DAYS))
            .unwrap_or(DateWindow::day(today));

        self.in_window(window, &EventFilter::default())
            .into_iter()
            .filter(|e| e.starts_at().is_some_and(|start| start >= now))
            .take(count)
            .collect()
    }

    /// Events on `date` whose start is less than the conflict threshold away
    /// from `time`. Occurrences of `exclude_id` (the event being edited) are
    /// ignored.
    pub fn conflicts(&self, date: NaiveDate, time: NaiveTime, exclude_id: Option<&str>) -> Vec<Event> {
        let target = date.and_time(time);
        let threshold = Duration::minutes(self.conflict_minutes);

        self.on_day(date, &EventFilter::default())
            .into_iter()
            .filter(|e| exclude_id.is_none_or(|id| e.base_id() != id && e.id != id))
            .filter(|e| {
                e.starts_at()
                    .is_some_and(|start| (start - target).abs() < threshold)
            })
            .collect()
    }
}

/// Move an event to a new anchor date, keeping its time of day. Used when an
/// event is dropped on another day; for recurring events the whole series
/// shifts. A monthly rule follows the new anchor's day of the month so the
/// event still lands on the day it was moved to.
pub fn move_to_date(event: &Event, date: NaiveDate) -> Event {
    let recurrence = event.recurrence.clone().map(|mut rule| {
        if rule.kind == RecurrenceKind::Monthly {
            rule.day_of_month = Some(i64::from(date.day()));
        }
        rule
    });

    Event {
        date: format_date(date),
        recurrence,
        ..event.clone()
    }
}

/// Group date-sorted occurrences into per-day buckets, preserving order.
pub fn group_by_day(events: &[Event]) -> Vec<(NaiveDate, Vec<Event>)> {
    let mut days: Vec<(NaiveDate, Vec<Event>)> = Vec::new();

    for event in events {
        let Ok(date) = event.anchor_date() else {
            continue;
        };
        match days.last_mut() {
            Some((current, bucket)) if *current == date => bucket.push(event.clone()),
            _ => days.push((date, vec![event.clone()])),
        }
    }

    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{NewEvent, Recurrence};
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn add(
        store: &MemoryStore,
        title: &str,
        on: NaiveDate,
        at: NaiveTime,
        category: &str,
        recurrence: Option<Recurrence>,
    ) -> Event {
        let mut new = NewEvent::new(title, on, at);
        new.category = Some(category.to_string());
        new.recurrence = recurrence;
        store.create(new).unwrap()
    }

    fn sample_calendar() -> (Calendar, Event, Event, Event) {
        let store = MemoryStore::new();
        let standup = add(
            &store,
            "Standup",
            date(2024, 3, 4),
            time(9, 0),
            "Work",
            Some(Recurrence::weekly_on(&[1, 3, 5])),
        );
        let dentist = add(&store, "Dentist", date(2024, 3, 6), time(9, 30), "Health", None);
        let rent = add(
            &store,
            "Pay rent",
            date(2024, 1, 31),
            time(8, 0),
            "Personal",
            Some(Recurrence::new(RecurrenceKind::Monthly).with_interval(31)),
        );
        (Calendar::load(&store).unwrap(), standup, dentist, rent)
    }

    fn titles(events: &[Event]) -> Vec<(String, String)> {
        events.iter().map(|e| (e.date.clone(), e.title.clone())).collect()
    }

    #[test]
    fn test_in_window_flattens_and_sorts() {
        let (calendar, ..) = sample_calendar();
        let window = DateWindow::new(date(2024, 3, 4), date(2024, 3, 8)).unwrap();
        let events = calendar.in_window(window, &EventFilter::default());

        assert_eq!(
            titles(&events),
            vec![
                ("2024-03-04".into(), "Standup".into()),
                ("2024-03-06".into(), "Standup".into()),
                ("2024-03-06".into(), "Dentist".into()),
                ("2024-03-08".into(), "Standup".into()),
            ]
        );
    }

    #[test]
    fn test_in_window_drops_single_events_outside_window() {
        let (calendar, ..) = sample_calendar();
        let window = DateWindow::new(date(2024, 3, 9), date(2024, 3, 10)).unwrap();
        assert!(calendar.in_window(window, &EventFilter::default()).is_empty());
    }

    #[test]
    fn test_month_grid_includes_clamped_monthly() {
        let (calendar, ..) = sample_calendar();
        let grid = DateWindow::month_grid(2024, 2).unwrap();
        let filter = EventFilter {
            category: Some("Personal".into()),
            ..Default::default()
        };
        let events = calendar.in_window(grid, &filter);
        assert_eq!(
            titles(&events),
            vec![
                ("2024-01-31".into(), "Pay rent".into()),
                ("2024-02-29".into(), "Pay rent".into()),
            ]
        );
    }

    #[test]
    fn test_filter_by_search_and_category() {
        let (calendar, ..) = sample_calendar();
        let window = DateWindow::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();

        let search = EventFilter {
            search: Some("DENT".into()),
            ..Default::default()
        };
        assert_eq!(calendar.in_window(window, &search).len(), 1);

        let work = EventFilter {
            category: Some("Work".into()),
            ..Default::default()
        };
        assert!(calendar.in_window(window, &work).iter().all(|e| e.category == "Work"));

        let nothing = EventFilter {
            search: Some("standup".into()),
            category: Some("Health".into()),
        };
        assert!(calendar.in_window(window, &nothing).is_empty());
    }

    #[test]
    fn test_on_day_sorted_by_time() {
        let (calendar, ..) = sample_calendar();
        let day = calendar.on_day(date(2024, 3, 6), &EventFilter::default());
        let times: Vec<NaiveTime> = day.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![time(9, 0), time(9, 30)]);
    }

    #[test]
    fn test_upcoming_starts_at_now() {
        let (calendar, ..) = sample_calendar();
        let now = date(2024, 3, 6).and_time(time(9, 15));
        let next = calendar.upcoming(now, 3);
        assert_eq!(
            titles(&next),
            vec![
                ("2024-03-06".into(), "Dentist".into()),
                ("2024-03-08".into(), "Standup".into()),
                ("2024-03-11".into(), "Standup".into()),
            ]
        );
    }

    #[test]
    fn test_conflicts_within_an_hour() {
        let (calendar, standup, dentist, _) = sample_calendar();

        let clashes = calendar.conflicts(date(2024, 3, 6), time(9, 45), None);
        assert_eq!(clashes.len(), 2);

        let clashes = calendar.conflicts(date(2024, 3, 6), time(10, 0), None);
        assert_eq!(titles(&clashes), vec![("2024-03-06".into(), "Dentist".into())]);

        // Exactly 60 minutes apart does not conflict.
        assert!(calendar.conflicts(date(2024, 3, 6), time(10, 30), None).is_empty());

        let clashes = calendar.conflicts(date(2024, 3, 6), time(9, 15), Some(&dentist.id));
        assert!(clashes.iter().all(|e| e.base_id() == standup.id));
    }

    #[test]
    fn test_resolve_occurrence_id_to_base() {
        let (calendar, standup, dentist, _) = sample_calendar();
        let window = DateWindow::new(date(2024, 3, 11), date(2024, 3, 11)).unwrap();
        let occurrence = calendar
            .in_window(window, &EventFilter::default())
            .into_iter()
            .next()
            .unwrap();

        assert_eq!(calendar.resolve(&occurrence.id).map(|e| &e.id), Some(&standup.id));
        assert_eq!(calendar.resolve(&dentist.id).map(|e| &e.id), Some(&dentist.id));
        assert!(calendar.resolve("missing").is_none());
    }

    #[test]
    fn test_move_to_date_keeps_time() {
        let (_, _, dentist, _) = sample_calendar();
        let moved = move_to_date(&dentist, date(2024, 3, 12));
        assert_eq!(moved.date, "2024-03-12");
        assert_eq!(moved.time, dentist.time);
        assert_eq!(moved.id, dentist.id);
    }

    #[test]
    fn test_move_monthly_follows_new_day() {
        let store = MemoryStore::new();
        let rent = add(
            &store,
            "Rent",
            date(2024, 1, 15),
            time(9, 0),
            "Personal",
            Some(Recurrence::monthly_on(15)),
        );

        let moved = move_to_date(&rent, date(2024, 1, 20));
        assert_eq!(moved.recurrence.as_ref().and_then(|r| r.day_of_month), Some(20));
        store.update(&moved).unwrap();

        let calendar = Calendar::load(&store).unwrap();
        let on_new_day = calendar.on_day(date(2024, 1, 20), &EventFilter::default());
        assert_eq!(titles(&on_new_day), vec![("2024-01-20".into(), "Rent".into())]);

        let window = DateWindow::new(date(2024, 1, 1), date(2024, 3, 31)).unwrap();
        let dates: Vec<String> = calendar
            .in_window(window, &EventFilter::default())
            .into_iter()
            .map(|e| e.date)
            .collect();
        assert_eq!(dates, vec!["2024-01-20", "2024-02-20", "2024-03-20"]);
    }

    #[test]
    fn test_move_keeps_non_monthly_rule() {
        let (_, standup, ..) = sample_calendar();
        let moved = move_to_date(&standup, date(2024, 3, 11));
        assert_eq!(moved.recurrence, standup.recurrence);
    }

    #[test]
    fn test_group_by_day() {
        let (calendar, ..) = sample_calendar();
        let window = DateWindow::new(date(2024, 3, 4), date(2024, 3, 8)).unwrap();
        let groups = group_by_day(&calendar.in_window(window, &EventFilter::default()));
        let shape: Vec<(NaiveDate, usize)> = groups.iter().map(|(d, es)| (*d, es.len())).collect();
        assert_eq!(
            shape,
            vec![(date(2024, 3, 4), 1), (date(2024, 3, 6), 2), (date(2024, 3, 8), 1)]
        );
    }

    #[test]
    fn test_limit_applies_per_event() {
        let store = MemoryStore::new();
        add(&store, "Water plants", date(2024, 1, 1), time(7, 0), "Personal", Some(Recurrence::daily(1)));
        let calendar = Calendar::load(&store).unwrap().with_limit(10);
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        assert_eq!(calendar.in_window(window, &EventFilter::default()).len(), 10);
    }
}
