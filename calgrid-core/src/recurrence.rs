//! Recurrence expansion for recurring events.
//!
//! Expands a base event into the concrete occurrences that fall inside a date
//! window. Occurrences are never stored; they are regenerated from the base
//! rule on every query.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveTime, Weekday};
use tracing::{debug, warn};

use crate::constants::DEFAULT_MAX_OCCURRENCES;
use crate::date_range::{DateWindow, days_in_month};
use crate::event::{Event, Recurrence, RecurrenceKind, format_date};

/// How to get from one candidate date to the next.
#[derive(Debug, Clone)]
enum Step {
    /// Fixed number of days (daily, custom, weekly without weekdays).
    Days(u64),
    /// Next date whose weekday is in the set. Never empty.
    Weekdays(Vec<Weekday>),
    /// Same day-of-month next month, clamped to the month's length.
    MonthDay(u32),
}

impl Step {
    fn for_rule(rule: &Recurrence, anchor: NaiveDate) -> Option<Self> {
        let step = u64::from(rule.step());
        match rule.kind {
            RecurrenceKind::Daily | RecurrenceKind::Custom => Some(Step::Days(step)),
            RecurrenceKind::Weekly => {
                let weekdays = rule.weekdays();
                if weekdays.is_empty() {
                    Some(Step::Days(step.saturating_mul(7)))
                } else {
                    Some(Step::Weekdays(weekdays))
                }
            }
            RecurrenceKind::Monthly => Some(Step::MonthDay(rule.monthly_day(anchor))),
            RecurrenceKind::None | RecurrenceKind::Unknown(_) => None,
        }
    }

    /// First candidate on or after the anchor that belongs to the rule.
    fn first(&self, anchor: NaiveDate) -> Option<NaiveDate> {
        match self {
            Step::Days(_) => Some(anchor),
            Step::Weekdays(days) => (0..7)
                .filter_map(|n| anchor.checked_add_days(Days::new(n)))
                .find(|d| days.contains(&d.weekday())),
            Step::MonthDay(day) => {
                let same_month = clamp_to_month(anchor.year(), anchor.month(), *day)?;
                if same_month >= anchor {
                    Some(same_month)
                } else {
                    self.advance(anchor)
                }
            }
        }
    }

    /// Candidate strictly after `current`.
    fn advance(&self, current: NaiveDate) -> Option<NaiveDate> {
        match self {
            Step::Days(n) => current.checked_add_days(Days::new(*n)),
            Step::Weekdays(days) => (1..=7)
                .filter_map(|n| current.checked_add_days(Days::new(n)))
                .find(|d| days.contains(&d.weekday())),
            Step::MonthDay(day) => {
                let first = current.with_day(1)?.checked_add_months(Months::new(1))?;
                clamp_to_month(first.year(), first.month(), *day)
            }
        }
    }
}

/// `day` in the given month, or the month's last day if it is shorter.
fn clamp_to_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, days_in_month(year, month)))
}

/// Lazy, ascending stream of the dates a rule produces, starting at the
/// anchor and ending after the rule's end date (if any).
#[derive(Debug, Clone)]
pub struct Occurrences {
    next: Option<NaiveDate>,
    step: Step,
    until: Option<NaiveDate>,
}

impl Occurrences {
    /// Returns None for rules that do not repeat (`none` or an unknown type).
    pub fn new(anchor: NaiveDate, rule: &Recurrence) -> Option<Self> {
        let step = Step::for_rule(rule, anchor)?;
        Some(Occurrences {
            next: step.first(anchor),
            step,
            until: rule.end_date,
        })
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.take()?;
        if self.until.is_some_and(|until| current > until) {
            return None;
        }
        self.next = self.step.advance(current);
        Some(current)
    }
}

/// Expansion of events over one window, with an explicit occurrence cap.
#[derive(Debug, Clone, Copy)]
pub struct Expansion {
    window: DateWindow,
    limit: usize,
}

impl Expansion {
    pub fn new(window: DateWindow) -> Self {
        Expansion {
            window,
            limit: DEFAULT_MAX_OCCURRENCES,
        }
    }

    /// Maximum number of occurrences a single event may produce.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    /// Expand `base` into its occurrences inside the window, in date order.
    ///
    /// - Non-recurring events come back as `[base]` whatever the window.
    /// - An anchor date that does not parse yields `[base]` and a warning.
    /// - A rule that can never produce a date (unknown type, or an end date
    ///   before its first occurrence) yields `[base]` so the event is not
    ///   lost from every view.
    /// - Otherwise the result may be empty when nothing falls in the window.
    pub fn expand(&self, base: &Event) -> Vec<Event> {
        let Some(rule) = base.recurrence.as_ref().filter(|r| !r.is_none()) else {
            return vec![base.clone()];
        };

        let anchor = match base.anchor_date() {
            Ok(anchor) => anchor,
            Err(err) => {
                warn!(event = %base.id, %err, "Invalid anchor date, showing event unexpanded");
                return vec![base.clone()];
            }
        };

        let Some(candidates) = Occurrences::new(anchor, rule) else {
            warn!(event = %base.id, kind = %rule.kind, "Unknown recurrence type, showing event unexpanded");
            return vec![base.clone()];
        };

        let mut candidates = candidates.peekable();
        if candidates.peek().is_none() {
            debug!(event = %base.id, "Recurrence rule produces no dates");
            return vec![base.clone()];
        }

        let window = self.window;
        let occurrences: Vec<Event> = candidates
            .take_while(|d| *d <= window.end())
            .filter(|d| window.contains(*d))
            .take(self.limit)
            .map(|d| occurrence(base, d))
            .collect();

        debug!(
            event = %base.id,
            count = occurrences.len(),
            from = %window.start(),
            to = %window.end(),
            "Expanded recurring event"
        );

        occurrences
    }
}

/// Expand `base` over `[window_start, window_end]` with the default cap.
///
/// An inverted window contains no dates, so recurring events expand to nothing
/// while non-recurring events still come back unchanged.
pub fn expand(base: &Event, window_start: NaiveDate, window_end: NaiveDate) -> Vec<Event> {
    match DateWindow::new(window_start, window_end) {
        Ok(window) => Expansion::new(window).expand(base),
        Err(_) if base.is_recurring() => Vec::new(),
        Err(_) => vec![base.clone()],
    }
}

/// Id of the occurrence of `base_id` on `date`: the base id followed by the
/// Unix timestamp (ms) of that date at midnight UTC.
pub fn occurrence_id(base_id: &str, date: NaiveDate) -> String {
    let millis = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    format!("{}-{}", base_id, millis)
}

fn occurrence(base: &Event, date: NaiveDate) -> Event {
    Event {
        id: occurrence_id(&base.id, date),
        date: format_date(date),
        recurrence_of: Some(base.id.clone()),
        ..base.clone()
    }
}

/// Human-readable summary of a rule, e.g. "Every 2 weeks" or "Weekly on Mon, Fri".
pub fn describe(recurrence: Option<&Recurrence>) -> String {
    let Some(rule) = recurrence else {
        return "No recurrence".to_string();
    };

    let interval = rule.step();
    match &rule.kind {
        RecurrenceKind::None => "No recurrence".to_string(),
        RecurrenceKind::Daily => every(interval, "Daily", "day"),
        RecurrenceKind::Weekly => {
            let days = rule.weekdays();
            if days.is_empty() {
                every(interval, "Weekly", "week")
            } else {
                let names: Vec<&str> = days.iter().map(|d| weekday_abbrev(*d)).collect();
                format!("Weekly on {}", names.join(", "))
            }
        }
        RecurrenceKind::Monthly => every(interval, "Monthly", "month"),
        RecurrenceKind::Custom => {
            format!("Every {} {} (custom)", interval, pluralize("day", interval))
        }
        RecurrenceKind::Unknown(_) => "Custom recurrence".to_string(),
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&describe(Some(self)))
    }
}

fn every(interval: u32, single: &str, unit: &str) -> String {
    if interval == 1 {
        single.to_string()
    } else {
        format!("Every {} {}", interval, pluralize(unit, interval))
    }
}

/// Simple pluralization helper
pub fn pluralize<N: PartialEq + From<u8>>(word: &str, count: N) -> String {
    if count == N::from(1) {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
