pub mod day;
pub mod delete;
pub mod edit;
pub mod list;
pub mod month;
pub mod move_event;
pub mod new;
pub mod show;
pub mod upcoming;

use anyhow::{Context, Result};
use calgrid_core::calendar::{Calendar, EventFilter};
use calgrid_core::config::CalgridConfig;
use calgrid_core::event::{Recurrence, RecurrenceKind, parse_date, parse_time};
use calgrid_core::store::EventStore;
use chrono::{Datelike, NaiveDate, NaiveTime};
use clap::{Args, ValueEnum};
use owo_colors::OwoColorize;

/// Optional event fields shared by `new` and `edit`.
#[derive(Args, Debug, Default)]
pub struct EventFields {
    /// Time of day (HH:MM)
    #[arg(short, long)]
    pub time: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Work, Personal, Health, Social, Travel or Other
    #[arg(short, long)]
    pub category: Option<String>,

    /// Display color, e.g. "#d32f2f"
    #[arg(long)]
    pub color: Option<String>,

    /// How the event repeats
    #[arg(short, long, value_enum)]
    pub repeat: Option<RepeatArg>,

    /// Repeat every N days/weeks (daily, weekly, custom)
    #[arg(short, long)]
    pub interval: Option<i64>,

    /// Weekdays for weekly events, e.g. "mon,wed,fri" or "1,3,5" (0 = Sunday)
    #[arg(long)]
    pub days: Option<String>,

    /// Day of the month for monthly events (defaults to the event's day)
    #[arg(long)]
    pub day_of_month: Option<i64>,

    /// Last date an occurrence may fall on (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,
}

impl EventFields {
    fn touches_recurrence(&self) -> bool {
        self.repeat.is_some()
            || self.interval.is_some()
            || self.days.is_some()
            || self.day_of_month.is_some()
            || self.until.is_some()
    }

    pub fn time(&self) -> Result<Option<NaiveTime>> {
        self.time.as_deref().map(parse_time).transpose().map_err(Into::into)
    }

    /// The recurrence after applying these fields to `existing`.
    /// `anchor` supplies the default day for monthly rules.
    pub fn recurrence(
        &self,
        existing: Option<Recurrence>,
        anchor: NaiveDate,
    ) -> Result<Option<Recurrence>> {
        if !self.touches_recurrence() {
            return Ok(existing);
        }

        let kind = match self.repeat {
            Some(repeat) => repeat.kind(),
            None => match &existing {
                Some(rule) => rule.kind.clone(),
                None => anyhow::bail!("--repeat is required to make an event recurring"),
            },
        };

        if kind == RecurrenceKind::None {
            return Ok(None);
        }

        // Switching type starts from a clean rule.
        let mut rule = match existing {
            Some(rule) if rule.kind == kind => rule,
            _ => Recurrence::new(kind.clone()),
        };

        if let Some(interval) = self.interval {
            anyhow::ensure!(
                kind != RecurrenceKind::Monthly,
                "--interval does not apply to monthly events, use --day-of-month"
            );
            anyhow::ensure!(interval >= 1, "--interval must be at least 1");
            rule.interval = Some(interval);
        }

        if let Some(days) = &self.days {
            anyhow::ensure!(kind == RecurrenceKind::Weekly, "--days only applies to weekly events");
            rule.days_of_week = Some(parse_days(days)?);
        }

        if let Some(day) = self.day_of_month {
            anyhow::ensure!(
                kind == RecurrenceKind::Monthly,
                "--day-of-month only applies to monthly events"
            );
            anyhow::ensure!((1..=31).contains(&day), "--day-of-month must be between 1 and 31");
            rule.day_of_month = Some(day);
        }

        if kind == RecurrenceKind::Monthly && rule.day_of_month.is_none() {
            rule.day_of_month = Some(i64::from(anchor.day()));
        }

        if let Some(until) = &self.until {
            rule.end_date = Some(parse_date(until)?);
        }

        Ok(Some(rule))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RepeatArg {
    None,
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl RepeatArg {
    fn kind(self) -> RecurrenceKind {
        match self {
            RepeatArg::None => RecurrenceKind::None,
            RepeatArg::Daily => RecurrenceKind::Daily,
            RepeatArg::Weekly => RecurrenceKind::Weekly,
            RepeatArg::Monthly => RecurrenceKind::Monthly,
            RepeatArg::Custom => RecurrenceKind::Custom,
        }
    }
}

/// Search and category options for list-style commands.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only events whose title or description contains this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only events in this category
    #[arg(short, long)]
    pub category: Option<String>,
}

impl From<ListArgs> for EventFilter {
    fn from(args: ListArgs) -> Self {
        EventFilter {
            search: args.search,
            category: args.category,
        }
    }
}

/// Parse "mon,wed,fri" or "1,3,5" into Sunday-based weekday indices.
pub fn parse_days(s: &str) -> Result<Vec<i64>> {
    let mut days = Vec::new();

    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let index = match part.to_lowercase().as_str() {
            "sun" | "sunday" => 0,
            "mon" | "monday" => 1,
            "tue" | "tuesday" => 2,
            "wed" | "wednesday" => 3,
            "thu" | "thursday" => 4,
            "fri" | "friday" => 5,
            "sat" | "saturday" => 6,
            other => other
                .parse::<i64>()
                .ok()
                .filter(|i| (0..=6).contains(i))
                .with_context(|| format!("Invalid weekday '{}'", part))?,
        };
        if !days.contains(&index) {
            days.push(index);
        }
    }

    anyhow::ensure!(!days.is_empty(), "--days needs at least one weekday");
    Ok(days)
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn load_calendar(store: &dyn EventStore, config: &CalgridConfig) -> Result<Calendar> {
    let calendar = Calendar::load(store)
        .with_context(|| "Failed to load events")?
        .with_limit(config.max_occurrences)
        .with_conflict_minutes(config.conflict_minutes);
    Ok(calendar)
}

/// Refuse to save over a time conflict unless forced.
pub fn check_conflicts(
    calendar: &Calendar,
    date: NaiveDate,
    time: NaiveTime,
    exclude_id: Option<&str>,
    force: bool,
) -> Result<()> {
    let conflicts = calendar.conflicts(date, time, exclude_id);
    if conflicts.is_empty() {
        return Ok(());
    }

    let names: Vec<String> = conflicts
        .iter()
        .map(|e| format!("{} ({})", e.title, e.time.format("%H:%M")))
        .collect();

    if force {
        eprintln!("{} overlaps with: {}", "Warning:".yellow(), names.join(", "));
        return Ok(());
    }

    anyhow::bail!(
        "This event conflicts with: {}\nUse --force to save anyway.",
        names.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days("mon, Wed,FRI").unwrap(), vec![1, 3, 5]);
        assert_eq!(parse_days("0,6,0").unwrap(), vec![0, 6]);
        assert!(parse_days("7").is_err());
        assert!(parse_days("funday").is_err());
        assert!(parse_days(" , ").is_err());
    }

    #[test]
    fn test_fields_without_recurrence_keep_existing() {
        let fields = EventFields {
            time: Some("10:00".into()),
            ..Default::default()
        };
        let existing = Some(Recurrence::daily(2));
        assert_eq!(fields.recurrence(existing.clone(), anchor()).unwrap(), existing);
    }

    #[test]
    fn test_monthly_defaults_to_anchor_day() {
        let fields = EventFields {
            repeat: Some(RepeatArg::Monthly),
            ..Default::default()
        };
        let rule = fields.recurrence(None, anchor()).unwrap().unwrap();
        assert_eq!(rule.day_of_month, Some(14));
    }

    #[test]
    fn test_weekly_days_and_until() {
        let fields = EventFields {
            repeat: Some(RepeatArg::Weekly),
            days: Some("tue,thu".into()),
            until: Some("2024-06-30".into()),
            ..Default::default()
        };
        let rule = fields.recurrence(None, anchor()).unwrap().unwrap();
        assert_eq!(rule.days_of_week, Some(vec![2, 4]));
        assert_eq!(rule.end_date, NaiveDate::from_ymd_opt(2024, 6, 30));
    }

    #[test]
    fn test_edit_interval_keeps_rule_type() {
        let fields = EventFields {
            interval: Some(3),
            ..Default::default()
        };
        let rule = fields
            .recurrence(Some(Recurrence::weekly(1)), anchor())
            .unwrap()
            .unwrap();
        assert_eq!(rule.kind, RecurrenceKind::Weekly);
        assert_eq!(rule.interval, Some(3));
    }

    #[test]
    fn test_repeat_none_clears_rule() {
        let fields = EventFields {
            repeat: Some(RepeatArg::None),
            ..Default::default()
        };
        assert_eq!(fields.recurrence(Some(Recurrence::daily(1)), anchor()).unwrap(), None);
    }

    #[test]
    fn test_invalid_combinations() {
        let days_on_daily = EventFields {
            repeat: Some(RepeatArg::Daily),
            days: Some("mon".into()),
            ..Default::default()
        };
        assert!(days_on_daily.recurrence(None, anchor()).is_err());

        let interval_without_rule = EventFields {
            interval: Some(2),
            ..Default::default()
        };
        assert!(interval_without_rule.recurrence(None, anchor()).is_err());

        let zero_interval = EventFields {
            repeat: Some(RepeatArg::Daily),
            interval: Some(0),
            ..Default::default()
        };
        assert!(zero_interval.recurrence(None, anchor()).is_err());

        let interval_on_monthly = EventFields {
            repeat: Some(RepeatArg::Monthly),
            interval: Some(3),
            ..Default::default()
        };
        assert!(interval_on_monthly.recurrence(None, anchor()).is_err());

        let interval_on_existing_monthly = EventFields {
            interval: Some(2),
            ..Default::default()
        };
        assert!(
            interval_on_existing_monthly
                .recurrence(Some(Recurrence::monthly_on(14)), anchor())
                .is_err()
        );
    }

    #[test]
    fn test_check_conflicts_blocks_unless_forced() {
        use calgrid_core::event::NewEvent;
        use calgrid_core::store::MemoryStore;

        let store = MemoryStore::new();
        let at = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let existing = store.create(NewEvent::new("Standup", anchor(), at)).unwrap();
        let calendar = load_calendar(&store, &CalgridConfig::default()).unwrap();

        let near = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert!(check_conflicts(&calendar, anchor(), near, None, false).is_err());
        assert!(check_conflicts(&calendar, anchor(), near, None, true).is_ok());
        assert!(check_conflicts(&calendar, anchor(), near, Some(existing.id.as_str()), false).is_ok());

        let later = NaiveTime::from_hms_opt(11, 0, 0).unwrap();
        assert!(check_conflicts(&calendar, anchor(), later, None, false).is_ok());
    }
}
