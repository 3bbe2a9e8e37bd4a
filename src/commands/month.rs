use anyhow::Result;
use calgrid_core::calendar::{EventFilter, group_by_day};
use calgrid_core::config::CalgridConfig;
use calgrid_core::date_range::{DateWindow, parse_month};
use calgrid_core::recurrence::pluralize;
use calgrid_core::store::EventStore;
use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;

use super::{ListArgs, load_calendar, today};
use crate::render::print_days;

pub fn run(
    store: &dyn EventStore,
    config: &CalgridConfig,
    month: Option<String>,
    filter: ListArgs,
) -> Result<()> {
    let today = today();
    let (year, month) = match month {
        Some(m) => parse_month(&m)?,
        None => (today.year(), today.month()),
    };

    let window = DateWindow::month_grid(year, month)?;
    let calendar = load_calendar(store, config)?;
    let events = calendar.in_window(window, &EventFilter::from(filter));

    let title = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_default();
    let in_month = events
        .iter()
        .filter(|e| e.anchor_date().is_ok_and(|d| d.month() == month))
        .count();

    println!(
        "{} {}",
        title.bold(),
        format!("({} {})", in_month, pluralize("event", in_month)).dimmed()
    );
    println!();

    if events.is_empty() {
        println!("{}", "No events this month".dimmed());
        return Ok(());
    }

    print_days(&group_by_day(&events), today, Some(month));
    Ok(())
}
