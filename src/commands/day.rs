use anyhow::Result;
use calgrid_core::calendar::EventFilter;
use calgrid_core::config::CalgridConfig;
use calgrid_core::event::parse_date;
use calgrid_core::recurrence::pluralize;
use calgrid_core::store::EventStore;
use owo_colors::OwoColorize;

use super::load_calendar;
use crate::render::Render;

pub fn run(store: &dyn EventStore, config: &CalgridConfig, date: &str) -> Result<()> {
    let date = parse_date(date)?;
    let calendar = load_calendar(store, config)?;
    let events = calendar.on_day(date, &EventFilter::default());

    let heading = date.format("%A, %B %-d, %Y").to_string();
    let count = format!("{} {}", events.len(), pluralize("event", events.len()));
    println!("{} {} {}", heading.bold(), "•".dimmed(), count.dimmed());

    if events.is_empty() {
        println!("{}", "  Nothing scheduled".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}", event.render());
        if let Some(description) = &event.description {
            println!("        {}", description.dimmed());
        }
    }

    Ok(())
}
