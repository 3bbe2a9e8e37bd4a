use anyhow::Result;
use calgrid_core::config::CalgridConfig;
use calgrid_core::event::{NewEvent, parse_date};
use calgrid_core::recurrence::describe;
use calgrid_core::store::EventStore;
use chrono::NaiveTime;
use owo_colors::OwoColorize;

use super::{EventFields, check_conflicts, load_calendar};

pub fn run(
    store: &dyn EventStore,
    config: &CalgridConfig,
    title: String,
    date: &str,
    fields: EventFields,
    force: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let time = fields.time()?.unwrap_or(NaiveTime::MIN);
    let recurrence = fields.recurrence(None, date)?;

    let calendar = load_calendar(store, config)?;
    check_conflicts(&calendar, date, time, None, force)?;

    let new_event = NewEvent {
        title,
        description: fields.description,
        date,
        time,
        category: fields.category.or_else(|| Some(config.default_category.clone())),
        color: fields.color.or_else(|| Some(config.default_color.clone())),
        recurrence,
    };

    let event = store.create(new_event)?;

    println!("{} {} {}", "Created".green(), event.title, event.id.dimmed());
    if event.is_recurring() {
        println!("  {}", describe(event.recurrence.as_ref()).cyan());
    }
    Ok(())
}
