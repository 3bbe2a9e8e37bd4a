use anyhow::Result;
use calgrid_core::calendar::move_to_date;
use calgrid_core::config::CalgridConfig;
use calgrid_core::event::parse_date;
use calgrid_core::store::EventStore;
use owo_colors::OwoColorize;

use super::{check_conflicts, load_calendar};

pub fn run(
    store: &dyn EventStore,
    config: &CalgridConfig,
    id: &str,
    date: &str,
    force: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let calendar = load_calendar(store, config)?;
    let Some(event) = calendar.resolve(id) else {
        anyhow::bail!("Event '{}' not found", id);
    };

    check_conflicts(&calendar, date, event.time, Some(event.id.as_str()), force)?;

    let moved = move_to_date(event, date);
    store.update(&moved)?;

    println!("{} {} to {}", "Moved".yellow(), moved.title, moved.date);
    Ok(())
}
