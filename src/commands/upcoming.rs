use anyhow::Result;
use calgrid_core::calendar::group_by_day;
use calgrid_core::config::CalgridConfig;
use calgrid_core::store::EventStore;
use owo_colors::OwoColorize;

use super::load_calendar;
use crate::render::print_days;

pub fn run(store: &dyn EventStore, config: &CalgridConfig, count: Option<usize>) -> Result<()> {
    let now = chrono::Local::now().naive_local();
    let calendar = load_calendar(store, config)?;
    let events = calendar.upcoming(now, count.unwrap_or(config.upcoming_count));

    if events.is_empty() {
        println!("{}", "No upcoming events".dimmed());
        return Ok(());
    }

    print_days(&group_by_day(&events), now.date(), None);
    Ok(())
}
