use anyhow::Result;
use calgrid_core::calendar::{EventFilter, group_by_day};
use calgrid_core::config::CalgridConfig;
use calgrid_core::date_range::DateWindow;
use calgrid_core::store::EventStore;
use owo_colors::OwoColorize;

use super::{ListArgs, load_calendar, today};
use crate::render::print_days;

pub fn run(
    store: &dyn EventStore,
    config: &CalgridConfig,
    from: Option<String>,
    to: Option<String>,
    filter: ListArgs,
) -> Result<()> {
    let today = today();
    let window = DateWindow::from_args(from.as_deref(), to.as_deref(), today)?;
    let calendar = load_calendar(store, config)?;
    let events = calendar.in_window(window, &EventFilter::from(filter));

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    print_days(&group_by_day(&events), today, None);
    Ok(())
}
