use anyhow::Result;
use calgrid_core::calendar::Calendar;
use calgrid_core::store::EventStore;
use owo_colors::OwoColorize;

pub fn run(store: &dyn EventStore, id: &str) -> Result<()> {
    let calendar = Calendar::load(store)?;
    let Some(event) = calendar.resolve(id) else {
        anyhow::bail!("Event '{}' not found", id);
    };

    store.delete(&event.id)?;

    let series = if event.is_recurring() { " (all occurrences)" } else { "" };
    println!("{} {}{}", "Deleted".red(), event.title, series);
    Ok(())
}
