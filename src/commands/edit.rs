use anyhow::Result;
use calgrid_core::calendar::move_to_date;
use calgrid_core::config::CalgridConfig;
use calgrid_core::event::parse_date;
use calgrid_core::store::EventStore;
use owo_colors::OwoColorize;

use super::{EventFields, check_conflicts, load_calendar};

pub fn run(
    store: &dyn EventStore,
    config: &CalgridConfig,
    id: &str,
    title: Option<String>,
    date: Option<String>,
    fields: EventFields,
    force: bool,
) -> Result<()> {
    let calendar = load_calendar(store, config)?;
    let Some(existing) = calendar.resolve(id) else {
        anyhow::bail!("Event '{}' not found", id);
    };

    let (mut event, anchor) = match date.as_deref() {
        Some(d) => {
            let anchor = parse_date(d)?;
            (move_to_date(existing, anchor), anchor)
        }
        None => (existing.clone(), existing.anchor_date()?),
    };

    if let Some(title) = title {
        event.title = title.trim().to_string();
    }
    if let Some(time) = fields.time()? {
        event.time = time;
    }
    event.recurrence = fields.recurrence(event.recurrence.take(), anchor)?;
    if let Some(description) = fields.description {
        event.description = Some(description.trim().to_string()).filter(|d| !d.is_empty());
    }
    if let Some(category) = fields.category {
        event.category = category;
    }
    if let Some(color) = fields.color {
        event.color = color;
    }

    if event.date != existing.date || event.time != existing.time {
        check_conflicts(&calendar, anchor, event.time, Some(event.id.as_str()), force)?;
    }

    store.update(&event)?;

    println!("{} {}", "Updated".yellow(), event.title);
    Ok(())
}
