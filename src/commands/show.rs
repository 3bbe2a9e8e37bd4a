use anyhow::Result;
use calgrid_core::calendar::Calendar;
use calgrid_core::recurrence::describe;
use calgrid_core::store::EventStore;
use owo_colors::OwoColorize;

pub fn run(store: &dyn EventStore, id: &str) -> Result<()> {
    let calendar = Calendar::load(store)?;
    let Some(event) = calendar.resolve(id) else {
        anyhow::bail!("Event '{}' not found", id);
    };

    println!("{}", event.title.bold());
    println!("  {} {}", "id:".dimmed(), event.id);
    println!("  {} {} {}", "when:".dimmed(), event.date, event.time.format("%H:%M"));
    println!("  {} {}", "category:".dimmed(), event.category);
    println!("  {} {}", "color:".dimmed(), event.color);
    println!("  {} {}", "repeats:".dimmed(), describe(event.recurrence.as_ref()));

    if let Some(end) = event.recurrence.as_ref().and_then(|r| r.end_date) {
        println!("  {} {}", "until:".dimmed(), end);
    }
    if let Some(description) = &event.description {
        println!();
        println!("{}", description);
    }
    if event.anchor_date().is_err() {
        println!();
        println!(
            "{} date '{}' is not a valid YYYY-MM-DD date; fix it with `calgrid edit {} --date ...`",
            "Warning:".yellow(),
            event.date,
            event.id
        );
    }

    Ok(())
}
