mod commands;
mod render;

use anyhow::Result;
use calgrid_core::config::CalgridConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{EventFields, ListArgs};

#[derive(Parser)]
#[command(name = "calgrid")]
#[command(about = "Browse and edit a local event calendar with recurring events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month grid (full weeks, Sunday first)
    Month {
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,

        #[command(flatten)]
        filter: ListArgs,
    },
    /// List events in a date range
    List {
        /// First day to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        from: Option<String>,

        /// Last day to show (YYYY-MM-DD), defaults to 30 days after --from
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        filter: ListArgs,
    },
    /// Show every event on one day
    Day {
        /// Day to show (YYYY-MM-DD)
        date: String,
    },
    /// Show the next few events from now
    Upcoming {
        /// How many events to show
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Show one event and its recurrence
    Show {
        /// Event id (an occurrence id resolves to its series)
        id: String,
    },
    /// Create an event
    New {
        title: String,

        /// Date of the (first) occurrence (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        #[command(flatten)]
        fields: EventFields,

        /// Save even if the event overlaps others
        #[arg(long)]
        force: bool,
    },
    /// Change an existing event
    Edit {
        /// Event id (an occurrence id edits its series)
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// New anchor date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        #[command(flatten)]
        fields: EventFields,

        /// Save even if the event overlaps others
        #[arg(long)]
        force: bool,
    },
    /// Move an event to another day, keeping its time
    Move {
        /// Event id (an occurrence id moves its series)
        id: String,

        /// Target day (YYYY-MM-DD)
        date: String,

        /// Move even if the event overlaps others
        #[arg(long)]
        force: bool,
    },
    /// Delete an event (and all of its occurrences)
    Delete {
        /// Event id (an occurrence id deletes its series)
        id: String,
    },
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = CalgridConfig::load()?;
    let store = config.open_store();
    tracing::debug!(store = %store.path().display(), "Using event store");

    match cli.command {
        Commands::Month { month, filter } => commands::month::run(&store, &config, month, filter),
        Commands::List { from, to, filter } => commands::list::run(&store, &config, from, to, filter),
        Commands::Day { date } => commands::day::run(&store, &config, &date),
        Commands::Upcoming { count } => commands::upcoming::run(&store, &config, count),
        Commands::Show { id } => commands::show::run(&store, &id),
        Commands::New {
            title,
            date,
            fields,
            force,
        } => commands::new::run(&store, &config, title, &date, fields, force),
        Commands::Edit {
            id,
            title,
            date,
            fields,
            force,
        } => commands::edit::run(&store, &config, &id, title, date, fields, force),
        Commands::Move { id, date, force } => {
            commands::move_event::run(&store, &config, &id, &date, force)
        }
        Commands::Delete { id } => commands::delete::run(&store, &id),
    }
}

/// Log to stderr, filtered by `CALGRID_LOG` (defaults to warnings only).
fn init_logging() {
    let filter = EnvFilter::try_from_env("CALGRID_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
