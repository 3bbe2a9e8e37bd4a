//! Shared defaults.

/// Upper bound on occurrences produced by a single expansion.
pub const DEFAULT_MAX_OCCURRENCES: usize = 100;

/// Length of the default `list` window when `--to` is omitted.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// How far ahead `upcoming` looks for occurrences.
pub const UPCOMING_HORIZON_DAYS: i64 = 365;

/// Number of events shown by `upcoming` when no count is given.
pub const DEFAULT_UPCOMING_COUNT: usize = 5;

/// Two events starting closer than this on the same day conflict.
pub const DEFAULT_CONFLICT_MINUTES: i64 = 60;

pub const DEFAULT_CATEGORY: &str = "Other";
pub const DEFAULT_COLOR: &str = "#1976d2";

pub const CATEGORIES: [&str; 6] = ["Work", "Personal", "Health", "Social", "Travel", "Other"];

pub const COLORS: [&str; 6] = [
    "#1976d2", "#d32f2f", "#2e7d32", "#ed6c02", "#7b1fa2", "#0288d1",
];

/// Top-level key of the JSON store document.
pub const STORE_KEY: &str = "calendarEvents";
