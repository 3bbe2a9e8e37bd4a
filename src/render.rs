//! Terminal rendering for calgrid types.
//!
//! Extension traits that add colored output to calgrid-core types using
//! owo_colors.

use calgrid_core::event::Event;
use calgrid_core::recurrence::describe;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let time = format!("{:>5}", self.time.format("%H:%M"));
        let category = format!("[{}]", self.category);
        let mut line = format!(
            "  {} {} {} {}",
            color_swatch(&self.color),
            time.bold(),
            self.title,
            category.dimmed()
        );

        if self.is_recurring() {
            let badge = format!("↻ {}", describe(self.recurrence.as_ref()));
            line.push(' ');
            line.push_str(&badge.cyan().to_string());
        }

        line
    }
}

/// A dot in the event's color, or a plain dot if the color is not "#rrggbb".
fn color_swatch(color: &str) -> String {
    match parse_hex_color(color) {
        Some((r, g, b)) => "●".truecolor(r, g, b).to_string(),
        None => "●".to_string(),
    }
}

fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Heading for a day, e.g. "Wed Mar 6".
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => format!("Today, {}", date.format("%a %b %-d")),
        1 => format!("Tomorrow, {}", date.format("%a %b %-d")),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// Print day-grouped events, dimming days outside `focus_month` if given.
pub fn print_days(groups: &[(NaiveDate, Vec<Event>)], today: NaiveDate, focus_month: Option<u32>) {
    use chrono::Datelike;

    let mut first = true;
    for (date, events) in groups {
        if !first {
            println!();
        }
        first = false;

        let label = day_label(*date, today);
        if focus_month.is_some_and(|m| m != date.month()) {
            println!("{}", label.dimmed());
        } else {
            println!("{}", label.bold());
        }

        for event in events {
            println!("{}", event.render());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#1976d2"), Some((0x19, 0x76, 0xd2)));
        assert_eq!(parse_hex_color("1976d2"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_day_label() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        assert_eq!(day_label(today, today), "Today, Wed Mar 6");
        assert_eq!(
            day_label(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(), today),
            "Tomorrow, Thu Mar 7"
        );
        assert_eq!(
            day_label(NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(), today),
            "Tue Mar 12"
        );
    }
}
