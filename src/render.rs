//! TUI rendering for calgrid types.
//!
//! Extension traits that add colored terminal output to calgrid-core types
//! using owo_colors. Category colors come from the core color table.

use calgrid_core::event::format_date;
use calgrid_core::{DAYS, DayCell, Event, EventCategory, MonthGrid};
use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Width of one day column
const CELL_WIDTH: usize = 6;

/// Event markers shown under a day before collapsing into "+"
const MAX_MARKERS: usize = 4;

const MARKER: &str = "•";

fn paint(text: &str, category: EventCategory) -> String {
    let (r, g, b) = category.rgb();
    text.truecolor(r, g, b).to_string()
}

/// First 8 characters of an id, enough to address an event from the CLI.
pub fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(i, _)| &id[..i])
}

impl Render for EventCategory {
    fn render(&self) -> String {
        paint(&format!("[{}]", self.name()), *self)
    }
}

impl Render for Event {
    fn render(&self) -> String {
        format!(
            "{} {} {} {}",
            paint(MARKER, self.category),
            self.title,
            self.category.render(),
            short_id(&self.id).dimmed()
        )
    }
}

impl Render for MonthGrid {
    fn render(&self) -> String {
        let width = CELL_WIDTH * DAYS.len();
        let mut lines = Vec::new();

        lines.push(format!("{:^width$}", self.month().label()).bold().to_string());
        lines.push(
            DAYS.iter()
                .map(|d| format!("{:>CELL_WIDTH$}", d))
                .collect::<String>()
                .dimmed()
                .to_string(),
        );

        for week in self.weeks() {
            lines.push(week.days().iter().map(render_day_number).collect());
            lines.push(week.days().iter().map(render_markers).collect());
        }

        lines.join("\n")
    }
}

fn render_day_number(cell: &DayCell) -> String {
    let day = format!("{:>2}", cell.date.day());
    let padding = " ".repeat(CELL_WIDTH - day.len());

    if cell.is_today {
        format!("{}{}", padding, day.reversed().bold())
    } else if !cell.is_current_month {
        format!("{}{}", padding, day.dimmed())
    } else {
        format!("{}{}", padding, day)
    }
}

/// Visible width of the markers for `count` events.
fn marker_width(count: usize) -> usize {
    count.min(MAX_MARKERS) + usize::from(count > MAX_MARKERS)
}

fn render_markers(cell: &DayCell) -> String {
    let count = cell.events.len();
    let mut out = " ".repeat(CELL_WIDTH - marker_width(count));

    for event in cell.events.iter().take(MAX_MARKERS) {
        out.push_str(&paint(MARKER, event.category));
    }
    if count > MAX_MARKERS {
        out.push_str(&"+".dimmed().to_string());
    }

    out
}

/// Label for a day heading (e.g. "Wed Sep 10")
fn date_label(date: NaiveDate) -> String {
    date.format("%a %b %-d").to_string()
}

/// Events grouped under a heading per day, in date order.
pub fn render_event_list(events: &[&Event]) -> String {
    if events.is_empty() {
        return "No events".dimmed().to_string();
    }

    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| e.date);

    let mut lines = Vec::new();
    let mut current_date: Option<NaiveDate> = None;

    for event in sorted {
        if current_date != Some(event.date) {
            if current_date.is_some() {
                lines.push(String::new());
            }
            lines.push(date_label(event.date).bold().to_string());
            current_date = Some(event.date);
        }
        lines.push(format!("  {}", event.render()));
    }

    lines.join("\n")
}

/// Every field of a single event.
pub fn render_event_details(event: &Event) -> String {
    let mut lines = vec![
        format!("{} {}", paint(MARKER, event.category), event.title.bold()),
        format!("  {} {}", "date:".dimmed(), format_date(event.date)),
        format!("  {} {}", "category:".dimmed(), event.category.render()),
    ];
    if let Some(description) = &event.description {
        lines.push(format!("  {} {}", "description:".dimmed(), description));
    }
    lines.push(format!("  {} {}", "id:".dimmed(), event.id.dimmed()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use calgrid_core::Month;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_marker_width() {
        assert_eq!(marker_width(0), 0);
        assert_eq!(marker_width(3), 3);
        assert_eq!(marker_width(4), 4);
        assert_eq!(marker_width(9), 5);
        assert!(marker_width(usize::MAX) < CELL_WIDTH);
    }

    #[test]
    fn test_grid_has_two_lines_per_week() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 10).unwrap();
        let grid = MonthGrid::build(Month::new(2025, 9).unwrap(), today);
        let rendered = grid.render();
        assert_eq!(rendered.lines().count(), 2 + 2 * 5);
        assert!(rendered.contains("September 2025"));
    }

    #[test]
    fn test_event_list_groups_by_day() {
        let d1 = NaiveDate::from_ymd_opt(2025, 9, 10).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 9, 11).unwrap();
        let a = Event::new("Later", None, d2, EventCategory::Work);
        let b = Event::new("First", None, d1, EventCategory::Personal);
        let c = Event::new("Second", None, d1, EventCategory::Important);

        let rendered = render_event_list(&[&a, &b, &c]);
        let first = rendered.find("First").unwrap();
        let later = rendered.find("Later").unwrap();
        assert!(first < later);
        assert_eq!(rendered.matches("Sep 10").count(), 1);
    }
}
