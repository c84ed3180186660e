use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use super::Calendar;
use crate::render::{Render, render_event_list};

pub fn run(calendar: &Calendar, date: NaiveDate, json: bool) -> Result<()> {
    let events = calendar.store().events_on(date);

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("{}", format!("No events on {}", date.format("%a %b %-d %Y")).dimmed());
        return Ok(());
    }

    let refs: Vec<&_> = events.iter().collect();
    println!("{}", render_event_list(&refs));

    // Descriptions aren't part of the list view
    for event in events.iter().filter(|e| e.description.is_some()) {
        println!();
        println!("{}", event.render());
        if let Some(description) = &event.description {
            println!("  {}", description.dimmed());
        }
    }

    Ok(())
}
