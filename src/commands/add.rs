use anyhow::Result;
use calgrid_core::{EventCategory, EventDraft};
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use super::Calendar;
use crate::render::Render;

pub fn run(
    calendar: &mut Calendar,
    title: String,
    date: NaiveDate,
    category: EventCategory,
    description: Option<String>,
) -> Result<()> {
    let draft = EventDraft::new(title, category).with_description(description.unwrap_or_default());

    calendar.select_date(date);
    calendar.new_event();

    match calendar.save(&draft)? {
        Some(event) => println!("{} {}", "Created:".green(), event.render()),
        None => println!("{}", "Nothing saved: the title is empty".yellow()),
    }

    Ok(())
}
