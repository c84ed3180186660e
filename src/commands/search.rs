use anyhow::Result;
use calgrid_core::Month;

use super::Calendar;
use crate::render::{Render, render_event_list};

pub fn run(calendar: &mut Calendar, query: &str, month: Option<Month>, json: bool) -> Result<()> {
    calendar.set_search(query);

    if json {
        println!("{}", serde_json::to_string_pretty(&calendar.matching_events())?);
        return Ok(());
    }

    match month {
        Some(month) => calendar.go_to(month),
        None => calendar.go_to_today(),
    }

    println!("{}", calendar.grid().render());
    println!();
    println!("{}", render_event_list(&calendar.matching_events()));

    Ok(())
}
