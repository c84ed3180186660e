use anyhow::Result;
use calgrid_core::event::format_date;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use super::{Calendar, resolve_id};

pub fn run(calendar: &mut Calendar, id: &str, date: NaiveDate) -> Result<()> {
    let id = resolve_id(calendar, id)?;

    if calendar.move_event(&id, Some(date))? {
        let title = calendar.store().get(&id).map(|e| e.title.as_str()).unwrap_or_default();
        println!("{}", format!("Moved: {} → {}", title, format_date(date)).green());
    } else {
        println!("{}", "Already on that day".dimmed());
    }

    Ok(())
}
