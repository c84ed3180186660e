use anyhow::Result;
use owo_colors::OwoColorize;

use super::{Calendar, resolve_id};

pub fn run(calendar: &mut Calendar, id: &str) -> Result<()> {
    let id = resolve_id(calendar, id)?;
    let title = calendar
        .store()
        .get(&id)
        .map(|e| e.title.clone())
        .unwrap_or_default();

    if calendar.delete_event(&id)? {
        println!("{}", format!("Deleted: {}", title).red());
    }

    Ok(())
}
