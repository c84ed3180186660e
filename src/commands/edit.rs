use anyhow::Result;
use calgrid_core::{EventCategory, EventDraft};
use owo_colors::OwoColorize;

use super::{Calendar, resolve_id};
use crate::render::render_event_details;

pub fn run(
    calendar: &mut Calendar,
    id: &str,
    title: Option<String>,
    description: Option<String>,
    category: Option<EventCategory>,
) -> Result<()> {
    let id = resolve_id(calendar, id)?;

    calendar.select_event(&id);
    calendar.edit_selected();

    let Some(current) = calendar.modal().and_then(|m| m.selected.clone()) else {
        anyhow::bail!("No event with id '{}'", id);
    };

    let mut draft = EventDraft::from_event(&current);
    if let Some(title) = title {
        draft.title = title;
    }
    if let Some(description) = description {
        draft.description = description;
    }
    if let Some(category) = category {
        draft.category = category;
    }

    match calendar.update_selected(&draft)? {
        Some(event) => {
            println!("{}", "Updated:".yellow());
            println!("{}", render_event_details(&event));
        }
        None => println!("{}", "Nothing saved: the title is empty".yellow()),
    }

    Ok(())
}
