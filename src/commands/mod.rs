pub mod add;
pub mod browse;
pub mod day;
pub mod delete;
pub mod edit;
pub mod reschedule;
pub mod search;
pub mod show;

use std::path::Path;

use anyhow::Result;
use calgrid_core::CalendarController;
use calgrid_core::clock::{Clock, SystemClock};
use calgrid_core::config::CalGridConfig;
use calgrid_core::storage::{FileStorage, KeyValueStorage};
use calgrid_core::store::EventStore;
use tracing::debug;

/// The controller every command works through.
pub type Calendar = CalendarController<FileStorage>;

pub fn open_calendar(data_dir: &Path, config: &CalGridConfig) -> Result<Calendar> {
    let storage = FileStorage::open(data_dir)?;
    let mut store = EventStore::open(storage)?;

    store.subscribe(|events| debug!(count = events.len(), "Event list changed"));

    Ok(CalendarController::new(store, SystemClock).with_search_delay(config.search_debounce()))
}

/// Resolve a full id or a unique id prefix to a stored event id.
pub fn resolve_id<S, C>(calendar: &CalendarController<S, C>, input: &str) -> Result<String>
where
    S: KeyValueStorage,
    C: Clock,
{
    let events = calendar.store().all();

    if let Some(event) = events.iter().find(|e| e.id == input) {
        return Ok(event.id.clone());
    }

    let matches: Vec<_> = events.iter().filter(|e| e.id.starts_with(input)).collect();
    match matches.as_slice() {
        [] => anyhow::bail!("No event with id '{}'", input),
        [event] => Ok(event.id.clone()),
        _ => anyhow::bail!(
            "Id '{}' is ambiguous ({} events match). Use more characters.",
            input,
            matches.len()
        ),
    }
}
