//! The event store.
//!
//! Owns the canonical event list. Every mutation rewrites the whole list to
//! storage under [`STORAGE_KEY`], then updates memory, then notifies
//! subscribers with the full list.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::CalGridResult;
use crate::event::Event;
use crate::search::SearchQuery;
use crate::storage::KeyValueStorage;

/// Storage key holding the JSON array of all events.
pub const STORAGE_KEY: &str = "calendar_events";

type Listener = Box<dyn FnMut(&[Event])>;

/// Handle returned by [`EventStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct EventStore<S> {
    storage: S,
    events: Vec<Event>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: KeyValueStorage> EventStore<S> {
    /// Load the persisted list from `storage`.
    ///
    /// A missing or empty value starts an empty store. Anything else must parse
    /// as an event list; a parse failure is returned as-is.
    pub fn open(storage: S) -> CalGridResult<Self> {
        let events: Vec<Event> = match storage.get(STORAGE_KEY)? {
            Some(raw) if !raw.is_empty() => serde_json::from_str(&raw)?,
            _ => Vec::new(),
        };

        debug!(count = events.len(), "Loaded events");

        Ok(EventStore {
            storage,
            events,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // QUERIES:

    pub fn all(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events dated exactly `date`, in insertion order.
    pub fn events_on(&self, date: NaiveDate) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.date == date)
            .cloned()
            .collect()
    }

    pub fn search(&self, query: &SearchQuery) -> Vec<&Event> {
        self.events.iter().filter(|e| query.matches(e)).collect()
    }

    // MUTATIONS:

    pub fn add(&mut self, event: Event) -> CalGridResult<()> {
        debug!(id = %event.id, date = %event.date, "Adding event");

        let mut events = self.events.clone();
        events.push(event);
        self.commit(events)
    }

    /// Replace the event with the same id. Returns false (and changes nothing)
    /// if no such event exists.
    pub fn update(&mut self, updated: Event) -> CalGridResult<bool> {
        let Some(index) = self.events.iter().position(|e| e.id == updated.id) else {
            warn!(id = %updated.id, "Ignoring update for unknown event");
            return Ok(false);
        };

        debug!(id = %updated.id, date = %updated.date, "Updating event");

        let mut events = self.events.clone();
        events[index] = updated;
        self.commit(events)?;
        Ok(true)
    }

    /// Remove the event with `id`. Returns false if there was none.
    pub fn delete(&mut self, id: &str) -> CalGridResult<bool> {
        if self.get(id).is_none() {
            warn!(id, "Ignoring delete for unknown event");
            return Ok(false);
        }

        debug!(id, "Deleting event");

        let events = self.events.iter().filter(|e| e.id != id).cloned().collect();
        self.commit(events)?;
        Ok(true)
    }

    // SUBSCRIPTIONS:

    /// Register a listener. It's called right away with the current list, then
    /// after every mutation.
    pub fn subscribe<F>(&mut self, mut listener: F) -> SubscriptionId
    where
        F: FnMut(&[Event]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        listener(&self.events);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, events: Vec<Event>) -> CalGridResult<()> {
        let json = serde_json::to_string(&events)?;
        self.storage.set(STORAGE_KEY, &json)?;
        debug!(count = events.len(), "Persisted events");

        self.events = events;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.events);
        }
        Ok(())
    }
}
