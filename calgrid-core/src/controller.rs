//! Calendar controller.
//!
//! Ties the grid to the store: keeps a cursor month, rebuilds the grid after
//! every navigation or mutation, tracks the open modal and applies the active
//! search filter to what the grid shows.
//!
//! Operations that can't apply (invalid draft, unknown id, no drop target)
//! return `None`/`false` and leave everything as it was.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::CalGridResult;
use crate::event::{Event, EventDraft};
use crate::grid::{MonthGrid, Month, WeekRow};
use crate::search::{Debouncer, SearchQuery};
use crate::storage::KeyValueStorage;
use crate::store::{EventStore, SubscriptionId};

/// What the modal is showing. The presentation layer decides which fields are
/// visible or editable for each mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    /// Form for a new event on the selected date
    Create,
    /// Read-only view of the selected event
    View,
    /// Form prefilled from the selected event
    Update,
    /// All events on the selected date
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    pub mode: ModalMode,
    pub date: NaiveDate,
    /// Events on `date`, unfiltered by search
    pub events: Vec<Event>,
    pub selected: Option<Event>,
}

pub struct CalendarController<S, C = SystemClock> {
    store: EventStore<S>,
    clock: C,
    cursor: Month,
    grid: MonthGrid,
    query: SearchQuery,
    search: Debouncer<SearchQuery>,
    modal: Option<Modal>,
}

impl<S: KeyValueStorage, C: Clock> CalendarController<S, C> {
    /// Start on the current month.
    pub fn new(store: EventStore<S>, clock: C) -> Self {
        let today = clock.today();
        let cursor = Month::from_date(today);

        let mut controller = CalendarController {
            store,
            clock,
            cursor,
            grid: MonthGrid::build(cursor, today),
            query: SearchQuery::default(),
            search: Debouncer::default(),
            modal: None,
        };
        controller.refresh();
        controller
    }

    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search = Debouncer::new(delay);
        self
    }

    // STATE:

    pub fn store(&self) -> &EventStore<S> {
        &self.store
    }

    pub fn month(&self) -> Month {
        self.cursor
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn weeks(&self) -> &[WeekRow] {
        self.grid.weeks()
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    /// Events matching the active search, across all months.
    pub fn matching_events(&self) -> Vec<&Event> {
        self.store.search(&self.query)
    }

    /// Subscribe to the underlying store.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&[Event]) + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Rebuild the grid for the cursor month.
    pub fn refresh(&mut self) {
        let mut grid = MonthGrid::build(self.cursor, self.clock.today());

        let store = &self.store;
        let query = &self.query;
        grid.populate(|date| {
            store
                .events_on(date)
                .into_iter()
                .filter(|e| query.matches(e))
                .collect()
        });

        self.grid = grid;
    }

    // NAVIGATION:

    pub fn prev_month(&mut self) {
        self.go_to(self.cursor.prev());
    }

    pub fn next_month(&mut self) {
        self.go_to(self.cursor.next());
    }

    pub fn go_to_today(&mut self) {
        self.go_to(Month::from_date(self.clock.today()));
    }

    pub fn go_to(&mut self, month: Month) {
        debug!(month = %month, "Navigating");
        self.cursor = month;
        self.refresh();
    }

    // SELECTION:

    /// Open the modal for `date`: the event list if it has events, otherwise
    /// the create form.
    pub fn select_date(&mut self, date: NaiveDate) {
        let events = self.store.events_on(date);
        let mode = if events.is_empty() {
            ModalMode::Create
        } else {
            ModalMode::List
        };

        self.modal = Some(Modal {
            mode,
            date,
            events,
            selected: None,
        });
    }

    /// Open `id` in view mode. Returns false for unknown ids.
    pub fn select_event(&mut self, id: &str) -> bool {
        let Some(event) = self.store.get(id).cloned() else {
            return false;
        };

        self.modal = Some(Modal {
            mode: ModalMode::View,
            date: event.date,
            events: self.store.events_on(event.date),
            selected: Some(event),
        });
        true
    }

    /// Switch the viewed event to the update form.
    pub fn edit_selected(&mut self) -> bool {
        match &mut self.modal {
            Some(modal) if modal.mode == ModalMode::View && modal.selected.is_some() => {
                modal.mode = ModalMode::Update;
                true
            }
            _ => false,
        }
    }

    /// Switch an open modal to the create form for its date.
    pub fn new_event(&mut self) -> bool {
        match &mut self.modal {
            Some(modal) => {
                modal.mode = ModalMode::Create;
                modal.selected = None;
                true
            }
            None => false,
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    // MUTATIONS:

    /// Save a draft as a new event on the selected date and close the modal.
    ///
    /// Nothing happens unless the create form is open and the draft is valid.
    pub fn save(&mut self, draft: &EventDraft) -> CalGridResult<Option<Event>> {
        let Some(modal) = self.modal.as_ref().filter(|m| m.mode == ModalMode::Create) else {
            return Ok(None);
        };
        let Some(event) = draft.to_event(modal.date) else {
            return Ok(None);
        };

        self.store.add(event.clone())?;
        self.close_modal();
        self.refresh();
        Ok(Some(event))
    }

    /// Apply a draft to the event in the update form, then show it in view mode.
    pub fn update_selected(&mut self, draft: &EventDraft) -> CalGridResult<Option<Event>> {
        let Some(current) = self
            .modal
            .as_ref()
            .filter(|m| m.mode == ModalMode::Update)
            .and_then(|m| m.selected.as_ref())
        else {
            return Ok(None);
        };
        let Some(updated) = draft.apply_to(current) else {
            return Ok(None);
        };

        if !self.store.update(updated.clone())? {
            return Ok(None);
        }

        self.modal = Some(Modal {
            mode: ModalMode::View,
            date: updated.date,
            events: self.store.events_on(updated.date),
            selected: Some(updated.clone()),
        });
        self.refresh();
        Ok(Some(updated))
    }

    /// Delete an event. An open modal drops it from its list; if it was the
    /// selected event the modal falls back to the list (or the create form when
    /// the day is now empty).
    pub fn delete_event(&mut self, id: &str) -> CalGridResult<bool> {
        if !self.store.delete(id)? {
            return Ok(false);
        }

        if let Some(modal) = &mut self.modal {
            modal.events.retain(|e| e.id != id);
            if modal.selected.as_ref().is_some_and(|e| e.id == id) {
                modal.selected = None;
                modal.mode = if modal.events.is_empty() {
                    ModalMode::Create
                } else {
                    ModalMode::List
                };
            }
        }

        self.refresh();
        Ok(true)
    }

    /// Re-date an event (drop it on another day).
    ///
    /// A missing target, an unknown id, or dropping onto the same day does nothing.
    pub fn move_event(&mut self, id: &str, target: Option<NaiveDate>) -> CalGridResult<bool> {
        let Some(target) = target else {
            return Ok(false);
        };
        let Some(event) = self.store.get(id) else {
            return Ok(false);
        };
        if event.date == target {
            return Ok(false);
        }

        let moved = event.moved_to(target);
        debug!(id, from = %event.date, to = %target, "Moving event");

        let changed = self.store.update(moved)?;
        if changed {
            self.sync_modal();
        }
        self.refresh();
        Ok(changed)
    }

    /// Re-read an open modal from the store after a change it didn't make.
    ///
    /// A selected event is re-fetched and the modal follows it to its date. A
    /// day list whose events all moved away falls back to the create form.
    fn sync_modal(&mut self) {
        let Some(modal) = &mut self.modal else {
            return;
        };

        if let Some(selected) = &modal.selected {
            match self.store.get(&selected.id) {
                Some(current) => {
                    modal.date = current.date;
                    modal.selected = Some(current.clone());
                }
                None => {
                    modal.selected = None;
                    modal.mode = ModalMode::List;
                }
            }
        }

        modal.events = self.store.events_on(modal.date);
        if modal.selected.is_none() && modal.mode == ModalMode::List && modal.events.is_empty() {
            modal.mode = ModalMode::Create;
        }
    }

    // SEARCH:

    /// Feed a keystroke's worth of search text. Applied later by `poll_search`.
    pub fn search_input(&mut self, text: &str, now: Instant) {
        self.search.input(SearchQuery::new(text), now);
    }

    /// Apply the pending search if its quiet period has elapsed and it differs
    /// from the active one. Returns true if the grid was rebuilt.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(query) => self.apply_query(query),
            None => false,
        }
    }

    /// When a pending search becomes due.
    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    /// Apply a search immediately, bypassing the debounce.
    pub fn set_search(&mut self, text: &str) -> bool {
        let query = SearchQuery::new(text);
        self.search.mark_emitted(query.clone());
        self.apply_query(query)
    }

    pub fn clear_search(&mut self) -> bool {
        self.set_search("")
    }

    fn apply_query(&mut self, query: SearchQuery) -> bool {
        if query == self.query {
            return false;
        }
        debug!(query = query.as_str(), "Applying search");
        self.query = query;
        self.refresh();
        true
    }
}
