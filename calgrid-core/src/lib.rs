//! Core types for calgrid.
//!
//! - `grid`: month arithmetic and the week grid shown for a month
//! - `event`: events, categories and their colors
//! - `store`: the persisted, observable event list
//! - `controller`: navigation, selection, search and rescheduling on top of both

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod grid;
pub mod search;
pub mod storage;
pub mod store;

pub use controller::{CalendarController, Modal, ModalMode};
pub use error::{CalGridError, CalGridResult};
pub use event::{Event, EventCategory, EventDraft};
pub use grid::{DayCell, Month, MonthGrid, WeekRow, DAYS};
pub use store::EventStore;
