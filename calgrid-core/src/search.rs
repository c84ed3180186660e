//! Event search and input debouncing.

use std::time::{Duration, Instant};

use crate::event::Event;

/// Quiet period before a typed search is applied.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// A normalized search query.
///
/// Matching is a case-insensitive substring test over title, description and
/// category name. An empty query matches every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(text: &str) -> Self {
        SearchQuery {
            needle: text.trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.is_empty() || event.matches_lowercase(&self.needle)
    }
}

/// Timer-reset debouncer with change suppression.
///
/// Each `input` replaces the pending value and restarts the quiet period.
/// `poll` releases the pending value once the period has elapsed, unless it
/// equals the last released value. Time is passed in by the caller.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
    last_emitted: Option<T>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: None,
            last_emitted: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Queue `value`, cancelling whatever was pending.
    pub fn input(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if now >= *due => self.release(),
            _ => None,
        }
    }

    /// Release the pending value immediately, still suppressing repeats.
    pub fn flush(&mut self) -> Option<T> {
        self.release()
    }

    /// Record `value` as released without going through the timer.
    pub fn mark_emitted(&mut self, value: T) {
        self.pending = None;
        self.last_emitted = Some(value);
    }

    fn release(&mut self) -> Option<T> {
        let (value, _) = self.pending.take()?;
        if self.last_emitted.as_ref() == Some(&value) {
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }
}

impl<T: Clone + PartialEq> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
