//! Month grid generation.
//!
//! A grid always starts on a Sunday and holds whole weeks: the trailing days of
//! the previous month, every day of the month, then leading days of the next
//! month until the last row is full. Grids have 5 or 6 rows.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::CalGridError;
use crate::event::Event;

/// Weekday headers, in grid column order.
pub const DAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const DAYS_PER_WEEK: u64 = 7;

/// A February with 28 days starting on a Sunday fits in 4 rows; it still gets 5.
const MIN_WEEKS: u64 = 5;

/// Years a [`Month`] can take. Keeps every grid, including its spill-over
/// days, well inside chrono's date range.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// A calendar month (year + month), stored as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    first: NaiveDate,
}

impl Month {
    /// Returns None if `month` is not in 1..=12 or `year` is outside
    /// `MIN_YEAR..=MAX_YEAR`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).and_then(Month::starting_on)
    }

    fn starting_on(first: NaiveDate) -> Option<Self> {
        (MIN_YEAR..=MAX_YEAR)
            .contains(&first.year())
            .then_some(Month { first })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Month {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(self.first)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// The month before, or `self` for the first supported month.
    pub fn prev(&self) -> Month {
        self.first
            .checked_sub_months(Months::new(1))
            .and_then(Month::starting_on)
            .unwrap_or(*self)
    }

    /// The month after, or `self` for the last supported month.
    pub fn next(&self) -> Month {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(Month::starting_on)
            .unwrap_or(*self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Human-readable label, e.g. "September 2025"
    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.first.format("%Y-%m"))
    }
}

impl FromStr for Month {
    type Err = CalGridError;

    /// Parse YYYY-MM
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalGridError::InvalidMonth(s.to_string());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Month::new(year, month).ok_or_else(invalid)
    }
}

/// One day in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub events: Vec<Event>,
}

/// Seven consecutive days, Sunday first.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekRow {
    days: Vec<DayCell>,
}

impl WeekRow {
    pub fn days(&self) -> &[DayCell] {
        &self.days
    }
}

/// The week rows displayed for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    month: Month,
    start: NaiveDate,
    weeks: Vec<WeekRow>,
}

impl MonthGrid {
    /// Build the grid for `month`. Cells carry no events; see [`MonthGrid::populate`].
    pub fn build(month: Month, today: NaiveDate) -> MonthGrid {
        let first = month.first_day();

        // Column of day 1, Sunday = 0
        let leading = u64::from(first.weekday().num_days_from_sunday());
        let start = first.checked_sub_days(Days::new(leading)).unwrap_or(first);

        let filled = leading + u64::from(month.days_in_month());
        let total_weeks = filled.div_ceil(DAYS_PER_WEEK).max(MIN_WEEKS);

        let cells: Vec<DayCell> = start
            .iter_days()
            .take((total_weeks * DAYS_PER_WEEK) as usize)
            .map(|date| DayCell {
                date,
                is_current_month: month.contains(date),
                is_today: date == today,
                events: Vec::new(),
            })
            .collect();

        let weeks = cells
            .chunks(DAYS_PER_WEEK as usize)
            .map(|days| WeekRow {
                days: days.to_vec(),
            })
            .collect();

        MonthGrid {
            month,
            start,
            weeks,
        }
    }

    /// Attach events to every cell using `events_for`.
    pub fn populate<F>(&mut self, mut events_for: F)
    where
        F: FnMut(NaiveDate) -> Vec<Event>,
    {
        for cell in self.weeks.iter_mut().flat_map(|w| w.days.iter_mut()) {
            cell.events = events_for(cell.date);
        }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn weeks(&self) -> &[WeekRow] {
        &self.weeks
    }

    pub fn cells(&self) -> impl Iterator<Item = &DayCell> {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }

    pub fn first_date(&self) -> NaiveDate {
        self.start
    }

    pub fn last_date(&self) -> NaiveDate {
        let cell_count = self.weeks.len() as u64 * DAYS_PER_WEEK;
        self.start
            .checked_add_days(Days::new(cell_count.saturating_sub(1)))
            .unwrap_or(self.start)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_date() && date <= self.last_date()
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        if !self.contains(date) {
            return None;
        }
        let offset = (date - self.start).num_days() as usize;
        self.cells().nth(offset)
    }

    /// Total number of events shown in the grid.
    pub fn event_count(&self) -> usize {
        self.cells().map(|c| c.events.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventCategory;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_september_2025() {
        let month = Month::new(2025, 9).unwrap();
        let grid = MonthGrid::build(month, date(2025, 9, 15));

        assert_eq!(grid.weeks().len(), 5);
        assert_eq!(grid.first_date(), date(2025, 8, 31));
        assert_eq!(grid.last_date(), date(2025, 10, 4));

        let first = &grid.weeks()[0].days()[0];
        assert_eq!(first.date, date(2025, 8, 31));
        assert!(!first.is_current_month);

        let last = grid.cells().last().unwrap();
        assert_eq!(last.date, date(2025, 10, 4));
        assert!(!last.is_current_month);
    }

    #[test]
    fn test_six_week_month() {
        // August 2025 starts on a Friday and has 31 days
        let grid = MonthGrid::build(Month::new(2025, 8).unwrap(), date(2025, 8, 1));
        assert_eq!(grid.weeks().len(), 6);
        assert_eq!(grid.cells().count(), 42);
        assert_eq!(grid.first_date(), date(2025, 7, 27));
        assert_eq!(grid.last_date(), date(2025, 9, 6));
    }

    #[test]
    fn test_february_starting_on_sunday_still_has_five_rows() {
        let grid = MonthGrid::build(Month::new(2015, 2).unwrap(), date(2015, 2, 1));
        assert_eq!(grid.weeks().len(), 5);
        assert_eq!(grid.first_date(), date(2015, 2, 1));
        assert_eq!(grid.last_date(), date(2015, 3, 7));
    }

    #[test]
    fn test_every_month_is_whole_weeks() {
        let today = date(2024, 2, 29);
        let mut month = Month::new(2023, 1).unwrap();
        for _ in 0..48 {
            let grid = MonthGrid::build(month, today);
            let count = grid.cells().count();
            assert!(count == 35 || count == 42, "{} has {} cells", month, count);
            assert!(grid.weeks().iter().all(|w| w.days().len() == 7));
            assert_eq!(grid.first_date().weekday().num_days_from_sunday(), 0);

            let in_month = grid.cells().filter(|c| c.is_current_month).count() as u32;
            assert_eq!(in_month, month.days_in_month());

            let today_count = grid.cells().filter(|c| c.is_today).count();
            assert_eq!(today_count, usize::from(grid.contains(today)));

            month = month.next();
        }
    }

    #[test]
    fn test_today_flag_on_adjacent_month_day() {
        // Aug 31 2025 is visible in the September grid
        let grid = MonthGrid::build(Month::new(2025, 9).unwrap(), date(2025, 8, 31));
        let flagged: Vec<_> = grid.cells().filter(|c| c.is_today).collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].date, date(2025, 8, 31));
        assert!(!flagged[0].is_current_month);
    }

    #[test]
    fn test_today_outside_grid() {
        let grid = MonthGrid::build(Month::new(2025, 9).unwrap(), date(2026, 1, 1));
        assert!(grid.cells().all(|c| !c.is_today));
    }

    #[test]
    fn test_populate_and_cell_lookup() {
        let mut grid = MonthGrid::build(Month::new(2025, 9).unwrap(), date(2025, 9, 1));
        let target = date(2025, 9, 10);
        grid.populate(|d| {
            if d == target {
                vec![Event::new("Review", None, d, EventCategory::Work)]
            } else {
                Vec::new()
            }
        });

        assert_eq!(grid.event_count(), 1);
        assert_eq!(grid.cell(target).unwrap().events[0].title, "Review");
        assert!(grid.cell(date(2025, 10, 5)).is_none());
    }

    #[test]
    fn test_month_navigation_wraps_years() {
        let jan = Month::new(2025, 1).unwrap();
        assert_eq!(jan.prev(), Month::new(2024, 12).unwrap());
        assert_eq!(jan.prev().next(), jan);
        assert_eq!(Month::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(Month::from_date(date(2025, 9, 17)), Month::new(2025, 9).unwrap());
    }

    #[test]
    fn test_month_parse_and_display() {
        let month: Month = "2025-09".parse().unwrap();
        assert_eq!(month.to_string(), "2025-09");
        assert_eq!(month.label(), "September 2025");
        assert!("2025-13".parse::<Month>().is_err());
        assert!("2025-9".parse::<Month>().is_err());
        assert!("september".parse::<Month>().is_err());
    }

    #[test]
    fn test_months_outside_supported_years_are_rejected() {
        assert!(Month::new(MIN_YEAR - 1, 12).is_none());
        assert!(Month::new(MAX_YEAR + 1, 1).is_none());
        assert!("0000-12".parse::<Month>().is_err());
        assert!("10000-01".parse::<Month>().is_err());
    }

    #[test]
    fn test_navigation_stops_at_supported_range() {
        let first = Month::new(MIN_YEAR, 1).unwrap();
        assert_eq!(first.prev(), first);
        assert_eq!(first.next(), Month::new(MIN_YEAR, 2).unwrap());

        let last: Month = "9999-12".parse().unwrap();
        assert_eq!(last.next(), last);
        assert_eq!(last.prev(), Month::new(MAX_YEAR, 11).unwrap());
        assert_eq!(last.days_in_month(), 31);
    }

    #[test]
    fn test_grids_at_range_edges() {
        let today = NaiveDate::from_ymd_opt(2025, 9, 10).unwrap();

        let first = MonthGrid::build(Month::new(MIN_YEAR, 1).unwrap(), today);
        assert_eq!(first.cells().count() % 7, 0);
        assert!(first.contains(NaiveDate::from_ymd_opt(MIN_YEAR, 1, 1).unwrap()));

        let last = MonthGrid::build(Month::new(MAX_YEAR, 12).unwrap(), today);
        assert_eq!(
            last.last_date(),
            last.first_date() + Days::new(last.cells().count() as u64 - 1)
        );
        assert!(last.contains(NaiveDate::from_ymd_opt(MAX_YEAR, 12, 31).unwrap()));
    }
}
