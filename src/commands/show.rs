use anyhow::Result;
use calgrid_core::Month;

use super::Calendar;
use crate::render::{Render, render_event_list};

pub fn run(calendar: &mut Calendar, month: Option<Month>) -> Result<()> {
    match month {
        Some(month) => calendar.go_to(month),
        None => calendar.go_to_today(),
    }

    let grid = calendar.grid();
    println!("{}", grid.render());
    println!();

    let events: Vec<_> = grid
        .cells()
        .filter(|c| c.is_current_month)
        .flat_map(|c| c.events.iter())
        .collect();

    println!("{}", render_event_list(&events));

    Ok(())
}
