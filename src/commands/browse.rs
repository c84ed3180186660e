//! Interactive month browser.
//!
//! The grid is redrawn after every action. Opening a day walks the controller's
//! modal modes (list, create, view, update) with prompts standing in for the form.

use anyhow::Result;
use calgrid_core::event::parse_date;
use calgrid_core::{EventCategory, EventDraft, Modal, ModalMode};
use chrono::NaiveDate;
use dialoguer::{Confirm, Input, Select};
use owo_colors::OwoColorize;

use super::Calendar;
use crate::render::{Render, render_event_details};

#[derive(Clone, Copy)]
enum Action {
    Prev,
    Next,
    Today,
    OpenDay,
    Search,
    ClearSearch,
    Quit,
}

const ACTIONS: [(&str, Action); 7] = [
    ("Previous month", Action::Prev),
    ("Next month", Action::Next),
    ("Today", Action::Today),
    ("Open a day", Action::OpenDay),
    ("Search", Action::Search),
    ("Clear search", Action::ClearSearch),
    ("Quit", Action::Quit),
];

pub fn run(calendar: &mut Calendar, default_category: EventCategory) -> Result<()> {
    loop {
        println!();
        println!("{}", calendar.grid().render());
        if !calendar.query().is_empty() {
            println!("{}", format!("  filter: \"{}\"", calendar.query().as_str()).dimmed());
        }
        println!();

        let labels: Vec<&str> = ACTIONS.iter().map(|(label, _)| *label).collect();
        let choice = Select::new().items(&labels).default(0).interact()?;

        match ACTIONS[choice].1 {
            Action::Prev => calendar.prev_month(),
            Action::Next => calendar.next_month(),
            Action::Today => calendar.go_to_today(),
            Action::OpenDay => {
                if let Some(date) = prompt_day(calendar)? {
                    calendar.select_date(date);
                    modal_loop(calendar, default_category)?;
                }
            }
            Action::Search => {
                let query: String = Input::new()
                    .with_prompt("  Search")
                    .allow_empty(true)
                    .interact_text()?;
                calendar.set_search(&query);
            }
            Action::ClearSearch => {
                calendar.clear_search();
            }
            Action::Quit => return Ok(()),
        }
    }
}

/// Ask for a day of the shown month ("14") or any date ("2025-10-02").
fn prompt_day(calendar: &Calendar) -> Result<Option<NaiveDate>> {
    let input: String = Input::new()
        .with_prompt("  Day (number or YYYY-MM-DD)")
        .interact_text()?;

    let month = calendar.month();
    let date = match input.trim().parse::<u32>() {
        Ok(day) => NaiveDate::from_ymd_opt(month.year(), month.month(), day),
        Err(_) => parse_date(&input).ok(),
    };

    if date.is_none() {
        eprintln!("  {}", format!("Not a valid day: {}", input).red());
    }
    Ok(date)
}

fn modal_loop(calendar: &mut Calendar, default_category: EventCategory) -> Result<()> {
    while let Some(modal) = calendar.modal().cloned() {
        println!();
        match modal.mode {
            ModalMode::List => list_step(calendar, &modal)?,
            ModalMode::Create => create_step(calendar, &modal, default_category)?,
            ModalMode::View => view_step(calendar, &modal)?,
            ModalMode::Update => update_step(calendar, &modal)?,
        }
    }
    Ok(())
}

fn list_step(calendar: &mut Calendar, modal: &Modal) -> Result<()> {
    println!("{}", modal.date.format("%A %B %-d, %Y").bold());

    let mut items: Vec<String> = modal.events.iter().map(|e| e.render()).collect();
    items.push("New event".to_string());
    items.push("Back".to_string());

    let choice = Select::new().items(&items).default(0).interact()?;
    match modal.events.get(choice) {
        Some(event) => {
            calendar.select_event(&event.id);
        }
        None if choice == modal.events.len() => {
            calendar.new_event();
        }
        None => calendar.close_modal(),
    }
    Ok(())
}

fn create_step(calendar: &mut Calendar, modal: &Modal, default_category: EventCategory) -> Result<()> {
    println!("{}", format!("New event on {}", modal.date.format("%a %b %-d")).bold());

    let draft = prompt_draft(&EventDraft::new("", default_category))?;
    match calendar.save(&draft)? {
        Some(event) => println!("{} {}", "Created:".green(), event.render()),
        None => {
            println!("{}", "Nothing saved: the title is empty".yellow());
            calendar.close_modal();
        }
    }
    Ok(())
}

fn view_step(calendar: &mut Calendar, modal: &Modal) -> Result<()> {
    let Some(event) = &modal.selected else {
        calendar.close_modal();
        return Ok(());
    };

    println!("{}", render_event_details(event));

    let choice = Select::new()
        .items(&["Edit", "Move to another day", "Delete", "Back"])
        .default(0)
        .interact()?;

    match choice {
        0 => {
            calendar.edit_selected();
        }
        1 => {
            let input: String = Input::new()
                .with_prompt("  Move to (YYYY-MM-DD)")
                .interact_text()?;
            // An unreadable target leaves the event where it is
            if calendar.move_event(&event.id, parse_date(&input).ok())? {
                println!("{}", format!("Moved to {}", input.trim()).green());
            }
            calendar.close_modal();
        }
        2 => {
            let confirmed = Confirm::new()
                .with_prompt("  Are you sure you want to delete this event?")
                .default(false)
                .interact()?;
            if confirmed && calendar.delete_event(&event.id)? {
                println!("{}", format!("Deleted: {}", event.title).red());
            }
        }
        _ => calendar.select_date(modal.date),
    }
    Ok(())
}

fn update_step(calendar: &mut Calendar, modal: &Modal) -> Result<()> {
    let Some(event) = &modal.selected else {
        calendar.close_modal();
        return Ok(());
    };

    let draft = prompt_draft(&EventDraft::from_event(event))?;
    if calendar.update_selected(&draft)?.is_none() {
        println!("{}", "Nothing saved: the title is empty".yellow());
        calendar.select_event(&event.id);
    }
    Ok(())
}

/// Prompt for every draft field, prefilled from `initial`.
fn prompt_draft(initial: &EventDraft) -> Result<EventDraft> {
    let title: String = Input::new()
        .with_prompt("  Title")
        .with_initial_text(initial.title.clone())
        .allow_empty(true)
        .interact_text()?;

    let description: String = Input::new()
        .with_prompt("  Description (skip)")
        .with_initial_text(initial.description.clone())
        .allow_empty(true)
        .interact_text()?;

    let names: Vec<&str> = EventCategory::ALL.iter().map(|c| c.name()).collect();
    let current = EventCategory::ALL
        .iter()
        .position(|c| *c == initial.category)
        .unwrap_or(0);
    let choice = Select::new()
        .with_prompt("  Category")
        .items(&names)
        .default(current)
        .interact()?;

    Ok(EventDraft {
        title,
        description,
        category: EventCategory::ALL[choice],
    })
}
