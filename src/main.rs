mod commands;
mod logging;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use calgrid_core::config::CalGridConfig;
use calgrid_core::event::{EventCategory, parse_date};
use calgrid_core::grid::Month;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "calgrid")]
#[command(about = "A monthly calendar in your terminal")]
struct Cli {
    /// Store events in this directory instead of the configured one
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the month grid
    Show {
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
    /// List the events on one day
    Day {
        /// Date (YYYY-MM-DD)
        date: String,

        /// Print events as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an event
    Add {
        title: String,

        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Work, Personal or Important
        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Change an event's title, description or category
    Edit {
        /// Event id (or a unique prefix of it)
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        category: Option<String>,
    },
    /// Delete an event
    Delete {
        /// Event id (or a unique prefix of it)
        id: String,
    },
    /// Move an event to another day
    Move {
        /// Event id (or a unique prefix of it)
        id: String,

        /// New date (YYYY-MM-DD)
        date: String,
    },
    /// Search titles, descriptions and categories
    Search {
        query: String,

        /// Month grid to show the matches in (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse the calendar interactively
    Browse,
}

fn main() -> Result<()> {
    logging::init()?;

    let cli = Cli::parse();
    let config = CalGridConfig::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data_path());
    let mut calendar = commands::open_calendar(&data_dir, &config)
        .with_context(|| format!("Failed to open events in {}", data_dir.display()))?;

    match cli.command.unwrap_or(Commands::Show { month: None }) {
        Commands::Show { month } => {
            let month = parse_month(month.as_deref())?;
            commands::show::run(&mut calendar, month)
        }
        Commands::Day { date, json } => commands::day::run(&calendar, parse_date(&date)?, json),
        Commands::Add {
            title,
            date,
            category,
            description,
        } => {
            let category = match category {
                Some(c) => c.parse::<EventCategory>()?,
                None => config.default_category,
            };
            commands::add::run(&mut calendar, title, parse_date(&date)?, category, description)
        }
        Commands::Edit {
            id,
            title,
            description,
            category,
        } => {
            let category = category
                .map(|c| c.parse::<EventCategory>())
                .transpose()?;
            commands::edit::run(&mut calendar, &id, title, description, category)
        }
        Commands::Delete { id } => commands::delete::run(&mut calendar, &id),
        Commands::Move { id, date } => {
            commands::reschedule::run(&mut calendar, &id, parse_date(&date)?)
        }
        Commands::Search { query, month, json } => {
            let month = parse_month(month.as_deref())?;
            commands::search::run(&mut calendar, &query, month, json)
        }
        Commands::Browse => commands::browse::run(&mut calendar, config.default_category),
    }
}

fn parse_month(month: Option<&str>) -> Result<Option<Month>> {
    Ok(month.map(str::parse::<Month>).transpose()?)
}
