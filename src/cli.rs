//! Command-line interface definitions for NewsHub.
//!
//! This module defines the startup arguments using the `clap` crate, and the
//! line commands accepted by the interactive session.

use crate::controller::{Action, FeedState};
use crate::models::Category;
use crate::pagination::{has_next, has_previous};
use clap::{Parser, ValueEnum};
use thiserror::Error;

/// Command-line arguments for the NewsHub application.
///
/// # Examples
///
/// ```sh
/// # Interactive session on the technology headlines
/// newshub --api-key YOUR_KEY --category technology
///
/// # One search, printed as JSON
/// newshub --search "climate" --page 2 --once --format json
///
/// # Route requests through the CORS relay
/// newshub --relay
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// GNews API key
    #[arg(long, env = "GNEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the provider API root
    #[arg(long, env = "GNEWS_BASE_URL")]
    pub base_url: Option<String>,

    /// Send requests through the configured CORS relay
    #[arg(long)]
    pub relay: bool,

    /// Category to browse first
    #[arg(long)]
    pub category: Option<Category>,

    /// Start with a free-text search instead of a category
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page to start on
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Fetch a single page, print it, and exit
    #[arg(long)]
    pub once: bool,

    /// Output format for --once
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Give up on a request after this many seconds (default: wait forever)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// A line typed into the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Category(Category),
    Search(String),
    Next,
    Previous,
    Goto(u32),
    Retry,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type h for help)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a page number")]
    BadPage(String),

    #[error("unknown category '{0}'")]
    BadCategory(String),

    #[error("already on the first page")]
    AtFirstPage,

    #[error("already on the last page")]
    AtLastPage,

    #[error("the last request failed; type r to retry")]
    NothingLoaded,
}

pub const HELP: &str = "\
commands:
  c <category>   browse general, technology, business, sports, health, entertainment
  s <terms>      search; `s` alone clears the search
  n / p          next / previous page
  g <page>       go to page
  r              retry the last request
  h              show this help
  q              quit";

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "c" | "cat" | "category" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("c <category>"));
            }
            rest.parse::<Category>()
                .map(Command::Category)
                .map_err(|_| CommandError::BadCategory(rest.to_string()))
        }
        "s" | "search" | "/" => Ok(Command::Search(rest.to_string())),
        "n" | "next" => Ok(Command::Next),
        "p" | "prev" | "previous" => Ok(Command::Previous),
        "g" | "goto" | "page" => match rest.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(Command::Goto(n)),
            _ if rest.is_empty() => Err(CommandError::Usage("g <page>")),
            _ => Err(CommandError::BadPage(rest.to_string())),
        },
        "r" | "retry" => Ok(Command::Retry),
        "h" | "help" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(line.to_string())),
    }
}

/// Translate a feed command into a controller action.
///
/// Previous and next are refused at the ends of the page range, matching
/// disabled pagination buttons, and after a failed fetch, when there is no
/// page range to move in; `g` jumps anywhere. Returns `Ok(None)` for
/// commands that do not touch the feed.
pub fn command_action(command: &Command, state: &FeedState) -> Result<Option<Action>, CommandError> {
    let page = state.query.page;
    if state.failed() && matches!(command, Command::Next | Command::Previous) {
        return Err(CommandError::NothingLoaded);
    }
    let action = match command {
        Command::Category(c) => Action::ChangeCategory(*c),
        Command::Search(term) => Action::SubmitSearch(term.clone()),
        Command::Next if !has_next(page, state.total_pages()) => {
            return Err(CommandError::AtLastPage);
        }
        Command::Next => Action::ChangePage(page + 1),
        Command::Previous if !has_previous(page) => return Err(CommandError::AtFirstPage),
        Command::Previous => Action::ChangePage(page - 1),
        Command::Goto(n) => Action::ChangePage(*n),
        Command::Retry => Action::Retry,
        Command::Help | Command::Quit => return Ok(None),
    };
    Ok(Some(action))
}
