//! # NewsHub
//!
//! A terminal news browser for the GNews API: top headlines by category,
//! free-text search, and paginated article cards.
//!
//! ## Usage
//!
//! ```sh
//! GNEWS_API_KEY=... newshub                      # interactive, general headlines
//! newshub --category sports --once               # print one page and exit
//! newshub --search "climate" --once --format json
//! ```
//!
//! ## Architecture
//!
//! 1. **Controller**: a pure reducer from (state, action) to (state, effects)
//! 2. **Session**: runs fetch effects on tokio tasks, feeds completions back
//! 3. **Provider**: builds the request URL (optionally through a relay) and
//!    maps the JSON response into a page
//! 4. **Output**: renders the state as text, or a page as JSON

use clap::Parser;
use std::error::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod controller;
mod error;
mod models;
mod once;
mod outputs;
mod pagination;
mod request;
mod session;
mod utils;

use api::GNewsClient;
use cli::{Cli, Command, HELP, OutputFormat, command_action, parse_command};
use config::{FeedConfig, load_config};
use controller::Action;
use models::Query;
use outputs::terminal::TerminalView;
use session::Session;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    // Logs go to stderr so they never interleave with the rendered feed.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args.config, once = args.once, "Parsed CLI arguments");

    let config = load_config(args.config.as_deref())?.merge_cli(&args);
    let settings = config.request_settings()?;
    info!(
        base_url = %settings.base_url,
        relay = settings.relay_prefix.is_some(),
        "Provider configured"
    );

    let client = GNewsClient::new(settings, config.default_total_articles, config.timeout());
    let query = initial_query(&args, &config);
    let mut session = Session::new(client, query);
    let view = TerminalView::new(config.placeholder_image.clone());

    if args.once {
        run_once(&mut session, &view, args.format).await
    } else {
        run_interactive(&mut session, &view).await
    }
}

fn initial_query(args: &Cli, config: &FeedConfig) -> Query {
    let query = match &args.search {
        Some(term) => Query::search(term, config.default_category),
        None => Query::browse(config.default_category),
    };
    query.with_page(args.page)
}

/// Fetch the starting page, print it, and exit.
#[instrument(level = "info", skip_all)]
async fn run_once(
    session: &mut Session<GNewsClient>,
    view: &TerminalView,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let output = once::fetch_once(session, view, format).await?;
    if !output.stdout.is_empty() {
        println!("{}", output.stdout);
    }
    for line in &output.stderr {
        eprintln!("{line}");
    }

    if output.failed {
        return Err("failed to fetch news articles".into());
    }
    Ok(())
}

/// Read commands from stdin until `q` or end of input.
///
/// Input and fetch completions are handled as they arrive, so several
/// requests can be in flight; only the latest one is shown.
async fn run_interactive(
    session: &mut Session<GNewsClient>,
    view: &TerminalView,
) -> Result<(), Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let effects = session.dispatch(Action::Load);
    println!("{}", view.present(session.state(), &effects));
    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match command {
                    Command::Quit => break,
                    Command::Help => {
                        println!("{HELP}");
                        continue;
                    }
                    _ => {}
                }
                match command_action(&command, session.state()) {
                    Ok(Some(action)) => {
                        let effects = session.dispatch(action);
                        println!("{}", view.present(session.state(), &effects));
                    }
                    Ok(None) => {}
                    Err(e) => println!("{e}"),
                }
            }
            effects = session.next_completion() => {
                println!("{}", view.present(session.state(), &effects));
            }
        }
    }

    if session.in_flight() > 0 {
        warn!(in_flight = session.in_flight(), "Exiting with requests still in flight");
    }
    Ok(())
}
