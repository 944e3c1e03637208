//! Single-fetch mode (`--once`).
//!
//! Loads the starting page, waits for it to settle, and produces what should
//! go to stdout and stderr. In JSON mode stdout only ever carries the JSON
//! page document; notices, including the failure notice, go to stderr.

use crate::api::PageSource;
use crate::cli::OutputFormat;
use crate::controller::{Action, Effect};
use crate::outputs::json;
use crate::outputs::terminal::{TerminalView, render_notice};
use crate::session::Session;
use tracing::instrument;

/// Rendered result of a one-shot fetch.
#[derive(Debug, Default)]
pub struct OnceOutput {
    /// Empty when there is nothing for stdout, e.g. a failed JSON fetch.
    pub stdout: String,
    /// One line per notice.
    pub stderr: Vec<String>,
    pub failed: bool,
}

#[instrument(level = "info", skip_all, fields(?format))]
pub async fn fetch_once<S: PageSource>(
    session: &mut Session<S>,
    view: &TerminalView,
    format: OutputFormat,
) -> Result<OnceOutput, serde_json::Error> {
    let mut effects = session.dispatch(Action::Load);
    effects.extend(session.settle().await);

    let state = session.state();
    let mut output = OnceOutput {
        failed: state.failed(),
        ..OnceOutput::default()
    };

    match format {
        OutputFormat::Text => output.stdout = view.present(state, &effects),
        OutputFormat::Json => {
            if let Some(page) = &state.result {
                output.stdout = json::page_to_json(&state.query, page, &view.placeholder_image)?;
            }
            output.stderr = effects
                .iter()
                .filter_map(|effect| match effect {
                    Effect::Notify(notice) => Some(render_notice(*notice)),
                    _ => None,
                })
                .collect();
        }
    }
    Ok(output)
}
