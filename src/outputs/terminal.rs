//! Plain-text rendering of the feed.
//!
//! The screen is rebuilt from [`FeedState`] after every change:
//!
//! ```text
//! NewsHub
//! [General] Technology  Business  Sports  Health  Entertainment
//! Search: climate
//!
//!  1. Example Daily · Mar 1, 2025
//!     Headline
//!     Clamped description…
//!     image: https://…
//!     https://example.com/article
//!
//! « prev   1  [2]  3  4  5   next »
//! ```
//!
//! While a fetch is loading only the loading line is shown, never the
//! previous list.

use crate::controller::{Effect, FeedState, Notice, NoticeLevel, Status};
use crate::models::{Article, Category, PageResult};
use crate::pagination::{has_next, has_previous, page_window};
use crate::utils::{clamp_text, upcase};
use chrono::DateTime;
use itertools::Itertools;
use std::fmt::Write;

/// Clears the terminal and homes the cursor.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const DESCRIPTION_CHARS: usize = 240;

/// Display settings for the terminal view.
#[derive(Debug, Clone)]
pub struct TerminalView {
    pub placeholder_image: String,
}

impl TerminalView {
    pub fn new(placeholder_image: impl Into<String>) -> Self {
        Self {
            placeholder_image: placeholder_image.into(),
        }
    }

    /// Render the effects the UI is responsible for, followed by the screen.
    ///
    /// Scroll-to-top clears the terminal before the screen is drawn; notices
    /// are printed underneath it.
    pub fn present(&self, state: &FeedState, effects: &[Effect]) -> String {
        let mut out = String::new();
        if effects.contains(&Effect::ScrollToTop) {
            out.push_str(CLEAR_SCREEN);
        }
        out.push_str(&self.render_screen(state));
        for effect in effects {
            if let Effect::Notify(notice) = effect {
                out.push('\n');
                out.push_str(&render_notice(*notice));
            }
        }
        out
    }

    pub fn render_screen(&self, state: &FeedState) -> String {
        let mut out = String::new();
        writeln!(out, "NewsHub").unwrap();
        writeln!(out, "{}", render_categories(state.query.category)).unwrap();
        if let Some(term) = &state.query.term {
            writeln!(out, "Search: {term}").unwrap();
        }
        out.push('\n');

        match (state.status, &state.result) {
            (Status::Idle, _) => {}
            (Status::Loading, _) => writeln!(out, "Loading articles…").unwrap(),
            (Status::Failure, _) => out.push_str(&render_error()),
            (Status::Success, Some(page)) => {
                out.push_str(&self.render_page(page, state.query.page))
            }
            (Status::Success, None) => {}
        }
        out
    }

    /// Article cards plus the pagination bar.
    pub fn render_page(&self, page: &PageResult, current: u32) -> String {
        if page.is_empty() {
            return "No articles found. Try a different search or category.\n".to_string();
        }

        let mut out = String::new();
        for (i, article) in page.articles.iter().enumerate() {
            out.push_str(&self.render_card(i + 1, article));
            out.push('\n');
        }
        if page.total_pages > 1 {
            writeln!(out, "{}", render_pagination(current, page.total_pages)).unwrap();
        }
        out
    }

    pub fn render_card(&self, number: usize, article: &Article) -> String {
        let mut out = String::new();
        writeln!(
            out,
            "{number:>2}. {} · {}",
            article.source_name,
            format_date(&article.published_at)
        )
        .unwrap();
        writeln!(out, "    {}", article.title).unwrap();
        if !article.description.trim().is_empty() {
            writeln!(out, "    {}", clamp_text(&article.description, DESCRIPTION_CHARS)).unwrap();
        }
        writeln!(out, "    image: {}", article.image_or(&self.placeholder_image)).unwrap();
        writeln!(out, "    {}", article.url).unwrap();
        out
    }
}

/// The category bar with the selected category bracketed.
pub fn render_categories(selected: Category) -> String {
    Category::ALL
        .iter()
        .map(|c| {
            let label = upcase(c.as_str());
            if *c == selected {
                format!("[{label}]")
            } else {
                label
            }
        })
        .join("  ")
}

/// Previous/next controls around at most five page links.
///
/// A disabled control is shown in parentheses.
pub fn render_pagination(current: u32, total: u32) -> String {
    let prev = if has_previous(current) { "« prev" } else { "(« prev)" };
    let next = if has_next(current, total) { "next »" } else { "(next »)" };
    let links = page_window(current, total)
        .into_iter()
        .map(|p| {
            if p == current {
                format!("[{p}]")
            } else {
                p.to_string()
            }
        })
        .join("  ");
    format!("{prev}   {links}   {next}")
}

pub fn render_notice(notice: Notice) -> String {
    match notice.level() {
        NoticeLevel::Info => format!("info: {}", notice.message()),
        NoticeLevel::Error => format!("error: {}", notice.message()),
    }
}

fn render_error() -> String {
    format!(
        "Error\n{}. Please try again later.\nType r to retry.\n",
        Notice::FetchFailed.message()
    )
}

/// Format an RFC 3339 timestamp as `Mar 1, 2025`.
///
/// Anything that does not parse is shown as sent.
pub fn format_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
