//! The feed controller as a pure state transition.
//!
//! [`reduce`] takes the previous [`FeedState`] and an [`Action`] and returns
//! the next state plus a list of [`Effect`]s for the caller to carry out.
//! Nothing here performs I/O; the session driver executes fetches and feeds
//! their outcomes back in as [`Action::Resolved`].
//!
//! # Fetch cycle
//!
//! ```text
//! Idle ──trigger──▶ Loading ──ok──▶ Success
//!                      └────err──▶ Failure
//! ```
//!
//! `Success` and `Failure` are settled states that remember how the last
//! fetch ended. Any trigger moves back to `Loading`.
//!
//! # Overlapping requests
//!
//! Every fetch gets a sequence number one higher than the last. Only the
//! completion carrying the latest number is applied; anything older is
//! dropped, so the most recently *requested* page wins regardless of the
//! order responses arrive in.

use crate::error::FetchError;
use crate::models::{Category, PageResult, Query};
use tracing::{debug, error, info, warn};

/// Where the current fetch cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Success,
    Failure,
}

/// A user-visible, fire-and-forget notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoResults,
    FetchFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::NoResults => NoticeLevel::Info,
            Notice::FetchFailed => NoticeLevel::Error,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::NoResults => "No articles found for your search",
            Notice::FetchFailed => "Failed to fetch news articles",
        }
    }
}

/// Everything that can happen to the feed.
#[derive(Debug)]
pub enum Action {
    /// First fetch for the starting query.
    Load,
    ChangeCategory(Category),
    /// Submit the search box; a blank term means "browse the current category".
    SubmitSearch(String),
    ChangePage(u32),
    /// Re-issue the fetch for the current query.
    Retry,
    /// A fetch issued with sequence number `seq` has finished.
    Resolved {
        seq: u64,
        outcome: Result<PageResult, FetchError>,
    },
}

/// Work for the caller to carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { seq: u64, query: Query },
    ScrollToTop,
    Notify(Notice),
}

/// Session state owned by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedState {
    pub query: Query,
    pub status: Status,
    /// The last successfully fetched page. Cleared on failure.
    pub result: Option<PageResult>,
    /// Sequence number of the most recently issued fetch; 0 before the first.
    pub latest_seq: u64,
}

impl FeedState {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    pub fn failed(&self) -> bool {
        self.status == Status::Failure
    }

    /// Page count of the current result, 1 when there is none.
    pub fn total_pages(&self) -> u32 {
        self.result.as_ref().map_or(1, |r| r.total_pages)
    }

    fn begin_fetch(mut self, mut effects: Vec<Effect>) -> (Self, Vec<Effect>) {
        self.latest_seq += 1;
        self.status = Status::Loading;
        effects.push(Effect::Fetch {
            seq: self.latest_seq,
            query: self.query.clone(),
        });
        (self, effects)
    }
}

/// Apply `action` to `state`.
pub fn reduce(mut state: FeedState, action: Action) -> (FeedState, Vec<Effect>) {
    match action {
        Action::Load => {
            debug!(query = ?state.query, "Initial load");
            state.begin_fetch(Vec::new())
        }
        Action::Retry => {
            info!(query = ?state.query, "Retrying fetch");
            state.begin_fetch(Vec::new())
        }
        Action::ChangeCategory(category) => {
            state.query = Query::browse(category);
            debug!(%category, "Category changed");
            state.begin_fetch(Vec::new())
        }
        Action::SubmitSearch(term) => {
            state.query = Query::search(&term, state.query.category);
            debug!(term = ?state.query.term, "Search submitted");
            state.begin_fetch(Vec::new())
        }
        Action::ChangePage(0) => {
            warn!("Ignoring request for page 0");
            (state, Vec::new())
        }
        Action::ChangePage(page) => {
            state.query = state.query.with_page(page);
            debug!(page, "Page changed");
            state.begin_fetch(vec![Effect::ScrollToTop])
        }
        Action::Resolved { seq, outcome } => resolve(state, seq, outcome),
    }
}

fn resolve(
    mut state: FeedState,
    seq: u64,
    outcome: Result<PageResult, FetchError>,
) -> (FeedState, Vec<Effect>) {
    if seq != state.latest_seq {
        debug!(seq, latest = state.latest_seq, "Discarding stale response");
        return (state, Vec::new());
    }

    match outcome {
        Ok(page) => {
            let mut effects = Vec::new();
            if page.is_empty() {
                effects.push(Effect::Notify(Notice::NoResults));
            }
            info!(
                seq,
                articles = page.articles.len(),
                total_pages = page.total_pages,
                "Page loaded"
            );
            state.status = Status::Success;
            state.result = Some(page);
            (state, effects)
        }
        Err(e) => {
            error!(seq, query = ?state.query, error = %e, "Error fetching news");
            state.status = Status::Failure;
            state.result = None;
            (state, vec![Effect::Notify(Notice::FetchFailed)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Article;
    use reqwest::StatusCode;

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: String::new(),
            url: format!("https://example.com/{title}"),
            image: None,
            source_name: "Example".to_string(),
            published_at: "2025-03-01T12:00:00Z".to_string(),
        }
    }

    fn page(titles: &[&str], total_pages: u32) -> PageResult {
        PageResult {
            articles: titles.iter().map(|t| article(t)).collect(),
            total_pages,
        }
    }

    fn fetched_query(effects: &[Effect]) -> Query {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::Fetch { query, .. } => Some(query.clone()),
                _ => None,
            })
            .expect("no fetch effect")
    }

    fn loaded(query: Query) -> FeedState {
        let (state, effects) = reduce(FeedState::new(query), Action::Load);
        let (state, _) = reduce(
            state,
            Action::Resolved {
                seq: 1,
                outcome: Ok(page(&["a"], 10)),
            },
        );
        assert!(matches!(effects[0], Effect::Fetch { seq: 1, .. }));
        state
    }

    #[test]
    fn test_initial_load_fetches_general() {
        let (state, effects) = reduce(FeedState::default(), Action::Load);
        assert_eq!(state.status, Status::Loading);
        assert_eq!(
            effects,
            vec![Effect::Fetch {
                seq: 1,
                query: Query::browse(Category::General)
            }]
        );
    }

    #[test]
    fn test_change_category_resets_query() {
        let start = loaded(Query::search("climate", Category::Business).with_page(4));
        for category in Category::ALL {
            let (state, effects) = reduce(start.clone(), Action::ChangeCategory(category));
            assert_eq!(state.query.term, None);
            assert_eq!(state.query.category, category);
            assert_eq!(state.query.page, 1);
            assert_eq!(fetched_query(&effects), state.query);
            assert!(state.is_loading());
        }
    }

    #[test]
    fn test_blank_search_matches_category_change() {
        let start = loaded(Query::search("climate", Category::Sports).with_page(3));
        let (by_search, _) = reduce(start.clone(), Action::SubmitSearch("   ".to_string()));
        let (by_category, _) = reduce(start, Action::ChangeCategory(Category::Sports));
        assert_eq!(by_search.query, by_category.query);
    }

    #[test]
    fn test_search_resets_page() {
        let start = loaded(Query::browse(Category::Health).with_page(5));
        let (state, effects) = reduce(start, Action::SubmitSearch("vaccines".to_string()));
        assert_eq!(state.query.term.as_deref(), Some("vaccines"));
        assert_eq!(state.query.page, 1);
        assert_eq!(state.query.category, Category::Health);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_change_page_preserves_mode() {
        let searching = loaded(Query::search("climate", Category::General));
        let (state, effects) = reduce(searching, Action::ChangePage(3));
        assert_eq!(state.query.term.as_deref(), Some("climate"));
        assert_eq!(state.query.page, 3);
        assert!(effects.contains(&Effect::ScrollToTop));

        let browsing = loaded(Query::browse(Category::Technology));
        let (state, _) = reduce(browsing, Action::ChangePage(2));
        assert_eq!(state.query, Query::browse(Category::Technology).with_page(2));
    }

    #[test]
    fn test_change_page_is_not_bounded_by_total() {
        let start = loaded(Query::default());
        let (state, effects) = reduce(start, Action::ChangePage(42));
        assert_eq!(state.query.page, 42);
        assert_eq!(fetched_query(&effects).page, 42);
    }

    #[test]
    fn test_page_zero_is_ignored() {
        let start = loaded(Query::default());
        let (state, effects) = reduce(start.clone(), Action::ChangePage(0));
        assert_eq!(state, start);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_empty_result_is_success_with_notice() {
        let (state, _) = reduce(FeedState::default(), Action::Load);
        let (state, effects) = reduce(
            state,
            Action::Resolved {
                seq: 1,
                outcome: Ok(page(&[], 10)),
            },
        );
        assert_eq!(state.status, Status::Success);
        assert!(!state.failed());
        assert_eq!(state.result.as_ref().map(|r| r.articles.len()), Some(0));
        assert_eq!(effects, vec![Effect::Notify(Notice::NoResults)]);
    }

    #[test]
    fn test_failure_clears_articles_and_notifies_once() {
        let start = loaded(Query::default());
        assert!(start.result.is_some());

        let (state, _) = reduce(start, Action::ChangePage(2));
        let (state, effects) = reduce(
            state,
            Action::Resolved {
                seq: 2,
                outcome: Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
            },
        );

        assert_eq!(state.status, Status::Failure);
        assert!(state.failed());
        assert!(state.result.is_none());
        let failures = effects
            .iter()
            .filter(|e| **e == Effect::Notify(Notice::FetchFailed))
            .count();
        assert_eq!(failures, 1);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_retry_reissues_current_query() {
        let (state, _) = reduce(
            FeedState::new(Query::search("climate", Category::General).with_page(2)),
            Action::Load,
        );
        let (state, _) = reduce(
            state,
            Action::Resolved {
                seq: 1,
                outcome: Err(FetchError::Timeout),
            },
        );
        let (state, effects) = reduce(state, Action::Retry);
        assert!(state.is_loading());
        assert_eq!(
            effects,
            vec![Effect::Fetch {
                seq: 2,
                query: Query::search("climate", Category::General).with_page(2)
            }]
        );
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let start = loaded(Query::default());
        let (state, _) = reduce(start, Action::ChangePage(2));
        let (state, _) = reduce(state, Action::ChangePage(3));
        assert_eq!(state.latest_seq, 3);

        // Page 3 arrives first, then the slower page 2 response.
        let (state, _) = reduce(
            state,
            Action::Resolved {
                seq: 3,
                outcome: Ok(page(&["page three"], 10)),
            },
        );
        let (state, effects) = reduce(
            state,
            Action::Resolved {
                seq: 2,
                outcome: Ok(page(&["page two"], 10)),
            },
        );

        assert!(effects.is_empty());
        assert_eq!(state.query.page, 3);
        assert_eq!(state.result.unwrap().articles[0].title, "page three");
    }

    #[test]
    fn test_stale_failure_does_not_notify() {
        let start = loaded(Query::default());
        let (state, _) = reduce(start, Action::ChangePage(2));
        let (state, _) = reduce(state, Action::ChangePage(3));
        let (state, effects) = reduce(
            state,
            Action::Resolved {
                seq: 2,
                outcome: Err(FetchError::Timeout),
            },
        );
        assert!(effects.is_empty());
        assert!(state.is_loading());
    }

    #[test]
    fn test_total_pages_without_result() {
        assert_eq!(FeedState::default().total_pages(), 1);
        assert_eq!(loaded(Query::default()).total_pages(), 10);
    }
}
