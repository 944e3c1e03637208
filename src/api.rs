//! News provider access.
//!
//! This module fetches one page of articles for a [`Query`] and maps the
//! provider's JSON into a [`PageResult`].
//!
//! # Architecture
//!
//! - [`PageSource`]: Core trait defining "fetch one page for this query"
//! - [`GNewsClient`]: The reqwest-backed implementation talking to GNews
//!
//! The session driver only depends on [`PageSource`], so tests can swap in a
//! scripted source without a network.
//!
//! # Failure model
//!
//! Transport errors, non-2xx statuses, malformed JSON and timeouts all come
//! back as a [`FetchError`]. There is no retry here; retrying is a user
//! action.

use crate::error::FetchError;
use crate::models::{Article, PageResult, ProviderResponse, Query};
use crate::pagination::total_pages;
use crate::request::{Endpoint, RequestSettings, request_url};
use crate::utils::truncate_for_log;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Something that can fetch one page of articles.
pub trait PageSource: Send + Sync + 'static {
    /// Fetch the page described by `query`.
    ///
    /// # Returns
    ///
    /// The mapped page, or a [`FetchError`] if the request failed for any
    /// reason. An empty article list is a success, not an error.
    fn fetch_page(
        &self,
        query: &Query,
    ) -> impl Future<Output = Result<PageResult, FetchError>> + Send;
}

/// [`PageSource`] backed by the GNews v4 HTTP API.
#[derive(Debug, Clone)]
pub struct GNewsClient {
    http: reqwest::Client,
    settings: RequestSettings,
    /// Match count assumed when the provider omits `totalArticles`.
    default_total: u64,
    timeout: Option<Duration>,
}

impl GNewsClient {
    pub fn new(settings: RequestSettings, default_total: u64, timeout: Option<Duration>) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
            default_total,
            timeout,
        }
    }

    async fn get_body(&self, url: url::Url) -> Result<String, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.text().await?)
    }
}

impl PageSource for GNewsClient {
    #[instrument(
        level = "info",
        skip_all,
        fields(
            endpoint = Endpoint::for_query(query).path(),
            page = query.page,
            relay = self.settings.relay_prefix.is_some()
        )
    )]
    async fn fetch_page(&self, query: &Query) -> Result<PageResult, FetchError> {
        let t0 = Instant::now();
        let url = request_url(&self.settings, query)?;

        let body = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.get_body(url))
                .await
                .map_err(|_| FetchError::Timeout)??,
            None => self.get_body(url).await?,
        };

        let response: ProviderResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                body_preview = %truncate_for_log(&body, 300),
                "Provider returned malformed JSON"
            );
            FetchError::Decode(e)
        })?;

        let page = into_page(response, self.settings.page_size, self.default_total);
        debug!(
            articles = page.articles.len(),
            total_pages = page.total_pages,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(page)
    }
}

/// Map a decoded provider response onto a page of display records.
///
/// Missing `articles` becomes an empty page; the page count falls back to
/// `default_total` matches when `totalArticles` is missing or falsy.
pub fn into_page(response: ProviderResponse, page_size: u32, default_total: u64) -> PageResult {
    PageResult {
        articles: response
            .articles
            .unwrap_or_default()
            .into_iter()
            .map(Article::from)
            .collect(),
        total_pages: total_pages(response.total_articles, page_size, default_total),
    }
}
