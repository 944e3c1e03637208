//! Request URL construction.
//!
//! Turning a [`Query`] into the outbound URL is kept free of I/O and of any
//! inspection of the runtime environment: whether the relay is used is
//! decided once, at startup, and carried in [`RequestSettings`].
//!
//! # URL shapes
//!
//! ```text
//! {base}/search?q=<term>&lang=en&country=us&max=10&page=<n>&apikey=<key>
//! {base}/top-headlines?category=<c>&lang=en&country=us&max=10&page=<n>&apikey=<key>
//! {relay_prefix}<percent-encoded provider URL>
//! ```

use crate::models::Query;
use itertools::Itertools;
use url::Url;

/// Everything needed to address the provider.
#[derive(Debug, Clone)]
pub struct RequestSettings {
    /// API root, e.g. `https://gnews.io/api/v4`. Never a cannot-be-a-base URL.
    pub base_url: Url,
    pub api_key: String,
    pub language: String,
    pub country: String,
    pub page_size: u32,
    /// Set when requests must go through the relay.
    pub relay_prefix: Option<String>,
}

/// Which provider endpoint a query maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Search,
    TopHeadlines,
}

impl Endpoint {
    pub fn for_query(query: &Query) -> Self {
        if query.is_search() {
            Endpoint::Search
        } else {
            Endpoint::TopHeadlines
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Search => "search",
            Endpoint::TopHeadlines => "top-headlines",
        }
    }
}

/// Build the provider URL for `query`, without relay wrapping.
pub fn provider_url(settings: &RequestSettings, query: &Query) -> Url {
    let endpoint = Endpoint::for_query(query);
    let mut url = settings.base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(endpoint.path());
    }

    let mode = match &query.term {
        Some(term) => ("q", term.clone()),
        None => ("category", query.category.as_str().to_string()),
    };
    let pairs = [
        mode,
        ("lang", settings.language.clone()),
        ("country", settings.country.clone()),
        ("max", settings.page_size.to_string()),
        ("page", query.page.to_string()),
        ("apikey", settings.api_key.clone()),
    ];
    // Percent-encoding (`%20`), not form encoding (`+`), for every value.
    let encoded = pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .join("&");
    url.set_query(Some(&encoded));
    url
}

/// Build the URL actually requested: the provider URL, wrapped in the relay
/// when one is configured.
pub fn request_url(settings: &RequestSettings, query: &Query) -> Result<Url, url::ParseError> {
    let real = provider_url(settings, query);
    match &settings.relay_prefix {
        Some(prefix) => wrap_in_relay(prefix, &real),
        None => Ok(real),
    }
}

fn wrap_in_relay(prefix: &str, real: &Url) -> Result<Url, url::ParseError> {
    Url::parse(&format!("{}{}", prefix, urlencoding::encode(real.as_str())))
}
