//! JSON output for `--once --format json`.
//!
//! # Output Shape
//!
//! ```json
//! {
//!   "query": {"term": null, "category": "technology", "page": 2},
//!   "total_pages": 10,
//!   "articles": [{"title": "...", "description": "...", "url": "...",
//!                 "image": "...", "source_name": "...", "published_at": "..."}]
//! }
//! ```
//!
//! Missing images are filled with the placeholder so consumers never see
//! `null` there.

use crate::models::{Article, PageResult, Query};
use serde::Serialize;
use std::borrow::Cow;

#[derive(Serialize)]
struct PageDocument<'a> {
    query: &'a Query,
    total_pages: u32,
    articles: Vec<Cow<'a, Article>>,
}

/// Render `page` (fetched for `query`) as pretty-printed JSON.
pub fn page_to_json(
    query: &Query,
    page: &PageResult,
    placeholder_image: &str,
) -> Result<String, serde_json::Error> {
    let articles = page
        .articles
        .iter()
        .map(|a| match a.image {
            Some(_) => Cow::Borrowed(a),
            None => Cow::Owned(Article {
                image: Some(placeholder_image.to_string()),
                ..a.clone()
            }),
        })
        .collect();

    serde_json::to_string_pretty(&PageDocument {
        query,
        total_pages: page.total_pages,
        articles,
    })
}
