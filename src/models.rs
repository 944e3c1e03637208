//! Data models for queries, articles and fetched pages.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Category`]: The fixed set of headline categories the provider supports
//! - [`Query`]: The search/category/page selection driving the next fetch
//! - [`Article`]: A display record for a single news story
//! - [`PageResult`]: One page of articles plus the derived page count
//! - [`ProviderResponse`] / [`ProviderArticle`]: The provider's JSON wire shape
//!
//! The wire types use the provider's camelCase field names via serde renames.

use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Headline category for top-headlines browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Technology,
    Business,
    Sports,
    Health,
    Entertainment,
}

impl Category {
    /// All categories, in the order they are offered to the user.
    pub const ALL: [Category; 6] = [
        Category::General,
        Category::Technology,
        Category::Business,
        Category::Sports,
        Category::Health,
        Category::Entertainment,
    ];

    /// The value sent as the `category` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Technology => "technology",
            Category::Business => "business",
            Category::Sports => "sports",
            Category::Health => "health",
            Category::Entertainment => "entertainment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| ConfigError::InvalidCategory(s.to_string()))
    }
}

/// The current search/category/page selection.
///
/// Exactly one retrieval mode is active: free-text search when `term` is
/// present, category browse otherwise. The category is kept while searching
/// so that clearing the search returns to the same category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    /// Free-text search term; `None` means category browse.
    pub term: Option<String>,
    /// The selected headline category.
    pub category: Category,
    /// 1-based page number.
    pub page: u32,
}

impl Query {
    /// A category browse starting on the first page.
    pub fn browse(category: Category) -> Self {
        Self {
            term: None,
            category,
            page: 1,
        }
    }

    /// A search for `term` starting on the first page.
    ///
    /// A blank term yields a category browse on `category` instead. A
    /// non-blank term is kept exactly as typed.
    pub fn search(term: &str, category: Category) -> Self {
        Self {
            term: (!term.trim().is_empty()).then(|| term.to_string()),
            category,
            page: 1,
        }
    }

    /// The same retrieval mode on a different page.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    pub fn is_search(&self) -> bool {
        self.term.is_some()
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::browse(Category::General)
    }
}

/// A news story as displayed on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    /// Image URL; `None` when the provider sent nothing usable.
    pub image: Option<String>,
    pub source_name: String,
    /// Publication timestamp exactly as the provider sent it.
    pub published_at: String,
}

impl Article {
    /// The image URL, or `placeholder` when the article has none.
    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.image.as_deref().unwrap_or(placeholder)
    }
}

impl From<ProviderArticle> for Article {
    fn from(raw: ProviderArticle) -> Self {
        Self {
            title: raw.title,
            description: raw.description.unwrap_or_default(),
            url: raw.url,
            image: raw.image.filter(|i| !i.trim().is_empty()),
            source_name: raw.source.name,
            published_at: raw.published_at,
        }
    }
}

/// One fetched page of articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult {
    /// Articles in provider order.
    pub articles: Vec<Article>,
    /// Derived page count, at least 1.
    pub total_pages: u32,
}

impl PageResult {
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Top-level JSON body returned by the search and top-headlines endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderResponse {
    #[serde(default)]
    pub articles: Option<Vec<ProviderArticle>>,
    /// The reported match count; `None` when missing or falsy.
    #[serde(default, rename = "totalArticles", deserialize_with = "truthy_count")]
    pub total_articles: Option<u64>,
}

/// A single article as sent by the provider.
#[derive(Debug, Deserialize)]
pub struct ProviderArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, rename = "publishedAt")]
    pub published_at: String,
    #[serde(default)]
    pub source: ProviderSource,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderSource {
    #[serde(default)]
    pub name: String,
}

/// Accepts any JSON value for `totalArticles` and keeps only positive numbers.
///
/// `0`, `false`, `null`, and non-numeric values all collapse to `None` so the
/// caller can substitute its default total.
fn truthy_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(n.filter(|n| n.is_finite() && *n > 0.0).map(|n| n.ceil() as u64))
}
