//! Headlines API access.
//!
//! - `category` - the fixed set of topic filters
//! - `types` - request triple and response decoding
//! - `client` - HTTP client for the top-headlines endpoint

mod category;
mod client;
mod types;

pub use category::{Category, CategoryParseError};
pub use client::{NewsApiSettings, NewsClient, NewsError, DEFAULT_BASE_URL};
pub use types::{Article, HeadlineQuery, HeadlinePage, HeadlinesResponse};

/// Results requested per page.
pub const PAGE_SIZE: u32 = 10;
