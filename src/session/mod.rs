//! Fetch-and-page controller.
//!
//! `Session` owns the browsing state: the (category, query, page) triple, the
//! accumulated article list, search history and the status flags. Every
//! operation that changes the triple returns the `FetchRequest` the caller must
//! dispatch; nothing is fetched implicitly.
//!
//! Overlapping requests are resolved in `complete`: each request carries a
//! generation token and the triple it was issued for, and only a completion
//! matching both the latest generation and the current triple is applied.

mod debounce;
mod history;

pub use debounce::{Debouncer, DEBOUNCE_DELAY};
pub use history::{SearchHistory, HISTORY_LIMIT};

use crate::news::{Article, Category, HeadlinePage, HeadlineQuery, PAGE_SIZE};
use std::fmt::Display;

/// The one message shown for any failed fetch.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch news. Please try again later.";

/// A fetch the caller must issue, stamped with the state it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub params: HeadlineQuery,
}

/// Outcome of applying a settled fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Page 1: list replaced with this many articles.
    Replaced(usize),
    /// Page > 1: this many articles appended.
    Appended(usize),
    /// Fetch failed; list left untouched.
    Failed,
    /// Superseded by a newer request; ignored.
    Stale,
}

/// What the article area should show.
///
/// With no articles, loading takes precedence over an error and an error
/// over the empty message, so error and empty state never show together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedState<'a> {
    Loading,
    Failed(&'a str),
    Empty,
    Articles(&'a [Article]),
}

#[derive(Debug, Clone)]
pub struct Session {
    category: Category,
    query: String,
    page: u32,
    articles: Vec<Article>,
    history: SearchHistory,
    loading: bool,
    error: Option<String>,
    dark_mode: bool,
    generation: u64,
    total_results: Option<u64>,
    exhausted: bool,
    /// A page-1 fetch failed, so the kept list no longer matches the triple.
    list_outdated: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Category::default(), "", false)
    }
}

impl Session {
    pub fn new(category: Category, query: &str, dark_mode: bool) -> Self {
        Self {
            category,
            query: query.trim().to_string(),
            page: 1,
            articles: Vec::new(),
            history: SearchHistory::new(),
            loading: false,
            error: None,
            dark_mode,
            generation: 0,
            total_results: None,
            exhausted: false,
            list_outdated: false,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn total_results(&self) -> Option<u64> {
        self.total_results
    }

    /// The triple the next request would be issued for.
    pub fn params(&self) -> HeadlineQuery {
        HeadlineQuery {
            category: self.category,
            query: self.query.clone(),
            page: self.page,
        }
    }

    /// Whether the API may still have results past the loaded ones.
    pub fn has_more(&self) -> bool {
        !self.exhausted
    }

    /// Whether `load_more` would issue a request right now.
    pub fn can_load_more(&self) -> bool {
        !self.articles.is_empty() && !self.loading && !self.exhausted && !self.list_outdated
    }

    pub fn feed_state(&self) -> FeedState<'_> {
        if !self.articles.is_empty() {
            return FeedState::Articles(&self.articles);
        }
        if self.loading {
            FeedState::Loading
        } else if let Some(err) = &self.error {
            FeedState::Failed(err)
        } else {
            FeedState::Empty
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Start a fetch for the current triple.
    pub fn refresh(&mut self) -> FetchRequest {
        self.loading = true;
        self.error = None;
        self.generation = self.generation.wrapping_add(1);
        let request = FetchRequest {
            generation: self.generation,
            params: self.params(),
        };
        tracing::debug!(
            generation = request.generation,
            category = request.params.category.as_str(),
            query = %request.params.query,
            page = request.params.page,
            "Issuing headlines request"
        );
        request
    }

    /// Apply a settled fetch.
    pub fn complete<E: Display>(
        &mut self,
        request: &FetchRequest,
        result: Result<HeadlinePage, E>,
    ) -> Applied {
        if request.generation != self.generation || request.params != self.params() {
            tracing::debug!(
                expected = self.generation,
                got = request.generation,
                page = request.params.page,
                "Ignoring stale headlines result"
            );
            return Applied::Stale;
        }

        self.loading = false;

        match result {
            Ok(page) => {
                let count = page.articles.len();
                let applied = if request.params.page <= 1 {
                    self.articles = page.articles;
                    Applied::Replaced(count)
                } else {
                    self.articles.extend(page.articles);
                    Applied::Appended(count)
                };
                self.total_results = page.total_results;
                self.list_outdated = false;
                self.exhausted = count < PAGE_SIZE as usize
                    || page
                        .total_results
                        .is_some_and(|total| self.articles.len() as u64 >= total);
                tracing::info!(
                    category = request.params.category.as_str(),
                    page = request.params.page,
                    count,
                    shown = self.articles.len(),
                    "Headlines applied"
                );
                applied
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    category = request.params.category.as_str(),
                    query = %request.params.query,
                    page = request.params.page,
                    "Error fetching news"
                );
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
                // A failed load-more must not skip its page on the next attempt
                if request.params.page > 1 {
                    self.page = request.params.page - 1;
                } else {
                    // Paging must restart from page 1 of the current triple
                    self.list_outdated = true;
                }
                Applied::Failed
            }
        }
    }

    /// Switch topic. Selecting the active category is a no-op.
    pub fn set_category(&mut self, category: Category) -> Option<FetchRequest> {
        let query = self.query.clone();
        self.apply(category, query)
    }

    /// Submit a search from the search box.
    pub fn submit_search(&mut self, text: &str) -> Option<FetchRequest> {
        let text = text.trim();
        if self.history.record(text) {
            tracing::debug!(query = %text, "Recorded search in history");
        }
        self.apply(self.category, text.to_string())
    }

    /// Re-issue a search from history. History is left as is.
    pub fn select_history(&mut self, index: usize) -> Option<FetchRequest> {
        let query = self.history.get(index)?.to_string();
        self.apply(self.category, query)
    }

    /// Apply search text once the debounce quiet period has elapsed.
    pub fn apply_debounced_query(&mut self, text: &str) -> Option<FetchRequest> {
        self.apply(self.category, text.trim().to_string())
    }

    /// Request the next page, appending to the list.
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        if !self.can_load_more() {
            return None;
        }
        self.page = self.page.saturating_add(1);
        Some(self.refresh())
    }

    /// Re-fetch the current category and query from page 1.
    pub fn reload(&mut self) -> FetchRequest {
        self.page = 1;
        self.refresh()
    }

    /// Flip dark mode. Data state is untouched.
    pub fn toggle_theme(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    /// Set category and query with page reset; fetch only if the triple changed.
    fn apply(&mut self, category: Category, query: String) -> Option<FetchRequest> {
        if category == self.category && query == self.query && self.page == 1 {
            return None;
        }
        self.category = category;
        self.query = query;
        self.page = 1;
        Some(self.refresh())
    }
}
