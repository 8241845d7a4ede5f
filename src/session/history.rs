use std::collections::VecDeque;

/// Maximum number of remembered searches.
pub const HISTORY_LIMIT: usize = 5;

/// Recent searches, oldest first.
///
/// Holds at most `HISTORY_LIMIT` distinct non-empty entries. A query already
/// present is not recorded again and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHistory {
    entries: VecDeque<String>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted query. Returns `true` if it was added.
    pub fn record(&mut self, query: &str) -> bool {
        if query.is_empty() || self.entries.iter().any(|q| q == query) {
            return false;
        }
        self.entries.push_back(query.to_string());
        while self.entries.len() > HISTORY_LIMIT {
            if let Some(dropped) = self.entries.pop_front() {
                tracing::trace!(query = %dropped, "Dropped oldest search from history");
            }
        }
        true
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
