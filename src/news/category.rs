use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Topic filters accepted by the top-headlines endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    General,
    Business,
    Entertainment,
    Health,
    Science,
    Sports,
    Technology,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown category '{0}' (expected one of: general, business, entertainment, health, science, sports, technology)")]
pub struct CategoryParseError(pub String);

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Business,
        Category::Entertainment,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    /// Value sent as the `category` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Business => "business",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Science => "science",
            Self::Sports => "sports",
            Self::Technology => "technology",
        }
    }

    /// Capitalized label for the category tabs.
    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Business => "Business",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Science => "Science",
            Self::Sports => "Sports",
            Self::Technology => "Technology",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    /// Next category, wrapping Technology -> General.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous category, wrapping General -> Technology.
    pub fn prev(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| CategoryParseError(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_general() {
        assert_eq!(Category::default(), Category::General);
    }

    #[test]
    fn test_next_wraps_around() {
        assert_eq!(Category::General.next(), Category::Business);
        assert_eq!(Category::Technology.next(), Category::General);
    }

    #[test]
    fn test_prev_wraps_around() {
        assert_eq!(Category::Business.prev(), Category::General);
        assert_eq!(Category::General.prev(), Category::Technology);
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        let mut c = Category::Health;
        for _ in 0..Category::ALL.len() {
            c = c.next();
        }
        assert_eq!(c, Category::Health);
    }

    #[test]
    fn test_labels_are_capitalized_api_values() {
        for c in Category::ALL {
            let label = c.label();
            let mut chars = label.chars();
            let first = chars.next().unwrap();
            assert!(first.is_uppercase());
            assert_eq!(label.to_ascii_lowercase(), c.as_str());
        }
    }

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!("sports".parse::<Category>(), Ok(Category::Sports));
        assert_eq!("  Science ".parse::<Category>(), Ok(Category::Science));
        assert_eq!("TECHNOLOGY".parse::<Category>(), Ok(Category::Technology));
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "politics".parse::<Category>().unwrap_err();
        assert_eq!(err, CategoryParseError("politics".to_string()));
        assert!(err.to_string().contains("Unknown category"));
    }
}
