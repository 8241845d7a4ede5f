//! Utility functions for common operations.
//!
//! - **URL validation**: checks on API-supplied article and image URLs
//! - **Text processing**: sanitizing, measuring, truncating and wrapping
//!   headline text for the terminal
//!
//! # Examples
//!
//! ```
//! use headlines::util::{display_width, single_line, truncate_to_width};
//!
//! let title = single_line("Markets\n  rally \x1b[1mtoday");
//! assert_eq!(title, "Markets rally today");
//! assert_eq!(display_width(&title), 19);
//! assert_eq!(truncate_to_width(&title, 10), "Markets...");
//! ```

mod text;
mod url_validator;

pub use text::{
    display_width, format_relative_time, single_line, strip_control_chars, truncate_to_width,
    wrap_to_width,
};
pub use url_validator::{image_host, validate_url_for_open, UrlValidationError, MAX_URL_LENGTH};

/// Maximum search box length in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
