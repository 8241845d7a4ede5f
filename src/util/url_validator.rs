use thiserror::Error;
use url::Url;

/// Longest article URL we will hand to the system browser.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur during URL validation.
///
/// Article and image URLs come from the API response verbatim, so they are
/// checked before being passed to the OS opener or shown as a host name.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("URL has no host")]
    MissingHost,
    #[error("URL too long ({0} bytes)")]
    TooLong(usize),
    #[error("URL contains control characters")]
    ControlCharacters,
    #[error("URL contains embedded credentials")]
    EmbeddedCredentials,
}

fn parse_web_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url_str = url_str.trim();
    if url_str.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong(url_str.len()));
    }
    if url_str.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacters);
    }

    let url = Url::parse(url_str)?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }
    Ok(url)
}

/// Validate an article URL before opening it in the system browser.
///
/// Rejects:
/// - anything other than `http`/`https` (`file:`, `javascript:`, custom handlers)
/// - URLs without a host
/// - `user:pass@host` forms, which disguise the real destination
/// - control characters and oversized URLs
///
/// # Examples
///
/// ```
/// use headlines::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://example.com/story").is_ok());
/// assert!(validate_url_for_open("javascript:alert(1)").is_err());
/// assert!(validate_url_for_open("file:///etc/passwd").is_err());
/// ```
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = parse_web_url(url_str)?;
    if !url.username().is_empty() || url.password().is_some() {
        return Err(UrlValidationError::EmbeddedCredentials);
    }
    Ok(url)
}

/// Host of a usable image URL, for the card's image indicator.
///
/// `None` when the article has no image or the URL is not a valid web URL;
/// the card then shows its placeholder.
pub fn image_host(url: Option<&str>) -> Option<String> {
    let url = parse_web_url(url?).ok()?;
    let host = url.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_accepts_web_urls() {
        assert!(validate_url_for_open("https://example.com/2024/03/story.html").is_ok());
        assert!(validate_url_for_open("http://news.example.org/a?id=1#top").is_ok());
        assert!(validate_url_for_open("  https://example.com/padded  ").is_ok());
    }

    #[test]
    fn test_open_rejects_other_schemes() {
        for url in [
            "file:///etc/passwd",
            "javascript:alert(1)",
            "ftp://example.com/file",
            "data:text/html,hi",
        ] {
            assert!(
                matches!(
                    validate_url_for_open(url),
                    Err(UrlValidationError::UnsupportedScheme(_))
                ),
                "{} should be rejected",
                url
            );
        }
    }

    #[test]
    fn test_open_rejects_unparseable() {
        assert!(matches!(
            validate_url_for_open("not a url"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
        assert!(validate_url_for_open("").is_err());
    }

    #[test]
    fn test_open_rejects_credentials() {
        assert!(matches!(
            validate_url_for_open("https://bank.com@evil.example/login"),
            Err(UrlValidationError::EmbeddedCredentials)
        ));
        assert!(matches!(
            validate_url_for_open("https://user:pw@example.com/"),
            Err(UrlValidationError::EmbeddedCredentials)
        ));
    }

    #[test]
    fn test_open_rejects_control_chars() {
        assert!(matches!(
            validate_url_for_open("https://example.com/\x1b[2J"),
            Err(UrlValidationError::ControlCharacters)
        ));
    }

    #[test]
    fn test_open_rejects_oversized() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            validate_url_for_open(&url),
            Err(UrlValidationError::TooLong(_))
        ));
    }

    #[test]
    fn test_image_host() {
        assert_eq!(
            image_host(Some("https://www.example.com/img/a.jpg")).as_deref(),
            Some("example.com")
        );
        assert_eq!(
            image_host(Some("https://cdn.news.example/a.png")).as_deref(),
            Some("cdn.news.example")
        );
    }

    #[test]
    fn test_image_host_missing_or_invalid() {
        assert_eq!(image_host(None), None);
        assert_eq!(image_host(Some("")), None);
        assert_eq!(image_host(Some("not a url")), None);
        assert_eq!(image_host(Some("data:image/png;base64,AAAA")), None);
    }
}
