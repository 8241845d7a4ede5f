use super::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// The (category, query, page) triple a request is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineQuery {
    pub category: Category,
    pub query: String,
    /// 1-based page index.
    pub page: u32,
}

impl Default for HeadlineQuery {
    fn default() -> Self {
        Self {
            category: Category::default(),
            query: String::new(),
            page: 1,
        }
    }
}

/// A single headline as returned by the API.
///
/// Received verbatim and never mutated locally. `url` doubles as the list key.
/// The API sends `null` for missing text fields; those decode as empty strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    /// `source.name` from the response.
    #[serde(default, deserialize_with = "source_name")]
    pub source: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
}

/// Top-level response body of the top-headlines endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlinesResponse {
    #[serde(default)]
    pub total_results: Option<u64>,
    /// Absent or `null` is an empty page, not an error.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub articles: Vec<Article>,
}

/// One page of results handed from the client to the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlinePage {
    pub articles: Vec<Article>,
    pub total_results: Option<u64>,
}

impl From<HeadlinesResponse> for HeadlinePage {
    fn from(resp: HeadlinesResponse) -> Self {
        Self {
            articles: resp.articles,
            total_results: resp.total_results,
        }
    }
}

/// Error body the API sends alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn source_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Source {
        #[serde(default)]
        name: Option<String>,
    }
    Ok(Option::<Source>::deserialize(deserializer)?
        .and_then(|s| s.name)
        .filter(|n| !n.trim().is_empty()))
}

/// Malformed timestamps are dropped rather than failing the whole page.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| tracing::debug!(value = %s, error = %e, "Ignoring unparseable publishedAt"))
            .ok()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_full_article() {
        let json = r#"{
            "source": {"id": "bbc-news", "name": "BBC News"},
            "author": "Jane Doe",
            "title": "Headline",
            "description": "Summary text",
            "url": "https://example.com/a",
            "urlToImage": "https://example.com/a.jpg",
            "publishedAt": "2024-03-01T12:30:00Z",
            "content": "ignored"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "Headline");
        assert_eq!(article.description, "Summary text");
        assert_eq!(article.url, "https://example.com/a");
        assert_eq!(
            article.url_to_image.as_deref(),
            Some("https://example.com/a.jpg")
        );
        assert_eq!(article.source.as_deref(), Some("BBC News"));
        assert_eq!(article.author.as_deref(), Some("Jane Doe"));
        assert_eq!(
            article.published_at.map(|d| d.timestamp()),
            Some(1_709_296_200)
        );
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let json = r#"{
            "source": {"id": null, "name": null},
            "author": null,
            "title": "Only a title",
            "description": null,
            "url": "https://example.com/b",
            "urlToImage": null,
            "publishedAt": null
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.description, "");
        assert!(article.url_to_image.is_none());
        assert!(article.source.is_none());
        assert!(article.published_at.is_none());
    }

    #[test]
    fn test_bad_timestamp_is_dropped() {
        let json = r#"{"title": "t", "url": "https://example.com/c", "publishedAt": "yesterday"}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert!(article.published_at.is_none());
    }

    #[test]
    fn test_missing_articles_field_is_empty_page() {
        let resp: HeadlinesResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        let page = HeadlinePage::from(resp);
        assert!(page.articles.is_empty());
        assert_eq!(page.total_results, None);
    }

    #[test]
    fn test_null_articles_field_is_empty_page() {
        let resp: HeadlinesResponse =
            serde_json::from_str(r#"{"status": "ok", "totalResults": 0, "articles": null}"#)
                .unwrap();
        assert!(resp.articles.is_empty());
        assert_eq!(resp.total_results, Some(0));
    }

    #[test]
    fn test_articles_keep_response_order() {
        let json = r#"{"status":"ok","totalResults":3,"articles":[
            {"title":"one","url":"https://example.com/1"},
            {"title":"two","url":"https://example.com/2"},
            {"title":"three","url":"https://example.com/3"}
        ]}"#;
        let resp: HeadlinesResponse = serde_json::from_str(json).unwrap();
        let titles: Vec<&str> = resp.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two", "three"]);
    }
}
