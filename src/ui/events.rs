//! Application event handling.
//!
//! Applies settled headline fetches from background tasks to the app state.

use crate::app::{App, AppEvent};
use crate::session::Applied;

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    let applied = match event {
        AppEvent::HeadlinesLoaded { request, result } => {
            let applied = app.apply_headlines(&request, result);
            match applied {
                Applied::Replaced(n) | Applied::Appended(n) => tracing::info!(
                    generation = request.generation,
                    page = request.params.page,
                    articles = n,
                    "Headlines loaded"
                ),
                Applied::Failed => {}
                Applied::Stale => tracing::debug!(
                    generation = request.generation,
                    "Dropped stale headlines result"
                ),
            }
            applied
        }
        AppEvent::TaskPanicked {
            task,
            request,
            error,
        } => {
            tracing::error!(task, error = %error, "Background task panicked");
            app.fail_request(&request, error)
        }
    };

    // The task that produced a current result has finished
    if applied != Applied::Stale {
        app.fetch_handle = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybindings::KeybindingRegistry;
    use crate::news::{Article, HeadlinePage, NewsApiSettings, NewsClient, NewsError, DEFAULT_BASE_URL};
    use crate::session::{Session, FETCH_ERROR_MESSAGE};
    use secrecy::SecretString;
    use std::time::Duration;

    fn test_app() -> App {
        let client = NewsClient::new(NewsApiSettings {
            api_key: SecretString::from("test-key".to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
            country: "us".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        App::new(Session::default(), client, KeybindingRegistry::new())
    }

    fn page(titles: &[&str]) -> HeadlinePage {
        HeadlinePage {
            articles: titles
                .iter()
                .map(|t| Article {
                    title: t.to_string(),
                    description: String::new(),
                    url: "https://example.com/a".to_string(),
                    url_to_image: None,
                    source: None,
                    author: None,
                    published_at: None,
                })
                .collect(),
            total_results: Some(titles.len() as u64),
        }
    }

    #[test]
    fn test_older_result_is_ignored() {
        let mut app = test_app();
        let first = app.session.refresh();
        app.search_input = "rust".to_string();
        let second = app.commit_search().unwrap();

        handle_app_event(
            &mut app,
            AppEvent::HeadlinesLoaded {
                request: second,
                result: Ok(page(&["new"])),
            },
        );
        handle_app_event(
            &mut app,
            AppEvent::HeadlinesLoaded {
                request: first,
                result: Ok(page(&["old"])),
            },
        );

        assert_eq!(app.session.articles().len(), 1);
        assert_eq!(app.session.articles()[0].title, "new");
    }

    #[test]
    fn test_error_event_sets_message() {
        let mut app = test_app();
        let req = app.session.refresh();
        handle_app_event(
            &mut app,
            AppEvent::HeadlinesLoaded {
                request: req,
                result: Err(NewsError::HttpStatus(401)),
            },
        );
        assert_eq!(app.session.error(), Some(FETCH_ERROR_MESSAGE));
        assert!(!app.session.is_loading());
    }

    #[test]
    fn test_panic_event_clears_loading() {
        let mut app = test_app();
        let req = app.session.refresh();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "headlines",
                request: req,
                error: "boom".to_string(),
            },
        );
        assert!(!app.session.is_loading());
        assert!(app.session.error().is_some());
    }
}
