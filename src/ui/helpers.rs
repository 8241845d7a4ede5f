//! Helper functions for UI operations.
//!
//! Spawning headline fetches and opening articles in the browser.

use crate::app::{App, AppEvent};
use crate::news::NewsClient;
use crate::session::FetchRequest;
use crate::util::validate_url_for_open;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Error message for articles without URLs
pub(super) const ERR_ARTICLE_NO_URL: &str = "Article has no URL";

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of the task silently disappearing (caught by Tokio's runtime but not
/// handled), panics are converted to `Err(String)` containing the panic message.
///
/// # Returns
///
/// - `Ok(result)` if the future completes normally
/// - `Err(panic_message)` if the future panics
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else if let Some(e) = panic.downcast_ref::<Box<dyn std::error::Error + Send>>() {
                e.to_string()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Spawn a background task that runs one headlines request.
///
/// Sends `AppEvent::HeadlinesLoaded` when the request settles, or
/// `AppEvent::TaskPanicked` if the task panics. Either way the event carries
/// the request, so the session can discard it if it is no longer current.
pub(super) fn spawn_fetch(
    client: NewsClient,
    request: FetchRequest,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let tx_panic = tx.clone();
        let panic_request = request.clone();
        match catch_task_panic(async {
            let result = client.fetch_headlines(&request.params).await;
            if let Err(e) = tx
                .send(AppEvent::HeadlinesLoaded { request, result })
                .await
            {
                tracing::warn!(error = %e, event = "HeadlinesLoaded", "Channel send failed (receiver dropped)");
            }
        })
        .await
        {
            Ok(()) => {}
            Err(panic_msg) => {
                tracing::error!(task = "headlines", error = %panic_msg, "Headlines task panicked");
                let _ = tx_panic
                    .send(AppEvent::TaskPanicked {
                        task: "headlines",
                        request: panic_request,
                        error: panic_msg,
                    })
                    .await;
            }
        }
    })
}

/// Start the fetch a transition asked for, if any.
///
/// Aborts the previous in-flight task first; only the newest request matters.
pub(super) fn dispatch(
    app: &mut App,
    request: Option<FetchRequest>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let Some(request) = request else {
        return;
    };

    if let Some(handle) = app.fetch_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous headlines task");
    }

    tracing::debug!(
        generation = request.generation,
        category = request.params.category.as_str(),
        query = %request.params.query,
        page = request.params.page,
        "Dispatching headlines request"
    );
    app.fetch_handle = Some(spawn_fetch(app.client.clone(), request, event_tx.clone()));
    app.needs_redraw = true;
}

/// Open the selected article in the system browser.
pub(super) fn open_selected(app: &mut App) {
    let Some(raw_url) = app.selected_article().map(|a| a.url.clone()) else {
        return;
    };
    if raw_url.trim().is_empty() {
        app.set_status(ERR_ARTICLE_NO_URL);
        return;
    }

    let url = match validate_url_for_open(&raw_url) {
        Ok(url) => url,
        Err(e) => {
            app.set_status(e.to_string());
            return;
        }
    };

    if let Err(e) = open::that(url.as_str()) {
        app.set_status(format!("Failed to open browser: {}", e));
    } else {
        app.set_status("Opening in browser...");
    }
}
