use crate::keybindings::KeybindingRegistry;
use crate::news::{Article, HeadlinePage, NewsClient, NewsError};
use crate::session::{Applied, Debouncer, FetchRequest, Session, FETCH_ERROR_MESSAGE};
use crate::theme::{StyleMap, ThemeVariant};
use ratatui::style::Style;
use std::borrow::Cow;
use std::fmt::Display;
use tokio::time::Instant;

/// How long a status bar message stays up.
const STATUS_TTL_SECS: u64 = 3;

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// A headlines fetch settled.
    ///
    /// `request` is the one the task was spawned for, so the session can tell
    /// whether the result is still current.
    HeadlinesLoaded {
        request: FetchRequest,
        result: Result<HeadlinePage, NewsError>,
    },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked
    /// - `request`: The fetch it was running
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked {
        task: &'static str,
        request: FetchRequest,
        error: String,
    },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub session: Session,
    pub client: NewsClient,

    // Theme
    pub theme_variant: ThemeVariant,
    /// Active style map for all UI rendering.
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // UI State
    pub selected_article: usize,

    // Search box
    pub search_mode: bool,
    /// Text in the search box. Differs from the applied query while editing.
    pub search_input: String,
    pub debouncer: Debouncer,

    /// Status message with expiry
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    /// Handle to the in-flight headlines task.
    ///
    /// Aborted when a newer request is dispatched and on drop. Results that
    /// still slip through are rejected by `Session::complete`.
    pub fetch_handle: Option<tokio::task::JoinHandle<()>>,

    pub show_help: bool,
    pub help_scroll_offset: usize,
}

impl App {
    pub fn new(session: Session, client: NewsClient, keybindings: KeybindingRegistry) -> Self {
        let variant = ThemeVariant::from_dark_mode(session.is_dark_mode());
        Self {
            search_input: session.query().to_string(),
            session,
            client,
            theme_variant: variant,
            theme: StyleMap::from_palette(&variant.palette()),
            keybindings,
            selected_article: 0,
            search_mode: false,
            debouncer: Debouncer::default(),
            status_message: None,
            needs_redraw: true,
            fetch_handle: None,
            show_help: false,
            help_scroll_offset: 0,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Flip dark/light. Returns the name of the new theme for status display.
    pub fn toggle_theme(&mut self) -> &'static str {
        let dark = self.session.toggle_theme();
        self.theme_variant = ThemeVariant::from_dark_mode(dark);
        self.theme = StyleMap::from_palette(&self.theme_variant.palette());
        self.needs_redraw = true;
        self.theme_variant.name()
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.session.articles().get(self.selected_article)
    }

    pub fn nav_up(&mut self) {
        self.selected_article = self.selected_article.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        let len = self.session.articles().len();
        if len > 0 {
            self.selected_article = self.selected_article.saturating_add(1).min(len - 1);
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.session.articles().len();
        self.selected_article = self.selected_article.min(len.saturating_sub(1));
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Enter the search box, starting from the applied query.
    pub fn enter_search(&mut self) {
        self.search_mode = true;
        self.search_input = self.session.query().to_string();
    }

    /// Leave the search box without touching the applied query.
    pub fn exit_search(&mut self) {
        self.debouncer.cancel();
        self.search_mode = false;
        self.search_input = self.session.query().to_string();
    }

    /// Commit the search box text.
    pub fn commit_search(&mut self) -> Option<FetchRequest> {
        self.debouncer.cancel();
        self.search_mode = false;
        let request = self.session.submit_search(&self.search_input);
        self.search_input = self.session.query().to_string();
        request
    }

    /// Apply a settled fetch to the session and adjust the view.
    pub fn apply_headlines<E: Display>(
        &mut self,
        request: &FetchRequest,
        result: Result<HeadlinePage, E>,
    ) -> Applied {
        let applied = self.session.complete(request, result);
        match applied {
            Applied::Replaced(_) => self.selected_article = 0,
            Applied::Appended(0) => self.set_status("No more headlines"),
            Applied::Appended(_) => {}
            Applied::Failed => {
                self.clamp_selection();
                self.set_status(FETCH_ERROR_MESSAGE);
            }
            Applied::Stale => return applied,
        }
        self.needs_redraw = true;
        applied
    }

    /// Treat a panicked fetch like a failed one.
    pub fn fail_request(&mut self, request: &FetchRequest, error: String) -> Applied {
        self.apply_headlines(request, Err(format!("task panicked: {}", error)))
    }
}

/// Abort the in-flight fetch on App drop.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted headlines task on App drop");
        }
    }
}
