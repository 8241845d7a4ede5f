//! Input handling for the TUI.
//!
//! Keys go to the help overlay when it is open, then to the search box while
//! editing, and otherwise to the headline list with global fallbacks.

use crate::app::{App, AppEvent};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{dispatch, open_selected};
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Help overlay captures all keys when visible
    if app.show_help {
        return handle_help_input(app, code);
    }

    if app.search_mode {
        return handle_search_input(app, code, modifiers, event_tx);
    }

    handle_browse_input(app, code, modifiers, event_tx)
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input on the headline list.
fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Articles);

    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::NextCategory) => {
            let request = app.session.set_category(app.session.category().next());
            dispatch(app, request, event_tx);
        }
        Some(KbAction::PrevCategory) => {
            let request = app.session.set_category(app.session.category().prev());
            dispatch(app, request, event_tx);
        }
        Some(KbAction::EnterSearch) => app.enter_search(),
        Some(KbAction::SelectHistory(n)) => {
            let index = usize::from(n);
            if index >= app.session.history().len() {
                app.set_status(format!("No recent search #{}", index + 1));
            } else {
                let request = app.session.select_history(index);
                app.search_input = app.session.query().to_string();
                dispatch(app, request, event_tx);
            }
        }
        Some(KbAction::OpenInBrowser) => open_selected(app),
        Some(KbAction::LoadMore) => {
            let request = app.session.load_more();
            if request.is_none()
                && !app.session.articles().is_empty()
                && !app.session.is_loading()
                && !app.session.has_more()
            {
                app.set_status("No more headlines");
            }
            dispatch(app, request, event_tx);
        }
        Some(KbAction::Reload) => {
            let request = app.session.reload();
            dispatch(app, Some(request), event_tx);
        }
        Some(KbAction::ToggleTheme) => {
            let name = app.toggle_theme();
            app.set_status(format!("{} theme", name));
        }
        Some(KbAction::ShowHelp) => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        Some(KbAction::ExitSearch) | Some(KbAction::CommitSearch) | None => {}
    }
    Action::Continue
}

/// Handle input while editing the search box.
///
/// Bound keys (Enter, Esc, Ctrl+C by default) act; everything else edits the
/// text and restarts the debounce timer.
fn handle_search_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Search)
    {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::ExitSearch) => {
            app.exit_search();
            return Action::Continue;
        }
        Some(KbAction::CommitSearch) => {
            let request = app.commit_search();
            dispatch(app, request, event_tx);
            return Action::Continue;
        }
        _ => {}
    }

    match code {
        KeyCode::Backspace => {
            if app.search_input.pop().is_some() {
                app.debouncer.input(app.search_input.clone());
            }
        }
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            if app.search_input.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Search query at max length ({} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
                return Action::Continue;
            }
            app.search_input.push(c);
            app.debouncer.input(app.search_input.clone());
        }
        _ => {}
    }
    Action::Continue
}
