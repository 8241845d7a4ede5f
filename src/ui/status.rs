use crate::app::App;
use crate::keybindings::Action as KbAction;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Key hints for the current mode, built from the live bindings.
fn hints(app: &App) -> String {
    let hint = |action: KbAction, label: &str| {
        app.keybindings
            .key_hint(action)
            .map(|key| format!("[{}]{}", key, label))
    };

    let parts: Vec<Option<String>> = if app.search_mode {
        vec![
            Some("Type to search".to_string()),
            hint(KbAction::CommitSearch, " search"),
            hint(KbAction::ExitSearch, " cancel"),
        ]
    } else {
        vec![
            hint(KbAction::EnterSearch, " search"),
            hint(KbAction::NextCategory, " category"),
            hint(KbAction::OpenInBrowser, " open"),
            hint(KbAction::LoadMore, " more"),
            hint(KbAction::ToggleTheme, " theme"),
            hint(KbAction::ShowHelp, " help"),
            hint(KbAction::Quit, " quit"),
        ]
    };

    parts.into_iter().flatten().collect::<Vec<_>>().join(" ")
}

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = match &app.status_message {
        Some((msg, _)) => Cow::Borrowed(&**msg),
        None => Cow::Owned(hints(app)),
    };

    f.render_widget(Paragraph::new(text).style(app.style("status_bar")), area);
}
