//! Header widgets: category tabs, search box, recent searches.

use crate::app::App;
use crate::news::Category;
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Category tabs on the left, theme indicator on the right.
pub fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let theme_label = format!(" {} (t) ", app.theme_variant.name());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(theme_label.len() as u16),
        ])
        .split(area);

    let titles: Vec<Line> = Category::ALL
        .iter()
        .map(|c| Line::from(c.label()))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.session.category().index())
        .style(app.style("category_tab"))
        .highlight_style(app.style("category_active"))
        .divider("|");

    f.render_widget(tabs, chunks[0]);
    f.render_widget(
        Paragraph::new(Span::styled(theme_label, app.style("theme_indicator"))),
        chunks[1],
    );
}

/// Search box. Shows a cursor while editing and a hint when empty.
/// Search box title; marks typed text that has not been applied yet.
fn search_title(app: &App) -> &'static str {
    if app.search_mode && app.debouncer.is_pending() {
        " Search ... "
    } else {
        " Search "
    }
}

pub fn render_search(f: &mut Frame, app: &App, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;

    let (text, style) = if app.search_mode {
        // Keep the tail visible while typing past the box width
        let shown = tail_to_width(&app.search_input, inner_width.saturating_sub(1));
        (format!("{}_", shown), app.style("search_box_active"))
    } else if app.search_input.is_empty() {
        ("Press / to search headlines".to_string(), app.style("search_box"))
    } else {
        (
            truncate_to_width(&app.search_input, inner_width).into_owned(),
            app.style("search_box_active"),
        )
    };

    let border = if app.search_mode {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(search_title(app));

    f.render_widget(Paragraph::new(Span::styled(text, style)).block(block), area);
}

/// Numbered recent searches, newest last.
pub fn render_history(f: &mut Frame, app: &App, area: Rect) {
    let history = app.session.history();
    let mut spans = vec![Span::styled("Recent: ", app.style("card_meta"))];

    if history.is_empty() {
        spans.push(Span::styled("none yet", app.style("card_placeholder")));
    } else {
        for (i, query) in history.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(format!("{}:", i + 1), app.style("help_key")));
            spans.push(Span::styled(
                truncate_to_width(query, 20).into_owned(),
                app.style("history_item"),
            ));
        }
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Longest suffix of `s` that fits in `width` columns.
fn tail_to_width(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices().rev() {
        used += unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used > width {
            return &s[idx + c.len_utf8()..];
        }
    }
    s
}
