use crate::app::App;
use crate::keybindings::Action as KbAction;
use crate::news::Article;
use crate::session::{FeedState, Session};
use crate::util::{format_relative_time, image_host, single_line, truncate_to_width, wrap_to_width};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub const NO_NEWS_MESSAGE: &str = "No news found. Try a different search.";
pub const LOADING_MESSAGE: &str = "Loading...";
pub const LOADING_MORE_MESSAGE: &str = "Loading more news...";

/// Lines of description shown per card.
const DESCRIPTION_LINES: usize = 2;

/// Line under the card list: progress, the last error, or the load-more hint.
///
/// Returns the text and the theme role to draw it with.
pub(super) fn footer(session: &Session, load_more_key: Option<&str>) -> Option<(String, &'static str)> {
    if session.is_loading() {
        let text = if session.page() > 1 {
            LOADING_MORE_MESSAGE
        } else {
            LOADING_MESSAGE
        };
        return Some((text.to_string(), "loading_text"));
    }
    if let Some(err) = session.error() {
        return Some((err.to_string(), "error_text"));
    }
    if session.can_load_more() {
        let key = load_more_key.unwrap_or("m");
        let text = match session.total_results() {
            Some(total) => format!(
                "Load more ({})  {} of {}",
                key,
                session.articles().len(),
                total
            ),
            None => format!("Load more ({})", key),
        };
        return Some((text, "load_more_hint"));
    }
    None
}

/// Build the lines of one card.
fn card_lines(app: &App, article: &Article, width: usize, now: DateTime<Utc>) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(DESCRIPTION_LINES + 3);

    // Image indicator, source, age
    let mut meta = Vec::new();
    match image_host(article.url_to_image.as_deref()) {
        Some(host) => meta.push(Span::styled(
            format!("[img] {}", truncate_to_width(&host, 30)),
            app.style("card_image"),
        )),
        None => meta.push(Span::styled("[no image]", app.style("card_placeholder"))),
    }
    let source = article.source.as_deref().map(single_line).unwrap_or_default();
    let age = format_relative_time(article.published_at, now);
    let details: Vec<&str> = [source.as_str(), age.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !details.is_empty() {
        meta.push(Span::styled(
            format!("  {}", details.join(" · ")),
            app.style("card_meta"),
        ));
    }
    lines.push(Line::from(meta));

    let title = single_line(&article.title);
    let title = if title.is_empty() { "(untitled)".to_string() } else { title };
    lines.push(Line::from(Span::styled(
        truncate_to_width(&title, width).into_owned(),
        app.style("card_title"),
    )));

    let description = single_line(&article.description);
    for line in wrap_to_width(&description, width, DESCRIPTION_LINES) {
        lines.push(Line::from(Span::styled(line, app.style("card_description"))));
    }

    lines.push(Line::from(""));
    lines
}

fn centered_message(f: &mut Frame, area: Rect, block: Block<'_>, text: &str, style: Style) {
    let inner = block.inner(area);
    f.render_widget(block, area);
    let top = inner.height.saturating_sub(1) / 2;
    let row = Rect {
        y: inner.y + top,
        height: inner.height.saturating_sub(top).min(3),
        ..inner
    };
    f.render_widget(
        Paragraph::new(Span::styled(text.to_string(), style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        row,
    );
}

/// Render the headline cards panel
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let title = if session.query().is_empty() {
        format!(" {} headlines ", session.category().label())
    } else {
        format!(
            " {} headlines matching \"{}\" ",
            session.category().label(),
            truncate_to_width(session.query(), 30)
        )
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if app.search_mode {
            app.style("panel_border")
        } else {
            app.style("panel_border_focused")
        })
        .title(title);

    let articles = match session.feed_state() {
        FeedState::Loading => {
            return centered_message(f, area, block, LOADING_MESSAGE, app.style("loading_text"))
        }
        FeedState::Failed(err) => {
            return centered_message(f, area, block, err, app.style("error_text"))
        }
        FeedState::Empty => {
            return centered_message(f, area, block, NO_NEWS_MESSAGE, app.style("empty_text"))
        }
        FeedState::Articles(articles) => articles,
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let load_more_key = app.keybindings.key_hint(KbAction::LoadMore);
    let footer = footer(session, load_more_key.as_deref());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(u16::from(footer.is_some())),
        ])
        .split(inner);

    // Room for the highlight symbol
    let width = inner.width.saturating_sub(2) as usize;
    let now = Utc::now();
    let items: Vec<ListItem> = articles
        .iter()
        .map(|a| ListItem::new(card_lines(app, a, width, now)))
        .collect();

    let list = List::new(items)
        .highlight_style(app.style("card_selected"))
        .highlight_symbol("▌ ");
    let mut state = ListState::default().with_selected(Some(app.selected_article));
    f.render_stateful_widget(list, chunks[0], &mut state);

    if let Some((text, role)) = footer {
        f.render_widget(
            Paragraph::new(Span::styled(text, app.style(role))).alignment(Alignment::Center),
            chunks[1],
        );
    }
}
