//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn from_dark_mode(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette — semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    /// Whole-frame base; the only role that sets a background everywhere.
    pub background: Style,

    // -- Header --
    pub category_tab: Style,
    pub category_active: Style,
    pub theme_indicator: Style,

    // -- Search --
    pub search_box: Style,
    pub search_box_active: Style,
    pub history_item: Style,

    // -- Article cards --
    pub card_title: Style,
    pub card_description: Style,
    pub card_meta: Style,
    pub card_image: Style,
    pub card_placeholder: Style,
    pub card_selected: Style,
    pub load_more_hint: Style,

    // -- Feed status --
    pub loading_text: Style,
    pub error_text: Style,
    pub empty_text: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub help_key: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            background: Style::default().bg(Color::Black).fg(Color::White),

            // Header
            category_tab: Style::default().fg(Color::Gray),
            category_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            theme_indicator: Style::default().fg(Color::Yellow),

            // Search
            search_box: Style::default().fg(Color::Gray),
            search_box_active: Style::default().fg(Color::White),
            history_item: Style::default().fg(Color::Cyan),

            // Cards
            card_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            card_description: Style::default().fg(Color::Gray),
            card_meta: Style::default().fg(Color::DarkGray),
            card_image: Style::default().fg(Color::Blue),
            card_placeholder: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            card_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            load_more_hint: Style::default().fg(Color::Cyan),

            // Feed status
            loading_text: Style::default().fg(Color::Yellow),
            error_text: Style::default().fg(Color::Red),
            empty_text: Style::default().fg(Color::Gray),

            // Chrome
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Cyan),
            help_key: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Light palette, for light terminal backgrounds.
    fn light() -> Self {
        Self {
            background: Style::default().bg(Color::White).fg(Color::Black),

            // Header
            category_tab: Style::default().fg(Color::DarkGray),
            category_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            theme_indicator: Style::default().fg(Color::Magenta),

            // Search
            search_box: Style::default().fg(Color::DarkGray),
            search_box_active: Style::default().fg(Color::Black),
            history_item: Style::default().fg(Color::Blue),

            // Cards
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_description: Style::default().fg(Color::DarkGray),
            card_meta: Style::default().fg(Color::Gray),
            card_image: Style::default().fg(Color::Blue),
            card_placeholder: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            card_selected: Style::default().bg(Color::Blue).fg(Color::White),
            load_more_hint: Style::default().fg(Color::Blue),

            // Feed status
            loading_text: Style::default().fg(Color::Magenta),
            error_text: Style::default().fg(Color::Red),
            empty_text: Style::default().fg(Color::DarkGray),

            // Chrome
            status_bar: Style::default().bg(Color::Gray).fg(Color::Black),
            panel_border: Style::default().fg(Color::Gray),
            panel_border_focused: Style::default().fg(Color::Blue),
            help_key: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }
}

// ============================================================================
// Style Map — string-keyed lookup
// ============================================================================

/// String-keyed style lookup, built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 21] = [
    "background",
    "category_tab",
    "category_active",
    "theme_indicator",
    "search_box",
    "search_box_active",
    "history_item",
    "card_title",
    "card_description",
    "card_meta",
    "card_image",
    "card_placeholder",
    "card_selected",
    "load_more_hint",
    "loading_text",
    "error_text",
    "empty_text",
    "status_bar",
    "panel_border",
    "panel_border_focused",
    "help_key",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 21] = [
            p.background,
            p.category_tab,
            p.category_active,
            p.theme_indicator,
            p.search_box,
            p.search_box_active,
            p.history_item,
            p.card_title,
            p.card_description,
            p.card_meta,
            p.card_image,
            p.card_placeholder,
            p.card_selected,
            p.load_more_hint,
            p.loading_text,
            p.error_text,
            p.empty_text,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
            p.help_key,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
