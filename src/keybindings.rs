//! Keybinding registry: maps actions to key events with config overrides.
use crate::session::HISTORY_LIMIT;
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    NextCategory,
    PrevCategory,
    EnterSearch,
    ExitSearch,
    CommitSearch,
    /// Re-run the recent search at this 0-based index.
    SelectHistory(u8),
    OpenInBrowser,
    LoadMore,
    Reload,
    ToggleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Next article",
            Self::NavUp => "Previous article",
            Self::NextCategory => "Next category",
            Self::PrevCategory => "Previous category",
            Self::EnterSearch => "Search headlines",
            Self::ExitSearch => "Leave search box",
            Self::CommitSearch => "Run search",
            Self::SelectHistory(_) => "Re-run recent search",
            Self::OpenInBrowser => "Open article in browser",
            Self::LoadMore => "Load more headlines",
            Self::Reload => "Reload from first page",
            Self::ToggleTheme => "Toggle dark/light theme",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Articles,
    Search,
}

impl Context {
    pub fn name(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Articles => "Articles",
            Self::Search => "Search",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Drop modifiers that terminals report inconsistently.
    ///
    /// SHIFT is implied by uppercase chars and by BackTab, so it is not part
    /// of the lookup key.
    pub fn normalized(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self::new(code, modifiers - KeyModifiers::SHIFT)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "m", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Shift+Tab", "Up", "Down", "Backspace"
/// - Modifier combos: "Ctrl+r"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    match s.to_lowercase().as_str() {
        "enter" | "return" => return Some(KeySpec::plain(KeyCode::Enter)),
        "esc" | "escape" => return Some(KeySpec::plain(KeyCode::Esc)),
        "tab" => return Some(KeySpec::plain(KeyCode::Tab)),
        "shift+tab" | "backtab" => return Some(KeySpec::plain(KeyCode::BackTab)),
        "up" => return Some(KeySpec::plain(KeyCode::Up)),
        "down" => return Some(KeySpec::plain(KeyCode::Down)),
        "left" => return Some(KeySpec::plain(KeyCode::Left)),
        "right" => return Some(KeySpec::plain(KeyCode::Right)),
        "backspace" => return Some(KeySpec::plain(KeyCode::Backspace)),
        "space" => return Some(KeySpec::plain(KeyCode::Char(' '))),
        _ => {}
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then_some(KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::plain(KeyCode::Char(c))),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// outside the search box fall back to `Global`.
#[derive(Debug)]
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Context::{Articles, Global, Search};
        let plain = |c: char| KeySpec::plain(KeyCode::Char(c));

        // === Global ===
        self.bind(Global, plain('q'), Action::Quit);
        self.bind(Global, KeySpec::ctrl('c'), Action::Quit);
        self.bind(Global, plain('?'), Action::ShowHelp);
        self.bind(Global, plain('t'), Action::ToggleTheme);
        self.bind(Global, plain('/'), Action::EnterSearch);
        self.bind(Global, plain('r'), Action::Reload);

        // Categories
        self.bind(Global, KeySpec::plain(KeyCode::Tab), Action::NextCategory);
        self.bind(Global, plain(']'), Action::NextCategory);
        self.bind(Global, KeySpec::plain(KeyCode::BackTab), Action::PrevCategory);
        self.bind(Global, plain('['), Action::PrevCategory);

        // Recent searches, numbered from 1
        for (i, digit) in ('1'..='9').take(HISTORY_LIMIT).enumerate() {
            self.bind(Global, plain(digit), Action::SelectHistory(i as u8));
        }

        // === Article list ===
        self.bind(Articles, plain('j'), Action::NavDown);
        self.bind(Articles, KeySpec::plain(KeyCode::Down), Action::NavDown);
        self.bind(Articles, plain('k'), Action::NavUp);
        self.bind(Articles, KeySpec::plain(KeyCode::Up), Action::NavUp);
        self.bind(Articles, plain('o'), Action::OpenInBrowser);
        self.bind(Articles, KeySpec::plain(KeyCode::Enter), Action::OpenInBrowser);
        self.bind(Articles, plain('m'), Action::LoadMore);
        self.bind(Articles, plain('l'), Action::LoadMore);

        // === Search box ===
        self.bind(Search, KeySpec::plain(KeyCode::Esc), Action::ExitSearch);
        self.bind(Search, KeySpec::plain(KeyCode::Enter), Action::CommitSearch);
        self.bind(Search, KeySpec::ctrl('c'), Action::Quit);
    }

    /// Apply user overrides from the config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "load_more").
    /// Values are key strings (e.g., "q", "Ctrl+r", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a key, trying the context first, then Global.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::normalized(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        // The search box takes free text, so it never falls back
        if context != Context::Global && context != Context::Search {
            return self.lookup.get(&(Context::Global, key)).copied();
        }

        None
    }

    /// Display key for an action's first binding, for inline hints.
    pub fn key_hint(&self, action: Action) -> Option<String> {
        self.bindings
            .iter()
            .find(|(_, _, a)| *a == action)
            .map(|(_, key, _)| format_key(key))
    }

    /// All bindings for the help screen.
    ///
    /// Returns (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action.
fn parse_action_name(name: &str) -> Option<Action> {
    let name = name.to_lowercase();
    if let Some(n) = name.strip_prefix("history_") {
        let n: usize = n.parse().ok()?;
        return (1..=HISTORY_LIMIT)
            .contains(&n)
            .then(|| Action::SelectHistory((n - 1) as u8));
    }
    match name.as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "down" => Some(Action::NavDown),
        "nav_up" | "up" => Some(Action::NavUp),
        "next_category" => Some(Action::NextCategory),
        "prev_category" | "previous_category" => Some(Action::PrevCategory),
        "enter_search" | "search" => Some(Action::EnterSearch),
        "exit_search" => Some(Action::ExitSearch),
        "commit_search" => Some(Action::CommitSearch),
        "open_in_browser" | "open" => Some(Action::OpenInBrowser),
        "load_more" | "more" => Some(Action::LoadMore),
        "reload" | "refresh" => Some(Action::Reload),
        "toggle_theme" | "theme" => Some(Action::ToggleTheme),
        "show_help" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(reg: &KeybindingRegistry, code: KeyCode, ctx: Context) -> Option<Action> {
        reg.action_for_key(code, KeyModifiers::NONE, ctx)
    }

    #[test]
    fn test_default_registry_has_quit() {
        let reg = KeybindingRegistry::new();
        assert_eq!(key(&reg, KeyCode::Char('q'), Context::Global), Some(Action::Quit));
        assert_eq!(
            reg.action_for_key(KeyCode::Char('c'), KeyModifiers::CONTROL, Context::Articles),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_articles_fall_back_to_global() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            key(&reg, KeyCode::Char('t'), Context::Articles),
            Some(Action::ToggleTheme)
        );
        assert_eq!(
            key(&reg, KeyCode::Char('m'), Context::Articles),
            Some(Action::LoadMore)
        );
        assert_eq!(
            key(&reg, KeyCode::Enter, Context::Articles),
            Some(Action::OpenInBrowser)
        );
    }

    #[test]
    fn test_search_does_not_fall_back() {
        let reg = KeybindingRegistry::new();
        // Typing 'q' or 't' in the search box must not quit or toggle
        assert_eq!(key(&reg, KeyCode::Char('q'), Context::Search), None);
        assert_eq!(key(&reg, KeyCode::Char('t'), Context::Search), None);
        assert_eq!(key(&reg, KeyCode::Esc, Context::Search), Some(Action::ExitSearch));
        assert_eq!(
            key(&reg, KeyCode::Enter, Context::Search),
            Some(Action::CommitSearch)
        );
    }

    #[test]
    fn test_history_digits() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            key(&reg, KeyCode::Char('1'), Context::Articles),
            Some(Action::SelectHistory(0))
        );
        assert_eq!(
            key(&reg, KeyCode::Char('5'), Context::Articles),
            Some(Action::SelectHistory(4))
        );
        assert_eq!(key(&reg, KeyCode::Char('6'), Context::Articles), None);
    }

    #[test]
    fn test_backtab_with_shift_modifier() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::BackTab, KeyModifiers::SHIFT, Context::Articles),
            Some(Action::PrevCategory)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Tab, KeyModifiers::NONE, Context::Articles),
            Some(Action::NextCategory)
        );
    }

    #[test]
    fn test_unknown_key_returns_none() {
        let reg = KeybindingRegistry::new();
        assert_eq!(key(&reg, KeyCode::F(12), Context::Global), None);
    }

    #[test]
    fn test_apply_overrides_valid() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("quit".to_string(), "Ctrl+q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert!(warnings.is_empty());

        assert_eq!(
            key(&reg, KeyCode::Char('q'), Context::Global),
            None,
            "old binding should be gone"
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::CONTROL, Context::Global),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_override_preserves_context() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("load_more".to_string(), "n".to_string());
        assert!(reg.apply_overrides(&overrides).is_empty());

        assert_eq!(
            key(&reg, KeyCode::Char('n'), Context::Articles),
            Some(Action::LoadMore)
        );
        assert_eq!(key(&reg, KeyCode::Char('m'), Context::Articles), None);
        assert_eq!(key(&reg, KeyCode::Char('l'), Context::Articles), None);
        // Still scoped to the article list
        assert_eq!(key(&reg, KeyCode::Char('n'), Context::Global), None);
    }

    #[test]
    fn test_override_history_entry() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("history_2".to_string(), "F2".to_string());
        assert!(reg.apply_overrides(&overrides).is_empty());
        assert_eq!(
            key(&reg, KeyCode::F(2), Context::Articles),
            Some(Action::SelectHistory(1))
        );
        assert_eq!(key(&reg, KeyCode::Char('2'), Context::Articles), None);
    }

    #[test]
    fn test_apply_overrides_unknown_action() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("nonexistent_action".to_string(), "q".to_string());
        overrides.insert("history_9".to_string(), "q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.contains("Unknown action")));
    }

    #[test]
    fn test_apply_overrides_bad_key() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("quit".to_string(), "Ctrl+Alt+Shift+Q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Cannot parse key"));
    }

    #[test]
    fn test_parse_key_string_named_keys() {
        assert_eq!(parse_key_string("Enter"), Some(KeySpec::plain(KeyCode::Enter)));
        assert_eq!(parse_key_string("esc"), Some(KeySpec::plain(KeyCode::Esc)));
        assert_eq!(
            parse_key_string("Shift+Tab"),
            Some(KeySpec::plain(KeyCode::BackTab))
        );
        assert_eq!(
            parse_key_string("space"),
            Some(KeySpec::plain(KeyCode::Char(' ')))
        );
    }

    #[test]
    fn test_parse_key_string_function_keys() {
        assert_eq!(parse_key_string("F1"), Some(KeySpec::plain(KeyCode::F(1))));
        assert_eq!(parse_key_string("F12"), Some(KeySpec::plain(KeyCode::F(12))));
        assert_eq!(parse_key_string("F0"), None);
        assert_eq!(parse_key_string("F13"), None);
        // A bare "f" is still a character key
        assert_eq!(parse_key_string("f"), Some(KeySpec::plain(KeyCode::Char('f'))));
    }

    #[test]
    fn test_parse_key_string_ctrl_and_chars() {
        assert_eq!(parse_key_string("Ctrl+r"), Some(KeySpec::ctrl('r')));
        assert_eq!(parse_key_string("/"), Some(KeySpec::plain(KeyCode::Char('/'))));
        assert_eq!(parse_key_string("é"), Some(KeySpec::plain(KeyCode::Char('é'))));
        assert_eq!(parse_key_string("ab"), None);
    }

    #[test]
    fn test_key_hint() {
        let reg = KeybindingRegistry::new();
        assert_eq!(reg.key_hint(Action::LoadMore).as_deref(), Some("m"));
        assert_eq!(reg.key_hint(Action::PrevCategory).as_deref(), Some("Shift+Tab"));
    }

    #[test]
    fn test_all_bindings_cover_every_context() {
        let reg = KeybindingRegistry::new();
        let bindings = reg.all_bindings();
        for ctx in [Context::Global, Context::Articles, Context::Search] {
            assert!(bindings.iter().any(|(c, _, _, _)| *c == ctx));
        }
    }

    #[test]
    fn test_format_key_display() {
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Char('q'))), "q");
        assert_eq!(format_key(&KeySpec::ctrl('c')), "Ctrl+c");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Enter)), "Enter");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::F(5))), "F5");
    }
}
