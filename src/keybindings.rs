//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Bindings are data, not match arms, so users can remap any action from the
//! `[keybindings]` table in config.toml.
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
    PageDown,
    PageUp,
    Select,
    Back,
    GoHome,
    GoComments,
    OpenInBrowser,
    Refresh,
    CycleOrdering,
    OrderTop,
    OrderBest,
    OrderNew,
    ToggleReply,
    Compose,
    SubmitComment,
    SwitchField,
    CancelCompose,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Navigate down",
            Self::NavUp => "Navigate up",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::Select => "Open selected item",
            Self::Back => "Go back / dismiss",
            Self::GoHome => "Go to story list",
            Self::GoComments => "Go to newest comments",
            Self::OpenInBrowser => "Open in browser",
            Self::Refresh => "Refresh now",
            Self::CycleOrdering => "Cycle top / best / new",
            Self::OrderTop => "Show top stories",
            Self::OrderBest => "Show best stories",
            Self::OrderNew => "Show new stories",
            Self::ToggleReply => "Reply to selected comment",
            Self::Compose => "Write a comment",
            Self::SubmitComment => "Submit comment",
            Self::SwitchField => "Switch text / author field",
            Self::CancelCompose => "Cancel editing",
            Self::CycleTheme => "Cycle theme",
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
    Stories,
    Detail,
    Feed,
    /// A comment form has focus. Never falls back to Global, so typed
    /// characters are not mistaken for commands.
    Composer,
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

    pub const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Backspace"
/// - Modifier combos: "Ctrl+d", "Ctrl+u"
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

    // Named keys (case-insensitive)
    match s.to_lowercase().as_str() {
        "enter" | "return" => return Some(KeySpec::plain(KeyCode::Enter)),
        "esc" | "escape" => return Some(KeySpec::plain(KeyCode::Esc)),
        "tab" => return Some(KeySpec::plain(KeyCode::Tab)),
        "up" => return Some(KeySpec::plain(KeyCode::Up)),
        "down" => return Some(KeySpec::plain(KeyCode::Down)),
        "left" => return Some(KeySpec::plain(KeyCode::Left)),
        "right" => return Some(KeySpec::plain(KeyCode::Right)),
        "backspace" => return Some(KeySpec::plain(KeyCode::Backspace)),
        "space" => return Some(KeySpec::ch(' ')),
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
        (Some(c), None) => Some(KeySpec::ch(c)),
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
/// try the specific context first and then Global.
pub struct KeybindingRegistry {
    /// Primary lookup: (Context, KeySpec) -> Action
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings for help screen enumeration
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
        use Context::*;

        // === Global ===
        self.bind(Global, KeySpec::ch('q'), Action::Quit);
        self.bind(Global, KeySpec::ch('j'), Action::NavDown);
        self.bind(Global, KeySpec::plain(KeyCode::Down), Action::NavDown);
        self.bind(Global, KeySpec::ch('k'), Action::NavUp);
        self.bind(Global, KeySpec::plain(KeyCode::Up), Action::NavUp);
        self.bind(Global, KeySpec::ctrl('d'), Action::PageDown);
        self.bind(Global, KeySpec::ctrl('u'), Action::PageUp);
        self.bind(Global, KeySpec::plain(KeyCode::Enter), Action::Select);
        self.bind(Global, KeySpec::plain(KeyCode::Esc), Action::Back);

        // Route switching (header)
        self.bind(Global, KeySpec::ch('1'), Action::GoHome);
        self.bind(Global, KeySpec::ch('2'), Action::GoComments);

        self.bind(Global, KeySpec::ch('o'), Action::OpenInBrowser);
        self.bind(Global, KeySpec::ch('T'), Action::CycleTheme);
        self.bind(Global, KeySpec::ch('?'), Action::ShowHelp);

        // === Story list ===
        self.bind(Stories, KeySpec::ch('r'), Action::Refresh);
        self.bind(Stories, KeySpec::ch('s'), Action::CycleOrdering);
        self.bind(Stories, KeySpec::ch('t'), Action::OrderTop);
        self.bind(Stories, KeySpec::ch('b'), Action::OrderBest);
        self.bind(Stories, KeySpec::ch('n'), Action::OrderNew);

        // === Item detail ===
        self.bind(Detail, KeySpec::ch('r'), Action::ToggleReply);
        self.bind(Detail, KeySpec::ch('c'), Action::Compose);

        // === Comments feed ===
        self.bind(Feed, KeySpec::ch('r'), Action::Refresh);

        // === Comment forms ===
        self.bind(Composer, KeySpec::plain(KeyCode::Enter), Action::SubmitComment);
        self.bind(Composer, KeySpec::plain(KeyCode::Tab), Action::SwitchField);
        self.bind(Composer, KeySpec::plain(KeyCode::Esc), Action::CancelCompose);
    }

    /// Apply user overrides from config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "nav_down").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5").
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

            // Re-bind in every context where the action was bound
            let contexts_for_action: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts_for_action {
                if !self.bindings.iter().any(|(c, k, _)| *c == ctx && *k == key) {
                    self.bind(ctx, key, action);
                } else {
                    warnings.push(format!(
                        "Key '{}' already bound in {:?}, '{}' left unbound there",
                        key_str, ctx, action_name
                    ));
                }
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Tries the specific context first, then falls back to Global (except in
    /// the Composer context).
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        match context {
            Context::Global | Context::Composer => None,
            _ => self.lookup.get(&(Context::Global, key)).copied(),
        }
    }

    /// Get all bindings for the help screen.
    ///
    /// Returns (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }

    /// First key bound to `action` in `context`, formatted for hints.
    pub fn key_hint(&self, action: Action, context: Context) -> Option<String> {
        self.bindings
            .iter()
            .find(|(c, _, a)| *a == action && (*c == context || *c == Context::Global))
            .map(|(_, key, _)| format_key(key))
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "navdown" | "down" => Some(Action::NavDown),
        "nav_up" | "navup" | "up" => Some(Action::NavUp),
        "page_down" | "pagedown" => Some(Action::PageDown),
        "page_up" | "pageup" => Some(Action::PageUp),
        "select" | "enter" => Some(Action::Select),
        "back" => Some(Action::Back),
        "go_home" | "gohome" | "home" => Some(Action::GoHome),
        "go_comments" | "gocomments" | "comments" => Some(Action::GoComments),
        "open_in_browser" | "openinbrowser" | "open" => Some(Action::OpenInBrowser),
        "refresh" => Some(Action::Refresh),
        "cycle_ordering" | "cycleordering" | "ordering" => Some(Action::CycleOrdering),
        "order_top" | "ordertop" | "top" => Some(Action::OrderTop),
        "order_best" | "orderbest" | "best" => Some(Action::OrderBest),
        "order_new" | "ordernew" | "new" => Some(Action::OrderNew),
        "toggle_reply" | "togglereply" | "reply" => Some(Action::ToggleReply),
        "compose" | "comment" => Some(Action::Compose),
        "submit_comment" | "submitcomment" | "submit" => Some(Action::SubmitComment),
        "switch_field" | "switchfield" => Some(Action::SwitchField),
        "cancel_compose" | "cancelcompose" | "cancel" => Some(Action::CancelCompose),
        "cycle_theme" | "cycletheme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "showhelp" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(reg: &KeybindingRegistry, c: char, ctx: Context) -> Option<Action> {
        reg.action_for_key(KeyCode::Char(c), KeyModifiers::NONE, ctx)
    }

    #[test]
    fn test_default_registry_has_quit() {
        let reg = KeybindingRegistry::new();
        assert_eq!(key(&reg, 'q', Context::Global), Some(Action::Quit));
    }

    #[test]
    fn test_default_nav_keys() {
        let reg = KeybindingRegistry::new();
        assert_eq!(key(&reg, 'j', Context::Stories), Some(Action::NavDown));
        assert_eq!(
            reg.action_for_key(KeyCode::Down, KeyModifiers::NONE, Context::Detail),
            Some(Action::NavDown)
        );
        assert_eq!(key(&reg, 'k', Context::Feed), Some(Action::NavUp));
    }

    #[test]
    fn test_r_depends_on_context() {
        let reg = KeybindingRegistry::new();
        assert_eq!(key(&reg, 'r', Context::Stories), Some(Action::Refresh));
        assert_eq!(key(&reg, 'r', Context::Detail), Some(Action::ToggleReply));
        assert_eq!(key(&reg, 'r', Context::Feed), Some(Action::Refresh));
        assert_eq!(key(&reg, 'r', Context::Global), None);
    }

    #[test]
    fn test_ordering_keys_only_on_story_list() {
        let reg = KeybindingRegistry::new();
        assert_eq!(key(&reg, 'b', Context::Stories), Some(Action::OrderBest));
        assert_eq!(key(&reg, 'b', Context::Detail), None);
    }

    #[test]
    fn test_composer_does_not_fall_back_to_global() {
        let reg = KeybindingRegistry::new();
        assert_eq!(key(&reg, 'q', Context::Composer), None);
        assert_eq!(key(&reg, '1', Context::Composer), None);
        assert_eq!(
            reg.action_for_key(KeyCode::Enter, KeyModifiers::NONE, Context::Composer),
            Some(Action::SubmitComment)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Esc, KeyModifiers::NONE, Context::Composer),
            Some(Action::CancelCompose)
        );
    }

    #[test]
    fn test_ctrl_modifiers() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('d'), KeyModifiers::CONTROL, Context::Detail),
            Some(Action::PageDown)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('u'), KeyModifiers::CONTROL, Context::Stories),
            Some(Action::PageUp)
        );
    }

    #[test]
    fn test_unknown_key_returns_none() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::F(12), KeyModifiers::NONE, Context::Global),
            None
        );
    }

    #[test]
    fn test_apply_overrides_valid() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("quit".to_string(), "Ctrl+q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert!(warnings.is_empty());
        assert_eq!(key(&reg, 'q', Context::Global), None);
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::CONTROL, Context::Global),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_override_preserves_contexts() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("refresh".to_string(), "F5".to_string());
        assert!(reg.apply_overrides(&overrides).is_empty());

        for ctx in [Context::Stories, Context::Feed] {
            assert_eq!(
                reg.action_for_key(KeyCode::F(5), KeyModifiers::NONE, ctx),
                Some(Action::Refresh)
            );
        }
        assert_eq!(key(&reg, 'r', Context::Stories), None);
        // Detail's own 'r' is untouched
        assert_eq!(key(&reg, 'r', Context::Detail), Some(Action::ToggleReply));
    }

    #[test]
    fn test_override_conflict_is_reported() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("order_top".to_string(), "b".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("already bound"));
        assert_eq!(key(&reg, 'b', Context::Stories), Some(Action::OrderBest));
    }

    #[test]
    fn test_apply_overrides_unknown_action() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("nonexistent_action".to_string(), "q".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Unknown action"));
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
    fn test_parse_key_string_variants() {
        assert_eq!(parse_key_string("Enter"), Some(KeySpec::plain(KeyCode::Enter)));
        assert_eq!(parse_key_string("esc"), Some(KeySpec::plain(KeyCode::Esc)));
        assert_eq!(parse_key_string("space"), Some(KeySpec::ch(' ')));
        assert_eq!(parse_key_string("F1"), Some(KeySpec::plain(KeyCode::F(1))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("Ctrl+d"), Some(KeySpec::ctrl('d')));
        assert_eq!(parse_key_string("f"), Some(KeySpec::ch('f')));
        assert_eq!(parse_key_string("?"), Some(KeySpec::ch('?')));
        assert_eq!(parse_key_string("qq"), None);
    }

    #[test]
    fn test_format_key_display() {
        assert_eq!(format_key(&KeySpec::ch('q')), "q");
        assert_eq!(format_key(&KeySpec::ctrl('d')), "Ctrl+d");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Enter)), "Enter");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::F(5))), "F5");
    }

    #[test]
    fn test_key_hint() {
        let reg = KeybindingRegistry::new();
        assert_eq!(reg.key_hint(Action::Refresh, Context::Stories).as_deref(), Some("r"));
        assert_eq!(reg.key_hint(Action::Quit, Context::Detail).as_deref(), Some("q"));
        assert_eq!(reg.key_hint(Action::Compose, Context::Stories), None);
    }
}
