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
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

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
// Color Palette: semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Story list --
    pub story_title: Style,
    pub story_meta: Style,
    pub story_selected: Style,
    pub story_rank: Style,
    pub countdown: Style,

    // -- Comments --
    pub comment_author: Style,
    pub comment_age: Style,
    pub comment_body: Style,
    pub comment_local: Style,
    pub comment_selected: Style,
    pub reply_marker: Style,
    pub composer_border: Style,
    pub feed_link: Style,
    pub error: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub header_active: Style,
    pub header_inactive: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub help_heading: Style,
    pub help_hint: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            // Story list
            story_title: Style::default().add_modifier(Modifier::BOLD),
            story_meta: Style::default().fg(Color::Gray),
            story_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            story_rank: Style::default().fg(Color::Rgb(255, 102, 0)),
            countdown: Style::default().fg(Color::Yellow),

            // Comments
            comment_author: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            comment_age: Style::default().fg(Color::DarkGray),
            comment_body: Style::default(),
            comment_local: Style::default().fg(Color::Green),
            comment_selected: Style::default().bg(Color::DarkGray),
            reply_marker: Style::default().fg(Color::DarkGray),
            composer_border: Style::default().fg(Color::Yellow),
            feed_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            error: Style::default().fg(Color::Red),

            // Chrome
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            header_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(255, 102, 0))
                .add_modifier(Modifier::BOLD),
            header_inactive: Style::default().fg(Color::Gray),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            help_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            help_hint: Style::default().fg(Color::DarkGray),
        }
    }

    /// Light palette, adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            // Story list
            story_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            story_meta: Style::default().fg(Color::DarkGray),
            story_selected: Style::default().bg(Color::Blue).fg(Color::White),
            story_rank: Style::default().fg(Color::Rgb(204, 82, 0)),
            countdown: Style::default().fg(Color::Magenta),

            // Comments
            comment_author: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            comment_age: Style::default().fg(Color::DarkGray),
            comment_body: Style::default().fg(Color::Black),
            comment_local: Style::default().fg(Color::Green),
            comment_selected: Style::default().bg(Color::Gray),
            reply_marker: Style::default().fg(Color::Gray),
            composer_border: Style::default().fg(Color::Magenta),
            feed_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            error: Style::default().fg(Color::Red),

            // Chrome
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            header_active: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(204, 82, 0))
                .add_modifier(Modifier::BOLD),
            header_inactive: Style::default().fg(Color::DarkGray),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            help_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            help_hint: Style::default().fg(Color::DarkGray),
        }
    }
}

// ============================================================================
// Style Map: string-keyed lookup
// ============================================================================

/// String-keyed style lookup.
///
/// Built from a `ColorPalette`, this resolves role names (e.g.
/// `"comment_author"`) to their concrete `Style` at runtime.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 21] = [
    "story_title",
    "story_meta",
    "story_selected",
    "story_rank",
    "countdown",
    "comment_author",
    "comment_age",
    "comment_body",
    "comment_local",
    "comment_selected",
    "reply_marker",
    "composer_border",
    "feed_link",
    "error",
    "status_bar",
    "header_active",
    "header_inactive",
    "panel_border",
    "panel_border_focused",
    "help_heading",
    "help_hint",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 21] = [
            p.story_title,
            p.story_meta,
            p.story_selected,
            p.story_rank,
            p.countdown,
            p.comment_author,
            p.comment_age,
            p.comment_body,
            p.comment_local,
            p.comment_selected,
            p.reply_marker,
            p.composer_border,
            p.feed_link,
            p.error,
            p.status_bar,
            p.header_active,
            p.header_inactive,
            p.panel_border,
            p.panel_border_focused,
            p.help_heading,
            p.help_hint,
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
