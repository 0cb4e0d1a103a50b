//! Render functions for the TUI.
//!
//! Lays out header, route body and status bar, and dispatches the body to
//! the widget for the current route.

use crate::app::{App, Route};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::loop_runner::SPINNER_FRAMES;
use super::{detail, feed, header, help, status, stories};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

const SPINNER: [&str; SPINNER_FRAMES] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// "Loading..." with the current spinner frame.
pub(super) fn loading_label(app: &App) -> String {
    format!("{} Loading...", SPINNER[app.spinner_frame % SPINNER_FRAMES])
}

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    header::render(f, app, chunks[0]);
    match app.route {
        Route::Home => stories::render(f, app, chunks[1]),
        Route::Item(_) => detail::render(f, app, chunks[1]),
        Route::Comments => feed::render(f, app, chunks[1]),
    }
    status::render(f, app, chunks[2]);

    if app.show_help {
        help::render(f, app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HnClient, Item};
    use crate::config::Config;
    use crate::views::FEED_ERROR;
    use ratatui::{backend::TestBackend, Terminal};

    fn test_app() -> App {
        let config = Config::default();
        let client = HnClient::from_config(&config).unwrap();
        App::new(client, config)
    }

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_small_terminal_shows_size_message() {
        let app = test_app();
        assert!(draw(&app, 40, 8).contains("Terminal too small"));
    }

    #[tokio::test]
    async fn test_story_rows_and_countdown_render() {
        let mut app = test_app();
        app.stories.begin_load(1);
        app.stories.apply_loaded(
            1,
            vec![Item {
                id: 1,
                title: Some("Rust 2.0 released".into()),
                url: Some("https://www.rust-lang.org/news".into()),
                by: Some("steveklabnik".into()),
                score: 512,
                descendants: 77,
                ..Item::default()
            }],
        );

        let screen = draw(&app, 100, 20);
        assert!(screen.contains("Home | Comments"));
        assert!(screen.contains(" 1. Rust 2.0 released (rust-lang.org)"));
        assert!(screen.contains("512 points by steveklabnik | 77 comments"));
        assert!(screen.contains("Next update in: 30s"));
    }

    #[tokio::test]
    async fn test_feed_error_replaces_list() {
        let mut app = test_app();
        app.route = Route::Comments;
        app.feed.begin_load(1);
        app.feed
            .apply_loaded(1, Err(crate::api::ApiError::NotAList));

        let screen = draw(&app, 80, 12);
        assert!(screen.contains(FEED_ERROR));
    }
}
