//! Input handling for the TUI.
//!
//! Keys are resolved through the keybinding registry for the current
//! context. While a comment form has focus, unbound keys are typed into it.

use crate::api::{discussion_url, Listing};
use crate::app::{App, AppEvent, Route};
use crate::comments::ReplyOutcome;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::views::{SubmitError, Submitted};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{change_ordering, load_feed, manual_refresh, navigate, open_url};
use super::Action;

/// Rows moved by PageDown / PageUp.
const PAGE_SIZE: usize = 5;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Handle help overlay input first (captures all keys when visible)
    if app.show_help {
        return handle_help_input(app, code);
    }

    let context = app.context();
    if context == KbContext::Composer {
        handle_composer_input(app, code, modifiers);
        return Action::Continue;
    }

    let Some(action) = app.keybindings.action_for_key(code, modifiers, context) else {
        return Action::Continue;
    };

    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::GoHome => navigate(app, Route::Home, event_tx),
        KbAction::GoComments => navigate(app, Route::Comments, event_tx),
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KbAction::Back => {
            if let Route::Item(_) = app.route {
                let back = app.back_route;
                navigate(app, back, event_tx);
            }
        }
        KbAction::NavDown => move_selection(app, 1, true),
        KbAction::NavUp => move_selection(app, 1, false),
        KbAction::PageDown => move_selection(app, PAGE_SIZE, true),
        KbAction::PageUp => move_selection(app, PAGE_SIZE, false),
        KbAction::Select => handle_select(app, event_tx),
        KbAction::OpenInBrowser => handle_open(app),
        KbAction::Refresh => match app.route {
            Route::Home => manual_refresh(app, event_tx),
            Route::Comments => load_feed(app, event_tx),
            Route::Item(_) => {}
        },
        KbAction::CycleOrdering => {
            let next = app.stories.ordering.next_ordering();
            change_ordering(app, next, event_tx);
        }
        KbAction::OrderTop => change_ordering(app, Listing::Top, event_tx),
        KbAction::OrderBest => change_ordering(app, Listing::Best, event_tx),
        KbAction::OrderNew => change_ordering(app, Listing::New, event_tx),
        KbAction::ToggleReply => {
            if let Some(detail) = app.detail.as_mut() {
                match detail.selected_comment() {
                    Some(id) => detail.toggle_reply(id),
                    None => app.set_status("No comment selected"),
                }
            }
        }
        KbAction::Compose => {
            if let Some(detail) = app.detail.as_mut() {
                detail.open_composer();
            }
        }
        // Composer-only actions never resolve outside the Composer context.
        KbAction::SubmitComment | KbAction::SwitchField | KbAction::CancelCompose => {}
    }
    Action::Continue
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

/// Handle input while a comment or reply form has focus.
fn handle_composer_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Composer);
    let Some(detail) = app.detail.as_mut() else {
        return;
    };

    match action {
        Some(KbAction::SubmitComment) => {
            let message = match detail.submit_focused() {
                Ok(Submitted::Comment(_)) => "Comment added (local only)",
                Ok(Submitted::Reply(_, ReplyOutcome::TopLevelFallback)) => {
                    "Parent replies not loaded; reply added at top level"
                }
                Ok(Submitted::Reply(..)) => "Reply added (local only)",
                Err(SubmitError::EmptyText) => "Comment text is empty",
                Err(SubmitError::NoReplyTarget) => "No comment selected to reply to",
            };
            app.set_status(message);
        }
        Some(KbAction::SwitchField) => {
            if let Some(composer) = detail.active_composer_mut() {
                composer.toggle_field();
            }
        }
        Some(KbAction::CancelCompose) => detail.close_composer(),
        _ => {
            let Some(composer) = detail.active_composer_mut() else {
                return;
            };
            match code {
                KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => composer.push(c),
                KeyCode::Backspace => composer.backspace(),
                _ => {}
            }
        }
    }
}

fn move_selection(app: &mut App, steps: usize, down: bool) {
    for _ in 0..steps {
        match (app.route, down) {
            (Route::Home, true) => app.stories.select_next(),
            (Route::Home, false) => app.stories.select_prev(),
            (Route::Comments, true) => app.feed.select_next(),
            (Route::Comments, false) => app.feed.select_prev(),
            (Route::Item(_), _) => {
                let Some(detail) = app.detail.as_mut() else {
                    return;
                };
                if down {
                    detail.select_next();
                } else {
                    detail.select_prev();
                }
            }
        }
    }
}

/// Enter: open the selected story, or the parent of the selected feed comment.
fn handle_select(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let target = match app.route {
        Route::Home => app.stories.selected_story().map(|s| s.id),
        Route::Comments => app.feed.selected_comment().and_then(|c| c.parent),
        Route::Item(_) => None,
    };
    if let Some(id) = target {
        navigate(app, Route::Item(id), event_tx);
    }
}

fn handle_open(app: &mut App) {
    let url = match app.route {
        Route::Home => app.stories.selected_story().map(|s| s.link()),
        Route::Item(_) => app
            .detail
            .as_ref()
            .and_then(|d| d.item.as_ref())
            .map(|item| item.link()),
        Route::Comments => app
            .feed
            .selected_comment()
            .and_then(|c| c.parent)
            .map(discussion_url),
    };
    match url {
        Some(url) => open_url(app, &url),
        None => app.set_status("Nothing to open"),
    }
}
