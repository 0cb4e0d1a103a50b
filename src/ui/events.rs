//! Application event handling.
//!
//! Applies background task results and timer ticks to view state. Results
//! are matched against the owning view's epoch and timer events against the
//! current timer generation; anything stale is dropped.

use crate::app::{App, AppEvent, Route};
use tokio::sync::mpsc;

use super::helpers::load_list;

/// Handle application events from background tasks.
pub fn handle_app_event(app: &mut App, event: AppEvent, event_tx: &mpsc::Sender<AppEvent>) {
    match event {
        AppEvent::StoriesLoaded { epoch, result } => match result {
            Ok(stories) => {
                if app.stories.apply_loaded(epoch, stories) {
                    tracing::debug!(epoch, count = app.stories.stories.len(), "Story list updated");
                }
            }
            Err(e) => {
                if app.stories.load_failed(epoch) {
                    tracing::warn!(error = %e, ordering = %app.stories.ordering, "Story list load failed");
                    app.set_status(format!("Failed to load stories: {}", e));
                }
            }
        },
        AppEvent::ItemLoaded { epoch, result } => {
            let Some(detail) = app.detail.as_mut() else {
                return;
            };
            match result {
                Ok(item) => {
                    detail.apply_item(epoch, item);
                }
                Err(e) => {
                    if detail.load_failed(epoch) {
                        tracing::warn!(error = %e, item_id = detail.item_id, "Item load failed");
                        app.set_status(format!("Failed to load item: {}", e));
                    }
                }
            }
        }
        AppEvent::CommentsResolved { epoch, result } => {
            let Some(detail) = app.detail.as_mut() else {
                return;
            };
            match result {
                Ok(roots) => {
                    if detail.apply_comments(epoch, roots) {
                        tracing::debug!(item_id = detail.item_id, comments = detail.tree.len(), "Comment tree resolved");
                    }
                }
                Err(e) => {
                    if detail.load_failed(epoch) {
                        tracing::warn!(error = %e, item_id = detail.item_id, "Comment resolution failed");
                        app.set_status(format!("Failed to load comments: {}", e));
                    }
                }
            }
        }
        AppEvent::FeedLoaded { epoch, result } => {
            app.feed.apply_loaded(epoch, result);
        }
        AppEvent::AutoRefresh { timer_gen } => {
            if app.route == Route::Home && app.stories.timers.is_current(timer_gen) {
                tracing::debug!(timer_gen, "Auto refresh");
                load_list(app, event_tx);
                app.stories.reset_countdown();
            } else {
                tracing::debug!(timer_gen, "Ignoring stale refresh tick");
            }
        }
        AppEvent::CountdownTick { timer_gen } => {
            if app.route == Route::Home && app.stories.timers.is_current(timer_gen) {
                app.stories.tick_countdown();
            }
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}
