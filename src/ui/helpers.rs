//! Helper functions for UI operations.
//!
//! Route transitions and the background loads each route starts. Every load
//! is tagged with a fresh epoch and runs in a spawned task that reports back
//! through the `AppEvent` channel; the owning view keeps the task handle so
//! teardown can abort it.

use crate::api::Listing;
use crate::app::{App, AppEvent, Route};
use crate::comments::resolve_comments;
use crate::util::validate_url_for_open;
use crate::views::DetailView;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of a spawned task silently disappearing, the panic payload is
/// returned as `Err(String)` so it can be reported as
/// [`AppEvent::TaskPanicked`].
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else if let Some(e) = panic.downcast_ref::<Box<dyn std::error::Error + Send>>() {
                e.to_string()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

async fn send_event(tx: &mpsc::Sender<AppEvent>, task: &'static str, event: AppEvent) {
    if let Err(e) = tx.send(event).await {
        tracing::warn!(task, error = %e, "Failed to send task result (receiver dropped)");
    }
}

/// Spawns `work` with panic reporting. `work` receives its own sender.
fn spawn_guarded<F, Fut>(task: &'static str, tx: &mpsc::Sender<AppEvent>, work: F) -> JoinHandle<()>
where
    F: FnOnce(mpsc::Sender<AppEvent>) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let tx = tx.clone();
    let fut = work(tx.clone());
    tokio::spawn(async move {
        if let Err(error) = catch_task_panic(fut).await {
            tracing::error!(task, error = %error, "Background task panicked");
            send_event(&tx, task, AppEvent::TaskPanicked { task, error }).await;
        }
    })
}

// ============================================================================
// Navigation
// ============================================================================

/// Switches to `route`, tearing down the current one first.
///
/// Navigating to the route already shown is a no-op.
pub fn navigate(app: &mut App, route: Route, tx: &mpsc::Sender<AppEvent>) {
    if app.route == route {
        return;
    }
    tracing::debug!(from = ?app.route, to = ?route, "Navigating");
    teardown_route(app);
    if matches!(route, Route::Item(_)) && !matches!(app.route, Route::Item(_)) {
        app.back_route = app.route;
    }
    app.route = route;
    app.show_help = false;
    mount_route(app, tx);
}

/// Mounts the current route: builds its view state and starts its fetches.
pub fn mount_route(app: &mut App, tx: &mpsc::Sender<AppEvent>) {
    match app.route {
        Route::Home => {
            load_list(app, tx);
            restart_timers(app, tx);
        }
        Route::Item(id) => {
            app.detail = Some(DetailView::new(
                id,
                app.config.reply_placement,
                app.config.default_author.clone(),
            ));
            load_detail(app, tx);
        }
        Route::Comments => load_feed(app, tx),
    }
    app.needs_redraw = true;
}

/// Leaves the current route: bumps its epoch so in-flight results are
/// discarded, aborts its tasks, and cancels List View timers.
fn teardown_route(app: &mut App) {
    let epoch = app.next_epoch();
    match app.route {
        Route::Home => {
            app.stories.teardown();
            app.stories.epoch = epoch;
        }
        Route::Item(_) => {
            // Local comments live only as long as the view.
            if let Some(mut detail) = app.detail.take() {
                detail.teardown();
            }
        }
        Route::Comments => {
            app.feed.teardown();
            app.feed.epoch = epoch;
        }
    }
}

// ============================================================================
// List View
// ============================================================================

/// Fetches the current ordering's first `story_count` stories.
pub fn load_list(app: &mut App, tx: &mpsc::Sender<AppEvent>) {
    let epoch = app.next_epoch();
    app.stories.begin_load(epoch);

    let client = app.client.clone();
    let listing = app.stories.ordering;
    let count = app.config.story_count;
    tracing::debug!(%listing, count, epoch, "Loading story list");

    let handle = spawn_guarded("story list", tx, move |tx| async move {
        let result = client.load_stories(listing, count).await;
        send_event(&tx, "story list", AppEvent::StoriesLoaded { epoch, result }).await;
    });
    app.stories.track_load(handle);
}

/// Switches ordering, reloads immediately and recreates both timers.
pub fn change_ordering(app: &mut App, ordering: Listing, tx: &mpsc::Sender<AppEvent>) {
    if !app.stories.set_ordering(ordering) {
        return;
    }
    tracing::info!(%ordering, "Story ordering changed");
    load_list(app, tx);
    restart_timers(app, tx);
    app.set_status(format!("Showing {}", ordering.label()));
}

/// Cancels both timers, reloads immediately, resets the countdown and
/// recreates the timers.
pub fn manual_refresh(app: &mut App, tx: &mpsc::Sender<AppEvent>) {
    app.stories.timers.cancel();
    load_list(app, tx);
    restart_timers(app, tx);
    app.set_status("Refreshing...");
}

fn restart_timers(app: &mut App, tx: &mpsc::Sender<AppEvent>) {
    app.stories.reset_countdown();
    let period = Duration::from_secs(app.stories.period);
    app.stories.timers.restart(period, tx);
}

// ============================================================================
// Detail View
// ============================================================================

/// Fetches the mounted item, then resolves its comment tree.
///
/// The item is reported as soon as it arrives so the header can render
/// while comments are still loading.
pub fn load_detail(app: &mut App, tx: &mpsc::Sender<AppEvent>) {
    let epoch = app.next_epoch();
    let Some(detail) = app.detail.as_mut() else {
        return;
    };
    detail.begin_load(epoch);

    let client = app.client.clone();
    let item_id = detail.item_id;
    let max_depth = app.config.max_comment_depth;
    tracing::debug!(item_id, epoch, "Loading item detail");

    let handle = spawn_guarded("item detail", tx, move |tx| async move {
        let result = client.fetch_item(item_id).await;
        let kids = match &result {
            Ok(item) => item.kids.clone(),
            Err(_) => Vec::new(),
        };
        send_event(&tx, "item detail", AppEvent::ItemLoaded { epoch, result }).await;

        if kids.is_empty() {
            return;
        }
        let result = resolve_comments(&client, &kids, max_depth).await;
        send_event(&tx, "item detail", AppEvent::CommentsResolved { epoch, result }).await;
    });
    detail.track_load(handle);
}

// ============================================================================
// Comments Feed View
// ============================================================================

/// Fetches the newest `comment_feed_count` comments, one level only.
pub fn load_feed(app: &mut App, tx: &mpsc::Sender<AppEvent>) {
    let epoch = app.next_epoch();
    app.feed.begin_load(epoch);

    let client = app.client.clone();
    let count = app.config.comment_feed_count;
    tracing::debug!(count, epoch, "Loading comments feed");

    let handle = spawn_guarded("comments feed", tx, move |tx| async move {
        let result = client.load_newest_comments(count).await;
        send_event(&tx, "comments feed", AppEvent::FeedLoaded { epoch, result }).await;
    });
    app.feed.track_load(handle);
}

// ============================================================================
// Browser
// ============================================================================

/// Opens `url` in the system browser after validation.
pub(super) fn open_url(app: &mut App, url: &str) {
    // SEC: Validate URL before open::that() to prevent command injection
    match validate_url_for_open(url) {
        Err(e) => app.set_status(e.to_string()),
        Ok(valid) => match open::that(valid.as_str()) {
            Ok(()) => app.set_status(format!("Opening {}", valid)),
            Err(e) => app.set_status(format!("Failed to open browser: {}", e)),
        },
    }
}
