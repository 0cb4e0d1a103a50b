use crate::api::{ApiError, HnClient, Item, ItemId};
use crate::comments::Comment;
use crate::config::Config;
use crate::keybindings::{Context, KeybindingRegistry};
use crate::theme::{StyleMap, ThemeVariant};
use crate::views::{DetailView, FeedView, StoriesView};
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::time::Instant;

/// Seconds a status bar message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Routes
// ============================================================================

/// Top-level screens reachable from the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    /// Story list (top / best / new).
    #[default]
    Home,
    /// One item with its comment tree.
    Item(ItemId),
    /// Newest comments across the site.
    Comments,
}

impl Route {
    /// Keybinding context for the route (ignoring open comment forms).
    pub fn context(self) -> Context {
        match self {
            Route::Home => Context::Stories,
            Route::Item(_) => Context::Detail,
            Route::Comments => Context::Feed,
        }
    }
}

// ============================================================================
// Background Events
// ============================================================================

/// Events from background tasks.
///
/// Load results carry the epoch they were spawned under; the receiving view
/// drops anything that is not current. Timer events carry the timer
/// generation for the same reason.
#[derive(Debug)]
pub enum AppEvent {
    StoriesLoaded {
        epoch: u64,
        result: Result<Vec<Item>, ApiError>,
    },
    /// The story record for the detail view. Arrives before its comments.
    ItemLoaded {
        epoch: u64,
        result: Result<Item, ApiError>,
    },
    CommentsResolved {
        epoch: u64,
        result: Result<Vec<Comment>, ApiError>,
    },
    FeedLoaded {
        epoch: u64,
        result: Result<Vec<Item>, ApiError>,
    },
    AutoRefresh {
        timer_gen: u64,
    },
    CountdownTick {
        timer_gen: u64,
    },
    /// A background task panicked.
    ///
    /// Sent by tasks wrapped with `catch_task_panic` so panics surface in the
    /// status bar instead of vanishing silently.
    TaskPanicked {
        task: &'static str,
        error: String,
    },
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub client: HnClient,
    pub config: Config,
    /// Active theme variant (Dark or Light).
    pub theme_variant: ThemeVariant,
    /// Resolved style map for the active theme.
    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,

    pub route: Route,
    /// Where `Back` returns to from an item.
    pub back_route: Route,
    pub stories: StoriesView,
    /// Present only while an item route is mounted.
    pub detail: Option<DetailView>,
    pub feed: FeedView,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Set when state changed; the loop renders only then.
    pub needs_redraw: bool,
    pub show_help: bool,
    pub help_scroll_offset: usize,
    /// Loading spinner animation frame, advanced by the tick while a view loads.
    pub spinner_frame: usize,

    epoch: u64,
}

impl App {
    /// Builds the application state. Nothing is fetched until a route is
    /// mounted.
    pub fn new(client: HnClient, config: Config) -> Self {
        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
            ThemeVariant::Dark
        });

        let mut keybindings = KeybindingRegistry::new();
        for warning in keybindings.apply_overrides(&config.keybindings) {
            tracing::warn!(%warning, "Keybinding override skipped");
        }

        Self {
            client,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            route: Route::Home,
            back_route: Route::Home,
            stories: StoriesView::new(Default::default(), config.refresh_interval_secs),
            detail: None,
            feed: FeedView::new(),
            status_message: None,
            needs_redraw: true,
            show_help: false,
            help_scroll_offset: 0,
            spinner_frame: 0,
            epoch: 0,
            config,
        }
    }

    /// Allocates a fresh load epoch. Epochs are shared by all views, so a
    /// result can never match a view it was not spawned for.
    pub fn next_epoch(&mut self) -> u64 {
        self.epoch = self.epoch.wrapping_add(1);
        self.epoch
    }

    /// Keybinding context for the current route, or `Composer` while a
    /// comment form has focus.
    pub fn context(&self) -> Context {
        match &self.detail {
            Some(detail) if self.route == Route::Item(detail.item_id) && detail.focus.is_some() => {
                Context::Composer
            }
            _ => self.route.context(),
        }
    }

    /// True while the current route is waiting on the network.
    pub fn is_loading(&self) -> bool {
        match self.route {
            Route::Home => self.stories.loading,
            Route::Item(_) => self
                .detail
                .as_ref()
                .is_some_and(|d| d.item.is_none() || d.comments_loading),
            Route::Comments => self.feed.loading,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant. Returns its name for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

/// Tear down every view so no timer or load task outlives the loop.
impl Drop for App {
    fn drop(&mut self) {
        self.stories.teardown();
        if let Some(detail) = self.detail.as_mut() {
            detail.teardown();
        }
        self.feed.teardown();
        tracing::debug!("Aborted background tasks on App drop");
    }
}
