use super::timers::RefreshTimers;
use crate::api::{Item, Listing};
use tokio::task::JoinHandle;

/// State of the story list (Top/Best/New).
pub struct StoriesView {
    pub ordering: Listing,
    pub stories: Vec<Item>,
    pub selected: usize,
    /// Seconds until the next automatic refresh.
    pub countdown: u64,
    /// Auto-refresh period in seconds.
    pub period: u64,
    pub loading: bool,
    /// Epoch of the load whose result this view will accept.
    pub epoch: u64,
    pub timers: RefreshTimers,
    load_handle: Option<JoinHandle<()>>,
}

impl StoriesView {
    pub fn new(ordering: Listing, period_secs: u64) -> Self {
        let period = period_secs.max(1);
        Self {
            ordering,
            stories: Vec::new(),
            selected: 0,
            countdown: period,
            period,
            loading: false,
            epoch: 0,
            timers: RefreshTimers::new(),
            load_handle: None,
        }
    }

    /// Marks a new load as the only one whose result counts.
    ///
    /// Any load still in flight is aborted.
    pub fn begin_load(&mut self, epoch: u64) {
        self.abort_load();
        self.epoch = epoch;
        self.loading = true;
    }

    pub fn track_load(&mut self, handle: JoinHandle<()>) {
        self.abort_load();
        self.load_handle = Some(handle);
    }

    /// Replaces the story collection. Returns `false` for stale results.
    pub fn apply_loaded(&mut self, epoch: u64, stories: Vec<Item>) -> bool {
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "Discarding stale story list");
            return false;
        }
        self.stories = stories;
        self.selected = self.selected.min(self.stories.len().saturating_sub(1));
        self.loading = false;
        self.load_handle = None;
        true
    }

    /// Ends a failed load, keeping whatever was shown before.
    pub fn load_failed(&mut self, epoch: u64) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.loading = false;
        self.load_handle = None;
        true
    }

    /// One-second countdown step, wrapping from 0 back to the period.
    pub fn tick_countdown(&mut self) {
        self.countdown = if self.countdown > 0 {
            self.countdown - 1
        } else {
            self.period
        };
    }

    pub fn reset_countdown(&mut self) {
        self.countdown = self.period;
    }

    /// Switches ordering. Returns `false` when it is already active.
    pub fn set_ordering(&mut self, ordering: Listing) -> bool {
        if self.ordering == ordering || !ordering.is_story_ordering() {
            return false;
        }
        self.ordering = ordering;
        self.selected = 0;
        true
    }

    pub fn selected_story(&self) -> Option<&Item> {
        self.stories.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.stories.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Stops timers and in-flight work when the route is left.
    pub fn teardown(&mut self) {
        self.timers.cancel();
        self.abort_load();
        self.loading = false;
    }

    fn abort_load(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!(epoch = self.epoch, "Aborted story load task");
        }
    }
}

impl Drop for StoriesView {
    fn drop(&mut self) {
        self.abort_load();
    }
}
