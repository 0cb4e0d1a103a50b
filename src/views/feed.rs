use crate::api::{ApiError, Item};
use tokio::task::JoinHandle;

/// The only message the comments feed ever shows for a failed load.
pub const FEED_ERROR: &str = "Failed to fetch comments";

/// State of the newest-comments route.
#[derive(Default)]
pub struct FeedView {
    pub comments: Vec<Item>,
    pub error: Option<&'static str>,
    pub loading: bool,
    pub selected: usize,
    pub epoch: u64,
    load_handle: Option<JoinHandle<()>>,
}

impl FeedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self, epoch: u64) {
        self.abort_load();
        self.epoch = epoch;
        self.loading = true;
    }

    pub fn track_load(&mut self, handle: JoinHandle<()>) {
        self.abort_load();
        self.load_handle = Some(handle);
    }

    /// Applies a load result. Any error collapses to [`FEED_ERROR`].
    pub fn apply_loaded(&mut self, epoch: u64, result: Result<Vec<Item>, ApiError>) -> bool {
        if epoch != self.epoch {
            return false;
        }
        match result {
            Ok(comments) => {
                self.comments = comments;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Comments feed load failed");
                self.comments.clear();
                self.error = Some(FEED_ERROR);
            }
        }
        self.selected = self.selected.min(self.comments.len().saturating_sub(1));
        self.loading = false;
        self.load_handle = None;
        true
    }

    pub fn selected_comment(&self) -> Option<&Item> {
        self.comments.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.comments.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn teardown(&mut self) {
        self.abort_load();
        self.loading = false;
    }

    fn abort_load(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
        }
    }
}

impl Drop for FeedView {
    fn drop(&mut self) {
        self.abort_load();
    }
}
