//! Per-route view state.
//!
//! Each route owns one of these exclusively. Results from background tasks
//! are applied through methods that check the load epoch, so a response
//! that arrives after the user moved on is dropped instead of overwriting
//! newer state.

mod detail;
mod feed;
mod stories;
mod timers;

pub use detail::{Composer, ComposerField, ComposerTarget, DetailView, SubmitError, Submitted};
pub use feed::{FeedView, FEED_ERROR};
pub use stories::StoriesView;
pub use timers::RefreshTimers;
