//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `helpers` - Route transitions and background loads
//! - `render` - Layout and dispatch to route widgets
//! - `header` - "Home | Comments" header
//! - `stories` - Story list widget
//! - `detail` - Item and comment tree widget
//! - `feed` - Newest comments widget
//! - `status` - Status bar widget
//! - `help` - Keybinding help overlay

mod detail;
mod events;
mod feed;
mod header;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;
mod stories;

// Re-export the public API
pub use events::handle_app_event;
pub use helpers::{
    change_ordering, load_detail, load_feed, load_list, manual_refresh, mount_route, navigate,
};
pub use loop_runner::{run, Action};
