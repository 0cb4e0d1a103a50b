//! Terminal front-end for the Hacker News read API.
//!
//! Three routes share one event loop: the story list (top / best / new with
//! a timed auto-refresh), an item page with its full comment tree and
//! local-only comments, and a feed of the newest comments site-wide.

pub mod api;
pub mod app;
pub mod comments;
pub mod config;
pub mod keybindings;
pub mod theme;
pub mod ui;
pub mod util;
pub mod views;
