//! Typed client for the Hacker News read API.
//!
//! Two endpoint shapes are used: id lists (`/{listing}.json`) and single
//! items (`/item/{id}.json`). Fan-out over item ids is bounded and
//! order-preserving.

mod client;
mod types;

pub use client::{ApiError, HnClient};
pub use types::{discussion_url, Item, ItemId, Listing, HN_ITEM_URL};
