//! Utility functions shared by the API client and the UI.
//!
//! - **URL validation**: base URL and browser-open checks
//! - **Text processing**: Unicode-aware width, truncation and word wrap
//! - **HTML**: plain-text rendering of comment and story bodies
//! - **Time**: relative ages and absolute timestamps
//!
//! # Examples
//!
//! ```
//! use hnreader::util::{display_width, format_age, html_to_text, truncate_to_width};
//!
//! let width = display_width("Hello 世界");
//! assert_eq!(width, 10);
//!
//! let truncated = truncate_to_width("Show HN: A very long title", 15);
//! assert_eq!(truncated, "Show HN: A v...");
//!
//! assert_eq!(html_to_text("a &amp; b"), "a & b");
//! assert_eq!(format_age(45), "45 seconds ago");
//! ```

mod html;
mod text;
mod time;
mod url_validator;

pub use html::{decode_entities, html_to_text};
pub use text::{display_width, strip_control_chars, truncate_to_width, wrap_text};
pub use time::{format_age, format_timestamp, now_unix, time_since};
pub use url_validator::{validate_base_url, validate_url_for_open, UrlValidationError};
