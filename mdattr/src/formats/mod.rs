//! Format implementations
//!
//! This module contains all format implementations that convert between
//! styled text and its textual representations.

pub mod json;
pub mod markdown;

pub use json::{JsonFormat, JsonOptions};
pub use markdown::MarkdownFormat;
