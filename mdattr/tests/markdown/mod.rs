//! Markdown format tests
//!
//! Tests for bidirectional Markdown ↔ styled text conversion.

mod parser;
mod properties;
mod roundtrip;
mod serializer;

use mdattr::MarkdownParser;
use once_cell::sync::Lazy;

/// Standard parser shared across tests. Building one compiles every rule.
pub(crate) static PARSER: Lazy<MarkdownParser> = Lazy::new(MarkdownParser::standard);
