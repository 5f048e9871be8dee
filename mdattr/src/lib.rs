//! Markdown ↔ styled text conversion
//!
//!     This crate converts a practical subset of markdown into styled (attributed) text, a
//!     string plus runs of typed style attributes, and serializes styled text back into
//!     markdown. The subset is what a rich text editor needs: strong, emphasis, code spans,
//!     headers, bulleted and numbered lists, quotes, links, autolinks and images.
//!
//!     TLDR:
//!         - Parsing is an ordered list of rewrite rules over the text buffer itself, no AST.
//!         - Serializing is one left-to-right walk that keeps markup in sync with styling.
//!         - For the supported subset, serialize(parse(s)) == s.
//!
//! Architecture
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # TextError (buffer contract) and FormatError
//!     ├── styled                  # StyledText buffer and typed Attributes
//!     ├── rules                   # Pattern trait, RuleSet and the engine loop
//!     ├── common                  # Escape placeholders, link resolution
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── markdown            # Rules, stylesheet, parser, serializer
//!     │   └── json                # Lossless StyledText dump
//!     ├── selection.rs            # Read-only selection queries
//!     └── transforms.rs           # Functional wrappers
//!
//!     This is a pure lib: no printing, no environment lookups. Diagnostics go through the
//!     `log` facade and it is up to the host to install a logger.
//!
//! Core Algorithm
//!
//!     A rule is a pattern plus an action. The engine runs rules in registration order; each
//!     rule scans the whole text, and after every match resumes at
//!     `match.end + (len_after - len_before)`, so actions may freely grow or shrink the
//!     text. Ordering does the rest: escapes hide literal punctuation from every structural
//!     rule and are undone last, and strong always resolves before emphasis.
//!
//!     See rules/mod.rs for the engine and formats/markdown/parser.rs for the standard set.
//!
//! Testing
//!
//!     tests
//!     └── markdown
//!         ├── parser.rs
//!         ├── serializer.rs
//!         ├── roundtrip.rs
//!         └── properties.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.

pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;
pub mod rules;
pub mod selection;
pub mod styled;
pub mod transforms;

pub use error::{FormatError, TextError, TextErrorKind};
pub use format::{Capabilities, Format};
pub use formats::markdown::{
    BulletStyle, ImageCatalog, ImageResolver, MarkdownParser, MarkdownSerializer, ParserOptions,
    SerializerOptions,
};
pub use registry::FormatRegistry;
pub use styled::{Attachment, Attributes, Color, Font, FontFace, StyledText};
