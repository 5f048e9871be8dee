//! Helpers shared by the markdown parser and serializer
//!
//! - `escape`: hex placeholders that hide escaped characters and code span
//!   contents from the structural rules
//! - `links`: link target resolution and bare-link detection

pub mod escape;
pub mod links;
