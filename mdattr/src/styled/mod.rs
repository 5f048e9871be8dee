//! Styled (attributed) text: a string plus per-range style attributes.

pub mod attributes;
pub mod text;

pub use attributes::{Attachment, Attributes, Color, Font, FontFace, FontStyle, FontWeight};
pub use text::{Runs, StyledText};
