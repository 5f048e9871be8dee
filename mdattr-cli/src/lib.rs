//! Library half of the `mdattr` binary.
//!
//! Exposes the inspect transforms so they can be tested without spawning the
//! executable.

pub mod transforms;
