//! State handed to every markdown rule action
//!
//! Actions never capture the parser. They receive a [`ParseContext`] holding
//! the attribute tables, link settings and the image resolver, so a parser can
//! be restyled after its rules are registered.

use super::options::ParserOptions;
use super::stylesheet::Stylesheet;
use crate::common::links::LinkOptions;
use std::collections::HashMap;
use std::sync::Arc;

/// Natural size of an image, in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Looks up images referenced by `![alt](source)`.
///
/// Resolution is a synchronous, local lookup. Returning `None` is not an
/// error: the image falls back to its alt text.
pub trait ImageResolver: Send + Sync {
    fn resolve(&self, source: &str) -> Option<ImageSize>;
}

/// In-memory image table keyed by source path.
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    images: HashMap<String, ImageSize>,
}

impl ImageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, width: u32, height: u32) {
        self.images
            .insert(source.into(), ImageSize { width, height });
    }

    pub fn with_image(mut self, source: impl Into<String>, width: u32, height: u32) -> Self {
        self.insert(source, width, height);
        self
    }
}

impl ImageResolver for ImageCatalog {
    fn resolve(&self, source: &str) -> Option<ImageSize> {
        self.images.get(source).copied()
    }
}

#[derive(Clone)]
pub struct ParseContext {
    pub stylesheet: Stylesheet,
    pub links: LinkOptions,
    images: Arc<dyn ImageResolver>,
}

impl ParseContext {
    pub fn new(stylesheet: Stylesheet) -> Self {
        Self {
            stylesheet,
            links: LinkOptions::default(),
            images: Arc::new(ImageCatalog::new()),
        }
    }

    pub fn from_options(options: &ParserOptions) -> Self {
        let mut context = Self::new(Stylesheet::from_options(options));
        context.links = LinkOptions {
            encode_extra: options.url_encode_extra.clone(),
            base_url: options.base_url.clone(),
        };
        context
    }

    pub fn images(&self) -> &dyn ImageResolver {
        self.images.as_ref()
    }

    pub fn set_image_resolver(&mut self, resolver: impl ImageResolver + 'static) {
        self.images = Arc::new(resolver);
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new(Stylesheet::default())
    }
}
