//! Handler registries
//!
//! Every backend keeps one ordered registry per criteria part (conditions,
//! facets, sortings). A part is handled by the first registered handler whose
//! `supports` returns true. When none does, the part is skipped: unknown
//! variants from extensions never break a search.

use std::sync::Arc;

/// Declares which criteria parts a handler can process
pub trait Supports<P: ?Sized> {
    fn supports(&self, part: &P) -> bool;
}

/// Supplies extra handlers when a registry is built
pub type HandlerProvider<H> = Box<dyn Fn() -> Vec<Arc<H>> + Send + Sync>;

/// Ordered list of handlers, first match wins
pub struct HandlerRegistry<H: ?Sized> {
    handlers: Vec<Arc<H>>,
}

impl<H: ?Sized> HandlerRegistry<H> {
    pub fn new(handlers: Vec<Arc<H>>) -> Self {
        Self { handlers }
    }

    /// Core handlers plus handlers from `providers`.
    ///
    /// Provided handlers come first so they can claim a variant ahead of the
    /// core handler for it.
    pub fn with_providers(core: Vec<Arc<H>>, providers: &[HandlerProvider<H>]) -> Self {
        let mut handlers: Vec<Arc<H>> = providers.iter().flat_map(|provide| provide()).collect();
        handlers.extend(core);
        Self { handlers }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn find<P: ?Sized>(&self, part: &P) -> Option<&Arc<H>>
    where
        H: Supports<P>,
    {
        self.handlers.iter().find(|h| h.supports(part))
    }
}

impl<H: ?Sized> Clone for HandlerRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<H: ?Sized> Default for HandlerRegistry<H> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}
