//! Format registry and autodetection
//!
//! Handlers are kept in dispatch priority order: signature formats first,
//! then formats that must walk their directory, then heuristic ones.
//! [`Registry::find_handler`] stops at the first certain match.

use crate::error::{ArchiveError, Result};
use crate::formats;
use crate::handler::{ArchiveHandler, Confidence, Identification};

/// Ordered collection of format handlers
pub struct Registry {
    handlers: Vec<Box<dyn ArchiveHandler>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Create a registry holding every built-in format
    pub fn with_builtin_formats() -> Self {
        let mut registry = Self::new();
        for handler in formats::builtin_handlers() {
            registry.register(handler);
        }
        registry
    }

    /// Add a handler after every handler of the same or an earlier detection class
    pub fn register(&mut self, handler: Box<dyn ArchiveHandler>) {
        let class = handler.metadata().detection;
        let index = self
            .handlers
            .iter()
            .position(|h| h.metadata().detection > class)
            .unwrap_or(self.handlers.len());
        self.handlers.insert(index, handler);
    }

    /// All handlers in dispatch order
    pub fn list_handlers(&self) -> impl Iterator<Item = &dyn ArchiveHandler> {
        self.handlers.iter().map(|h| h.as_ref())
    }

    /// Look up a handler by format id
    pub fn get_handler(&self, id: &str) -> Option<&dyn ArchiveHandler> {
        self.list_handlers().find(|h| h.metadata().id == id)
    }

    /// Like [`Registry::get_handler`], but an unknown id is an error
    pub fn handler(&self, id: &str) -> Result<&dyn ArchiveHandler> {
        self.get_handler(id)
            .ok_or_else(|| ArchiveError::UnknownFormat(id.to_string()))
    }

    /// Candidate handlers for `content`
    ///
    /// A certain match returns that handler alone, discarding any possible
    /// matches seen before it. Otherwise every possible match is returned in
    /// priority order, which may be none.
    pub fn find_handler(&self, content: &[u8], filename: &str) -> Vec<&dyn ArchiveHandler> {
        let mut possible = Vec::new();

        for handler in self.list_handlers() {
            let result = handler.identify(content, filename);
            let id = handler.metadata().id;
            match result.confidence {
                Confidence::Certain => {
                    tracing::debug!(format = id, reason = %result.reason, "certain match");
                    return vec![handler];
                }
                Confidence::Possible => {
                    tracing::debug!(format = id, reason = %result.reason, "possible match");
                    possible.push(handler);
                }
                Confidence::Rejected => {
                    tracing::debug!(format = id, reason = %result.reason, "rejected");
                }
            }
        }

        possible
    }

    /// Every handler's verdict on `content`, in priority order
    pub fn identify_all(
        &self,
        content: &[u8],
        filename: &str,
    ) -> Vec<(&'static str, Identification)> {
        self.list_handlers()
            .map(|h| (h.metadata().id, h.identify(content, filename)))
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtin_formats()
    }
}
