//! Destinations: native screens addressable by URI

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use hybridnav_core::prelude::*;
use hybridnav_core::PathProperties;

/// Unique identifier for a registered destination (one per screen
/// instance in the navigation graph)
pub type DestinationId = u64;

static DESTINATION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique destination ID
pub fn next_destination_id() -> DestinationId {
    DESTINATION_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// How a destination presents, which changes transition mechanics
/// (dialogs survive their own pop; standard screens do not)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DestinationKind {
    #[default]
    Standard,
    Dialog,
}

/// A native screen registered under a URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub id: DestinationId,
    pub uri: String,
    pub kind: DestinationKind,
}

impl Destination {
    pub fn new(uri: impl Into<String>, kind: DestinationKind) -> Self {
        Self {
            id: next_destination_id(),
            uri: uri.into(),
            kind,
        }
    }

    pub fn is_dialog(&self) -> bool {
        self.kind == DestinationKind::Dialog
    }
}

/// Registered destinations, looked up by exact URI match
#[derive(Debug, Default)]
pub struct DestinationRegistry {
    by_uri: HashMap<String, Destination>,
}

impl DestinationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a destination under its URI, returning its ID.
    ///
    /// Registering the same URI again replaces the previous entry.
    pub fn register(&mut self, uri: impl Into<String>, kind: DestinationKind) -> DestinationId {
        let destination = Destination::new(uri, kind);
        let id = destination.id;
        self.by_uri.insert(destination.uri.clone(), destination);
        id
    }

    /// Exact-match lookup by URI
    pub fn get(&self, uri: &str) -> Option<&Destination> {
        self.by_uri.get(uri)
    }

    pub fn len(&self) -> usize {
        self.by_uri.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uri.is_empty()
    }

    /// Resolve a location's configured destination and fallback.
    ///
    /// Returns `(destination, fallback_destination)`; both `None` means
    /// resolution failed and the navigation must become a logged no-op.
    pub fn resolve(
        &self,
        properties: &PathProperties,
    ) -> (Option<Destination>, Option<Destination>) {
        let destination = match properties.uri() {
            Ok(uri) => {
                let found = self.get(uri).cloned();
                if found.is_none() {
                    debug!(uri, "no destination registered for configured uri");
                }
                found
            }
            Err(err) => {
                warn!(%err, "location has no configured uri");
                None
            }
        };

        let fallback = properties
            .fallback_uri()
            .and_then(|uri| self.get(uri).cloned());

        (destination, fallback)
    }
}
