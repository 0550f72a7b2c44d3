//! One in-flight rendering operation

use hybridnav_core::{Location, VisitOptions};

use crate::destination::DestinationId;

/// A single visit, owned by the session for its lifetime
///
/// `identifier` starts empty and is assigned once the rendering
/// surface confirms the visit started; from then on it is the join key
/// between this visit and the surface's lifecycle events.
#[derive(Debug, Clone)]
pub struct Visit {
    pub location: Location,

    /// Identity of the screen instance that requested this visit,
    /// keys the restoration-identifier cache
    pub destination_identifier: DestinationId,

    /// Render from the cached snapshot while the request is in flight
    pub restore_with_cached_snapshot: bool,

    /// Force a session reset and a fresh cold boot
    pub reload: bool,

    /// Assigned asynchronously by the surface; empty until then
    pub identifier: String,

    /// Set when the response was served from the offline cache
    pub completed_offline: bool,

    pub options: VisitOptions,
}

impl Visit {
    pub fn new(
        location: Location,
        destination_identifier: DestinationId,
        options: VisitOptions,
    ) -> Self {
        Self {
            location,
            destination_identifier,
            restore_with_cached_snapshot: false,
            reload: false,
            identifier: String::new(),
            completed_offline: false,
            options,
        }
    }

    pub fn reloading(mut self) -> Self {
        self.reload = true;
        self
    }

    pub fn with_cached_snapshot(mut self) -> Self {
        self.restore_with_cached_snapshot = true;
        self
    }
}
