//! Visit lifecycle state machine.
//!
//! One session owns one shared rendering surface and reconciles the
//! asynchronous, possibly out-of-order lifecycle events the surface
//! reports with the visit the session believes is current. Identifier
//! fencing is the race-prevention mechanism: an event carrying an
//! identifier other than the current visit's is dropped silently.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use hybridnav_core::prelude::*;
use hybridnav_core::{BridgeMessage, Location, SessionEvent, VisitAction, VisitResponse};

use hybridnav_bridge::{ScreenKey, SnapshotFetched, WebSurface};

use crate::destination::DestinationId;

use super::callback::VisitSessionCallback;
use super::visit::Visit;
use super::{error_codes, next_session_id, SessionId};

/// Overlapping redirect proposals for the same location within this
/// window are collapsed to one
pub const COLD_BOOT_REDIRECT_THROTTLE: Duration = Duration::from_millis(500);

/// Boot state of the shared rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No successful boot yet
    #[default]
    Cold,
    /// Surface is loading root resources
    ColdBooting,
    /// Bridge installed, warm visits accepted
    Ready,
}

/// The state machine owning one shared rendering surface
pub struct VisitSession {
    /// Unique session identifier
    pub id: SessionId,

    /// Display name for this session (e.g. tab or stack name)
    pub name: String,

    state: SessionState,

    surface: WebSurface,

    /// Exactly one visit is current at any time; a new `visit()` call
    /// unconditionally supersedes it
    current_visit: Option<Visit>,

    /// Single pending slot filled while cold-booting; overwritten, not
    /// enqueued
    pending_visit: Option<Visit>,

    /// Grows as screens render; cleared wholesale on reset
    restoration_identifiers: HashMap<DestinationId, String>,

    callback: Option<Box<dyn VisitSessionCallback>>,

    last_proposal: Option<(Location, Instant)>,
}

impl VisitSession {
    pub fn new(name: impl Into<String>, surface: WebSurface) -> Self {
        Self {
            id: next_session_id(),
            name: name.into(),
            state: SessionState::default(),
            surface,
            current_visit: None,
            pending_visit: None,
            restoration_identifiers: HashMap::new(),
            callback: None,
            last_proposal: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    pub fn current_visit(&self) -> Option<&Visit> {
        self.current_visit.as_ref()
    }

    pub fn pending_visit(&self) -> Option<&Visit> {
        self.pending_visit.as_ref()
    }

    pub fn restoration_identifier(&self, destination: DestinationId) -> Option<&str> {
        self.restoration_identifiers
            .get(&destination)
            .map(String::as_str)
    }

    /// Install the callback for the currently attached screen
    pub fn set_callback(&mut self, callback: Box<dyn VisitSessionCallback>) {
        self.callback = Some(callback);
    }

    /// Remove the callback on screen teardown so a background result
    /// cannot mutate a torn-down screen
    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    // ─────────────────────────────────────────────────────────
    // Surface attachment
    // ─────────────────────────────────────────────────────────

    pub fn attach_screen(&mut self, screen: ScreenKey) {
        self.surface.attach(screen);
    }

    pub fn detach_screen(&mut self, screen: ScreenKey) {
        self.surface.detach(screen);
    }

    pub fn surface(&self) -> &WebSurface {
        &self.surface
    }

    // ─────────────────────────────────────────────────────────
    // Visits
    // ─────────────────────────────────────────────────────────

    /// Perform a visit, superseding any current one.
    ///
    /// The caller is signalled synchronously before any dispatch so it
    /// can show progress immediately. A `reload` visit forces a reset
    /// first, guaranteeing a clean cold boot.
    pub fn visit(&mut self, visit: Visit) -> Result<()> {
        if let Some(callback) = self.callback.as_mut() {
            callback.on_visit_started(&visit.location);
        }

        if visit.reload {
            self.reset();
        }

        match self.state {
            SessionState::ColdBooting => {
                debug!(session = self.id, location = %visit.location, "queuing visit during cold boot");
                self.pending_visit = Some(visit);
                Ok(())
            }
            SessionState::Ready => self.warm_visit(visit),
            SessionState::Cold => self.cold_boot_visit(visit),
        }
    }

    /// Synthetically replay rendered+completed for a foregrounded
    /// screen whose location has not changed.
    ///
    /// Succeeds only when the session is ready and a restoration
    /// identifier is already cached for the visit's destination; the
    /// caller falls back to a real visit otherwise.
    pub fn restore_current_visit(&mut self) -> bool {
        if self.state != SessionState::Ready {
            return false;
        }
        let Some(visit) = self.current_visit.as_ref() else {
            return false;
        };
        if !self
            .restoration_identifiers
            .contains_key(&visit.destination_identifier)
        {
            return false;
        }

        let completed_offline = visit.completed_offline;
        if let Some(callback) = self.callback.as_mut() {
            callback.on_visit_rendered();
            callback.on_visit_completed(completed_offline);
        }
        true
    }

    /// Apply the result of a background cached-snapshot fetch.
    ///
    /// Marshaled back from the worker context by the host; only acted
    /// on when the session is still ready, the current visit asked to
    /// restore from cache, and its location still matches. The visit
    /// is then re-issued against the cached content and completes
    /// offline.
    pub fn handle_snapshot_fetched(&mut self, fetched: SnapshotFetched) -> Result<()> {
        if self.state != SessionState::Ready {
            return Ok(());
        }
        let Some(snapshot) = fetched.snapshot else {
            return Ok(());
        };
        let Some(mut visit) = self.current_visit.clone() else {
            return Ok(());
        };
        if !visit.restore_with_cached_snapshot
            || visit.location.as_str() != fetched.location.as_str()
        {
            trace!(session = self.id, location = %fetched.location, "snapshot no longer wanted");
            return Ok(());
        }

        debug!(session = self.id, location = %fetched.location, "completing visit offline");
        visit.completed_offline = true;
        visit.options.snapshot_html = Some(snapshot.html.clone());
        visit.options.response = Some(VisitResponse {
            status_code: snapshot.status_code,
            response_html: Some(snapshot.html),
        });
        self.warm_visit(visit)
    }

    /// Force the session back to cold, clearing all cached restoration
    /// state; the next visit is a clean cold boot
    pub fn reset(&mut self) {
        debug!(session = self.id, "session reset");
        self.state = SessionState::Cold;
        self.restoration_identifiers.clear();
        self.pending_visit = None;
        self.last_proposal = None;
        if let Some(visit) = self.current_visit.as_mut() {
            // Stale surface events for the old identifier must fence out
            visit.identifier.clear();
        }
        self.surface.invalidate_bridge();
    }

    fn warm_visit(&mut self, mut visit: Visit) -> Result<()> {
        let restoration_identifier = if visit.options.action == VisitAction::Restore {
            self.restoration_identifiers
                .get(&visit.destination_identifier)
                .cloned()
                .unwrap_or_default()
        } else {
            String::new()
        };

        // A restore without a cached restoration point degrades to a
        // fresh advance
        if restoration_identifier.is_empty() && visit.options.action == VisitAction::Restore {
            visit.options.action = VisitAction::Advance;
        }

        debug!(
            session = self.id,
            location = %visit.location,
            action = ?visit.options.action,
            "warm visit"
        );
        self.surface
            .visit(&visit.location, &visit.options, &restoration_identifier)?;
        self.current_visit = Some(visit);
        Ok(())
    }

    fn cold_boot_visit(&mut self, visit: Visit) -> Result<()> {
        debug!(session = self.id, location = %visit.location, reload = visit.reload, "cold boot");
        if visit.reload {
            self.surface.reload()?;
        } else {
            self.surface.load(&visit.location)?;
        }
        self.state = SessionState::ColdBooting;
        if let Some(callback) = self.callback.as_mut() {
            callback.on_page_started(&visit.location);
        }
        self.current_visit = Some(visit);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Event handling
    // ─────────────────────────────────────────────────────────

    /// Consume one event from the rendering surface or the platform
    pub fn handle_event(&mut self, event: SessionEvent) -> Result<()> {
        match event {
            SessionEvent::Message(message) => self.handle_message(message),
            SessionEvent::RenderProcessGone => {
                warn!(session = self.id, "render process gone");
                self.reset();
                if let Some(callback) = self.callback.as_mut() {
                    callback.on_render_process_gone();
                    callback.on_received_error(error_codes::RENDER_PROCESS_GONE);
                }
                Ok(())
            }
            SessionEvent::LoadFailed { description } => {
                warn!(session = self.id, %description, "load failed");
                self.reset();
                if let Some(callback) = self.callback.as_mut() {
                    callback.on_received_error(error_codes::LOAD_FAILED);
                }
                Ok(())
            }
            SessionEvent::SslError { description } => {
                warn!(session = self.id, %description, "ssl error");
                self.reset();
                if let Some(callback) = self.callback.as_mut() {
                    callback.on_received_error(error_codes::SSL_ERROR);
                }
                Ok(())
            }
        }
    }

    fn handle_message(&mut self, message: BridgeMessage) -> Result<()> {
        // visitStarted assigns the identifier; every other
        // identifier-carrying message is fenced against the current one
        if !matches!(message, BridgeMessage::VisitStarted(_)) {
            if let Some(identifier) = message.visit_identifier() {
                if !self.is_current_identifier(identifier) {
                    trace!(
                        session = self.id,
                        identifier,
                        "dropping stale surface event"
                    );
                    return Ok(());
                }
            }
        }

        match message {
            BridgeMessage::VisitProposed(event) => {
                if self.is_throttled_proposal(&event.location) {
                    debug!(session = self.id, location = %event.location, "throttling duplicate proposal");
                    return Ok(());
                }
                self.last_proposal = Some((event.location.clone(), Instant::now()));
                if let Some(callback) = self.callback.as_mut() {
                    callback.visit_proposed_to_location(event.location, event.options);
                }
            }
            BridgeMessage::VisitStarted(event) => {
                if let Some(visit) = self.current_visit.as_mut() {
                    visit.identifier = event.identifier;
                }
            }
            BridgeMessage::VisitRequestCompleted(event) => {
                trace!(session = self.id, identifier = event.identifier, "request completed");
            }
            BridgeMessage::VisitRequestFailed(event) => {
                self.reset();
                if let Some(callback) = self.callback.as_mut() {
                    callback.request_failed_with_status_code(
                        event.has_cached_snapshot,
                        event.status_code,
                    );
                }
            }
            BridgeMessage::VisitRendered(_) => {
                if let Some(callback) = self.callback.as_mut() {
                    callback.on_visit_rendered();
                }
            }
            BridgeMessage::VisitCompleted(event) => {
                let completed_offline = self.record_restoration(event.restoration_identifier);
                if let Some(callback) = self.callback.as_mut() {
                    callback.on_visit_completed(completed_offline);
                }
            }
            BridgeMessage::PageLoaded(event) => {
                self.record_restoration(event.restoration_identifier);
                self.surface.install_bridge()?;
                if let Some(location) = self.current_visit.as_ref().map(|v| v.location.clone()) {
                    if let Some(callback) = self.callback.as_mut() {
                        callback.on_page_finished(&location);
                    }
                }
            }
            BridgeMessage::PageInvalidated => {
                if let Some(callback) = self.callback.as_mut() {
                    callback.on_page_invalidated();
                }
                if let Some(current) = self.current_visit.clone() {
                    self.visit(current.reloading())?;
                }
            }
            BridgeMessage::BridgeReady(event) => {
                if event.is_ready {
                    self.on_bridge_ready()?;
                } else {
                    self.reset();
                    if let Some(callback) = self.callback.as_mut() {
                        callback
                            .request_failed_with_status_code(false, error_codes::BRIDGE_NOT_READY);
                    }
                }
            }
            BridgeMessage::BridgeFailedToLoad => {
                self.reset();
                if let Some(callback) = self.callback.as_mut() {
                    callback.on_received_error(error_codes::BRIDGE_FAILED_TO_LOAD);
                }
            }
            BridgeMessage::UnknownEvent { name, .. } => {
                warn!(session = self.id, %name, "unknown surface event");
            }
        }

        Ok(())
    }

    fn on_bridge_ready(&mut self) -> Result<()> {
        self.state = SessionState::Ready;
        if let Some(pending) = self.pending_visit.take() {
            self.warm_visit(pending)
        } else if let Some(identifier) =
            self.current_visit.as_ref().map(|v| v.identifier.clone())
        {
            self.surface.render_cold_boot(&identifier)
        } else {
            Ok(())
        }
    }

    fn is_current_identifier(&self, identifier: &str) -> bool {
        self.current_visit
            .as_ref()
            .map(|visit| !visit.identifier.is_empty() && visit.identifier == identifier)
            .unwrap_or(false)
    }

    /// Cold boot can replay the redirect that triggered it; a warm
    /// session never throttles proposals
    fn is_throttled_proposal(&self, location: &Location) -> bool {
        if self.state != SessionState::ColdBooting {
            return false;
        }
        match &self.last_proposal {
            Some((last_location, at)) => {
                last_location.as_str() == location.as_str()
                    && at.elapsed() < COLD_BOOT_REDIRECT_THROTTLE
            }
            None => false,
        }
    }

    /// Persist a restoration identifier for the current visit's
    /// destination; returns the visit's offline-completion flag
    fn record_restoration(&mut self, restoration_identifier: String) -> bool {
        match self.current_visit.as_ref() {
            Some(visit) => {
                if !restoration_identifier.is_empty() {
                    self.restoration_identifiers
                        .insert(visit.destination_identifier, restoration_identifier);
                }
                visit.completed_offline
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for VisitSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitSession")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("current_visit", &self.current_visit)
            .field("pending_visit", &self.pending_visit)
            .finish_non_exhaustive()
    }
}
