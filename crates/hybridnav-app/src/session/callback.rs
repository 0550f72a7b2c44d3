//! Callback surface the session dispatches into

use hybridnav_core::{Location, VisitOptions};

/// Lifecycle callbacks delivered to the screen currently attached to
/// the session.
///
/// The session never surfaces visit failures as errors; it classifies
/// them and reports through this interface, and the screen decides
/// what to present.
#[cfg_attr(test, mockall::automock)]
pub trait VisitSessionCallback {
    /// The surface began loading resources for a location
    fn on_page_started(&mut self, location: &Location);

    /// The surface finished loading a page
    fn on_page_finished(&mut self, location: &Location);

    /// A visit was accepted by the session (synchronous, fires before
    /// any state dispatch so the screen can show progress immediately)
    fn on_visit_started(&mut self, location: &Location);

    /// The current visit completed; `completed_offline` reports
    /// whether the response came from the offline cache
    fn on_visit_completed(&mut self, completed_offline: bool);

    /// The current visit's content was rendered
    fn on_visit_rendered(&mut self);

    /// A non-request failure classified by status code (see
    /// [`super::error_codes`] for the sentinel values)
    fn on_received_error(&mut self, status_code: i32);

    /// The rendering process was killed; the session has already reset
    fn on_render_process_gone(&mut self);

    /// An in-page link or server redirect proposed a new location; the
    /// screen typically forwards this to the navigator
    fn visit_proposed_to_location(&mut self, location: Location, options: VisitOptions);

    /// The current visit's request failed; `has_cached_snapshot` tells
    /// the screen whether stale content is available to show instead
    fn request_failed_with_status_code(&mut self, has_cached_snapshot: bool, status_code: i32);

    /// The page declared its own cache invalid; the session will
    /// re-issue the current visit with a forced reload
    fn on_page_invalidated(&mut self);
}
