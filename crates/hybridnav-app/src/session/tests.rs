//! Tests for the session module.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use hybridnav_core::events::{
        BridgeReady, PageLoaded, VisitCompletedEvent, VisitProposed, VisitRequestFailed,
        VisitStartedEvent,
    };
    use hybridnav_core::{BridgeMessage, Location, SessionEvent, VisitOptions};

    use hybridnav_bridge::test_utils::{drain_commands, recording_surface};
    use hybridnav_bridge::{CachedSnapshot, SnapshotFetched, SurfaceCommand};

    use crate::session::{
        error_codes, MockVisitSessionCallback, SessionState, Visit, VisitSession,
        VisitSessionCallback,
    };

    // ─────────────────────────────────────────────────────────
    // Recording callback
    // ─────────────────────────────────────────────────────────

    #[derive(Debug, Clone, PartialEq)]
    enum Recorded {
        PageStarted(String),
        PageFinished(String),
        VisitStarted(String),
        VisitCompleted(bool),
        VisitRendered,
        ReceivedError(i32),
        RenderProcessGone,
        Proposed(String),
        RequestFailed { has_cached_snapshot: bool, status_code: i32 },
        PageInvalidated,
    }

    #[derive(Default)]
    struct Recording {
        events: Rc<RefCell<Vec<Recorded>>>,
    }

    impl Recording {
        fn install(session: &mut VisitSession) -> Rc<RefCell<Vec<Recorded>>> {
            let events = Rc::new(RefCell::new(Vec::new()));
            session.set_callback(Box::new(Recording {
                events: Rc::clone(&events),
            }));
            events
        }
    }

    impl VisitSessionCallback for Recording {
        fn on_page_started(&mut self, location: &Location) {
            self.events
                .borrow_mut()
                .push(Recorded::PageStarted(location.path().to_string()));
        }
        fn on_page_finished(&mut self, location: &Location) {
            self.events
                .borrow_mut()
                .push(Recorded::PageFinished(location.path().to_string()));
        }
        fn on_visit_started(&mut self, location: &Location) {
            self.events
                .borrow_mut()
                .push(Recorded::VisitStarted(location.path().to_string()));
        }
        fn on_visit_completed(&mut self, completed_offline: bool) {
            self.events
                .borrow_mut()
                .push(Recorded::VisitCompleted(completed_offline));
        }
        fn on_visit_rendered(&mut self) {
            self.events.borrow_mut().push(Recorded::VisitRendered);
        }
        fn on_received_error(&mut self, status_code: i32) {
            self.events
                .borrow_mut()
                .push(Recorded::ReceivedError(status_code));
        }
        fn on_render_process_gone(&mut self) {
            self.events.borrow_mut().push(Recorded::RenderProcessGone);
        }
        fn visit_proposed_to_location(&mut self, location: Location, _options: VisitOptions) {
            self.events
                .borrow_mut()
                .push(Recorded::Proposed(location.path().to_string()));
        }
        fn request_failed_with_status_code(
            &mut self,
            has_cached_snapshot: bool,
            status_code: i32,
        ) {
            self.events.borrow_mut().push(Recorded::RequestFailed {
                has_cached_snapshot,
                status_code,
            });
        }
        fn on_page_invalidated(&mut self) {
            self.events.borrow_mut().push(Recorded::PageInvalidated);
        }
    }

    // ─────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────

    fn location(path: &str) -> Location {
        Location::parse(&format!("https://example.com{path}")).unwrap()
    }

    fn visit(path: &str, destination: u64) -> Visit {
        Visit::new(location(path), destination, VisitOptions::advance())
    }

    fn message(session: &mut VisitSession, message: BridgeMessage) {
        session.handle_event(SessionEvent::Message(message)).unwrap();
    }

    fn started(identifier: &str, path: &str) -> BridgeMessage {
        BridgeMessage::VisitStarted(VisitStartedEvent {
            identifier: identifier.to_string(),
            has_cached_snapshot: false,
            location: location(path),
        })
    }

    fn bridge_ready(is_ready: bool) -> BridgeMessage {
        BridgeMessage::BridgeReady(BridgeReady { is_ready })
    }

    /// Boot a session to READY with a current visit carrying `identifier`
    fn ready_session(identifier: &str) -> (VisitSession, tokio::sync::mpsc::UnboundedReceiver<SurfaceCommand>) {
        let (surface, mut rx) = recording_surface();
        let mut session = VisitSession::new("main", surface);
        session.visit(visit("/home", 1)).unwrap();
        message(&mut session, bridge_ready(true));
        message(&mut session, started(identifier, "/home"));
        drain_commands(&mut rx);
        (session, rx)
    }

    // ─────────────────────────────────────────────────────────
    // Boot sequencing
    // ─────────────────────────────────────────────────────────

    #[test]
    fn test_first_visit_cold_boots() {
        let (surface, mut rx) = recording_surface();
        let mut session = VisitSession::new("main", surface);
        assert_eq!(session.state(), SessionState::Cold);

        session.visit(visit("/home", 1)).unwrap();
        assert_eq!(session.state(), SessionState::ColdBooting);

        let commands = drain_commands(&mut rx);
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], SurfaceCommand::LoadLocation { .. }));
    }

    #[test]
    fn test_visit_signals_started_synchronously() {
        let (surface, _rx) = recording_surface();
        let mut session = VisitSession::new("main", surface);
        let events = Recording::install(&mut session);

        session.visit(visit("/home", 1)).unwrap();
        assert_eq!(
            events.borrow().first(),
            Some(&Recorded::VisitStarted("/home".to_string()))
        );
    }

    #[test]
    fn test_bridge_ready_renders_cold_boot_completion() {
        let (surface, mut rx) = recording_surface();
        let mut session = VisitSession::new("main", surface);
        session.visit(visit("/home", 1)).unwrap();
        drain_commands(&mut rx);

        message(&mut session, bridge_ready(true));
        assert_eq!(session.state(), SessionState::Ready);

        let commands = drain_commands(&mut rx);
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], SurfaceCommand::RenderColdBoot { .. }));
    }

    #[test]
    fn test_cold_boot_queues_exactly_one_pending_visit() {
        let (surface, mut rx) = recording_surface();
        let mut session = VisitSession::new("main", surface);
        session.visit(visit("/home", 1)).unwrap();
        drain_commands(&mut rx);

        // Two visits while cold-booting: the second overwrites the first
        session.visit(visit("/a", 2)).unwrap();
        session.visit(visit("/b", 3)).unwrap();
        assert_eq!(session.pending_visit().unwrap().location.path(), "/b");
        assert!(drain_commands(&mut rx).is_empty());

        message(&mut session, bridge_ready(true));
        let commands = drain_commands(&mut rx);
        assert_eq!(commands.len(), 1);
        match &commands[0] {
            SurfaceCommand::VisitLocation { location, .. } => {
                assert_eq!(location.path(), "/b");
            }
            other => panic!("expected warm visit, got {other:?}"),
        }
        assert!(session.pending_visit().is_none());
    }

    #[test]
    fn test_warm_visit_when_ready() {
        let (mut session, mut rx) = ready_session("v1");
        session.visit(visit("/feature", 2)).unwrap();

        let commands = drain_commands(&mut rx);
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], SurfaceCommand::VisitLocation { .. }));
    }

    #[test]
    fn test_reload_visit_forces_cold_boot() {
        let (mut session, mut rx) = ready_session("v1");

        session.visit(visit("/home", 1).reloading()).unwrap();
        assert_eq!(session.state(), SessionState::ColdBooting);

        let commands = drain_commands(&mut rx);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0], SurfaceCommand::Reload);
    }

    // ─────────────────────────────────────────────────────────
    // Restore semantics
    // ─────────────────────────────────────────────────────────

    #[test]
    fn test_restore_without_cached_identifier_degrades_to_advance() {
        let (mut session, mut rx) = ready_session("v1");

        session
            .visit(Visit::new(location("/feature"), 2, VisitOptions::restore()))
            .unwrap();

        let commands = drain_commands(&mut rx);
        match &commands[0] {
            SurfaceCommand::VisitLocation {
                options_json,
                restoration_identifier,
                ..
            } => {
                assert!(options_json.contains("advance"));
                assert!(restoration_identifier.is_empty());
            }
            other => panic!("expected warm visit, got {other:?}"),
        }
    }

    #[test]
    fn test_restore_with_cached_identifier_stays_restore() {
        let (mut session, mut rx) = ready_session("v1");
        message(
            &mut session,
            BridgeMessage::VisitCompleted(VisitCompletedEvent {
                identifier: "v1".to_string(),
                restoration_identifier: "rest-1".to_string(),
            }),
        );

        session
            .visit(Visit::new(location("/other"), 1, VisitOptions::restore()))
            .unwrap();

        let commands = drain_commands(&mut rx);
        match &commands[0] {
            SurfaceCommand::VisitLocation {
                options_json,
                restoration_identifier,
                ..
            } => {
                assert!(options_json.contains("restore"));
                assert_eq!(restoration_identifier, "rest-1");
            }
            other => panic!("expected warm visit, got {other:?}"),
        }
    }

    #[test]
    fn test_restore_current_visit_requires_cached_identifier() {
        let (mut session, _rx) = ready_session("v1");
        let events = Recording::install(&mut session);

        // Nothing cached for destination 1 yet
        assert!(!session.restore_current_visit());
        assert!(events.borrow().is_empty());

        message(
            &mut session,
            BridgeMessage::VisitCompleted(VisitCompletedEvent {
                identifier: "v1".to_string(),
                restoration_identifier: "rest-1".to_string(),
            }),
        );
        events.borrow_mut().clear();

        assert!(session.restore_current_visit());
        assert_eq!(
            events.borrow().as_slice(),
            [Recorded::VisitRendered, Recorded::VisitCompleted(false)]
        );
    }

    #[test]
    fn test_restore_current_visit_fails_when_not_ready() {
        let (surface, _rx) = recording_surface();
        let mut session = VisitSession::new("main", surface);
        session.visit(visit("/home", 1)).unwrap();
        assert!(!session.restore_current_visit());
    }

    // ─────────────────────────────────────────────────────────
    // Identifier fencing
    // ─────────────────────────────────────────────────────────

    #[test]
    fn test_stale_visit_completed_is_dropped() {
        let (mut session, _rx) = ready_session("v1");
        let mut callback = MockVisitSessionCallback::new();
        callback.expect_on_visit_completed().never();
        session.set_callback(Box::new(callback));

        message(
            &mut session,
            BridgeMessage::VisitCompleted(VisitCompletedEvent {
                identifier: "stale".to_string(),
                restoration_identifier: "rest-9".to_string(),
            }),
        );
        assert!(session.restoration_identifier(1).is_none());
    }

    #[test]
    fn test_visit_started_assigns_identifier() {
        let (surface, _rx) = recording_surface();
        let mut session = VisitSession::new("main", surface);
        session.visit(visit("/home", 1)).unwrap();
        assert!(session.current_visit().unwrap().identifier.is_empty());

        message(&mut session, started("v7", "/home"));
        assert_eq!(session.current_visit().unwrap().identifier, "v7");
    }

    #[test]
    fn test_matching_visit_completed_caches_restoration_identifier() {
        let (mut session, _rx) = ready_session("v1");
        let events = Recording::install(&mut session);

        message(
            &mut session,
            BridgeMessage::VisitCompleted(VisitCompletedEvent {
                identifier: "v1".to_string(),
                restoration_identifier: "rest-1".to_string(),
            }),
        );
        assert_eq!(session.restoration_identifier(1), Some("rest-1"));
        assert_eq!(
            events.borrow().as_slice(),
            [Recorded::VisitCompleted(false)]
        );
    }

    // ─────────────────────────────────────────────────────────
    // Failures always reset before notifying
    // ─────────────────────────────────────────────────────────

    #[test]
    fn test_request_failure_resets_then_notifies() {
        let (mut session, _rx) = ready_session("v1");
        let events = Recording::install(&mut session);

        message(
            &mut session,
            BridgeMessage::VisitRequestFailed(VisitRequestFailed {
                identifier: "v1".to_string(),
                has_cached_snapshot: true,
                status_code: 500,
            }),
        );

        assert_eq!(session.state(), SessionState::Cold);
        assert_eq!(
            events.borrow().as_slice(),
            [Recorded::RequestFailed {
                has_cached_snapshot: true,
                status_code: 500
            }]
        );
    }

    #[test]
    fn test_bridge_not_ready_synthesizes_sentinel_failure() {
        let (mut session, _rx) = ready_session("v1");
        let events = Recording::install(&mut session);

        message(&mut session, bridge_ready(false));
        assert_eq!(session.state(), SessionState::Cold);
        assert_eq!(
            events.borrow().as_slice(),
            [Recorded::RequestFailed {
                has_cached_snapshot: false,
                status_code: error_codes::BRIDGE_NOT_READY
            }]
        );
    }

    #[test]
    fn test_bridge_failed_to_load_reports_sentinel_error() {
        let (mut session, _rx) = ready_session("v1");
        let events = Recording::install(&mut session);

        message(&mut session, BridgeMessage::BridgeFailedToLoad);
        assert_eq!(session.state(), SessionState::Cold);
        assert_eq!(
            events.borrow().as_slice(),
            [Recorded::ReceivedError(error_codes::BRIDGE_FAILED_TO_LOAD)]
        );
    }

    #[test]
    fn test_render_process_gone_resets_session() {
        let (mut session, _rx) = ready_session("v1");
        let events = Recording::install(&mut session);

        session.handle_event(SessionEvent::RenderProcessGone).unwrap();
        assert_eq!(session.state(), SessionState::Cold);
        assert_eq!(
            events.borrow().as_slice(),
            [
                Recorded::RenderProcessGone,
                Recorded::ReceivedError(error_codes::RENDER_PROCESS_GONE)
            ]
        );
    }

    #[test]
    fn test_load_failed_resets_session() {
        let (mut session, _rx) = ready_session("v1");
        let events = Recording::install(&mut session);

        session
            .handle_event(SessionEvent::LoadFailed {
                description: "net::ERR_CONNECTION_REFUSED".to_string(),
            })
            .unwrap();
        assert_eq!(session.state(), SessionState::Cold);
        assert_eq!(
            events.borrow().as_slice(),
            [Recorded::ReceivedError(error_codes::LOAD_FAILED)]
        );
    }

    #[test]
    fn test_ssl_error_resets_session() {
        let (mut session, _rx) = ready_session("v1");
        let events = Recording::install(&mut session);

        session
            .handle_event(SessionEvent::SslError {
                description: "certificate expired".to_string(),
            })
            .unwrap();
        assert_eq!(session.state(), SessionState::Cold);
        assert_eq!(
            events.borrow().as_slice(),
            [Recorded::ReceivedError(error_codes::SSL_ERROR)]
        );
    }

    #[test]
    fn test_reset_clears_restoration_cache_and_pending() {
        let (mut session, _rx) = ready_session("v1");
        message(
            &mut session,
            BridgeMessage::VisitCompleted(VisitCompletedEvent {
                identifier: "v1".to_string(),
                restoration_identifier: "rest-1".to_string(),
            }),
        );
        assert!(session.restoration_identifier(1).is_some());

        session.reset();
        assert_eq!(session.state(), SessionState::Cold);
        assert!(session.restoration_identifier(1).is_none());
        assert!(session.pending_visit().is_none());
        // The old identifier no longer matches stale events
        assert!(session.current_visit().unwrap().identifier.is_empty());
    }

    // ─────────────────────────────────────────────────────────
    // Offline completion
    // ─────────────────────────────────────────────────────────

    #[test]
    fn test_snapshot_fetch_completes_visit_offline() {
        let (surface, mut rx) = recording_surface();
        let mut session = VisitSession::new("main", surface);
        session
            .visit(visit("/home", 1).with_cached_snapshot())
            .unwrap();
        message(&mut session, bridge_ready(true));
        message(&mut session, started("v1", "/home"));
        drain_commands(&mut rx);
        let events = Recording::install(&mut session);

        session
            .handle_snapshot_fetched(SnapshotFetched {
                location: location("/home"),
                snapshot: Some(CachedSnapshot {
                    html: "<html></html>".to_string(),
                    status_code: 200,
                }),
            })
            .unwrap();

        let commands = drain_commands(&mut rx);
        match &commands[0] {
            SurfaceCommand::VisitLocation { options_json, .. } => {
                assert!(options_json.contains("snapshotHTML"));
            }
            other => panic!("expected offline re-visit, got {other:?}"),
        }
        assert!(session.current_visit().unwrap().completed_offline);

        message(
            &mut session,
            BridgeMessage::VisitCompleted(VisitCompletedEvent {
                identifier: "v1".to_string(),
                restoration_identifier: "rest-1".to_string(),
            }),
        );
        assert!(events.borrow().contains(&Recorded::VisitCompleted(true)));
    }

    #[test]
    fn test_unwanted_snapshot_is_discarded() {
        let (mut session, mut rx) = ready_session("v1");

        // Current visit never asked for cached restoration
        session
            .handle_snapshot_fetched(SnapshotFetched {
                location: location("/home"),
                snapshot: Some(CachedSnapshot {
                    html: "<html></html>".to_string(),
                    status_code: 200,
                }),
            })
            .unwrap();
        assert!(drain_commands(&mut rx).is_empty());
        assert!(!session.current_visit().unwrap().completed_offline);
    }

    // ─────────────────────────────────────────────────────────
    // Page lifecycle
    // ─────────────────────────────────────────────────────────

    #[test]
    fn test_page_loaded_installs_bridge_and_caches_restoration() {
        let (surface, mut rx) = recording_surface();
        let mut session = VisitSession::new("main", surface);
        session.visit(visit("/home", 1)).unwrap();
        drain_commands(&mut rx);

        message(
            &mut session,
            BridgeMessage::PageLoaded(PageLoaded {
                restoration_identifier: "rest-1".to_string(),
            }),
        );

        assert_eq!(session.restoration_identifier(1), Some("rest-1"));
        let commands = drain_commands(&mut rx);
        assert_eq!(commands, [SurfaceCommand::InstallBridge]);
    }

    #[test]
    fn test_page_invalidated_reissues_current_visit_with_reload() {
        let (mut session, mut rx) = ready_session("v1");
        let events = Recording::install(&mut session);

        message(&mut session, BridgeMessage::PageInvalidated);

        // Caller is signalled, then the session cold-boots a reload
        assert_eq!(
            events.borrow().first(),
            Some(&Recorded::PageInvalidated)
        );
        assert_eq!(session.state(), SessionState::ColdBooting);
        let commands = drain_commands(&mut rx);
        assert!(commands.contains(&SurfaceCommand::Reload));
    }

    // ─────────────────────────────────────────────────────────
    // Proposals and throttling
    // ─────────────────────────────────────────────────────────

    #[test]
    fn test_proposal_forwarded_to_callback() {
        let (mut session, _rx) = ready_session("v1");
        let events = Recording::install(&mut session);

        message(
            &mut session,
            BridgeMessage::VisitProposed(VisitProposed {
                location: location("/next"),
                options: VisitOptions::advance(),
            }),
        );
        assert_eq!(
            events.borrow().as_slice(),
            [Recorded::Proposed("/next".to_string())]
        );
    }

    #[test]
    fn test_cold_boot_duplicate_proposal_is_collapsed() {
        let (surface, _rx) = recording_surface();
        let mut session = VisitSession::new("main", surface);
        session.visit(visit("/home", 1)).unwrap();
        assert_eq!(session.state(), SessionState::ColdBooting);
        let events = Recording::install(&mut session);

        for _ in 0..3 {
            message(
                &mut session,
                BridgeMessage::VisitProposed(VisitProposed {
                    location: location("/redirect"),
                    options: VisitOptions::advance(),
                }),
            );
        }
        assert_eq!(
            events.borrow().as_slice(),
            [Recorded::Proposed("/redirect".to_string())]
        );
    }

    #[test]
    fn test_cold_boot_distinct_proposals_are_not_throttled() {
        let (surface, _rx) = recording_surface();
        let mut session = VisitSession::new("main", surface);
        session.visit(visit("/home", 1)).unwrap();
        let events = Recording::install(&mut session);

        for path in ["/one", "/two"] {
            message(
                &mut session,
                BridgeMessage::VisitProposed(VisitProposed {
                    location: location(path),
                    options: VisitOptions::advance(),
                }),
            );
        }
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn test_warm_session_forwards_repeat_proposals() {
        let (mut session, _rx) = ready_session("v1");
        let events = Recording::install(&mut session);

        // A user re-tapping the same link on a ready session is two
        // real proposals, not a cold-boot redirect replay
        for _ in 0..2 {
            message(
                &mut session,
                BridgeMessage::VisitProposed(VisitProposed {
                    location: location("/checkout"),
                    options: VisitOptions::advance(),
                }),
            );
        }
        assert_eq!(
            events.borrow().as_slice(),
            [
                Recorded::Proposed("/checkout".to_string()),
                Recorded::Proposed("/checkout".to_string()),
            ]
        );
    }

    #[test]
    fn test_reset_forgets_throttled_proposal() {
        let (surface, _rx) = recording_surface();
        let mut session = VisitSession::new("main", surface);
        session.visit(visit("/home", 1)).unwrap();
        let events = Recording::install(&mut session);

        let propose = |session: &mut VisitSession| {
            message(
                session,
                BridgeMessage::VisitProposed(VisitProposed {
                    location: location("/redirect"),
                    options: VisitOptions::advance(),
                }),
            );
        };
        propose(&mut session);
        session.reset();
        session.visit(visit("/home", 1)).unwrap();
        propose(&mut session);

        // The reboot starts a fresh throttle window
        assert_eq!(
            events
                .borrow()
                .iter()
                .filter(|e| matches!(e, Recorded::Proposed(_)))
                .count(),
            2
        );
    }

    // ─────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────

    #[test]
    fn test_session_id_uniqueness() {
        let (s1, _r1) = recording_surface();
        let (s2, _r2) = recording_surface();
        let a = VisitSession::new("a", s1);
        let b = VisitSession::new("b", s2);
        assert_ne!(a.id, b.id);
    }
}
