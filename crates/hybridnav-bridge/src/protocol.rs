//! Command building and sending for the embedded web runtime
//!
//! This module provides:
//! - Command building for the JS-facing operation envelope
//! - A channel-backed sender that the session and navigator write to
//! - Inbound message parsing (delegating to [`BridgeMessage::parse`])
//!
//! Commands are fire-and-forget: the runtime answers through lifecycle
//! callbacks, not request/response pairs, so there is no id tracking.

use serde_json::json;
use tokio::sync::mpsc;

use hybridnav_core::prelude::*;
use hybridnav_core::{BridgeMessage, Location};

/// An operation invoked on the embedded web runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCommand {
    /// Perform a scripted visit on an already-booted page
    VisitLocation {
        location: Location,
        options_json: String,
        restoration_identifier: String,
    },

    /// Load a location from scratch (cold boot)
    LoadLocation { location: Location },

    /// Reload the surface's current resource
    Reload,

    /// Render the cold-boot visit's completion directly
    RenderColdBoot { identifier: String },

    /// Install the bootstrap script that wires up the bridge
    InstallBridge,
}

impl SurfaceCommand {
    /// Build the JSON envelope handed to the rendering surface
    pub fn build(&self) -> String {
        let (name, args) = match self {
            SurfaceCommand::VisitLocation {
                location,
                options_json,
                restoration_identifier,
            } => (
                "visitLocationWithOptionsAndRestorationIdentifier",
                json!([location.as_str(), options_json, restoration_identifier]),
            ),
            SurfaceCommand::LoadLocation { location } => {
                ("loadLocation", json!([location.as_str()]))
            }
            SurfaceCommand::Reload => ("reload", json!([])),
            SurfaceCommand::RenderColdBoot { identifier } => {
                ("visitRenderedForColdBoot", json!([identifier]))
            }
            SurfaceCommand::InstallBridge => ("installBridge", json!([])),
        };

        json!({
            "name": name,
            "args": args,
        })
        .to_string()
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            SurfaceCommand::VisitLocation { .. } => "visit location",
            SurfaceCommand::LoadLocation { .. } => "load location",
            SurfaceCommand::Reload => "reload",
            SurfaceCommand::RenderColdBoot { .. } => "render cold boot",
            SurfaceCommand::InstallBridge => "install bridge",
        }
    }
}

/// Sends commands toward the rendering surface
///
/// The receiving end is owned by whatever glue physically injects the
/// envelope into the web runtime (out of scope here).
#[derive(Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<SurfaceCommand>,
}

impl std::fmt::Debug for CommandSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSender")
            .field("tx", &"<channel>")
            .finish()
    }
}

impl CommandSender {
    pub fn new(tx: mpsc::UnboundedSender<SurfaceCommand>) -> Self {
        Self { tx }
    }

    /// Create a sender paired with its receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SurfaceCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Send a command to the surface
    pub fn send(&self, command: SurfaceCommand) -> Result<()> {
        debug!("Sending surface command: {}", command.description());
        self.tx
            .send(command)
            .map_err(|_| Error::channel_send("rendering surface"))
    }
}

/// Parse one inbound message from the rendering surface.
///
/// Returns `None` for lines that are not a bridge envelope; garbage is
/// logged and dropped rather than surfaced as an error.
pub fn parse_surface_message(raw: &str) -> Option<BridgeMessage> {
    match BridgeMessage::parse(raw) {
        Some(message) => Some(message),
        None => {
            warn!(line = raw, "unparseable message from rendering surface");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    #[test]
    fn test_visit_command_envelope() {
        let command = SurfaceCommand::VisitLocation {
            location: loc("https://example.com/feature"),
            options_json: r#"{"action":"advance"}"#.to_string(),
            restoration_identifier: "abc".to_string(),
        };
        let value: serde_json::Value = serde_json::from_str(&command.build()).unwrap();
        assert_eq!(
            value["name"],
            "visitLocationWithOptionsAndRestorationIdentifier"
        );
        assert_eq!(value["args"][0], "https://example.com/feature");
        assert_eq!(value["args"][2], "abc");
    }

    #[test]
    fn test_argless_command_envelopes() {
        let reload: serde_json::Value =
            serde_json::from_str(&SurfaceCommand::Reload.build()).unwrap();
        assert_eq!(reload["name"], "reload");
        assert_eq!(reload["args"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_sender_delivers_commands() {
        let (sender, mut rx) = CommandSender::channel();
        sender.send(SurfaceCommand::InstallBridge).unwrap();
        assert_eq!(rx.try_recv().unwrap(), SurfaceCommand::InstallBridge);
    }

    #[test]
    fn test_sender_error_after_receiver_dropped() {
        let (sender, rx) = CommandSender::channel();
        drop(rx);
        assert!(sender.send(SurfaceCommand::Reload).is_err());
    }

    #[test]
    fn test_parse_surface_message_garbage() {
        assert!(parse_surface_message("{{nope").is_none());
        assert!(parse_surface_message(r#"{"name": "pageInvalidated"}"#).is_some());
    }
}
