//! Bridge event definitions
//!
//! Lifecycle callbacks from the embedded web runtime arrive as JSON
//! envelopes `{"name": ..., "params": {...}}` and are parsed into the
//! typed [`BridgeMessage`] enum. [`SessionEvent`] wraps them together
//! with transport-level signals (render process loss, load failures)
//! into the single event stream a visit session consumes.

use serde::{Deserialize, Serialize};

use crate::location::Location;
use crate::options::VisitOptions;

// ─────────────────────────────────────────────────────────
// Event Structs
// ─────────────────────────────────────────────────────────

/// The page proposed a navigation (link tap, redirect, form result)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitProposed {
    pub location: Location,
    #[serde(default)]
    pub options: VisitOptions,
}

/// The runtime confirmed a visit has begun and assigned its identifier
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitStartedEvent {
    pub identifier: String,
    #[serde(default)]
    pub has_cached_snapshot: bool,
    pub location: Location,
}

/// The visit's network request finished (response received)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRequestCompleted {
    pub identifier: String,
}

/// The visit's network request failed
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRequestFailed {
    pub identifier: String,
    #[serde(default)]
    pub has_cached_snapshot: bool,
    pub status_code: i32,
}

/// The visit's content was rendered to the surface
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRendered {
    pub identifier: String,
}

/// The visit finished end to end
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitCompletedEvent {
    pub identifier: String,
    #[serde(default)]
    pub restoration_identifier: String,
}

/// A full page load finished (cold boot path)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLoaded {
    #[serde(default)]
    pub restoration_identifier: String,
}

/// The runtime reported whether its native bridge installed successfully
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeReady {
    pub is_ready: bool,
}

// ─────────────────────────────────────────────────────────
// BridgeMessage Enum
// ─────────────────────────────────────────────────────────

/// Fully typed message from the embedded web runtime
#[derive(Debug, Clone)]
pub enum BridgeMessage {
    VisitProposed(VisitProposed),
    VisitStarted(VisitStartedEvent),
    VisitRequestCompleted(VisitRequestCompleted),
    VisitRequestFailed(VisitRequestFailed),
    VisitRendered(VisitRendered),
    VisitCompleted(VisitCompletedEvent),
    PageLoaded(PageLoaded),
    /// The page declared its own cached state invalid
    PageInvalidated,
    BridgeReady(BridgeReady),
    BridgeFailedToLoad,

    // Fallback for unknown callbacks
    UnknownEvent {
        name: String,
        params: serde_json::Value,
    },
}

impl BridgeMessage {
    /// The visit identifier this message is fenced on, if any.
    ///
    /// Messages carrying an identifier that does not match the session's
    /// current visit are dropped by the consumer.
    pub fn visit_identifier(&self) -> Option<&str> {
        match self {
            BridgeMessage::VisitStarted(e) => Some(&e.identifier),
            BridgeMessage::VisitRequestCompleted(e) => Some(&e.identifier),
            BridgeMessage::VisitRequestFailed(e) => Some(&e.identifier),
            BridgeMessage::VisitRendered(e) => Some(&e.identifier),
            BridgeMessage::VisitCompleted(e) => Some(&e.identifier),
            _ => None,
        }
    }

    /// Check if this message reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            BridgeMessage::VisitRequestFailed(_)
                | BridgeMessage::BridgeFailedToLoad
                | BridgeMessage::BridgeReady(BridgeReady { is_ready: false })
        )
    }

    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        match self {
            BridgeMessage::VisitProposed(e) => {
                format!("Visit proposed to {}", e.location)
            }
            BridgeMessage::VisitStarted(e) => {
                format!("Visit {} started for {}", e.identifier, e.location)
            }
            BridgeMessage::VisitRequestCompleted(e) => {
                format!("Visit {} request completed", e.identifier)
            }
            BridgeMessage::VisitRequestFailed(e) => {
                format!("Visit {} failed with status {}", e.identifier, e.status_code)
            }
            BridgeMessage::VisitRendered(e) => format!("Visit {} rendered", e.identifier),
            BridgeMessage::VisitCompleted(e) => format!("Visit {} completed", e.identifier),
            BridgeMessage::PageLoaded(e) => {
                format!("Page loaded (restoration {})", e.restoration_identifier)
            }
            BridgeMessage::PageInvalidated => "Page invalidated".to_string(),
            BridgeMessage::BridgeReady(e) => {
                if e.is_ready {
                    "Bridge ready".to_string()
                } else {
                    "Bridge reported not ready".to_string()
                }
            }
            BridgeMessage::BridgeFailedToLoad => "Bridge failed to load".to_string(),
            BridgeMessage::UnknownEvent { name, .. } => format!("Event: {}", name),
        }
    }

    /// Parse a JSON envelope into a typed BridgeMessage
    pub fn parse(json: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(json).ok()?;
        let name = value.get("name").and_then(|v| v.as_str())?;
        let params = value
            .get("params")
            .cloned()
            .unwrap_or(serde_json::Value::Null);
        Some(Self::parse_event(name, params))
    }

    /// Parse an event by name
    fn parse_event(name: &str, params: serde_json::Value) -> Self {
        match name {
            "visitProposed" => serde_json::from_value(params.clone())
                .map(BridgeMessage::VisitProposed)
                .unwrap_or_else(|_| Self::unknown(name, params)),
            "visitStarted" => serde_json::from_value(params.clone())
                .map(BridgeMessage::VisitStarted)
                .unwrap_or_else(|_| Self::unknown(name, params)),
            "visitRequestCompleted" => serde_json::from_value(params.clone())
                .map(BridgeMessage::VisitRequestCompleted)
                .unwrap_or_else(|_| Self::unknown(name, params)),
            "visitRequestFailedWithStatusCode" => serde_json::from_value(params.clone())
                .map(BridgeMessage::VisitRequestFailed)
                .unwrap_or_else(|_| Self::unknown(name, params)),
            "visitRendered" => serde_json::from_value(params.clone())
                .map(BridgeMessage::VisitRendered)
                .unwrap_or_else(|_| Self::unknown(name, params)),
            "visitCompleted" => serde_json::from_value(params.clone())
                .map(BridgeMessage::VisitCompleted)
                .unwrap_or_else(|_| Self::unknown(name, params)),
            "pageLoaded" => serde_json::from_value(params.clone())
                .map(BridgeMessage::PageLoaded)
                .unwrap_or_else(|_| Self::unknown(name, params)),
            "pageInvalidated" => BridgeMessage::PageInvalidated,
            "bridgeReady" => serde_json::from_value(params.clone())
                .map(BridgeMessage::BridgeReady)
                .unwrap_or_else(|_| Self::unknown(name, params)),
            "bridgeFailedToLoad" => BridgeMessage::BridgeFailedToLoad,
            _ => Self::unknown(name, params),
        }
    }

    fn unknown(name: &str, params: serde_json::Value) -> Self {
        BridgeMessage::UnknownEvent {
            name: name.to_string(),
            params,
        }
    }
}

// ─────────────────────────────────────────────────────────
// SessionEvent
// ─────────────────────────────────────────────────────────

/// Events consumed by a visit session's single event stream
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Parsed bridge callback
    Message(BridgeMessage),

    /// The rendering surface's process was terminated by the OS
    RenderProcessGone,

    /// The surface failed to load a resource (network-level failure)
    LoadFailed { description: String },

    /// An SSL error occurred while loading
    SslError { description: String },
}
