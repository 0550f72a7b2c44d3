//! Visit intent value objects
//!
//! These are the JSON-visible types exchanged with the embedded web
//! runtime when a visit is issued. The wire schema is
//! `{action, snapshotHTML?, response?: {statusCode, responseHTML?}}`.

use serde::{Deserialize, Serialize};

/// How a visit changes web-side history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitAction {
    /// Push a new history entry
    #[default]
    Advance,
    /// Replace the current history entry
    Replace,
    /// Restore a previously rendered page from its snapshot
    Restore,
}

/// An HTTP response carried along with a visit (e.g. a form submission
/// result rendered by the caller)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitResponse {
    pub status_code: i32,
    #[serde(rename = "responseHTML", default, skip_serializing_if = "Option::is_none")]
    pub response_html: Option<String>,
}

impl VisitResponse {
    pub fn new(status_code: i32) -> Self {
        Self {
            status_code,
            response_html: None,
        }
    }

    /// Whether the carried response is a 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// One navigation's intent, created per call and consumed at most once
/// by the destination screen
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitOptions {
    #[serde(default)]
    pub action: VisitAction,

    #[serde(rename = "snapshotHTML", default, skip_serializing_if = "Option::is_none")]
    pub snapshot_html: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<VisitResponse>,
}

impl VisitOptions {
    /// Options for a plain forward navigation
    pub fn advance() -> Self {
        Self::default()
    }

    /// Options that replace the current entry
    pub fn replace() -> Self {
        Self {
            action: VisitAction::Replace,
            ..Self::default()
        }
    }

    /// Options that restore a previously cached page
    pub fn restore() -> Self {
        Self {
            action: VisitAction::Restore,
            ..Self::default()
        }
    }

    pub fn with_response(mut self, response: VisitResponse) -> Self {
        self.response = Some(response);
        self
    }

    /// Serialize to the bridge JSON schema
    pub fn to_json(&self) -> String {
        // Serialization of this struct cannot fail: every field is a
        // string, int, or option thereof.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
