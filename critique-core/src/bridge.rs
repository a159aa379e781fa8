//! Message protocol between the editor host and the review session.
//!
//! Host communication is two independent one-directional queues, never a
//! blocking call: the host pushes [`HostMessage`]s in, the session pushes
//! [`SessionMessage`]s out and does not wait for an acknowledgement. Replies
//! the host wants to give (e.g. the outcome of an apply) arrive later as
//! ordinary inbound messages.
//!
//! On the wire each message is one line of JSON tagged by `type`.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::types::{ApplyScope, SourcePayload};

/// Notifications sent by the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostMessage {
    /// Fresh source text from the editor.
    NewCode(SourcePayload),
    /// The user signed in or out on the host side.
    AuthChanged { authenticated: bool },
    /// Outcome of an earlier `APPLY_TEXT`.
    ApplyResult {
        success: bool,
        #[serde(default)]
        message: Option<String>,
    },
    /// Any kind this session does not understand. Ignored.
    #[serde(other)]
    Unknown,
}

/// Notifications sent to the host. Fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionMessage {
    /// Announces the session once the display surface is up.
    #[serde(rename_all = "camelCase")]
    Ready { session_id: String },
    /// Ask the host to write `text` into the editor.
    ApplyText { scope: ApplyScope, text: String },
}

/// Decodes one inbound line. Blank and malformed lines yield `None`.
pub fn decode_line(line: &str) -> Option<HostMessage> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<HostMessage>(line) {
        Ok(HostMessage::Unknown) => {
            debug!(line, "ignoring host message of unknown kind");
            Some(HostMessage::Unknown)
        }
        Ok(msg) => Some(msg),
        Err(err) => {
            warn!(error = %err, "dropping malformed host message");
            None
        }
    }
}

/// Encodes one outbound message as a single JSON line (no trailing newline).
pub fn encode_line(msg: &SessionMessage) -> String {
    // Both variants hold only strings and unit enums, which always serialize.
    serde_json::to_string(msg).unwrap_or_default()
}

/// Sending half of the outbound queue, owned by the session.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<SessionMessage>,
}

impl Outbox {
    pub fn new(tx: mpsc::UnboundedSender<SessionMessage>) -> Self {
        Self { tx }
    }

    /// Queues `msg` for the host. Returns `false` when the host side is gone.
    pub fn send(&self, msg: SessionMessage) -> bool {
        self.tx.send(msg).is_ok()
    }
}

/// Both queues of the host link.
///
/// The inbound sender and outbound receiver are handed to the transport; the
/// session keeps the [`Outbox`] and the event loop keeps `inbound_rx`.
pub struct HostBridge {
    /// Transport pushes decoded host messages here.
    pub inbound_tx: mpsc::UnboundedSender<HostMessage>,
    /// Event loop drains host messages from here, in arrival order.
    pub inbound_rx: mpsc::UnboundedReceiver<HostMessage>,
    /// Handed to the session.
    pub outbox: Outbox,
    /// Transport drains session messages from here and writes them to the host.
    pub outbound_rx: mpsc::UnboundedReceiver<SessionMessage>,
}

impl HostBridge {
    pub fn new() -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        Self {
            inbound_tx,
            inbound_rx,
            outbox: Outbox::new(outbound_tx),
            outbound_rx,
        }
    }
}

impl Default for HostBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::SourceMode;

    #[test]
    fn decodes_new_code() {
        let line = r#"{"type":"NEW_CODE","code":"let x = 1;","filePath":"src/a.rs","languageId":"rust","mode":"selection"}"#;
        assert_eq!(
            decode_line(line),
            Some(HostMessage::NewCode(SourcePayload {
                code: "let x = 1;".to_owned(),
                file_path: "src/a.rs".to_owned(),
                language_id: "rust".to_owned(),
                mode: SourceMode::Selection,
            }))
        );
    }

    #[test]
    fn new_code_defaults_missing_identity_fields() {
        let line = r#"{"type":"NEW_CODE","code":"x"}"#;
        let Some(HostMessage::NewCode(payload)) = decode_line(line) else {
            panic!("expected NEW_CODE");
        };
        assert_eq!(payload.file_path, "");
        assert_eq!(payload.mode, SourceMode::Document);
    }

    #[test]
    fn unknown_kinds_are_tolerated() {
        let line = r#"{"type":"THEME_CHANGED","dark":true}"#;
        assert_eq!(decode_line(line), Some(HostMessage::Unknown));
    }

    #[test]
    fn malformed_and_blank_lines_are_dropped() {
        assert_eq!(decode_line(""), None);
        assert_eq!(decode_line("   "), None);
        assert_eq!(decode_line("{not json"), None);
        assert_eq!(decode_line(r#"{"code":"no type tag"}"#), None);
    }

    #[test]
    fn decodes_apply_result_and_auth() {
        assert_eq!(
            decode_line(r#"{"type":"APPLY_RESULT","success":false,"message":"read-only"}"#),
            Some(HostMessage::ApplyResult {
                success: false,
                message: Some("read-only".to_owned()),
            })
        );
        assert_eq!(
            decode_line(r#"{"type":"AUTH_CHANGED","authenticated":true}"#),
            Some(HostMessage::AuthChanged { authenticated: true })
        );
    }

    #[test]
    fn encodes_outbound_messages() {
        let msg = SessionMessage::ApplyText {
            scope: ApplyScope::File,
            text: "fn f() {}".to_owned(),
        };
        assert_eq!(
            encode_line(&msg),
            r#"{"type":"APPLY_TEXT","scope":"file","text":"fn f() {}"}"#
        );
        let ready = SessionMessage::Ready { session_id: "abc".to_owned() };
        assert_eq!(encode_line(&ready), r#"{"type":"READY","sessionId":"abc"}"#);
    }

    #[test]
    fn outbox_reports_closed_host() {
        let bridge = HostBridge::new();
        let outbox = bridge.outbox.clone();
        drop(bridge);
        assert!(!outbox.send(SessionMessage::Ready { session_id: "x".into() }));
    }
}
