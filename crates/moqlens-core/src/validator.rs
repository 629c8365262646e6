//! Top-level control-message classification and dispatch.
//!
//! The validator inspects the one-byte type tag, routes the payload to the
//! matching parser, and folds every outcome (including decode failures)
//! into a [`ControlReport`] value. It holds no state between calls.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::protocol::error::ControlError;
use crate::protocol::layout;
use crate::protocol::parser::{self, ControlMessage};

/// Control message kinds defined by the wire enumeration.
///
/// `SubscribeOk` and `SubscribeError` are defined protocol values without a
/// parser here; the validator reports them distinctly from unknown tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    ClientSetup,
    ServerSetup,
    Subscribe,
    SubscribeOk,
    SubscribeError,
}

impl ControlKind {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            layout::CLIENT_SETUP_TAG => Some(Self::ClientSetup),
            layout::SERVER_SETUP_TAG => Some(Self::ServerSetup),
            layout::SUBSCRIBE_TAG => Some(Self::Subscribe),
            layout::SUBSCRIBE_OK_TAG => Some(Self::SubscribeOk),
            layout::SUBSCRIBE_ERROR_TAG => Some(Self::SubscribeError),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            Self::ClientSetup => layout::CLIENT_SETUP_TAG,
            Self::ServerSetup => layout::SERVER_SETUP_TAG,
            Self::Subscribe => layout::SUBSCRIBE_TAG,
            Self::SubscribeOk => layout::SUBSCRIBE_OK_TAG,
            Self::SubscribeError => layout::SUBSCRIBE_ERROR_TAG,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ClientSetup => "CLIENT_SETUP",
            Self::ServerSetup => "SERVER_SETUP",
            Self::Subscribe => "SUBSCRIBE",
            Self::SubscribeOk => "SUBSCRIBE_OK",
            Self::SubscribeError => "SUBSCRIBE_ERROR",
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of validating one control-message buffer.
///
/// # Examples
/// ```
/// use moqlens_core::{ControlReport, validate_control_message};
///
/// let report = validate_control_message(&[]);
/// assert_eq!(report, ControlReport::Empty);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ControlReport {
    /// The message decoded cleanly into structured fields.
    Decoded { message: ControlMessage },
    /// Zero-length input; a defined outcome, not a decode failure.
    Empty,
    /// A defined protocol value this decoder has no parser for.
    Unsupported { kind: ControlKind },
    /// A type tag outside the wire enumeration.
    Unknown { tag: u8 },
    /// The payload did not decode; names the kind and the typed cause.
    Malformed {
        kind: ControlKind,
        error: ControlError,
    },
}

impl ControlReport {
    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded { .. })
    }
}

impl fmt::Display for ControlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decoded { message } => write!(f, "{message}"),
            Self::Empty => write!(f, "empty control message"),
            Self::Unsupported { kind } => {
                write!(f, "{kind} ({:#04x}): recognized type without a parser", kind.tag())
            }
            Self::Unknown { tag } => write!(f, "unknown control message type: {tag:#04x}"),
            Self::Malformed { kind, error } => write!(f, "{kind} parse error: {error}"),
        }
    }
}

/// Validate one control-message buffer and produce a diagnostic report.
///
/// Total over arbitrary input: every byte sequence of any length yields a
/// report value and the function never panics.
///
/// # Examples
/// ```
/// use moqlens_core::validate_control_message;
///
/// let report = validate_control_message(&[0x03, 0x05, 0x07]);
/// assert_eq!(report.to_string(), "SUBSCRIBE: request_id=5, track_alias=7");
/// ```
pub fn validate_control_message(data: &[u8]) -> ControlReport {
    let Some((&tag, payload)) = data.split_first() else {
        return ControlReport::Empty;
    };
    let Some(kind) = ControlKind::from_tag(tag) else {
        return ControlReport::Unknown { tag };
    };
    let parsed = match kind {
        ControlKind::ClientSetup => parser::parse_client_setup(payload),
        ControlKind::ServerSetup => parser::parse_server_setup(payload),
        ControlKind::Subscribe => parser::parse_subscribe(payload),
        ControlKind::SubscribeOk | ControlKind::SubscribeError => {
            return ControlReport::Unsupported { kind };
        }
    };
    match parsed {
        Ok(message) => ControlReport::Decoded { message },
        Err(error) => ControlReport::Malformed { kind, error },
    }
}
