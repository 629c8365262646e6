use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ControlError;
use super::layout;
use super::reader::ControlReader;

/// One setup parameter: a numeric type and a length-prefixed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupParam {
    pub param_type: u64,
    pub value: String,
}

impl SetupParam {
    /// Registry name for a known setup parameter type, if any.
    pub fn type_name(&self) -> Option<&'static str> {
        match self.param_type {
            layout::SETUP_PARAM_PATH => Some("path"),
            layout::SETUP_PARAM_MAX_REQUEST_ID => Some("max_request_id"),
            layout::SETUP_PARAM_MAX_AUTH_TOKEN_CACHE_SIZE => Some("max_auth_token_cache_size"),
            _ => None,
        }
    }
}

impl fmt::Display for SetupParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_name() {
            Some(name) => write!(f, "{}={:?}", name, self.value),
            None => write!(f, "{:#x}={:?}", self.param_type, self.value),
        }
    }
}

/// Decoded fields of one control message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlMessage {
    ClientSetup {
        versions: Vec<u64>,
        params: Vec<SetupParam>,
    },
    ServerSetup {
        version: u64,
        params: Vec<SetupParam>,
    },
    Subscribe {
        request_id: u64,
        track_alias: u64,
    },
}

impl fmt::Display for ControlMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMessage::ClientSetup { versions, params } => {
                write!(f, "CLIENT_SETUP: versions={versions:?}, ")?;
                fmt_params(f, params)
            }
            ControlMessage::ServerSetup { version, params } => {
                write!(f, "SERVER_SETUP: version={version}, ")?;
                fmt_params(f, params)
            }
            ControlMessage::Subscribe {
                request_id,
                track_alias,
            } => {
                write!(f, "SUBSCRIBE: request_id={request_id}, track_alias={track_alias}")
            }
        }
    }
}

fn fmt_params(f: &mut fmt::Formatter<'_>, params: &[SetupParam]) -> fmt::Result {
    write!(f, "params=[")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{param}")?;
    }
    write!(f, "]")
}

/// Parse a SUBSCRIBE payload: `request_id` then `track_alias`.
///
/// Bytes after the two fields are ignored; future subscription filter
/// fields would extend this parser.
pub fn parse_subscribe(payload: &[u8]) -> Result<ControlMessage, ControlError> {
    let mut reader = ControlReader::new(payload);
    let request_id = reader.read_varint()?;
    let track_alias = reader.read_varint()?;
    Ok(ControlMessage::Subscribe {
        request_id,
        track_alias,
    })
}

/// Parse a CLIENT_SETUP payload: a counted version list, then setup
/// parameters to the end of the payload.
pub fn parse_client_setup(payload: &[u8]) -> Result<ControlMessage, ControlError> {
    let mut reader = ControlReader::new(payload);
    let version_count = reader.read_varint()?;
    let mut versions = Vec::new();
    for _ in 0..version_count {
        versions.push(reader.read_varint()?);
    }
    let params = read_setup_params(&mut reader)?;
    Ok(ControlMessage::ClientSetup { versions, params })
}

/// Parse a SERVER_SETUP payload: the selected version, then setup
/// parameters to the end of the payload.
pub fn parse_server_setup(payload: &[u8]) -> Result<ControlMessage, ControlError> {
    let mut reader = ControlReader::new(payload);
    let version = reader.read_varint()?;
    let params = read_setup_params(&mut reader)?;
    Ok(ControlMessage::ServerSetup { version, params })
}

/// Read `(type, value)` parameter pairs until the payload is exhausted.
///
/// A dangling partial pair surfaces the reader's own error; it is never
/// silently dropped.
fn read_setup_params(reader: &mut ControlReader<'_>) -> Result<Vec<SetupParam>, ControlError> {
    let mut params = Vec::new();
    while !reader.is_empty() {
        let param_type = reader.read_varint()?;
        let value = reader.read_string()?;
        params.push(SetupParam { param_type, value });
    }
    Ok(params)
}
