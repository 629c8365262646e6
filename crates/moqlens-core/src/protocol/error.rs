use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the control-message decoding primitives.
///
/// # Examples
/// ```
/// use moqlens_core::ControlError;
///
/// let err = ControlError::EndOfBuffer {
///     needed: 2,
///     available: 1,
/// };
/// assert!(err.to_string().contains("end of buffer"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum ControlError {
    #[error("unexpected end of buffer: need {needed} bytes, got {available}")]
    EndOfBuffer { needed: usize, available: usize },
    #[error("unsupported varint length prefix: {prefix:#04x}")]
    UnsupportedEncoding { prefix: u8 },
    #[error("declared string length {length} exceeds remaining buffer ({available} bytes left)")]
    LengthOverflow { length: u64, available: usize },
}
