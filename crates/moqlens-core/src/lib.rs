//! MoqLens core library for MoQ control-plane message validation.
//!
//! This crate implements the reference decoding pipeline used by the CLI:
//! a cursor-based byte reader feeds per-message parsers (layout/reader/
//! parser), and the validator folds every outcome into a diagnostic report.
//! Decoding is byte-oriented and side-effect free; there is no network I/O
//! and no session state. Protocol conventions are captured in the reader so
//! parsers stay minimal and consistent with the wire format.
//!
//! Invariants:
//! - `validate_control_message` is total: every input yields a report,
//!   never a panic.
//! - Reports are deterministic; decoding the same buffer twice yields
//!   identical values.
//! - The cursor never moves past the buffer end; each primitive consumes
//!   exactly the bytes its encoding dictates.
//!
//! Version française (résumé):
//! Cette crate fournit le décodeur de référence des messages de contrôle
//! MoQ : lecteur d'octets -> parseurs par type de message -> rapport de
//! diagnostic. Contrat total (aucune panique), résultats déterministes,
//! aucun état entre les appels.
//!
//! # Examples
//! ```
//! use moqlens_core::validate_control_message;
//!
//! let report = validate_control_message(&[0x03, 0x05, 0x07]);
//! println!("{report}");
//! ```

use serde::{Deserialize, Serialize};

mod protocol;
mod validator;

pub use protocol::error::ControlError;
pub use protocol::parser::{ControlMessage, SetupParam};
pub use validator::{ControlKind, ControlReport, validate_control_message};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no generation time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Aggregated validation report over a batch of control messages.
///
/// # Examples
/// ```
/// use moqlens_core::make_report;
///
/// let report = make_report("cli", Vec::new());
/// assert_eq!(report.report_version, moqlens_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the protocol version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,
    /// Input metadata.
    pub input: InputInfo,
    /// Per-message validation records in input order.
    pub messages: Vec<MessageRecord>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "moqlens").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Where the messages came from, as described by the caller.
    pub source: String,
    /// Number of messages validated.
    pub messages: u64,
}

/// Validation record for a single control message.
///
/// # Examples
/// ```
/// use moqlens_core::{MessageRecord, validate_control_message};
///
/// let record = MessageRecord {
///     index: 0,
///     hex: "030507".to_string(),
///     report: validate_control_message(&[0x03, 0x05, 0x07]),
/// };
/// assert!(record.report.is_decoded());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Zero-based position of the message in the input.
    pub index: u64,
    /// The raw message bytes, hex encoded.
    pub hex: String,
    /// Validation outcome for this message.
    pub report: ControlReport,
}

/// Build a report with base fields filled and the default timestamp.
///
/// The core stays clock-free; callers that want a real generation time
/// overwrite `generated_at` (the CLI stamps RFC3339).
pub fn make_report(source: &str, messages: Vec<MessageRecord>) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "moqlens".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            source: source.to_string(),
            messages: messages.len() as u64,
        },
        messages,
    }
}
