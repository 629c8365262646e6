use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use moqlens_core::{MessageRecord, Report, make_report, validate_control_message};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// The three canonical control messages from the protocol examples:
// SUBSCRIBE, CLIENT_SETUP with one version and a path parameter, and
// SERVER_SETUP with the selected version and one parameter.
const DEMO_MESSAGES: [&[u8]; 3] = [
    &[0x03, 0x05, 0x07],
    &[0x01, 0x01, 0x01, 0x01, 0x05, b'/', b't', b'e', b's', b't'],
    &[0x02, 0x01, 0x02, 0x02, b'o', b'k'],
];

#[derive(Parser, Debug)]
#[command(name = "moqlens")]
#[command(version)]
#[command(
    about = "Reference decoder for MoQ control-plane messages.",
    long_about = None,
    after_help = "Examples:\n  moqlens validate 030507 --stdout\n  moqlens validate --file messages.hex -o report.json\n  moqlens demo"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode hex-encoded control messages and generate a versioned JSON report.
    #[command(
        after_help = "Examples:\n  moqlens validate 030507 --stdout\n  moqlens validate \"01 01 01 01 05 2f 74 65 73 74\" --stdout --pretty\n  moqlens validate --file messages.hex -o report.json"
    )]
    Validate {
        /// Hex-encoded control message (whitespace between bytes allowed)
        #[arg(required_unless_present = "file")]
        hex: Option<String>,

        /// Read messages from a file, one hex message per non-empty line
        #[arg(long, conflicts_with = "hex")]
        file: Option<PathBuf>,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if any message failed to decode
        #[arg(long)]
        strict: bool,

        /// List decode failures after validation
        #[arg(long)]
        list_failures: bool,
    },
    /// Decode the canonical sample messages and print their reports.
    Demo {
        /// Output the sample reports as a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            hex,
            file,
            report,
            stdout,
            pretty,
            compact,
            quiet,
            strict,
            list_failures,
        } => cmd_validate(
            hex,
            file,
            report,
            stdout,
            pretty,
            compact,
            quiet,
            strict,
            list_failures,
        ),
        Commands::Demo { json } => cmd_demo(json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(err.to_string(), None)
    }
}

fn cmd_validate(
    hex: Option<String>,
    file: Option<PathBuf>,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
    list_failures: bool,
) -> Result<(), CliError> {
    let (source, inputs) = collect_inputs(hex, file)?;

    let mut records = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        let bytes = parse_hex(input).map_err(|reason| {
            CliError::new(
                format!("invalid hex in message {}: {}", index + 1, reason),
                Some("expected pairs of hex digits, whitespace allowed".to_string()),
            )
        })?;
        records.push(MessageRecord {
            index: index as u64,
            hex: format_hex(&bytes),
            report: validate_control_message(&bytes),
        });
    }

    let mut rep = make_report(&source, records);
    rep.generated_at = now_rfc3339();
    let json = serialize_report(&rep, pretty, compact)?;

    if stdout {
        print!("{}", json);
        if list_failures && !quiet {
            print_failures(&rep);
        }
        if strict && has_failures(&rep) {
            return Err(CliError::new(
                "decode failures detected",
                Some("use --list-failures to inspect".to_string()),
            ));
        }
        return Ok(());
    }

    let report = report.expect("report required when not using stdout");
    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;

    if list_failures && !quiet {
        print_failures(&rep);
    }
    if !quiet {
        eprintln!("OK: report written -> {}", report.display());
    }
    if strict && has_failures(&rep) {
        return Err(CliError::new(
            "decode failures detected",
            Some("use --list-failures to inspect".to_string()),
        ));
    }
    Ok(())
}

fn cmd_demo(json: bool) -> Result<(), CliError> {
    if json {
        let records = DEMO_MESSAGES
            .iter()
            .enumerate()
            .map(|(index, bytes)| MessageRecord {
                index: index as u64,
                hex: format_hex(bytes),
                report: validate_control_message(bytes),
            })
            .collect();
        let mut rep = make_report("demo", records);
        rep.generated_at = now_rfc3339();
        println!("{}", serialize_report(&rep, true, false)?);
        return Ok(());
    }

    for bytes in DEMO_MESSAGES {
        println!("{}  {}", format_hex(bytes), validate_control_message(bytes));
    }
    Ok(())
}

fn collect_inputs(
    hex: Option<String>,
    file: Option<PathBuf>,
) -> Result<(String, Vec<String>), CliError> {
    if let Some(path) = file {
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        let lines: Vec<String> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        if lines.is_empty() {
            return Err(CliError::new(
                format!("no messages in input file: {}", path.display()),
                Some("expected one hex-encoded message per line".to_string()),
            ));
        }
        return Ok((path.display().to_string(), lines));
    }

    let hex = hex.expect("hex required when no file is given");
    Ok(("arg".to_string(), vec![hex]))
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn has_failures(rep: &Report) -> bool {
    rep.messages
        .iter()
        .any(|record| !record.report.is_decoded())
}

fn print_failures(rep: &Report) {
    eprintln!("Decode failures:");
    for record in rep.messages.iter().filter(|r| !r.report.is_decoded()) {
        eprintln!("  message {} ({}): {}", record.index + 1, record.hex, record.report);
    }
}

fn parse_hex(input: &str) -> Result<Vec<u8>, String> {
    let cleaned: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if cleaned.len() % 2 != 0 {
        return Err(format!("odd number of hex digits ({})", cleaned.len()));
    }
    let mut bytes = Vec::with_capacity(cleaned.len() / 2);
    for pair in cleaned.chunks(2) {
        let hi = hex_value(pair[0]).ok_or_else(|| invalid_digit(pair[0]))?;
        let lo = hex_value(pair[1]).ok_or_else(|| invalid_digit(pair[1]))?;
        bytes.push((hi << 4) | lo);
    }
    Ok(bytes)
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

fn invalid_digit(digit: u8) -> String {
    if digit.is_ascii_graphic() {
        format!("invalid hex digit '{}'", digit as char)
    } else {
        format!("invalid hex digit 0x{:02x}", digit)
    }
}

fn format_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| moqlens_core::DEFAULT_GENERATED_AT.to_string())
}
