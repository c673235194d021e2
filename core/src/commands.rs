//! # Commands
//!
//! One function per CLI subcommand. Every submission loads the snapshot,
//! applies the headers through a [`HeaderOracle`] and persists the result,
//! holding the snapshot's [`SnapshotLock`] throughout.

use crate::anchors::{read_header_lines, AnchorFile};
use crate::cli::Command;
use crate::config::OracleConfig;
use crate::errors::OracleError;
use crate::oracle::{HeaderOracle, OracleStatus};
use crate::settlement::JsonLinesSettlementSink;
use crate::snapshot::{load_snapshot, save_snapshot, SnapshotLock};
use oracle_lib::ChainEvent;
use serde::Serialize;
use serde_json::json;
use std::path::Path;

/// What a command reports back on standard output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    Status(OracleStatus),
    Events(Vec<ChainEvent>),
}

fn settlement_sink(config: &OracleConfig) -> Option<JsonLinesSettlementSink> {
    config
        .settlement_log_path
        .as_ref()
        .map(|path| JsonLinesSettlementSink::new(path.clone()))
}

fn open_oracle(
    config: &OracleConfig,
) -> Result<HeaderOracle<JsonLinesSettlementSink>, OracleError> {
    let store = load_snapshot(&config.snapshot_path)?;
    HeaderOracle::from_store(store, settlement_sink(config))
}

pub fn run_command(
    config: &OracleConfig,
    command: &Command,
) -> Result<CommandOutput, OracleError> {
    match command {
        Command::Init => init(config).map(CommandOutput::Status),
        Command::SubmitHeader { file } => {
            submit_header_file(config, file).map(CommandOutput::Events)
        }
        Command::SubmitChain { file } => {
            submit_chain_file(config, file).map(CommandOutput::Events)
        }
        Command::Status => status(config).map(CommandOutput::Status),
    }
}

/// Bootstraps from the anchor file and writes the first snapshot.
pub fn init(config: &OracleConfig) -> Result<OracleStatus, OracleError> {
    let _lock = SnapshotLock::acquire(&config.snapshot_path)?;
    if config.snapshot_path.exists() {
        return Err(OracleError::AlreadyBootstrapped(config.snapshot_path.clone()));
    }

    let anchor_file = AnchorFile::try_parse_file(&config.anchors_path)?;
    let anchors = anchor_file.decode_headers()?;
    let oracle =
        HeaderOracle::bootstrap(&anchors, anchor_file.tip_height, settlement_sink(config))?;

    save_snapshot(&config.snapshot_path, &oracle.snapshot()?)?;
    oracle.status()
}

/// Submits every header in `file` on top of the tip, in order.
///
/// Stops at the first rejected header. Headers accepted before it are kept
/// and persisted.
pub fn submit_header_file(
    config: &OracleConfig,
    file: &Path,
) -> Result<Vec<ChainEvent>, OracleError> {
    let headers = read_header_lines(file)?;
    let _lock = SnapshotLock::acquire(&config.snapshot_path)?;
    let oracle = open_oracle(config)?;

    let mut events = Vec::new();
    let mut result = Ok(());
    for header in &headers {
        match oracle.submit_header(header) {
            Ok(accepted) => events.extend(accepted),
            Err(e) => {
                result = Err(e);
                break;
            }
        }
    }

    if !events.is_empty() {
        save_snapshot(&config.snapshot_path, &oracle.snapshot()?)?;
    }
    tracing::info!(
        accepted = events.len(),
        submitted = headers.len(),
        tip_height = oracle.tip_height()?,
        "Header file processed"
    );

    result.map(|()| events)
}

/// Submits `file` as a single batch. Either all of it is applied or none.
pub fn submit_chain_file(
    config: &OracleConfig,
    file: &Path,
) -> Result<Vec<ChainEvent>, OracleError> {
    let headers = read_header_lines(file)?;
    let _lock = SnapshotLock::acquire(&config.snapshot_path)?;
    let oracle = open_oracle(config)?;

    let events = oracle.submit_chain(&headers)?;
    save_snapshot(&config.snapshot_path, &oracle.snapshot()?)?;

    Ok(events)
}

pub fn status(config: &OracleConfig) -> Result<OracleStatus, OracleError> {
    let _lock = SnapshotLock::acquire(&config.snapshot_path)?;
    open_oracle(config)?.status()
}

/// Machine readable form of a failed command, printed as one JSON line on
/// standard error. Verifier rejections carry their stable code; every other
/// failure is reported as `ORACLE_ERROR`.
pub fn error_report(error: &OracleError) -> serde_json::Value {
    match error.as_header_chain_error() {
        Some(e) => json!({
            "error": e.code(),
            "category": e.category(),
            "message": error.to_string(),
        }),
        None => json!({
            "error": "ORACLE_ERROR",
            "category": null,
            "message": error.to_string(),
        }),
    }
}
