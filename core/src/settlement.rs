//! # Settlement Log
//!
//! File backed [`SettlementSink`]. Every notice is appended as one JSON line,
//! which the ledger side tails.

use eyre::WrapErr;
use oracle_lib::{SettlementNotice, SettlementSink};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonLinesSettlementSink {
    path: PathBuf,
}

impl JsonLinesSettlementSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettlementSink for JsonLinesSettlementSink {
    fn notify_settlement(&mut self, notice: &SettlementNotice) -> eyre::Result<()> {
        let mut line = serde_json::to_string(notice)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .wrap_err_with(|| format!("Failed to open settlement log {:?}", self.path))?;
        file.write_all(line.as_bytes())
            .wrap_err_with(|| format!("Failed to append to settlement log {:?}", self.path))?;
        file.sync_data()?;

        tracing::debug!(height = notice.height, "Settlement notice written");
        Ok(())
    }
}

/// Reads every notice in a settlement log. A missing file has no notices.
pub fn read_settlement_log(path: &Path) -> eyre::Result<Vec<SettlementNotice>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut notices = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let notice = serde_json::from_str(&line)
            .wrap_err_with(|| format!("Line {} of {:?} is not a notice", index + 1, path))?;
        notices.push(notice);
    }

    Ok(notices)
}
