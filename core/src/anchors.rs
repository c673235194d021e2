//! # Header Files
//!
//! Bootstrap anchors are read from a JSON file:
//!
//! ```json
//! { "tip_height": 838902, "headers": ["<80 byte header as hex>", ...] }
//! ```
//!
//! Headers listed there are ordered oldest first and `tip_height` is the
//! height of the last one. Submission files hold one hex encoded header per
//! line; blank lines and lines starting with `#` are skipped.

use crate::errors::OracleError;
use oracle_lib::BlockHeader;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorFile {
    pub tip_height: u64,
    pub headers: Vec<String>,
}

impl AnchorFile {
    pub fn from_headers(headers: &[BlockHeader], tip_height: u64) -> Self {
        Self {
            tip_height,
            headers: headers.iter().map(BlockHeader::to_hex).collect(),
        }
    }

    pub fn try_parse_file(path: &Path) -> Result<Self, OracleError> {
        let contents = fs::read_to_string(path).map_err(|e| OracleError::InvalidAnchorFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&contents).map_err(|e| OracleError::InvalidAnchorFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn write_file(&self, path: &Path) -> Result<(), OracleError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Decodes the anchor headers, oldest first.
    pub fn decode_headers(&self) -> Result<Vec<BlockHeader>, OracleError> {
        self.headers
            .iter()
            .map(|h| BlockHeader::from_hex(h))
            .collect::<Result<Vec<_>, _>>()
            .map_err(OracleError::from)
    }
}

/// Reads a submission file. Line numbers in errors are 1-based.
pub fn read_header_lines(path: &Path) -> Result<Vec<BlockHeader>, OracleError> {
    let contents = fs::read_to_string(path)?;

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            BlockHeader::from_hex(line.trim()).map_err(|source| OracleError::InvalidHeaderLine {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })
        })
        .collect()
}
