//! Shared fixtures for the oracle integration tests.

#![allow(dead_code)]

use oracle_core::anchors::AnchorFile;
use oracle_core::config::OracleConfig;
use oracle_lib::test_utils::mine_chain;
use oracle_lib::BlockHeader;
use std::path::Path;
use tempfile::TempDir;

pub const TIP: u64 = 838902;
pub const START_TIME: u32 = 1_712_000_000;

pub fn anchors() -> Vec<BlockHeader> {
    mine_chain(17, [0u8; 32], START_TIME)
}

/// Creates a working directory holding an anchor file and a configuration
/// pointing into it. The snapshot is not created.
pub fn create_test_environment() -> (TempDir, OracleConfig, Vec<BlockHeader>) {
    let dir = tempfile::tempdir().unwrap();
    let anchors = anchors();

    let config = OracleConfig {
        anchors_path: dir.path().join("anchors.json"),
        snapshot_path: dir.path().join("oracle_snapshot.bin"),
        settlement_log_path: Some(dir.path().join("settlements.jsonl")),
    };
    AnchorFile::from_headers(&anchors, TIP)
        .write_file(&config.anchors_path)
        .unwrap();

    (dir, config, anchors)
}

pub fn write_header_file(path: &Path, headers: &[BlockHeader]) {
    let contents: Vec<String> = headers.iter().map(BlockHeader::to_hex).collect();
    std::fs::write(path, contents.join("\n")).unwrap();
}
