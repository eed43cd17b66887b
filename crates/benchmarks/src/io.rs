// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! I/O operations for result records.
//!
//! Each client's record lives in `<results_dir>/<stem>.json`, where the stem
//! comes from [`ClientLabel::result_stem`]. Writes overwrite; they are not
//! atomic and the last writer wins.

use crate::result::ResultRecord;
use sdk_parity_core::ClientLabel;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default results directory, relative to the working directory.
pub const RESULTS_DIR: &str = "results";

/// Path of the record file for `label` inside `results_dir`.
pub fn result_path(results_dir: &Path, label: ClientLabel) -> PathBuf {
    results_dir.join(format!("{}.json", label.result_stem()))
}

/// Write a record as pretty-printed JSON, creating the directory if needed.
pub fn write_record(record: &ResultRecord, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    fs::write(path, json)
}

/// Build and write the record for one client call. Returns the file path.
pub fn persist_result(
    results_dir: &Path,
    label: ClientLabel,
    duration_ms: u64,
    response: &serde_json::Value,
) -> io::Result<PathBuf> {
    let path = result_path(results_dir, label);
    let record = ResultRecord::new(duration_ms, response.clone());
    write_record(&record, &path)?;
    Ok(path)
}

/// Read the record for `label` back from `results_dir`.
pub fn read_result(results_dir: &Path, label: ClientLabel) -> io::Result<ResultRecord> {
    let content = fs::read_to_string(result_path(results_dir, label))?;
    serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Remove a record left over from an earlier run. Returns whether a file was removed.
pub fn remove_result(results_dir: &Path, label: ClientLabel) -> io::Result<bool> {
    match fs::remove_file(result_path(results_dir, label)) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
