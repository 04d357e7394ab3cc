//! Fragment file reader with worker-pool fan-out

use crate::errors::{Result, ThrowgraphError};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Result of loading one fragment directory
#[derive(Debug)]
pub struct LoadOutcome<T> {
    pub records: Vec<T>,
    pub files_ok: usize,
    pub files_failed: usize,
}

/// Parse one fragment file (a JSON array of records).
///
/// Some extractor builds emit over-escaped output that is not valid JSON;
/// a parse failure is retried once with every backslash byte stripped.
pub fn read_fragment_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let bytes = fs::read(path)?;
    match serde_json::from_slice(&bytes) {
        Ok(records) => Ok(records),
        Err(first_err) => {
            let stripped: Vec<u8> = bytes.iter().copied().filter(|&b| b != b'\\').collect();
            serde_json::from_slice(&stripped).map_err(|_| {
                ThrowgraphError::fragment(format!("{}: {first_err}", path.display()))
            })
        }
    }
}

/// Load every `*.json` fragment under `dir`, one worker task per file.
///
/// Workers only parse; the caller merges the flat record stream serially.
/// In non-strict mode a failed file is logged and skipped.
pub fn load_dir<T>(dir: &Path, jobs: usize, strict: bool) -> Result<LoadOutcome<T>>
where
    T: DeserializeOwned + Send,
{
    let mut files = fragment_files(dir)?;
    files.sort();
    debug!(dir = %dir.display(), files = files.len(), "loading fragments");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
        .map_err(|e| ThrowgraphError::config(format!("ingest pool: {e}")))?;

    let parsed: Vec<(PathBuf, Result<Vec<T>>)> = pool.install(|| {
        files
            .into_par_iter()
            .map(|path| {
                let result = read_fragment_file(&path);
                (path, result)
            })
            .collect()
    });

    let mut outcome = LoadOutcome {
        records: Vec::new(),
        files_ok: 0,
        files_failed: 0,
    };
    for (path, result) in parsed {
        match result {
            Ok(records) => {
                outcome.files_ok += 1;
                outcome.records.extend(records);
            }
            Err(err) if strict => return Err(err),
            Err(err) => {
                outcome.files_failed += 1;
                warn!(file = %path.display(), %err, "skipping malformed fragment");
            }
        }
    }
    Ok(outcome)
}

/// A missing directory is an empty fragment set, not an error; the cache
/// tree only exists for TUs that were actually extracted.
fn fragment_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
    }
    Ok(files)
}
