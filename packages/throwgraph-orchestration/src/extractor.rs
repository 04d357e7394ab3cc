//! Extractor failure bookkeeping
//!
//! The Clang extractor runs out of process, one invocation per TU. Its
//! failures are recorded here per-TU and counted; in non-strict mode the
//! pipeline then proceeds with whatever fragments exist.

use crate::error::Result;
use rustc_hash::FxHashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Why one TU produced no fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorFailure {
    /// Wall-clock budget exceeded
    Timeout,
    /// Killed by a signal
    Signal(i32),
    /// Exited non-zero
    ExitCode(i32),
    /// Fragments written but unparseable even after the backslash retry
    Malformed,
}

impl ExtractorFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractorFailure::Timeout => "timeout",
            ExtractorFailure::Signal(_) => "signal",
            ExtractorFailure::ExitCode(_) => "exit",
            ExtractorFailure::Malformed => "malformed",
        }
    }
}

impl std::fmt::Display for ExtractorFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractorFailure::Timeout => write!(f, "timeout"),
            ExtractorFailure::Signal(s) => write!(f, "signal {s}"),
            ExtractorFailure::ExitCode(c) => write!(f, "exit code {c}"),
            ExtractorFailure::Malformed => write!(f, "malformed output"),
        }
    }
}

/// Append-only per-TU failure log with in-memory counts
#[derive(Debug)]
pub struct ExtractorLog {
    path: PathBuf,
    writer: BufWriter<File>,
    counts: FxHashMap<&'static str, usize>,
    total: usize,
}

impl ExtractorLog {
    /// Open (or create) `<out>/extract-failures.log`
    pub fn open(output_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join("extract-failures.log");
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            counts: FxHashMap::default(),
            total: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&mut self, tu: &Path, failure: ExtractorFailure) -> Result<()> {
        warn!(tu = %tu.display(), %failure, "extraction failed");
        writeln!(self.writer, "{}\t{}", failure, tu.display())?;
        self.writer.flush()?;
        *self.counts.entry(failure.kind()).or_default() += 1;
        self.total += 1;
        Ok(())
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }
}
