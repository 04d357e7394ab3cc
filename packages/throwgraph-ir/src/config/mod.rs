//! Analysis configuration
//!
//! Recognized options mirror the extractor driver surface; unknown keys in a
//! config file are rejected so typos fail fast.

use crate::errors::{Result, ThrowgraphError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Whole-run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Pass system-header functions through extraction.
    ///
    /// Affects fragment contents only; the profiler independently skips
    /// system-tagged callers regardless of this switch.
    pub include_system_header: bool,

    /// Expand virtual call sites against the polymorph table
    pub expand_virtual_calls: bool,

    /// Treat any extraction or fragment failure as fatal
    pub strict: bool,

    /// Worker count for fragment ingest
    pub jobs: usize,

    /// Per-TU extraction wall-clock budget, seconds
    pub timeout: u64,

    /// Root directory for cache and result artifacts
    pub output_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            include_system_header: false,
            expand_virtual_calls: true,
            strict: false,
            jobs: num_cpus::get(),
            timeout: 60,
            output_dir: PathBuf::from("throwgraph-out"),
        }
    }
}

impl AnalysisConfig {
    /// Load a config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&text)
            .map_err(|e| ThrowgraphError::config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot run
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(ThrowgraphError::config("jobs must be at least 1"));
        }
        if self.timeout == 0 {
            return Err(ThrowgraphError::config("timeout must be at least 1 second"));
        }
        Ok(())
    }

    /// `<out>/cache`
    pub fn cache_dir(&self) -> PathBuf {
        self.output_dir.join("cache")
    }

    /// `<out>/cache/ipm` — polymorph fragments, mirroring source paths
    pub fn ipm_dir(&self) -> PathBuf {
        self.cache_dir().join("ipm")
    }

    /// `<out>/cache/icg` — call-graph fragments, mirroring source paths
    pub fn icg_dir(&self) -> PathBuf {
        self.cache_dir().join("icg")
    }

    /// `<out>/cache/lmt` — decimal mtime stamps, mirroring source paths
    pub fn lmt_dir(&self) -> PathBuf {
        self.cache_dir().join("lmt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.expand_virtual_calls);
        assert!(!config.strict);
        assert!(config.jobs >= 1);
    }

    #[test]
    fn kebab_case_keys_roundtrip() {
        let json = r#"{
            "expand-virtual-calls": false,
            "include-system-header": true,
            "jobs": 2,
            "output-dir": "/tmp/out"
        }"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert!(!config.expand_virtual_calls);
        assert!(config.include_system_header);
        assert_eq!(config.jobs, 2);
        assert_eq!(config.ipm_dir(), PathBuf::from("/tmp/out/cache/ipm"));
    }

    #[test]
    fn zero_jobs_rejected() {
        let config = AnalysisConfig {
            jobs: 0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_keys_rejected() {
        let json = r#"{ "expand-virtal-calls": true }"#;
        assert!(serde_json::from_str::<AnalysisConfig>(json).is_err());
    }
}
