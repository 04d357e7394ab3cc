//! Per-TU fragment cache
//!
//! `<out>/cache/{ipm,icg,lmt}/` mirror source paths. `lmt` holds the source
//! file's last-modified time as a decimal string; a TU whose ipm and icg
//! fragments exist under a matching stamp needs no re-extraction. A changed
//! source invalidates exactly its own fragments.

use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use throwgraph_ir::AnalysisConfig;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FragmentCache {
    ipm: PathBuf,
    icg: PathBuf,
    lmt: PathBuf,
}

impl FragmentCache {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            ipm: config.ipm_dir(),
            icg: config.icg_dir(),
            lmt: config.lmt_dir(),
        }
    }

    /// Where the extractor must place this TU's polymorph fragment
    pub fn ipm_path(&self, tu: &Path) -> PathBuf {
        mirror(&self.ipm, tu, "json")
    }

    /// Where the extractor must place this TU's call-graph fragment
    pub fn icg_path(&self, tu: &Path) -> PathBuf {
        mirror(&self.icg, tu, "json")
    }

    fn lmt_path(&self, tu: &Path) -> PathBuf {
        mirror(&self.lmt, tu, "lmt")
    }

    /// Stamp the TU after a successful extraction
    pub fn record(&self, tu: &Path) -> Result<()> {
        let stamp_path = self.lmt_path(tu);
        if let Some(parent) = stamp_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(stamp_path, mtime_decimal(tu)?)?;
        Ok(())
    }

    /// Both fragments present under a stamp matching the current mtime
    pub fn is_fresh(&self, tu: &Path) -> bool {
        if !self.ipm_path(tu).exists() || !self.icg_path(tu).exists() {
            return false;
        }
        let Ok(stamp) = fs::read_to_string(self.lmt_path(tu)) else {
            return false;
        };
        mtime_decimal(tu).map(|current| current == stamp).unwrap_or(false)
    }

    /// Delete this TU's fragments and stamp; other TUs are untouched
    pub fn invalidate(&self, tu: &Path) -> Result<()> {
        debug!(tu = %tu.display(), "invalidating cached fragments");
        remove_if_present(&self.ipm_path(tu))?;
        remove_if_present(&self.icg_path(tu))?;
        remove_if_present(&self.lmt_path(tu))?;
        Ok(())
    }
}

/// Mirror a (possibly absolute) source path under a cache root, appending
/// `.suffix` to the file name.
fn mirror(root: &Path, tu: &Path, suffix: &str) -> PathBuf {
    let relative = tu.strip_prefix("/").unwrap_or(tu);
    let mut path = root.join(relative);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.set_file_name(format!("{name}.{suffix}"));
    path
}

fn mtime_decimal(tu: &Path) -> Result<String> {
    let modified = fs::metadata(tu)?.modified()?;
    let seconds = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Ok(seconds.to_string())
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FragmentCache, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let config = AnalysisConfig {
            output_dir: tmp.path().join("out"),
            ..AnalysisConfig::default()
        };
        let cache = FragmentCache::new(&config);
        let tu = tmp.path().join("src/main.cpp");
        fs::create_dir_all(tu.parent().unwrap()).unwrap();
        fs::write(&tu, "int main() {}").unwrap();
        (tmp, cache, tu)
    }

    fn extract(cache: &FragmentCache, tu: &Path) {
        for path in [cache.ipm_path(tu), cache.icg_path(tu)] {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "[]").unwrap();
        }
        cache.record(tu).unwrap();
    }

    #[test]
    fn fresh_after_record() {
        let (_tmp, cache, tu) = setup();
        assert!(!cache.is_fresh(&tu));
        extract(&cache, &tu);
        assert!(cache.is_fresh(&tu));
    }

    #[test]
    fn missing_fragment_is_stale() {
        let (_tmp, cache, tu) = setup();
        extract(&cache, &tu);
        fs::remove_file(cache.icg_path(&tu)).unwrap();
        assert!(!cache.is_fresh(&tu));
    }

    #[test]
    fn stale_stamp_is_stale() {
        let (_tmp, cache, tu) = setup();
        extract(&cache, &tu);
        let lmt = cache.lmt_path(&tu);
        fs::write(lmt, "0").unwrap();
        assert!(!cache.is_fresh(&tu));
    }

    #[test]
    fn invalidate_touches_only_the_named_tu() {
        let (tmp, cache, tu) = setup();
        extract(&cache, &tu);

        let other = tmp.path().join("src/other.cpp");
        fs::write(&other, "void f() {}").unwrap();
        extract(&cache, &other);

        cache.invalidate(&tu).unwrap();
        assert!(!cache.is_fresh(&tu));
        assert!(!cache.ipm_path(&tu).exists());
        assert!(cache.is_fresh(&other));
    }

    #[test]
    fn invalidate_is_idempotent() {
        let (_tmp, cache, tu) = setup();
        cache.invalidate(&tu).unwrap();
        cache.invalidate(&tu).unwrap();
    }

    #[test]
    fn mirrored_paths_keep_source_layout() {
        let (_tmp, cache, _tu) = setup();
        let path = cache.ipm_path(Path::new("/proj/src/a.cpp"));
        assert!(path.ends_with("proj/src/a.cpp.json"));
    }
}
