//! Human-readable run overview

use crate::errors::Result;
use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

/// One pipeline phase as reported in the overview
#[derive(Debug, Clone)]
pub struct PhaseRow {
    pub name: String,
    pub status: String,
    pub duration_ms: u64,
}

/// Counts and timings for one completed (or interrupted) run
#[derive(Debug, Clone, Default)]
pub struct OverviewReport {
    pub run_id: String,
    pub generated_at: String,
    pub elapsed_ms: u64,
    pub functions: usize,
    pub call_sites: usize,
    pub polymorph_entries: usize,
    pub universe_sites: usize,
    pub phases: Vec<PhaseRow>,
}

impl OverviewReport {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "throwgraph run {}", self.run_id);
        let _ = writeln!(out, "generated: {}", self.generated_at);
        let _ = writeln!(out, "elapsed:   {} ms", self.elapsed_ms);
        let _ = writeln!(out);
        let _ = writeln!(out, "phases:");
        for phase in &self.phases {
            let _ = writeln!(
                out,
                "  {:<18} {:<10} {:>8} ms",
                phase.name, phase.status, phase.duration_ms
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "counts:");
        let _ = writeln!(out, "  functions:         {}", self.functions);
        let _ = writeln!(out, "  call sites:        {}", self.call_sites);
        let _ = writeln!(out, "  polymorph entries: {}", self.polymorph_entries);
        let _ = writeln!(out, "  profiled sites:    {}", self.universe_sites);
        out
    }

    /// Write `overview.txt` into the output directory
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join("overview.txt"), self.render())?;
        Ok(())
    }
}
