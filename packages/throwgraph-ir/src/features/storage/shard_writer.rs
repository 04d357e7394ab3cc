//! Sharded JSON artifact writer

use crate::errors::{Result, ThrowgraphError};
use crate::features::assembly::CallGraph;
use crate::features::polymorph::PolymorphTable;
use crate::features::profiling::ContextProfile;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Maximum entries per shard file
pub const SHARD_CAPACITY: usize = 1000;

/// Write `entries` as JSON-array files `<prefix>-<k>.json`, `k` from 1,
/// at most [`SHARD_CAPACITY`] entries each. Returns the shard count; empty
/// input writes nothing.
pub fn write_shards<T: Serialize>(dir: &Path, prefix: &str, entries: &[T]) -> Result<usize> {
    fs::create_dir_all(dir)?;
    let mut shard = 0usize;
    for chunk in entries.chunks(SHARD_CAPACITY) {
        shard += 1;
        let path = dir.join(format!("{prefix}-{shard}.json"));
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(&mut writer, chunk)
            .map_err(|e| ThrowgraphError::storage(format!("{}: {e}", path.display())))?;
        writer.flush()?;
    }
    debug!(prefix, shards = shard, entries = entries.len(), "shards written");
    Ok(shard)
}

/// Dump the call graph as `cg-<k>.json` shards, in installation order
pub fn dump_call_graph(dir: &Path, graph: &CallGraph) -> Result<usize> {
    let functions: Vec<_> = graph.iter_in_order().collect();
    write_shards(dir, "cg", &functions)
}

/// Dump the polymorph table as `pm-<k>.json` shards, sorted by base USR
pub fn dump_polymorph(dir: &Path, table: &PolymorphTable) -> Result<usize> {
    write_shards(dir, "pm", &table.sorted_entries())
}

/// Dump the 17 profile rows as `profile.json`
pub fn dump_profiles(dir: &Path, profiles: &[ContextProfile]) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join("profile.json");
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, profiles)
        .map_err(|e| ThrowgraphError::storage(format!("{}: {e}", path.display())))?;
    writer.flush()?;
    Ok(())
}
