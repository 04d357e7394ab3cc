//! Artifact sink
//!
//! Serializes the completed polymorph table, call graph, and profiles to the
//! output directory, and renders the human-readable run overview.

mod overview;
mod shard_writer;

pub use overview::{OverviewReport, PhaseRow};
pub use shard_writer::{
    dump_call_graph, dump_polymorph, dump_profiles, write_shards, SHARD_CAPACITY,
};
