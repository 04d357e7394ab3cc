//! Fragment ingestion
//!
//! Reads per-TU JSON fragments (IPM polymorph records, ICG function records)
//! produced by the external Clang extractor. Files are independent; the
//! loader fans out across a worker pool and merges nothing itself.

mod loader;
mod records;

pub use loader::{load_dir, read_fragment_file, LoadOutcome};
pub use records::{ClassRecord, MethodRecord};
