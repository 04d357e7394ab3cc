//! throwgraph-orchestration
//!
//! Runs the six analysis phases in order over one explicit context value,
//! owns the per-TU fragment cache and extractor-failure bookkeeping, and
//! maps pipeline outcomes to process exit codes in the driver binary.

pub mod cache;
pub mod error;
pub mod extractor;
pub mod job;
pub mod pipeline;

pub use cache::FragmentCache;
pub use error::{OrchestratorError, Result};
pub use extractor::{ExtractorFailure, ExtractorLog};
pub use job::{PhaseId, PhaseOutcome, PhaseStatus};
pub use pipeline::{AnalysisContext, AnalysisPipeline, PipelineRun};
