/*
 * throwgraph-ir - Whole-Program Exception Propagation Analysis
 *
 * Feature-First Architecture:
 * - shared/      : Common models (ExceptionType, CallSite, Function, PolyEntry)
 * - features/    : Vertical slices (fragments → polymorph → assembly → propagation → profiling → storage)
 * - config/      : Analysis configuration
 *
 * Pipeline:
 * - Per-TU JSON fragments are merged into a whole-program call graph
 * - Virtual calls are expanded against the polymorph table
 * - Throw sets reach a monotone fixed point over caller edges
 * - Context profiles aggregate catch/throw ratios over 17 scope levels
 */

pub mod config;
pub mod errors;
pub mod features;
pub mod shared;

pub use config::AnalysisConfig;
pub use errors::{Result, ThrowgraphError};
pub use shared::models::{
    CallSite, ExceptionSet, ExceptionType, Function, MethodRef, PolyEntry,
};
