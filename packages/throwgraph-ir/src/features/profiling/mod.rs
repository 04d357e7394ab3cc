//! Context profiling
//!
//! Groups the call-site universe at 17 abstraction levels and measures, per
//! level, how much of what callees throw the enclosing handlers catch.

mod contexts;
mod profiler;
mod reviewed;
mod universe;

pub use contexts::{
    checked_contexts, compact_from_legacy, compact_from_pair, legacy_from_compact,
    specificity_pair, Specificity, CONTEXT_LEVELS,
};
pub use profiler::{profile_contexts, ContextProfile};
pub use reviewed::{parse_reviewed_fixes, summarize_fixes, FixContextCount, ReviewedFix};
pub use universe::{SiteRecord, SiteUniverse};
