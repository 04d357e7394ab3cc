//! Phase identifiers and outcomes

use serde::{Deserialize, Serialize};
use throwgraph_ir::features::storage::PhaseRow;

/// Pipeline phase identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseId {
    LoadFragments,
    MergePolymorph,
    AssembleGraph,
    Propagate,
    Profile,
    Export,
}

impl PhaseId {
    /// Execution order
    pub const ALL: [PhaseId; 6] = [
        PhaseId::LoadFragments,
        PhaseId::MergePolymorph,
        PhaseId::AssembleGraph,
        PhaseId::Propagate,
        PhaseId::Profile,
        PhaseId::Export,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseId::LoadFragments => "load-fragments",
            PhaseId::MergePolymorph => "merge-polymorph",
            PhaseId::AssembleGraph => "assemble-graph",
            PhaseId::Propagate => "propagate",
            PhaseId::Profile => "profile",
            PhaseId::Export => "export",
        }
    }
}

impl std::fmt::Display for PhaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal state of one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseStatus {
    Completed,
    Skipped,
    Failed,
}

impl PhaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseStatus::Completed => "completed",
            PhaseStatus::Skipped => "skipped",
            PhaseStatus::Failed => "failed",
        }
    }
}

/// What one phase did, for the overview report
#[derive(Debug, Clone)]
pub struct PhaseOutcome {
    pub id: PhaseId,
    pub status: PhaseStatus,
    pub duration_ms: u64,
}

impl PhaseOutcome {
    pub fn to_row(&self) -> PhaseRow {
        PhaseRow {
            name: self.id.as_str().to_string(),
            status: self.status.as_str().to_string(),
            duration_ms: self.duration_ms,
        }
    }
}
