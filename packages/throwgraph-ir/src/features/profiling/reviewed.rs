//! Reviewed-fixes input
//!
//! Consumes the mined catch-fix review data: repository records, each with
//! commits, each commit with numbered `fix_<n>` entries carrying the legacy
//! context numbers a reviewer assigned and whether the fixed caller was
//! declared `noexcept`.

use super::contexts::{checked_contexts, compact_from_legacy, CONTEXT_LEVELS};
use crate::errors::{Result, ThrowgraphError};
use rustc_hash::FxHashSet;
use serde::Serialize;
use serde_json::Value;

/// One reviewed fix, with contexts remapped to compact numbering and closed
/// under the refinement relation.
#[derive(Debug, Clone)]
pub struct ReviewedFix {
    /// Compact context levels, expanded, sorted, deduped
    pub contexts: Vec<u32>,
    pub noexcept_caller: bool,
}

/// Per-context fix tallies
#[derive(Debug, Clone, Serialize)]
pub struct FixContextCount {
    pub context: u32,
    pub fixes: u64,
    pub noexcept_fixes: u64,
}

/// Parse the reviewed-fixes JSON document.
///
/// The commit objects carry arbitrary metadata next to the `fix_<n>` keys;
/// everything else is ignored.
pub fn parse_reviewed_fixes(text: &str) -> Result<Vec<ReviewedFix>> {
    let root: Value = serde_json::from_str(text)
        .map_err(|e| ThrowgraphError::fragment(format!("reviewed fixes: {e}")))?;
    let repos = root
        .as_array()
        .ok_or_else(|| ThrowgraphError::fragment("reviewed fixes: expected a top-level array"))?;

    let mut fixes = Vec::new();
    for repo in repos {
        let Some(commits) = repo.get("commits").and_then(Value::as_array) else {
            continue;
        };
        for commit in commits {
            let Some(entries) = commit.as_object() else {
                continue;
            };
            for (key, entry) in entries {
                if !key.starts_with("fix_") {
                    continue;
                }
                fixes.push(parse_fix(entry));
            }
        }
    }
    Ok(fixes)
}

fn parse_fix(entry: &Value) -> ReviewedFix {
    let legacy: Vec<u32> = entry
        .get("Context")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_u64)
                .map(|c| c as u32)
                .collect()
        })
        .unwrap_or_default();

    let mut expanded: FxHashSet<u32> = FxHashSet::default();
    for context in legacy {
        let compact = compact_from_legacy(context);
        expanded.insert(compact);
        expanded.extend(checked_contexts(compact));
    }
    let mut contexts: Vec<u32> = expanded.into_iter().collect();
    contexts.sort_unstable();

    ReviewedFix {
        contexts,
        noexcept_caller: entry
            .get("Caller.is noexcept")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

/// Tally how many fixes checked each context level
pub fn summarize_fixes(fixes: &[ReviewedFix]) -> Vec<FixContextCount> {
    let mut counts: Vec<FixContextCount> = (1..=CONTEXT_LEVELS)
        .map(|context| FixContextCount {
            context,
            fixes: 0,
            noexcept_fixes: 0,
        })
        .collect();
    for fix in fixes {
        for &context in &fix.contexts {
            let row = &mut counts[(context - 1) as usize];
            row.fixes += 1;
            if fix.noexcept_caller {
                row.noexcept_fixes += 1;
            }
        }
    }
    counts
}
