//! Per-level catch/throw accounting

use super::contexts::{specificity_pair, Specificity, CONTEXT_LEVELS};
use super::universe::SiteUniverse;
use serde::ser::Serializer;
use serde::Serialize;

/// One row of the context profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextProfile {
    /// Compact context level, 1..=17
    pub context: u32,
    pub thrown: u64,
    pub caught: u64,
    /// `caught/thrown`; `None` (printed `-`) when nothing was thrown
    #[serde(serialize_with = "rate_or_dash")]
    pub rate: Option<f64>,
}

fn rate_or_dash<S>(rate: &Option<f64>, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match rate {
        Some(value) => ser.serialize_f64(*value),
        None => ser.serialize_str("-"),
    }
}

fn finish(context: u32, thrown: u64, caught: u64) -> ContextProfile {
    ContextProfile {
        context,
        thrown,
        caught,
        rate: (thrown > 0).then(|| caught as f64 / thrown as f64),
    }
}

/// Profile every context level over the universe.
///
/// Returns exactly [`CONTEXT_LEVELS`] rows, level 1 first.
pub fn profile_contexts(universe: &SiteUniverse) -> Vec<ContextProfile> {
    let mut profiles = Vec::with_capacity(CONTEXT_LEVELS as usize);
    profiles.push(baseline_level(universe));
    for compact in 2..=CONTEXT_LEVELS {
        if let Some((caller, callee)) = specificity_pair(compact) {
            profiles.push(group_level(universe, compact, caller, callee));
        }
    }
    profiles
}

/// Level 1: each site judged alone.
///
/// Only sites whose callee throws at least two types and whose handlers
/// catch at least one of them say anything about partial coverage.
fn baseline_level(universe: &SiteUniverse) -> ContextProfile {
    let mut thrown = 0u64;
    let mut caught = 0u64;
    for record in &universe.sites {
        if record.n_throw >= 2 && record.caught() {
            thrown += record.n_throw as u64;
            caught += record.n_caught as u64;
        }
    }
    finish(1, thrown, caught)
}

/// Levels 2..=17: sites grouped by a caller/callee specificity pair.
fn group_level(
    universe: &SiteUniverse,
    compact: u32,
    caller: Specificity,
    callee: Specificity,
) -> ContextProfile {
    let mut thrown = 0u64;
    let mut caught_total = 0u64;
    let mut visited = vec![false; universe.len()];

    for position in 0..universe.len() {
        if visited[position] {
            continue;
        }
        let group = group_of(universe, position, caller, callee);
        for &member in &group {
            visited[member] = true;
        }
        if group.len() < 2 {
            continue;
        }
        let caught_members: Vec<usize> = group
            .iter()
            .copied()
            .filter(|&member| universe.sites[member].caught())
            .collect();
        if caught_members.is_empty() {
            continue;
        }
        // A single caught site would only be compared against itself;
        // drop it from the group before accounting.
        let dropped = (caught_members.len() == 1).then(|| caught_members[0]);
        for &member in &group {
            if Some(member) == dropped {
                continue;
            }
            let record = &universe.sites[member];
            thrown += record.n_throw as u64;
            caught_total += record.n_caught as u64;
        }
    }
    finish(compact, thrown, caught_total)
}

/// The group containing `position` at the given specificity pair, as sorted
/// universe positions.
fn group_of(
    universe: &SiteUniverse,
    position: usize,
    caller: Specificity,
    callee: Specificity,
) -> Vec<usize> {
    let record = &universe.sites[position];
    let caller_side = universe.caller_group(record, caller);
    let callee_side = universe.callee_group(record, callee);

    match (caller_side, callee_side) {
        (None, None) => (0..universe.len()).collect(),
        (Some(side), None) | (None, Some(side)) => side.to_vec(),
        (Some(a), Some(b)) => intersect_sorted(a, b),
    }
}

fn intersect_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
