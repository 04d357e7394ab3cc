//! Context lattice
//!
//! A context describes how call sites are grouped for catch/throw
//! statistics. Level 1 is the per-site baseline; levels 2..=17 are the 4×4
//! product of caller and callee specificities. The legacy encoding numbers
//! the same levels 1, 3, 5, …, 33.

/// Number of compact context levels
pub const CONTEXT_LEVELS: u32 = 17;

/// How narrowly one side of a group is keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specificity {
    /// The one function itself
    Exact,
    /// Same simple name
    Name,
    /// Same enclosing scope
    Scope,
    /// Unconstrained
    Any,
}

impl Specificity {
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Specificity::Exact),
            1 => Some(Specificity::Name),
            2 => Some(Specificity::Scope),
            3 => Some(Specificity::Any),
            _ => None,
        }
    }

    pub fn index(self) -> u32 {
        match self {
            Specificity::Exact => 0,
            Specificity::Name => 1,
            Specificity::Scope => 2,
            Specificity::Any => 3,
        }
    }
}

/// Map a legacy context number to the compact 1..=17 range.
///
/// Legacy data sometimes carries even numbers; those round up to the odd
/// level above before the `(c+1)/2` collapse.
pub fn compact_from_legacy(legacy: u32) -> u32 {
    if legacy <= 1 {
        return 1;
    }
    let odd = if legacy % 2 == 0 { legacy + 1 } else { legacy };
    (odd + 1) / 2
}

/// The legacy (odd) number of a compact level
pub fn legacy_from_compact(compact: u32) -> u32 {
    if compact <= 1 {
        1
    } else {
        2 * compact - 1
    }
}

/// The `(caller, callee)` specificity pair of a compact level ≥ 2
pub fn specificity_pair(compact: u32) -> Option<(Specificity, Specificity)> {
    if !(2..=CONTEXT_LEVELS).contains(&compact) {
        return None;
    }
    let caller = Specificity::from_index((compact - 2) / 4)?;
    let callee = Specificity::from_index((compact - 2) % 4)?;
    Some((caller, callee))
}

/// The compact level of a `(caller, callee)` specificity pair
pub fn compact_from_pair(caller: Specificity, callee: Specificity) -> u32 {
    2 + caller.index() * 4 + callee.index()
}

/// Every context a handler observed at `compact` also checks.
///
/// Checking at some specificity implies checking at every pointwise-coarser
/// pair; the per-site baseline implies all levels. The context itself is
/// included.
pub fn checked_contexts(compact: u32) -> Vec<u32> {
    if compact <= 1 {
        return (1..=CONTEXT_LEVELS).collect();
    }
    let Some((caller, callee)) = specificity_pair(compact) else {
        return Vec::new();
    };
    let mut checked = Vec::new();
    for caller_index in caller.index()..=3 {
        for callee_index in callee.index()..=3 {
            checked.push(2 + caller_index * 4 + callee_index);
        }
    }
    checked
}
