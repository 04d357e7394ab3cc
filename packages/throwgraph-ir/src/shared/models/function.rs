//! Function graph nodes

use super::{CallSite, ExceptionSet};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// A function in the whole-program call graph.
///
/// `throw` starts equal to `direct_throw` and only ever grows; `callers` is
/// a USR set rather than references so the caller/callee cycle never enters
/// the ownership graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    #[serde(rename = "USR")]
    pub usr: String,

    #[serde(rename = "SName", default)]
    pub sname: String,

    #[serde(rename = "Loc", default)]
    pub loc: String,

    /// Flag string; `'S'` marks a system-header function
    #[serde(rename = "Tag", default)]
    pub tag: String,

    /// Exceptions thrown by literal `throw` expressions in this body
    #[serde(
        rename = "DirectThrow",
        default,
        serialize_with = "super::sorted_exceptions"
    )]
    pub direct_throw: ExceptionSet,

    /// Full escape set; grows monotonically during propagation
    #[serde(
        rename = "Throw",
        default,
        serialize_with = "super::sorted_exceptions"
    )]
    pub throw: ExceptionSet,

    #[serde(rename = "CallSite", default)]
    pub call_sites: Vec<CallSite>,

    #[serde(
        rename = "Caller",
        default,
        serialize_with = "super::sorted_strings"
    )]
    pub callers: FxHashSet<String>,
}

impl Function {
    pub fn new(usr: impl Into<String>, sname: impl Into<String>) -> Self {
        Self {
            usr: usr.into(),
            sname: sname.into(),
            loc: String::new(),
            tag: String::new(),
            direct_throw: ExceptionSet::default(),
            throw: ExceptionSet::default(),
            call_sites: Vec::new(),
            callers: FxHashSet::default(),
        }
    }

    /// Defined in a system header; the profiler ignores such callers
    pub fn is_system(&self) -> bool {
        self.tag.contains('S')
    }
}

/// Split a qualified name into `(scope, simple name)`.
///
/// `"A::B::f"` → `("A::B", "f")`; a name with no `::` has scope `""`.
pub fn split_scope(sname: &str) -> (&str, &str) {
    match sname.rfind("::") {
        Some(i) => (&sname[..i], &sname[i + 2..]),
        None => ("", sname),
    }
}
