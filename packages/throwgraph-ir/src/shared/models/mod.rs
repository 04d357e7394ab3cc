//! Core data model
//!
//! Value types shared by every analysis phase. Exceptions compare by USR,
//! call sites by `(callee USR, location)`; both rules are load-bearing for
//! fragment merging and must not change.

mod call_site;
mod exception;
mod function;
mod polymorph;

pub use call_site::CallSite;
pub use exception::{ExceptionSet, ExceptionType, WILDCARD_USR};
pub use function::{split_scope, Function};
pub use polymorph::{MethodRef, PolyEntry};

use rustc_hash::FxHashSet;
use serde::ser::Serializer;
use serde::Serialize;

/// Serialize a string set as a sorted JSON array
pub(crate) fn sorted_strings<S>(set: &FxHashSet<String>, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut items: Vec<&String> = set.iter().collect();
    items.sort();
    items.serialize(ser)
}

/// Serialize an exception set as a JSON array sorted by USR
pub(crate) fn sorted_exceptions<S>(set: &ExceptionSet, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut items: Vec<&ExceptionType> = set.iter().collect();
    items.sort_by(|a, b| a.usr.cmp(&b.usr));
    items.serialize(ser)
}
