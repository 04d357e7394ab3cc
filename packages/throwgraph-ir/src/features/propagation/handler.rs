//! Handler-match oracle
//!
//! Decides whether a catch clause handles a thrown type: wildcard, exact
//! USR identity, or membership in the thrown type's declared parent chain.
//! No template re-matching.

use crate::shared::models::{ExceptionSet, ExceptionType, WILDCARD_USR};

/// Does `handler` catch `thrown`?
pub fn catches(handler: &ExceptionType, thrown: &ExceptionType) -> bool {
    handler.usr == WILDCARD_USR
        || handler.usr == thrown.usr
        || thrown.parents.contains(&handler.usr)
}

/// The subset of `throw_set` that escapes past `catch_set`.
///
/// Returns a fresh set; inputs are untouched.
pub fn filter_escaping(throw_set: &ExceptionSet, catch_set: &ExceptionSet) -> ExceptionSet {
    throw_set
        .iter()
        .filter(|thrown| !catch_set.iter().any(|handler| catches(handler, thrown)))
        .cloned()
        .collect()
}

/// How many of the thrown types `catch_set` handles
pub fn count_caught(throw_set: &ExceptionSet, catch_set: &ExceptionSet) -> usize {
    throw_set
        .iter()
        .filter(|thrown| catch_set.iter().any(|handler| catches(handler, thrown)))
        .count()
}
