//! Exception type values

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// USR of the wildcard `catch (...)` handler
pub const WILDCARD_USR: &str = "...";

/// An exception type as seen by the extractor.
///
/// Identity is the USR alone; `loc` and `parents` are carried data. Two
/// extractions of the same type may disagree on `loc`, in which case the
/// first value inserted into a set stays canonical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionType {
    #[serde(rename = "USR")]
    pub usr: String,

    #[serde(rename = "Loc", default)]
    pub loc: String,

    /// Transitive base classes known at extraction time
    #[serde(
        rename = "Parent",
        default,
        serialize_with = "super::sorted_strings"
    )]
    pub parents: FxHashSet<String>,
}

impl ExceptionType {
    pub fn new(usr: impl Into<String>, loc: impl Into<String>) -> Self {
        Self {
            usr: usr.into(),
            loc: loc.into(),
            parents: FxHashSet::default(),
        }
    }

    /// An exception with declared base classes
    pub fn with_parents<I, P>(usr: impl Into<String>, loc: impl Into<String>, parents: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            usr: usr.into(),
            loc: loc.into(),
            parents: parents.into_iter().map(Into::into).collect(),
        }
    }

    /// The `catch (...)` handler value
    pub fn wildcard() -> Self {
        Self::new(WILDCARD_USR, "")
    }

    pub fn is_wildcard(&self) -> bool {
        self.usr == WILDCARD_USR
    }
}

impl PartialEq for ExceptionType {
    fn eq(&self, other: &Self) -> bool {
        self.usr == other.usr
    }
}

impl Eq for ExceptionType {}

impl Hash for ExceptionType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.usr.hash(state);
    }
}

/// Set of exception types, keyed by USR
pub type ExceptionSet = FxHashSet<ExceptionType>;
