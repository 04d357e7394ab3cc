//! Polymorph (override) table entries

use serde::{Deserialize, Serialize};

/// A named method reference: `(USR, qualified name)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRef {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "SName", default)]
    pub sname: String,
}

impl MethodRef {
    pub fn new(name: impl Into<String>, sname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sname: sname.into(),
        }
    }
}

/// One overridden base method and its known direct overriders.
///
/// `derived` is a set-by-name kept as an ordered list so dumps are stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolyEntry {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "SName", default)]
    pub sname: String,

    #[serde(rename = "Derived", default)]
    pub derived: Vec<MethodRef>,
}

impl PolyEntry {
    pub fn new(name: impl Into<String>, sname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sname: sname.into(),
            derived: Vec::new(),
        }
    }

    /// Add an overrider, ignoring duplicates by USR
    pub fn add_derived(&mut self, method: MethodRef) {
        if !self.derived.iter().any(|d| d.name == method.name) {
            self.derived.push(method);
        }
    }
}
