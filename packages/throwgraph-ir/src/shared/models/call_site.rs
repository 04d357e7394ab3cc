//! Call site values

use super::{ExceptionSet, ExceptionType};
use serde::{Deserialize, Serialize};

/// One call expression inside a function body.
///
/// A site has no identity of its own outside its enclosing function; within
/// one function the key is `(callee_usr, loc)`. Sites synthesized by virtual
/// expansion carry the original callee USR in `expand_origin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSite {
    #[serde(rename = "USR")]
    pub callee_usr: String,

    #[serde(rename = "SName", default)]
    pub callee_sname: String,

    #[serde(rename = "Loc", default)]
    pub loc: String,

    /// Empty for directly extracted sites
    #[serde(rename = "Expand", default)]
    pub expand_origin: String,

    /// Union of exception types caught by the `catch` clauses lexically
    /// enclosing this site
    #[serde(
        rename = "Catch",
        default,
        serialize_with = "super::sorted_exceptions"
    )]
    pub catch_set: ExceptionSet,
}

impl CallSite {
    pub fn new(callee_usr: impl Into<String>, callee_sname: impl Into<String>, loc: impl Into<String>) -> Self {
        Self {
            callee_usr: callee_usr.into(),
            callee_sname: callee_sname.into(),
            loc: loc.into(),
            expand_origin: String::new(),
            catch_set: ExceptionSet::default(),
        }
    }

    pub fn with_catches<I>(mut self, catches: I) -> Self
    where
        I: IntoIterator<Item = ExceptionType>,
    {
        self.catch_set.extend(catches);
        self
    }

    /// Site key within the enclosing function
    pub fn key(&self) -> (String, String) {
        (self.callee_usr.clone(), self.loc.clone())
    }

    /// True for sites produced by virtual expansion
    pub fn is_synthetic(&self) -> bool {
        !self.expand_origin.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracted_sites_are_not_synthetic() {
        let cs = CallSite::new("c:@F@f#", "f", "main.cpp:7");
        assert!(!cs.is_synthetic());
        assert_eq!(cs.key(), ("c:@F@f#".to_string(), "main.cpp:7".to_string()));
    }

    #[test]
    fn catch_set_defaults_empty_on_wire() {
        let cs: CallSite =
            serde_json::from_str(r#"{"USR":"c:@F@f#","SName":"f","Loc":"a.cpp:1","Expand":""}"#)
                .unwrap();
        assert!(cs.catch_set.is_empty());
    }
}
