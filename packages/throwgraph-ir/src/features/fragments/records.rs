//! IPM fragment record types
//!
//! ICG fragments deserialize straight into [`crate::shared::models::Function`];
//! only the polymorph side needs dedicated wire types.

use crate::shared::models::MethodRef;
use serde::{Deserialize, Serialize};

/// One method declared by a class, with the base methods it overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodRecord {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "SName", default)]
    pub sname: String,

    /// Base methods this method overrides
    #[serde(rename = "Override", default)]
    pub overrides: Vec<MethodRef>,
}

/// One class record from an IPM fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRecord {
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "SName", default)]
    pub sname: String,

    #[serde(rename = "Method", default)]
    pub methods: Vec<MethodRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_record_parses_override_chain() {
        let json = r#"{
            "Name": "c:@S@Circle", "SName": "Circle",
            "Method": [{
                "Name": "c:@S@Circle@F@area#",
                "SName": "Circle::area",
                "Override": [{"Name": "c:@S@Shape@F@area#", "SName": "Shape::area"}]
            }]
        }"#;
        let record: ClassRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.methods.len(), 1);
        assert_eq!(record.methods[0].overrides[0].sname, "Shape::area");
    }

    #[test]
    fn missing_method_array_tolerated() {
        let record: ClassRecord = serde_json::from_str(r#"{"Name": "c:@S@Plain"}"#).unwrap();
        assert!(record.methods.is_empty());
    }
}
