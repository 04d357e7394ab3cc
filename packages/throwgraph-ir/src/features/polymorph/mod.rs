//! Polymorph table
//!
//! Merges IPM class records into an overridden-method → overriders map and
//! answers transitive-closure queries for virtual expansion.

mod table;

pub use table::PolymorphTable;
