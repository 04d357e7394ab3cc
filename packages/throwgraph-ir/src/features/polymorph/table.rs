//! Override table merge and closure

use crate::features::fragments::ClassRecord;
use crate::shared::models::{MethodRef, PolyEntry};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Whole-program override map: base-method USR → direct overriders.
///
/// Absorbing class records is commutative and associative, so fragment
/// ingest order never matters. The stored relation is one level deep; the
/// closure is computed on demand.
#[derive(Debug, Default)]
pub struct PolymorphTable {
    entries: FxHashMap<String, PolyEntry>,
}

impl PolymorphTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one IPM class record
    pub fn absorb(&mut self, class: &ClassRecord) {
        for method in &class.methods {
            for base in &method.overrides {
                let entry = self
                    .entries
                    .entry(base.name.clone())
                    .or_insert_with(|| PolyEntry::new(base.name.clone(), base.sname.clone()));
                entry.add_derived(MethodRef::new(method.name.clone(), method.sname.clone()));
            }
        }
    }

    pub fn get(&self, usr: &str) -> Option<&PolyEntry> {
        self.entries.get(usr)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All transitive overriders of `usr`, in first-discovered order.
    ///
    /// Override data is acyclic for well-formed input; the visited set makes
    /// an accidental cycle terminate instead of looping.
    pub fn transitive_overriders(&self, usr: &str) -> Vec<MethodRef> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        seen.insert(usr);

        let mut closure = Vec::new();
        let mut queue: VecDeque<&MethodRef> = self
            .entries
            .get(usr)
            .map(|e| e.derived.iter().collect())
            .unwrap_or_default();

        while let Some(method) = queue.pop_front() {
            if !seen.insert(&method.name) {
                continue;
            }
            closure.push(method.clone());
            if let Some(entry) = self.entries.get(&method.name) {
                queue.extend(entry.derived.iter());
            }
        }
        closure
    }

    /// Entries sorted by base USR, for deterministic dumps
    pub fn sorted_entries(&self) -> Vec<&PolyEntry> {
        let mut entries: Vec<&PolyEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}
