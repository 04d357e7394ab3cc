//! Whole-program call graph

use crate::features::polymorph::PolymorphTable;
use crate::shared::models::{CallSite, Function};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::hash_map::Entry;
use tracing::debug;

/// Function map plus insertion order.
///
/// The map owns every `Function`; sites are owned by their function and all
/// cross-references are USR strings resolved through this map. Insertion
/// order is remembered so dumps and worklist seeding are reproducible.
#[derive(Debug, Default)]
pub struct CallGraph {
    functions: FxHashMap<String, Function>,
    order: Vec<String>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install one extracted function.
    ///
    /// The throw set starts as `direct_throw ∪` whatever the extractor put
    /// in `Throw`, so the `throw ⊇ direct_throw` invariant holds from the
    /// first moment. A USR seen twice (overlapping TU includes) is merged
    /// by union of call sites and throw sets.
    pub fn install(&mut self, mut function: Function) {
        function.throw.extend(function.direct_throw.iter().cloned());
        match self.functions.entry(function.usr.clone()) {
            Entry::Occupied(mut occupied) => merge_duplicate(occupied.get_mut(), function),
            Entry::Vacant(vacant) => {
                self.order.push(function.usr.clone());
                vacant.insert(function);
            }
        }
    }

    pub fn get(&self, usr: &str) -> Option<&Function> {
        self.functions.get(usr)
    }

    pub fn get_mut(&mut self, usr: &str) -> Option<&mut Function> {
        self.functions.get_mut(usr)
    }

    pub fn contains(&self, usr: &str) -> bool {
        self.functions.contains_key(usr)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// USRs in installation order
    pub fn usrs_in_order(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Functions in installation order
    pub fn iter_in_order(&self) -> impl Iterator<Item = &Function> {
        self.order.iter().filter_map(|usr| self.functions.get(usr))
    }

    pub fn total_call_sites(&self) -> usize {
        self.functions.values().map(|f| f.call_sites.len()).sum()
    }

    /// Rewrite every function's call sites with one synthetic site per
    /// transitive overrider of the original callee.
    ///
    /// Only directly extracted sites are expansion sources, and existing
    /// site keys are never re-inserted, so the pass is idempotent.
    pub fn expand_virtual_calls(&mut self, table: &PolymorphTable) {
        if table.is_empty() {
            return;
        }
        let mut synthesized = 0usize;
        for usr in self.order.clone() {
            if let Some(function) = self.functions.get_mut(&usr) {
                synthesized += expand_sites(&mut function.call_sites, table);
            }
        }
        debug!(synthesized, "virtual call expansion complete");
    }

    /// Populate `callers` back-edges: `caller ∈ callee.callers` iff some
    /// caller site targets the callee. Unresolved callee USRs are external
    /// and contribute nothing.
    pub fn populate_callers(&mut self) {
        let mut edges: Vec<(String, String)> = Vec::new();
        for function in self.functions.values() {
            for cs in &function.call_sites {
                if self.functions.contains_key(&cs.callee_usr) {
                    edges.push((cs.callee_usr.clone(), function.usr.clone()));
                }
            }
        }
        for (callee, caller) in edges {
            if let Some(function) = self.functions.get_mut(&callee) {
                function.callers.insert(caller);
            }
        }
    }
}

fn merge_duplicate(existing: &mut Function, incoming: Function) {
    existing.direct_throw.extend(incoming.direct_throw);
    existing.throw.extend(incoming.throw);
    existing.callers.extend(incoming.callers);

    let mut keys: FxHashSet<(String, String)> =
        existing.call_sites.iter().map(CallSite::key).collect();
    for cs in incoming.call_sites {
        if keys.insert(cs.key()) {
            existing.call_sites.push(cs);
        }
    }
    if existing.sname.is_empty() {
        existing.sname = incoming.sname;
    }
    if existing.loc.is_empty() {
        existing.loc = incoming.loc;
    }
    if existing.tag.is_empty() {
        existing.tag = incoming.tag;
    }
}

fn expand_sites(sites: &mut Vec<CallSite>, table: &PolymorphTable) -> usize {
    let mut keys: FxHashSet<(String, String)> = sites.iter().map(CallSite::key).collect();
    let mut synthesized = Vec::new();

    for cs in sites.iter().filter(|cs| !cs.is_synthetic()) {
        for overrider in table.transitive_overriders(&cs.callee_usr) {
            let key = (overrider.name.clone(), cs.loc.clone());
            if !keys.insert(key) {
                continue;
            }
            synthesized.push(CallSite {
                callee_usr: overrider.name,
                callee_sname: overrider.sname,
                loc: cs.loc.clone(),
                expand_origin: cs.callee_usr.clone(),
                catch_set: cs.catch_set.clone(),
            });
        }
    }

    let count = synthesized.len();
    sites.extend(synthesized);
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::fragments::{ClassRecord, MethodRecord};
    use crate::shared::models::{ExceptionType, MethodRef};

    fn fn_with_site(usr: &str, sname: &str, site: CallSite) -> Function {
        let mut f = Function::new(usr, sname);
        f.call_sites.push(site);
        f
    }

    fn shape_table() -> PolymorphTable {
        let mut table = PolymorphTable::new();
        table.absorb(&ClassRecord {
            name: "c:@S@Circle".into(),
            sname: "Circle".into(),
            methods: vec![MethodRecord {
                name: "circle.area".into(),
                sname: "Circle::area".into(),
                overrides: vec![MethodRef::new("shape.area", "Shape::area")],
            }],
        });
        table.absorb(&ClassRecord {
            name: "c:@S@Square".into(),
            sname: "Square".into(),
            methods: vec![MethodRecord {
                name: "square.area".into(),
                sname: "Square::area".into(),
                overrides: vec![MethodRef::new("shape.area", "Shape::area")],
            }],
        });
        table
    }

    #[test]
    fn install_seeds_throw_from_direct_throw() {
        let mut f = Function::new("f", "f");
        f.direct_throw.insert(ExceptionType::new("E", "e.h:1"));

        let mut graph = CallGraph::new();
        graph.install(f);
        let installed = graph.get("f").unwrap();
        assert!(installed.throw.contains(&ExceptionType::new("E", "")));
    }

    #[test]
    fn duplicate_usr_merges_by_union() {
        let mut first = fn_with_site("f", "f", CallSite::new("g", "g", "f.cpp:3"));
        first.direct_throw.insert(ExceptionType::new("E1", ""));

        let mut second = fn_with_site("f", "f", CallSite::new("h", "h", "f.cpp:9"));
        second.direct_throw.insert(ExceptionType::new("E2", ""));
        // Same site as in `first`, from an overlapping include.
        second.call_sites.push(CallSite::new("g", "g", "f.cpp:3"));

        let mut graph = CallGraph::new();
        graph.install(first);
        graph.install(second);

        let merged = graph.get("f").unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(merged.call_sites.len(), 2);
        assert_eq!(merged.direct_throw.len(), 2);
        assert_eq!(merged.throw.len(), 2);
    }

    #[test]
    fn expansion_synthesizes_override_sites() {
        let mut graph = CallGraph::new();
        graph.install(fn_with_site(
            "caller",
            "caller",
            CallSite::new("shape.area", "Shape::area", "c.cpp:5"),
        ));
        graph.expand_virtual_calls(&shape_table());

        let caller = graph.get("caller").unwrap();
        assert_eq!(caller.call_sites.len(), 3);
        let synthetic: Vec<&CallSite> =
            caller.call_sites.iter().filter(|cs| cs.is_synthetic()).collect();
        assert_eq!(synthetic.len(), 2);
        assert!(synthetic.iter().all(|cs| cs.expand_origin == "shape.area"));
        assert!(synthetic.iter().all(|cs| cs.loc == "c.cpp:5"));
    }

    #[test]
    fn expansion_carries_catch_set() {
        let site = CallSite::new("shape.area", "Shape::area", "c.cpp:5")
            .with_catches([ExceptionType::new("E", "")]);
        let mut graph = CallGraph::new();
        graph.install(fn_with_site("caller", "caller", site));
        graph.expand_virtual_calls(&shape_table());

        let caller = graph.get("caller").unwrap();
        assert!(caller
            .call_sites
            .iter()
            .filter(|cs| cs.is_synthetic())
            .all(|cs| cs.catch_set.contains(&ExceptionType::new("E", ""))));
    }

    #[test]
    fn expansion_is_idempotent() {
        let mut graph = CallGraph::new();
        graph.install(fn_with_site(
            "caller",
            "caller",
            CallSite::new("shape.area", "Shape::area", "c.cpp:5"),
        ));
        let table = shape_table();
        graph.expand_virtual_calls(&table);
        let after_first: Vec<(String, String)> = graph
            .get("caller")
            .unwrap()
            .call_sites
            .iter()
            .map(CallSite::key)
            .collect();

        graph.expand_virtual_calls(&table);
        let after_second: Vec<(String, String)> = graph
            .get("caller")
            .unwrap()
            .call_sites
            .iter()
            .map(CallSite::key)
            .collect();
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn back_edges_match_call_sites() {
        let mut graph = CallGraph::new();
        graph.install(fn_with_site("g", "g", CallSite::new("f", "f", "g.cpp:2")));
        graph.install(Function::new("f", "f"));
        // Site on an external callee: no back-edge anywhere.
        graph.install(fn_with_site("h", "h", CallSite::new("ext", "ext", "h.cpp:1")));
        graph.populate_callers();

        assert!(graph.get("f").unwrap().callers.contains("g"));
        assert!(graph.get("g").unwrap().callers.is_empty());
        assert!(!graph.contains("ext"));
    }

    #[test]
    fn order_is_install_order() {
        let mut graph = CallGraph::new();
        graph.install(Function::new("b", "b"));
        graph.install(Function::new("a", "a"));
        let usrs: Vec<&str> = graph.usrs_in_order().collect();
        assert_eq!(usrs, vec!["b", "a"]);
    }
}
