//! Call-site universe and its derived indices

use crate::features::assembly::CallGraph;
use crate::features::propagation::count_caught;
use crate::shared::models::split_scope;
use rustc_hash::FxHashMap;

/// One universe member: a call site with its grouping keys precomputed.
#[derive(Debug, Clone)]
pub struct SiteRecord {
    pub caller_usr: String,
    pub caller_name: String,
    pub caller_scope: String,
    pub callee_usr: String,
    pub callee_name: String,
    pub callee_scope: String,
    /// `|callee.throw|`
    pub n_throw: usize,
    /// How many of the callee's throws this site's handlers match
    pub n_caught: usize,
}

impl SiteRecord {
    /// At least one of the callee's throws is handled here
    pub fn caught(&self) -> bool {
        self.n_caught > 0
    }
}

/// The universe U of profilable call sites, with one reverse index per
/// grouping key.
///
/// Membership: the callee resolves in the graph, the callee throws
/// something, and the owning function is not system-tagged. Index vectors
/// hold positions into `sites` in increasing order.
#[derive(Debug, Default)]
pub struct SiteUniverse {
    pub sites: Vec<SiteRecord>,
    by_caller: FxHashMap<String, Vec<usize>>,
    by_caller_name: FxHashMap<String, Vec<usize>>,
    by_caller_scope: FxHashMap<String, Vec<usize>>,
    by_callee: FxHashMap<String, Vec<usize>>,
    by_callee_name: FxHashMap<String, Vec<usize>>,
    by_callee_scope: FxHashMap<String, Vec<usize>>,
}

impl SiteUniverse {
    pub fn build(graph: &CallGraph) -> Self {
        let mut universe = SiteUniverse::default();

        for caller in graph.iter_in_order() {
            if caller.is_system() {
                continue;
            }
            let (caller_scope, caller_name) = split_scope(&caller.sname);
            for cs in &caller.call_sites {
                let Some(callee) = graph.get(&cs.callee_usr) else {
                    continue;
                };
                if callee.throw.is_empty() {
                    continue;
                }
                let (callee_scope, callee_name) = split_scope(&callee.sname);
                universe.sites.push(SiteRecord {
                    caller_usr: caller.usr.clone(),
                    caller_name: caller_name.to_string(),
                    caller_scope: caller_scope.to_string(),
                    callee_usr: callee.usr.clone(),
                    callee_name: callee_name.to_string(),
                    callee_scope: callee_scope.to_string(),
                    n_throw: callee.throw.len(),
                    n_caught: count_caught(&callee.throw, &cs.catch_set),
                });
            }
        }

        for (position, record) in universe.sites.iter().enumerate() {
            universe
                .by_caller
                .entry(record.caller_usr.clone())
                .or_default()
                .push(position);
            universe
                .by_caller_name
                .entry(record.caller_name.clone())
                .or_default()
                .push(position);
            universe
                .by_caller_scope
                .entry(record.caller_scope.clone())
                .or_default()
                .push(position);
            universe
                .by_callee
                .entry(record.callee_usr.clone())
                .or_default()
                .push(position);
            universe
                .by_callee_name
                .entry(record.callee_name.clone())
                .or_default()
                .push(position);
            universe
                .by_callee_scope
                .entry(record.callee_scope.clone())
                .or_default()
                .push(position);
        }
        universe
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Universe positions sharing `record`'s caller at the given key
    pub(crate) fn caller_group(
        &self,
        record: &SiteRecord,
        key: super::contexts::Specificity,
    ) -> Option<&[usize]> {
        use super::contexts::Specificity;
        let index = match key {
            Specificity::Exact => self.by_caller.get(&record.caller_usr),
            Specificity::Name => self.by_caller_name.get(&record.caller_name),
            Specificity::Scope => self.by_caller_scope.get(&record.caller_scope),
            Specificity::Any => return None,
        };
        index.map(Vec::as_slice)
    }

    /// Universe positions sharing `record`'s callee at the given key
    pub(crate) fn callee_group(
        &self,
        record: &SiteRecord,
        key: super::contexts::Specificity,
    ) -> Option<&[usize]> {
        use super::contexts::Specificity;
        let index = match key {
            Specificity::Exact => self.by_callee.get(&record.callee_usr),
            Specificity::Name => self.by_callee_name.get(&record.callee_name),
            Specificity::Scope => self.by_callee_scope.get(&record.callee_scope),
            Specificity::Any => return None,
        };
        index.map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{CallSite, ExceptionType, Function};

    fn graph_with_universe() -> CallGraph {
        let mut graph = CallGraph::new();

        let mut thrower = Function::new("f", "ns::f");
        thrower.direct_throw.insert(ExceptionType::new("E", ""));
        graph.install(thrower);

        let mut silent = Function::new("quiet", "quiet");
        silent.call_sites.push(CallSite::new("f", "ns::f", "q.cpp:1"));
        graph.install(silent);

        let mut system = Function::new("sys", "sys");
        system.tag = "S".to_string();
        system.call_sites.push(CallSite::new("f", "ns::f", "s.cpp:1"));
        graph.install(system);

        let mut external_caller = Function::new("ext_caller", "ext_caller");
        external_caller
            .call_sites
            .push(CallSite::new("unresolved", "unresolved", "e.cpp:1"));
        graph.install(external_caller);

        graph.populate_callers();
        graph
    }

    #[test]
    fn universe_excludes_system_and_unresolved_and_throwless() {
        let graph = graph_with_universe();
        let universe = SiteUniverse::build(&graph);
        // Only quiet→f qualifies: sys is system-tagged, ext_caller's callee
        // is unresolved, and nobody calls quiet (whose throw set is empty).
        assert_eq!(universe.len(), 1);
        assert_eq!(universe.sites[0].caller_usr, "quiet");
        assert_eq!(universe.sites[0].callee_name, "f");
        assert_eq!(universe.sites[0].callee_scope, "ns");
    }

    #[test]
    fn n_caught_counts_handler_matches() {
        let mut graph = CallGraph::new();
        let mut thrower = Function::new("f", "f");
        thrower.direct_throw.insert(ExceptionType::new("E1", ""));
        thrower.direct_throw.insert(ExceptionType::new("E2", ""));
        graph.install(thrower);

        let mut caller = Function::new("g", "g");
        caller.call_sites.push(
            CallSite::new("f", "f", "g.cpp:1").with_catches([ExceptionType::new("E1", "")]),
        );
        graph.install(caller);
        graph.populate_callers();

        let universe = SiteUniverse::build(&graph);
        assert_eq!(universe.sites[0].n_throw, 2);
        assert_eq!(universe.sites[0].n_caught, 1);
        assert!(universe.sites[0].caught());
    }
}
