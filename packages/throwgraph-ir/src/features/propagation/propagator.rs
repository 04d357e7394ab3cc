//! Worklist fixed point over caller edges

use super::handler::filter_escaping;
use crate::features::assembly::CallGraph;
use crate::shared::models::{ExceptionSet, ExceptionType};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Counters from one propagation run
#[derive(Debug, Default, Clone, Copy)]
pub struct PropagationStats {
    pub seeded: usize,
    pub visits: usize,
    pub enqueues: usize,
    pub cancelled: bool,
}

/// Grow every function's throw set to its fixed point.
///
/// LIFO worklist seeded with every function that already throws. A visited
/// snapshot skips functions whose throw set has not changed since their
/// last visit. Throw sets only grow inside the finite universe of extracted
/// exception types, so the loop terminates.
///
/// `cancel` is checked on each dequeue; a cancelled run leaves the graph in
/// a consistent (under-approximated) state.
pub fn propagate(graph: &mut CallGraph, cancel: Option<&AtomicBool>) -> PropagationStats {
    let mut stats = PropagationStats::default();

    let mut worklist: Vec<String> = graph
        .iter_in_order()
        .filter(|f| !f.throw.is_empty())
        .map(|f| f.usr.clone())
        .collect();
    stats.seeded = worklist.len();
    debug!(seeded = stats.seeded, "propagation worklist seeded");

    let mut visited: FxHashMap<String, ExceptionSet> = FxHashMap::default();

    while let Some(usr) = worklist.pop() {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                stats.cancelled = true;
                break;
            }
        }
        let Some(callee) = graph.get(&usr) else {
            continue;
        };
        if visited.get(&usr).is_some_and(|snapshot| *snapshot == callee.throw) {
            continue;
        }
        stats.visits += 1;
        visited.insert(usr.clone(), callee.throw.clone());

        let callee_throw = callee.throw.clone();
        let mut caller_usrs: Vec<String> = callee.callers.iter().cloned().collect();
        caller_usrs.sort();

        for caller_usr in caller_usrs {
            let Some(caller) = graph.get(&caller_usr) else {
                continue;
            };
            let mut escaped: Vec<ExceptionType> = Vec::new();
            for cs in caller.call_sites.iter().filter(|cs| cs.callee_usr == usr) {
                for ex in filter_escaping(&callee_throw, &cs.catch_set) {
                    if !caller.throw.contains(&ex) {
                        escaped.push(ex);
                    }
                }
            }
            if escaped.is_empty() {
                continue;
            }
            if let Some(caller) = graph.get_mut(&caller_usr) {
                caller.throw.extend(escaped);
                worklist.push(caller_usr);
                stats.enqueues += 1;
            }
        }
    }

    info!(
        visits = stats.visits,
        enqueues = stats.enqueues,
        cancelled = stats.cancelled,
        "propagation finished"
    );
    stats
}

/// Fold overrider throws back into the declared virtual base.
///
/// The worklist delivers overrider exceptions to the synthetic sites'
/// callers, but the base method's own throw set must reflect them too.
/// Returns the number of base functions enriched.
pub fn reconcile_expansion(graph: &mut CallGraph) -> usize {
    let mut pairs: FxHashSet<(String, String)> = FxHashSet::default();
    for function in graph.iter_in_order() {
        for cs in function.call_sites.iter().filter(|cs| cs.is_synthetic()) {
            if graph.contains(&cs.expand_origin) && graph.contains(&cs.callee_usr) {
                pairs.insert((cs.expand_origin.clone(), cs.callee_usr.clone()));
            }
        }
    }

    let mut enriched = 0usize;
    for (origin, derived) in pairs {
        let Some(derived_throw) = graph.get(&derived).map(|f| f.throw.clone()) else {
            continue;
        };
        if let Some(base) = graph.get_mut(&origin) {
            let before = base.throw.len();
            base.throw.extend(derived_throw);
            if base.throw.len() > before {
                enriched += 1;
            }
        }
    }
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{CallSite, Function};

    fn thrower(usr: &str, exceptions: &[&str]) -> Function {
        let mut f = Function::new(usr, usr);
        for usr in exceptions {
            f.direct_throw.insert(ExceptionType::new(*usr, ""));
        }
        f
    }

    fn caller_of(usr: &str, callee: &str, catches: &[ExceptionType]) -> Function {
        let mut f = Function::new(usr, usr);
        f.call_sites.push(
            CallSite::new(callee, callee, format!("{usr}.cpp:1"))
                .with_catches(catches.iter().cloned()),
        );
        f
    }

    fn build(functions: Vec<Function>) -> CallGraph {
        let mut graph = CallGraph::new();
        for f in functions {
            graph.install(f);
        }
        graph.populate_callers();
        graph
    }

    fn throw_usrs(graph: &CallGraph, usr: &str) -> Vec<String> {
        let mut usrs: Vec<String> = graph
            .get(usr)
            .unwrap()
            .throw
            .iter()
            .map(|e| e.usr.clone())
            .collect();
        usrs.sort();
        usrs
    }

    #[test]
    fn propagates_through_transparent_callers() {
        let mut graph = build(vec![
            thrower("f", &["E"]),
            caller_of("g", "f", &[]),
            caller_of("h", "g", &[ExceptionType::new("E", "")]),
        ]);
        propagate(&mut graph, None);

        assert_eq!(throw_usrs(&graph, "f"), vec!["E"]);
        assert_eq!(throw_usrs(&graph, "g"), vec!["E"]);
        assert!(graph.get("h").unwrap().throw.is_empty());
    }

    #[test]
    fn wildcard_stops_propagation() {
        let mut graph = build(vec![
            thrower("f", &["E"]),
            caller_of("g", "f", &[]),
            caller_of("h", "g", &[ExceptionType::wildcard()]),
        ]);
        propagate(&mut graph, None);
        assert!(graph.get("h").unwrap().throw.is_empty());
    }

    #[test]
    fn parent_handler_stops_derived_throw() {
        let mut graph = CallGraph::new();
        let mut f = Function::new("f", "f");
        f.direct_throw
            .insert(ExceptionType::with_parents("X", "", ["B", "A"]));
        graph.install(f);
        graph.install(caller_of("g", "f", &[ExceptionType::new("A", "")]));
        graph.populate_callers();

        propagate(&mut graph, None);
        assert!(graph.get("g").unwrap().throw.is_empty());
    }

    #[test]
    fn recursion_reaches_fixed_point() {
        // f and g call each other; each throws its own exception.
        let mut f = thrower("f", &["Ef"]);
        f.call_sites.push(CallSite::new("g", "g", "f.cpp:2"));
        let mut g = thrower("g", &["Eg"]);
        g.call_sites.push(CallSite::new("f", "f", "g.cpp:2"));

        let mut graph = build(vec![f, g]);
        propagate(&mut graph, None);

        assert_eq!(throw_usrs(&graph, "f"), vec!["Ef", "Eg"]);
        assert_eq!(throw_usrs(&graph, "g"), vec!["Ef", "Eg"]);
    }

    #[test]
    fn multiple_sites_to_same_callee_union_their_escapes() {
        let mut g = Function::new("g", "g");
        g.call_sites.push(
            CallSite::new("f", "f", "g.cpp:1").with_catches([ExceptionType::new("E1", "")]),
        );
        g.call_sites.push(
            CallSite::new("f", "f", "g.cpp:9").with_catches([ExceptionType::new("E2", "")]),
        );
        let mut graph = build(vec![thrower("f", &["E1", "E2"]), g]);
        propagate(&mut graph, None);

        // Each site lets the other exception through.
        assert_eq!(throw_usrs(&graph, "g"), vec!["E1", "E2"]);
    }

    #[test]
    fn direct_throw_survives_propagation() {
        let mut graph = build(vec![thrower("f", &["E"]), caller_of("g", "f", &[])]);
        propagate(&mut graph, None);
        let f = graph.get("f").unwrap();
        assert!(f.throw.is_superset(&f.direct_throw));
    }

    #[test]
    fn cancelled_run_stops_early() {
        let mut graph = build(vec![thrower("f", &["E"]), caller_of("g", "f", &[])]);
        let flag = AtomicBool::new(true);
        let stats = propagate(&mut graph, Some(&flag));
        assert!(stats.cancelled);
        assert_eq!(stats.visits, 0);
    }

    #[test]
    fn reconciliation_enriches_virtual_base() {
        let mut caller = Function::new("caller", "caller");
        caller
            .call_sites
            .push(CallSite::new("shape.area", "Shape::area", "c.cpp:5"));
        let mut synthetic = CallSite::new("circle.area", "Circle::area", "c.cpp:5");
        synthetic.expand_origin = "shape.area".to_string();
        caller.call_sites.push(synthetic);

        let mut graph = build(vec![
            caller,
            Function::new("shape.area", "Shape::area"),
            thrower("circle.area", &["E1"]),
        ]);
        propagate(&mut graph, None);
        let enriched = reconcile_expansion(&mut graph);

        assert_eq!(enriched, 1);
        assert_eq!(throw_usrs(&graph, "shape.area"), vec!["E1"]);
        assert_eq!(throw_usrs(&graph, "caller"), vec!["E1"]);
    }
}
