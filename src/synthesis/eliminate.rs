//! Path expressions by state elimination.
//!
//! States other than the two endpoints are successively ripped out of a
//! working copy of the graph while edge labels are rewritten so that the
//! path language between the endpoints is preserved. The accepting flag of
//! a rewritten edge is inherited from the incoming edge, so the flag of an
//! edge leaving the start state always reflects the first original edge of
//! the paths it abstracts; this is what makes the first-edge mode filter of
//! the final assembly sound.

use log::trace;

use super::graph::{Edge, StateId, TransitionGraph};
use super::PathMode;
use crate::regex::{union_all, Regex};

/// Computes an expression for the paths from `v_start` to `v_end` whose
/// first edge satisfies `mode`, or `None` if there is no such path.
///
/// Edges from `v_end` back to `v_start` and self-loops on `v_end` are
/// deliberately left out of the assembly: the decomposition only ever asks
/// for a prefix to a final state or for a cycle on one, and in both cases
/// paths leaving `v_end` have already been abstracted elsewhere.
pub(super) fn eliminate_path(
    graph: &TransitionGraph,
    v_start: StateId,
    v_end: StateId,
    mode: PathMode,
) -> Option<Regex> {
    let mut graph = graph.clone();
    while let Some(v) = find_rip_state(&graph, v_start, v_end) {
        rip(&mut graph, v);
        graph.combine_duplicate_edges();
    }

    let mut self_loops = Vec::new();
    let mut direct = Vec::new();
    for edge in graph.out_edges(v_start) {
        if edge.dst() == v_start && v_start != v_end && mode.admits(edge.accepting()) {
            self_loops.push(edge.label().clone());
        }
        if edge.dst() == v_end && mode.admits(edge.accepting()) {
            direct.push(edge.label().clone());
        }
    }

    let direct = union_all(direct)?;
    if v_start == v_end {
        return Some(direct);
    }
    match union_all(self_loops) {
        None => Some(direct),
        Some(loops) => Some(Regex::concat(Regex::star(loops), direct)),
    }
}

/// Returns the smallest state that is not an endpoint, if any.
fn find_rip_state(
    graph: &TransitionGraph,
    v_start: StateId,
    v_end: StateId,
) -> Option<StateId> {
    graph.states().find(|&s| s != v_start && s != v_end)
}

/// Removes `v` from the graph, replacing every path through it by a direct
/// edge `u → w` labeled `l_u · (loops)* · l_w`.
fn rip(graph: &mut TransitionGraph, v: StateId) {
    trace!("Ripping state {}", v);
    let loops = union_all(
        graph
            .out_edges(v)
            .iter()
            .filter(|e| e.dst() == v)
            .map(|e| e.label().clone()),
    );

    let mut added = Vec::new();
    for e_in in graph.in_edges(v) {
        if e_in.src() == v {
            continue;
        }
        for e_out in graph.out_edges(v) {
            if e_out.dst() == v {
                continue;
            }
            let label = match &loops {
                None => Regex::concat(e_in.label().clone(), e_out.label().clone()),
                Some(l) => Regex::concat(
                    e_in.label().clone(),
                    Regex::concat(Regex::star(l.clone()), e_out.label().clone()),
                ),
            };
            added.push((e_in.src(), e_out.dst(), label, e_in.accepting()));
        }
    }

    let mut incident: Vec<Edge> = graph.out_edges(v).to_vec();
    incident.extend(graph.in_edges(v).iter().filter(|e| e.src() != v).cloned());
    for edge in &incident {
        graph.remove_edge(edge);
    }
    graph.remove_state(v);
    for (src, dst, label, accepting) in added {
        graph.add_edge(src, dst, label, accepting);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Regex {
        Regex::symbol(s)
    }

    #[test]
    fn test_direct_edge() {
        let mut graph = TransitionGraph::new(2, 0);
        graph.add_edge(0, 1, sym("a"), false);
        let path = eliminate_path(&graph, 0, 1, PathMode::Any).unwrap();
        assert_eq!(path, sym("a"));
        // the search does not mutate its input
        assert_eq!(graph.num_states(), 2);
        assert_eq!(graph.out_edges(0).len(), 1);
    }

    #[test]
    fn test_rip_chains_labels() {
        let mut graph = TransitionGraph::new(3, 0);
        graph.add_edge(0, 1, sym("a"), false);
        graph.add_edge(1, 2, sym("b"), false);
        let path = eliminate_path(&graph, 0, 2, PathMode::Any).unwrap();
        assert_eq!(path, Regex::concat(sym("a"), sym("b")));
    }

    #[test]
    fn test_rip_inserts_self_loop_star() {
        let mut graph = TransitionGraph::new(3, 0);
        graph.add_edge(0, 1, sym("a"), false);
        graph.add_edge(1, 1, sym("c"), false);
        graph.add_edge(1, 2, sym("b"), false);
        let path = eliminate_path(&graph, 0, 2, PathMode::Any).unwrap();
        assert_eq!(
            path,
            Regex::concat(sym("a"), Regex::concat(Regex::star(sym("c")), sym("b")))
        );
    }

    #[test]
    fn test_start_self_loop_prefixed() {
        let mut graph = TransitionGraph::new(2, 0);
        graph.add_edge(0, 0, sym("s"), false);
        graph.add_edge(0, 1, sym("a"), false);
        let path = eliminate_path(&graph, 0, 1, PathMode::Any).unwrap();
        assert_eq!(path, Regex::concat(Regex::star(sym("s")), sym("a")));
    }

    #[test]
    fn test_no_path() {
        let mut graph = TransitionGraph::new(3, 0);
        graph.add_edge(1, 0, sym("a"), false);
        graph.add_edge(1, 2, sym("b"), false);
        assert_eq!(eliminate_path(&graph, 0, 2, PathMode::Any), None);
    }

    #[test]
    fn test_cycle_mode_filters_first_edge() {
        let mut graph = TransitionGraph::new(2, 0);
        graph.add_edge(0, 1, sym("a"), false);
        graph.add_edge(1, 1, sym("b"), true);
        graph.add_edge(1, 1, sym("c"), false);
        let acc = eliminate_path(&graph, 1, 1, PathMode::Accepting).unwrap();
        assert_eq!(acc, sym("b"));
        let nonacc = eliminate_path(&graph, 1, 1, PathMode::NonAccepting).unwrap();
        assert_eq!(nonacc, sym("c"));
    }

    #[test]
    fn test_accepting_cycle_through_other_states() {
        // the flag of a rewritten edge comes from the edge leaving the
        // start state, so the mode filter still sees the original first edge
        let mut graph = TransitionGraph::new(2, 0);
        graph.add_edge(0, 1, sym("a"), true);
        graph.add_edge(1, 0, sym("b"), false);
        graph.add_edge(0, 1, sym("c"), false);
        let acc = eliminate_path(&graph, 0, 0, PathMode::Accepting).unwrap();
        assert_eq!(acc, Regex::concat(sym("a"), sym("b")));
        let nonacc = eliminate_path(&graph, 0, 0, PathMode::NonAccepting).unwrap();
        assert_eq!(nonacc, Regex::concat(sym("c"), sym("b")));
    }
}
