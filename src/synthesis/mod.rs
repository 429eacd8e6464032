//! Synthesis of ω-regular expressions from transition graphs.
//!
//! Every accepting run of a Büchi automaton has a lasso witness α·β^ω. The
//! decomposition therefore asks, for each final state, for three finite
//! path expressions: a prefix from the initial state, a cycle whose first
//! edge is accepting, and a cycle whose first edge is not. Two backends
//! answer those path queries: state elimination on a working copy of the
//! graph, and the memoized McNaughton-Yamada closed form.

mod closure;
mod eliminate;
pub mod graph;

pub use graph::{Edge, StateId, TransitionGraph};

use log::debug;

use crate::options::RegexMethod;
use crate::regex::{union_all_omega, OmegaRegex, Regex};

/// The constraint a path query places on the first edge of its paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMode {
    /// Any first edge.
    Any,
    /// The first edge must be accepting.
    Accepting,
    /// The first edge must not be accepting.
    NonAccepting,
}

impl PathMode {
    fn admits(self, accepting: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Accepting => accepting,
            Self::NonAccepting => !accepting,
        }
    }
}

/// Computes an expression for the paths from `v_start` to `v_end` under
/// `mode` with the given backend.
pub fn find_path(
    graph: &TransitionGraph,
    method: RegexMethod,
    v_start: StateId,
    v_end: StateId,
    mode: PathMode,
) -> Option<Regex> {
    match method {
        RegexMethod::Bmc => eliminate::eliminate_path(graph, v_start, v_end, mode),
        RegexMethod::Mny => closure::closed_form_path(graph, v_start, v_end, mode),
    }
}

/// Decomposes the language of the graph into a union of lassos and returns
/// it as an ω-expression.
///
/// For each final state f in ascending order the contribution is
/// `prefix · (nonacc* · acc)^ω`, where the prefix is absent when f is the
/// initial state, the non-accepting cycle is only queried when f also has
/// non-accepting out-edges, and f contributes nothing when it has no
/// accepting cycle. Contributions are combined into a right-leaning union;
/// a graph without contributions denotes the empty ω-language.
pub fn decompose(graph: &TransitionGraph, method: RegexMethod) -> OmegaRegex {
    let mut graph = graph.clone();
    graph.combine_duplicate_edges();

    let finals: Vec<StateId> = graph.final_states().collect();
    let mut contributions = Vec::new();
    for f in finals {
        debug!("Decomposing lasso at final state {}", f);
        let accepting_cycle = match find_path(&graph, method, f, f, PathMode::Accepting) {
            Some(cycle) => cycle,
            None => continue,
        };
        let nonaccepting_cycle = if graph.is_pseudo_accepting(f) {
            find_path(&graph, method, f, f, PathMode::NonAccepting)
        } else {
            None
        };
        let prefix = if graph.initial() != f {
            find_path(&graph, method, graph.initial(), f, PathMode::Any)
        } else {
            None
        };

        let cycle = match nonaccepting_cycle {
            None => accepting_cycle,
            Some(skip) => Regex::concat(Regex::star(skip), accepting_cycle),
        };
        let tail = OmegaRegex::repeat(cycle);
        contributions.push(match prefix {
            None => tail,
            Some(prefix) => OmegaRegex::concat(prefix, tail),
        });
    }
    union_all_omega(contributions).unwrap_or(OmegaRegex::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Regex {
        Regex::symbol(s)
    }

    fn both_methods() -> [RegexMethod; 2] {
        [RegexMethod::Bmc, RegexMethod::Mny]
    }

    #[test]
    fn test_accepting_self_loop() {
        let mut graph = TransitionGraph::new(1, 0);
        graph.add_edge(0, 0, sym("a"), true);
        for method in both_methods() {
            let expr = decompose(&graph, method);
            assert_eq!(expr, OmegaRegex::repeat(sym("a")));
            assert_eq!(expr.length(), 1);
            assert_eq!(expr.size(), 2);
            assert_eq!(expr.star_height(), 0);
        }
    }

    #[test]
    fn test_nonaccepting_self_loop_is_empty() {
        let mut graph = TransitionGraph::new(1, 0);
        graph.add_edge(0, 0, sym("a"), false);
        for method in both_methods() {
            assert_eq!(decompose(&graph, method), OmegaRegex::Empty);
        }
    }

    #[test]
    fn test_prefix_and_cycle() {
        let mut graph = TransitionGraph::new(2, 0);
        graph.add_edge(0, 1, sym("a"), false);
        graph.add_edge(1, 1, sym("b"), true);
        for method in both_methods() {
            let expr = decompose(&graph, method);
            assert_eq!(
                expr,
                OmegaRegex::concat(sym("a"), OmegaRegex::repeat(sym("b")))
            );
            assert_eq!(expr.length(), 2);
            assert_eq!(expr.size(), 3);
            assert_eq!(expr.star_height(), 0);
        }
    }

    #[test]
    fn test_pseudo_accepting_cycle() {
        let mut graph = TransitionGraph::new(2, 0);
        graph.add_edge(0, 1, sym("a"), false);
        graph.add_edge(1, 1, sym("b"), true);
        graph.add_edge(1, 1, sym("c"), false);
        for method in both_methods() {
            let expr = decompose(&graph, method);
            assert_eq!(
                expr,
                OmegaRegex::concat(
                    sym("a"),
                    OmegaRegex::repeat(Regex::concat(Regex::star(sym("c")), sym("b")))
                )
            );
            assert_eq!(expr.length(), 3);
            assert_eq!(expr.star_height(), 1);
        }
    }

    #[test]
    fn test_union_of_lassos_leans_right() {
        // finals 1 and 2, both reachable from the initial state
        let mut graph = TransitionGraph::new(3, 0);
        graph.add_edge(0, 1, sym("a"), false);
        graph.add_edge(1, 1, sym("b"), true);
        graph.add_edge(0, 2, sym("c"), false);
        graph.add_edge(2, 2, sym("d"), true);
        for method in both_methods() {
            let expr = decompose(&graph, method);
            let first = OmegaRegex::concat(sym("a"), OmegaRegex::repeat(sym("b")));
            let second = OmegaRegex::concat(sym("c"), OmegaRegex::repeat(sym("d")));
            assert_eq!(expr, OmegaRegex::union(first, second));
            assert_eq!(expr.length(), 2);
        }
    }

    #[test]
    fn test_no_final_states() {
        let mut graph = TransitionGraph::new(2, 0);
        graph.add_edge(0, 1, sym("a"), false);
        graph.add_edge(1, 0, sym("b"), false);
        for method in both_methods() {
            let expr = decompose(&graph, method);
            assert_eq!(expr, OmegaRegex::Empty);
            assert_eq!(expr.length(), 0);
        }
    }

    #[test]
    fn test_deterministic_across_runs() {
        let mut graph = TransitionGraph::new(3, 0);
        graph.add_edge(0, 1, sym("a"), false);
        graph.add_edge(0, 1, sym("e"), false);
        graph.add_edge(1, 2, sym("b"), false);
        graph.add_edge(2, 0, sym("c"), true);
        graph.add_edge(2, 2, sym("d"), true);
        for method in both_methods() {
            let first = decompose(&graph, method);
            let second = decompose(&graph, method);
            assert_eq!(first, second);
        }
    }
}
