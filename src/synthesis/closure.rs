//! Path expressions by the McNaughton-Yamada closed form.
//!
//! `paths(i, j, k)` denotes the paths from `i` to `j` that only visit
//! intermediate states in `0..=k`. The graph is not modified; results are
//! memoized per top-level query, since the mode filter changes the base
//! case and must not leak between queries.

use std::collections::HashMap;

use super::graph::{StateId, TransitionGraph};
use super::PathMode;
use crate::regex::{union_all, Regex};

/// Computes an expression for the paths from `v_start` to `v_end` whose
/// first edge satisfies `mode`, or `None` if there is no such path.
pub(super) fn closed_form_path(
    graph: &TransitionGraph,
    v_start: StateId,
    v_end: StateId,
    mode: PathMode,
) -> Option<Regex> {
    if graph.num_states() == 0 {
        return None;
    }
    let mut closure = Closure::new(graph, v_start, mode);
    closure.paths(v_start, v_end, graph.num_states() as isize - 1)
}

struct Closure {
    source: StateId,
    mode: PathMode,
    direct: HashMap<(StateId, StateId), Vec<(Regex, bool)>>,
    memo: HashMap<(StateId, StateId, isize), Option<Regex>>,
}

impl Closure {
    fn new(graph: &TransitionGraph, source: StateId, mode: PathMode) -> Self {
        let mut direct: HashMap<(StateId, StateId), Vec<(Regex, bool)>> = HashMap::new();
        for state in graph.states() {
            for edge in graph.out_edges(state) {
                direct
                    .entry((edge.src(), edge.dst()))
                    .or_default()
                    .push((edge.label().clone(), edge.accepting()));
            }
        }
        Self {
            source,
            mode,
            direct,
            memo: HashMap::new(),
        }
    }

    fn paths(&mut self, i: StateId, j: StateId, k: isize) -> Option<Regex> {
        if let Some(cached) = self.memo.get(&(i, j, k)) {
            return cached.clone();
        }
        let result = self.compute(i, j, k);
        self.memo.insert((i, j, k), result.clone());
        result
    }

    fn compute(&mut self, i: StateId, j: StateId, k: isize) -> Option<Regex> {
        if k < 0 {
            return self.direct_labels(i, j);
        }
        let through = k as StateId;
        if through == j {
            self.paths(i, j, k - 1)
        } else if through == i {
            let repeat = self.paths(i, i, k - 1);
            let tail = self.paths(i, j, k - 1)?;
            Some(match repeat {
                None => tail,
                Some(r) => Regex::concat(Regex::star(r), tail),
            })
        } else {
            let enter = self.paths(i, through, k - 1);
            let repeat = self.paths(through, through, k - 1);
            let exit = self.paths(through, j, k - 1);
            let skip = self.paths(i, j, k - 1);
            match (enter, exit) {
                (Some(enter), Some(exit)) => {
                    let via = match repeat {
                        None => Regex::concat(enter, exit),
                        Some(r) => {
                            Regex::concat(enter, Regex::concat(Regex::star(r), exit))
                        }
                    };
                    Some(match skip {
                        None => via,
                        Some(skip) => Regex::union(skip, via),
                    })
                }
                // no way in or no way out: only the paths avoiding `through` remain
                _ => skip,
            }
        }
    }

    /// Union of the labels of direct edges `i → j`; edges leaving the query
    /// source are filtered by the mode.
    fn direct_labels(&self, i: StateId, j: StateId) -> Option<Regex> {
        let edges = self.direct.get(&(i, j))?;
        let filtered = edges
            .iter()
            .filter(|(_, accepting)| i != self.source || self.mode.admits(*accepting))
            .map(|(label, _)| label.clone());
        union_all(filtered)
    }
}
