//! The labeled transition graph on which expressions are synthesized.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use fixedbitset::FixedBitSet;

use crate::regex::{union_all, Regex};

/// The type for an index of a state in a transition graph.
pub type StateId = usize;

/// A directed edge of a transition graph, labeled with an expression and
/// marked as accepting or not.
///
/// Two edges are equal iff their endpoints and labels are equal; the
/// accepting flag is stored with the edge but excluded from its identity.
#[derive(Debug, Clone)]
pub struct Edge {
    src: StateId,
    dst: StateId,
    label: Regex,
    accepting: bool,
}

impl Edge {
    fn new(src: StateId, dst: StateId, label: Regex, accepting: bool) -> Self {
        Self {
            src,
            dst,
            label,
            accepting,
        }
    }

    /// The source state of the edge.
    pub fn src(&self) -> StateId {
        self.src
    }

    /// The destination state of the edge.
    pub fn dst(&self) -> StateId {
        self.dst
    }

    /// The expression labelling the edge.
    pub fn label(&self) -> &Regex {
        &self.label
    }

    /// Whether the edge belongs to the acceptance set.
    pub fn accepting(&self) -> bool {
        self.accepting
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.src == other.src && self.dst == other.dst && self.label == other.label
    }
}

impl Eq for Edge {}

#[derive(Debug, Clone, Default)]
struct Vertex {
    out_edges: Vec<Edge>,
    in_edges: Vec<Edge>,
}

/// A labeled directed multigraph with accepting-edge annotation.
///
/// The same logical edge is kept in the adjacency lists of both endpoints
/// and in exactly one of the accepting/non-accepting side indices; all
/// mutation goes through [`TransitionGraph::add_edge`] and
/// [`TransitionGraph::remove_edge`], which keep the views consistent. A
/// state is final iff it has at least one outgoing accepting edge.
#[derive(Debug, Clone)]
pub struct TransitionGraph {
    num_states: usize,
    initial: StateId,
    finals: FixedBitSet,
    vertices: BTreeMap<StateId, Vertex>,
    acc_trans: Vec<Edge>,
    nonacc_trans: Vec<Edge>,
}

impl TransitionGraph {
    /// Creates a graph with states `0..num_states`, no edges and the given
    /// initial state.
    pub fn new(num_states: usize, initial: StateId) -> Self {
        Self {
            num_states,
            initial,
            finals: FixedBitSet::with_capacity(num_states),
            vertices: (0..num_states).map(|s| (s, Vertex::default())).collect(),
            acc_trans: Vec::new(),
            nonacc_trans: Vec::new(),
        }
    }

    /// Returns the number of states in the graph.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Returns the initial state of the graph.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Returns an iterator over the states of the graph in ascending order.
    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.vertices.keys().copied()
    }

    /// Returns true if the given state has an outgoing accepting edge.
    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(state)
    }

    /// Returns an iterator over the final states in ascending order.
    pub fn final_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.finals.ones()
    }

    /// Returns the number of final states.
    pub fn num_final_states(&self) -> usize {
        self.finals.count_ones(..)
    }

    /// Returns the outgoing edges of the given state.
    pub fn out_edges(&self, state: StateId) -> &[Edge] {
        self.vertices
            .get(&state)
            .map(|v| v.out_edges.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the incoming edges of the given state.
    pub fn in_edges(&self, state: StateId) -> &[Edge] {
        self.vertices
            .get(&state)
            .map(|v| v.in_edges.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the outgoing accepting edges of the given state.
    pub fn accepting_edges_from(&self, state: StateId) -> impl Iterator<Item = &Edge> {
        self.out_edges(state).iter().filter(|e| e.accepting)
    }

    /// Returns the outgoing non-accepting edges of the given state.
    pub fn nonaccepting_edges_from(&self, state: StateId) -> impl Iterator<Item = &Edge> {
        self.out_edges(state).iter().filter(|e| !e.accepting)
    }

    /// Returns the incoming accepting edges of the given state.
    pub fn accepting_edges_to(&self, state: StateId) -> impl Iterator<Item = &Edge> {
        self.in_edges(state).iter().filter(|e| e.accepting)
    }

    /// Returns the incoming non-accepting edges of the given state.
    pub fn nonaccepting_edges_to(&self, state: StateId) -> impl Iterator<Item = &Edge> {
        self.in_edges(state).iter().filter(|e| !e.accepting)
    }

    /// Returns all accepting edges of the graph.
    pub fn accepting_transitions(&self) -> &[Edge] {
        &self.acc_trans
    }

    /// Returns all non-accepting edges of the graph.
    pub fn nonaccepting_transitions(&self) -> &[Edge] {
        &self.nonacc_trans
    }

    /// Returns true if the given state has both accepting and non-accepting
    /// outgoing edges.
    pub fn is_pseudo_accepting(&self, state: StateId) -> bool {
        self.accepting_edges_from(state).next().is_some()
            && self.nonaccepting_edges_from(state).next().is_some()
    }

    /// Adds an edge to the graph. An accepting edge makes its source final.
    pub fn add_edge(&mut self, src: StateId, dst: StateId, label: Regex, accepting: bool) {
        let edge = Edge::new(src, dst, label, accepting);
        self.vertices
            .get_mut(&src)
            .expect("unknown source state")
            .out_edges
            .push(edge.clone());
        self.vertices
            .get_mut(&dst)
            .expect("unknown destination state")
            .in_edges
            .push(edge.clone());
        if accepting {
            self.acc_trans.push(edge);
            self.finals.insert(src);
        } else {
            self.nonacc_trans.push(edge);
        }
    }

    /// Removes the edge from the graph. The source loses its final status
    /// when its last outgoing accepting edge is removed.
    pub fn remove_edge(&mut self, edge: &Edge) {
        fn remove_from(list: &mut Vec<Edge>, edge: &Edge) {
            let position = list
                .iter()
                .position(|e| e == edge && e.accepting == edge.accepting)
                .expect("edge not present");
            list.remove(position);
        }
        remove_from(
            &mut self.vertices.get_mut(&edge.src).expect("unknown source state").out_edges,
            edge,
        );
        remove_from(
            &mut self
                .vertices
                .get_mut(&edge.dst)
                .expect("unknown destination state")
                .in_edges,
            edge,
        );
        if edge.accepting {
            remove_from(&mut self.acc_trans, edge);
        } else {
            remove_from(&mut self.nonacc_trans, edge);
        }
        if self.finals.contains(edge.src) && self.accepting_edges_from(edge.src).next().is_none() {
            self.finals.set(edge.src, false);
        }
    }

    /// Union-combines every group of edges that share source, destination
    /// and accepting flag into a single edge, until no such group remains.
    ///
    /// Combining a group cannot create a new group, so a single pass reaches
    /// the fixed point; the loop re-checks regardless. Groups are visited in
    /// key order so that repeated runs produce identical adjacency lists.
    pub fn combine_duplicate_edges(&mut self) {
        loop {
            let mut groups: BTreeMap<(StateId, StateId, bool), Vec<Edge>> = BTreeMap::new();
            for vertex in self.vertices.values() {
                for edge in &vertex.out_edges {
                    groups
                        .entry((edge.src, edge.dst, edge.accepting))
                        .or_default()
                        .push(edge.clone());
                }
            }
            let mut changed = false;
            for ((src, dst, accepting), edges) in groups {
                if edges.len() < 2 {
                    continue;
                }
                changed = true;
                for edge in &edges {
                    self.remove_edge(edge);
                }
                let label = union_all(edges.into_iter().map(|e| e.label)).unwrap();
                self.add_edge(src, dst, label, accepting);
            }
            if !changed {
                break;
            }
        }
    }

    /// Removes a state from the graph.
    ///
    /// All edges incident to the state must have been removed before.
    pub(crate) fn remove_state(&mut self, state: StateId) {
        let vertex = self.vertices.remove(&state).expect("unknown state");
        assert!(vertex.out_edges.is_empty() && vertex.in_edges.is_empty());
        self.num_states -= 1;
    }

    /// Renders the graph in the textual BA format: the initial state, one
    /// `label,[src]->[dst]` line per transition, and the final states.
    pub fn to_ba_format(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[{}]", self.initial);
        for vertex in self.vertices.values() {
            for edge in &vertex.out_edges {
                let _ = writeln!(out, "{},[{}]->[{}]", edge.label, edge.src, edge.dst);
            }
        }
        for state in self.final_states() {
            let _ = writeln!(out, "[{}]", state);
        }
        out
    }
}
