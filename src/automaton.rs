//! Input automata and their import into the synthesis graph.
//!
//! The LTL-to-NBA translation itself is external; this module defines the
//! contract an automaton produced by the translator has to satisfy, the
//! seam through which the translator's shape knobs are reached, and the
//! import into a [`TransitionGraph`]. The textual BA format is supported
//! for drivers that read pre-translated automata from files.

use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;

use crate::regex::Regex;
use crate::synthesis::{StateId, TransitionGraph};

/// An edge of an input automaton.
#[derive(Debug, Clone)]
pub struct NbaEdge {
    src: StateId,
    dst: StateId,
    label: String,
    accepting: bool,
}

impl NbaEdge {
    /// The source state of the edge.
    pub fn src(&self) -> StateId {
        self.src
    }

    /// The destination state of the edge.
    pub fn dst(&self) -> StateId {
        self.dst
    }

    /// The label of the edge, a printable Boolean formula over atomic
    /// propositions.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the edge is a member of the acceptance set.
    pub fn accepting(&self) -> bool {
        self.accepting
    }
}

/// A nondeterministic Büchi automaton as produced by the external
/// translator: states `0..num_states`, an initial state, and edges with
/// opaque labels and membership in the acceptance sets.
#[derive(Debug, Clone)]
pub struct Nba {
    num_states: usize,
    initial: StateId,
    acceptance_sets: usize,
    edges: Vec<NbaEdge>,
}

impl Nba {
    /// Creates an automaton without edges.
    pub fn new(num_states: usize, initial: StateId, acceptance_sets: usize) -> Self {
        Self {
            num_states,
            initial,
            acceptance_sets,
            edges: Vec::new(),
        }
    }

    /// Adds an edge to the automaton.
    pub fn add_edge(
        &mut self,
        src: StateId,
        dst: StateId,
        label: impl Into<String>,
        accepting: bool,
    ) {
        self.edges.push(NbaEdge {
            src,
            dst,
            label: label.into(),
            accepting,
        });
    }

    /// Returns the number of states of the automaton.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Returns the initial state of the automaton.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Returns the number of acceptance sets of the automaton.
    pub fn acceptance_sets(&self) -> usize {
        self.acceptance_sets
    }

    /// Returns the edges of the automaton.
    pub fn edges(&self) -> &[NbaEdge] {
        &self.edges
    }
}

/// An error returned when an imported automaton cannot be synthesized from.
#[derive(Debug, Clone)]
pub struct UnsupportedAutomaton {
    acceptance_sets: usize,
}

impl fmt::Display for UnsupportedAutomaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported automaton: expected exactly one acceptance set, found {}",
            self.acceptance_sets
        )
    }
}

impl Error for UnsupportedAutomaton {}

/// Imports the automaton into a transition graph, wrapping each edge label
/// as a symbol expression.
///
/// # Errors
///
/// Returns an error unless the automaton uses exactly one acceptance set.
pub fn to_transition_graph(nba: &Nba) -> Result<TransitionGraph, UnsupportedAutomaton> {
    if nba.acceptance_sets != 1 {
        return Err(UnsupportedAutomaton {
            acceptance_sets: nba.acceptance_sets,
        });
    }
    let mut graph = TransitionGraph::new(nba.num_states, nba.initial);
    for edge in &nba.edges {
        graph.add_edge(
            edge.src,
            edge.dst,
            Regex::symbol(edge.label.as_str()),
            edge.accepting,
        );
    }
    Ok(graph)
}

/// An error of the external translator. The failure cause is opaque to the
/// synthesis core.
#[derive(Debug, Clone)]
pub struct TranslationError {
    message: String,
}

impl TranslationError {
    /// Creates a translation error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "automaton translation failed: {}", self.message)
    }
}

impl Error for TranslationError {}

/// The shape knobs of the external translator.
///
/// A translator can push acceptance to states or keep it on transitions,
/// and can degeneralize a transition-based automaton into a state-based one
/// while preserving state provenance. Implementations produce whichever
/// shapes they support and report a [`TranslationError`] for the rest.
pub trait NbaSource {
    /// An automaton with acceptance pushed to states, i.e. every out-edge
    /// of an accepting state is in the acceptance set.
    fn state_based(&self) -> Result<Nba, TranslationError>;

    /// An automaton with acceptance on individual transitions.
    fn transition_based(&self) -> Result<Nba, TranslationError>;

    /// The transition-based automaton degeneralized to state-based
    /// acceptance by the translator.
    fn transition_to_state(&self) -> Result<Nba, TranslationError>;
}

/// An [`NbaSource`] over automata that were translated ahead of time, e.g.
/// read from files. Shapes that were not provided report a translation
/// error, which the automatic shape selection treats as a failed
/// construction.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedAutomata {
    state_based: Option<Nba>,
    transition_based: Option<Nba>,
    transition_to_state: Option<Nba>,
}

impl PrecomputedAutomata {
    /// Creates a source without any automata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the state-based automaton.
    pub fn with_state_based(mut self, nba: Nba) -> Self {
        self.state_based = Some(nba);
        self
    }

    /// Sets the transition-based automaton.
    pub fn with_transition_based(mut self, nba: Nba) -> Self {
        self.transition_based = Some(nba);
        self
    }

    /// Sets the degeneralized state-based automaton.
    pub fn with_transition_to_state(mut self, nba: Nba) -> Self {
        self.transition_to_state = Some(nba);
        self
    }

    fn get(nba: &Option<Nba>, shape: &str) -> Result<Nba, TranslationError> {
        nba.clone()
            .ok_or_else(|| TranslationError::new(format!("no {} automaton available", shape)))
    }
}

impl NbaSource for PrecomputedAutomata {
    fn state_based(&self) -> Result<Nba, TranslationError> {
        Self::get(&self.state_based, "state-based")
    }

    fn transition_based(&self) -> Result<Nba, TranslationError> {
        Self::get(&self.transition_based, "transition-based")
    }

    fn transition_to_state(&self) -> Result<Nba, TranslationError> {
        Self::get(&self.transition_to_state, "degeneralized")
    }
}

/// An error encountered while parsing the textual BA format.
#[derive(Debug, Clone)]
pub struct BaParseError {
    line: usize,
    message: String,
}

impl BaParseError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for BaParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.message)
        } else {
            write!(f, "line {}: {}", self.line, self.message)
        }
    }
}

impl Error for BaParseError {}

/// Parses an automaton in the textual BA format.
///
/// The first state line names the initial state, `label,[src]->[dst]` lines
/// describe transitions, and the remaining state lines name the final
/// states. Acceptance in this format is state-based: an edge is imported as
/// accepting iff its source is final.
///
/// # Errors
///
/// Returns an error with the offending line on malformed input.
pub fn parse_ba(text: &str) -> Result<Nba, BaParseError> {
    let mut initial = None;
    let mut transitions: Vec<(StateId, StateId, String)> = Vec::new();
    let mut finals: BTreeSet<StateId> = BTreeSet::new();
    let mut max_state = 0;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let lineno = index + 1;
        if line.contains("->") {
            let (label, arrow) = line
                .split_once(',')
                .ok_or_else(|| BaParseError::new(lineno, "missing ',' before source state"))?;
            let (src, dst) = arrow
                .split_once("->")
                .ok_or_else(|| BaParseError::new(lineno, "missing '->' in transition"))?;
            let src = parse_state(src, lineno)?;
            let dst = parse_state(dst, lineno)?;
            max_state = max_state.max(src).max(dst);
            transitions.push((src, dst, label.to_string()));
        } else {
            let state = parse_state(line, lineno)?;
            max_state = max_state.max(state);
            if initial.is_none() {
                initial = Some(state);
            } else {
                finals.insert(state);
            }
        }
    }

    let initial = initial.ok_or_else(|| BaParseError::new(0, "missing initial state"))?;
    let mut nba = Nba::new(max_state + 1, initial, 1);
    for (src, dst, label) in transitions {
        let accepting = finals.contains(&src);
        nba.add_edge(src, dst, label, accepting);
    }
    Ok(nba)
}

fn parse_state(text: &str, line: usize) -> Result<StateId, BaParseError> {
    let inner = text
        .trim()
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| BaParseError::new(line, format!("expected a state '[n]', found '{}'", text)))?;
    inner
        .parse()
        .map_err(|_| BaParseError::new(line, format!("invalid state id '{}'", inner)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import() {
        let mut nba = Nba::new(2, 0, 1);
        nba.add_edge(0, 1, "a", false);
        nba.add_edge(1, 1, "b", true);
        let graph = to_transition_graph(&nba).unwrap();
        assert_eq!(graph.num_states(), 2);
        assert_eq!(graph.initial(), 0);
        assert!(graph.is_final(1));
        assert_eq!(*graph.out_edges(0)[0].label(), Regex::symbol("a"));
    }

    #[test]
    fn test_import_requires_single_acceptance_set() {
        let nba = Nba::new(1, 0, 2);
        let error = to_transition_graph(&nba).unwrap_err();
        assert!(error.to_string().contains("found 2"));
        assert!(to_transition_graph(&Nba::new(1, 0, 0)).is_err());
    }

    #[test]
    fn test_precomputed_source() {
        let nba = Nba::new(1, 0, 1);
        let source = PrecomputedAutomata::new().with_state_based(nba);
        assert!(source.state_based().is_ok());
        assert!(source.transition_based().is_err());
        assert!(source.transition_to_state().is_err());
    }

    #[test]
    fn test_parse_ba() {
        let text = "[0]\na,[0]->[1]\nb & !c,[1]->[1]\n[1]\n";
        let nba = parse_ba(text).unwrap();
        assert_eq!(nba.num_states(), 2);
        assert_eq!(nba.initial(), 0);
        assert_eq!(nba.acceptance_sets(), 1);
        assert_eq!(nba.edges().len(), 2);
        // acceptance is state-based: only the edge out of the final state
        assert!(!nba.edges()[0].accepting());
        assert!(nba.edges()[1].accepting());
        assert_eq!(nba.edges()[1].label(), "b & !c");
    }

    #[test]
    fn test_parse_ba_errors() {
        assert!(parse_ba("").is_err());
        assert!(parse_ba("[0]\na[0]->[1]\n").is_err());
        assert!(parse_ba("[x]\n").is_err());
        let error = parse_ba("[0]\na,[0]->(1)\n").unwrap_err();
        assert!(error.to_string().starts_with("line 2"));
    }
}
