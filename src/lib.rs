//! Lariat library crate for synthesis of ω-regular expressions from
//! nondeterministic Büchi automata of LTL specifications.
//!
//! An automaton produced by an external LTL translator is imported into a
//! labeled transition graph, the language of the graph is decomposed into a
//! union of lassos α·β^ω with one of two path-expression backends, and the
//! resulting ω-expression is optionally simplified. Every pipeline stage is
//! timed individually; deadline supervision itself is left to the caller,
//! which runs each invocation in an isolated execution context it can kill.

pub mod automaton;
pub mod options;
pub mod regex;
pub mod synthesis;

use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use automaton::{to_transition_graph, NbaSource, TranslationError, UnsupportedAutomaton};
use options::{AutomatonShape, SynthesisOptions};
use regex::simplify::simplify;
use regex::OmegaRegex;
use synthesis::{decompose, TransitionGraph};

/// An error of the synthesis procedure.
#[derive(Debug)]
pub enum SynthesisError {
    /// The imported automaton does not use exactly one acceptance set.
    Unsupported(UnsupportedAutomaton),
    /// The external translator failed to produce an automaton.
    Translation(TranslationError),
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(e) => fmt::Display::fmt(e, f),
            Self::Translation(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl Error for SynthesisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unsupported(e) => Some(e),
            Self::Translation(e) => Some(e),
        }
    }
}

impl From<UnsupportedAutomaton> for SynthesisError {
    fn from(e: UnsupportedAutomaton) -> Self {
        Self::Unsupported(e)
    }
}

impl From<TranslationError> for SynthesisError {
    fn from(e: TranslationError) -> Self {
        Self::Translation(e)
    }
}

/// Elapsed wall-clock times of the pipeline stages.
#[derive(Debug, Default, Clone, Copy)]
pub struct StageTimes {
    automaton: Duration,
    construction: Duration,
    simplification: Option<Duration>,
}

impl StageTimes {
    /// Returns the time spent building the transition graph.
    pub fn automaton(&self) -> Duration {
        self.automaton
    }

    /// Returns the time spent constructing the expression.
    pub fn construction(&self) -> Duration {
        self.construction
    }

    /// Returns the time spent simplifying the expression, if simplification
    /// was requested.
    pub fn simplification(&self) -> Option<Duration> {
        self.simplification
    }
}

impl fmt::Display for StageTimes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "aut time: {:.2}, regex time: {:.2}",
            self.automaton.as_secs_f32(),
            self.construction.as_secs_f32(),
        )?;
        if let Some(time) = self.simplification {
            write!(f, ", simplify time: {:.2}", time.as_secs_f32())?;
        }
        Ok(())
    }
}

/// A result of the synthesis procedure.
#[derive(Debug)]
pub struct SynthesisResult {
    /// The synthesized ω-expression.
    expr: OmegaRegex,
    /// The elapsed times of the pipeline stages.
    times: StageTimes,
}

impl SynthesisResult {
    /// Returns the synthesized ω-expression in this result.
    pub fn expr(&self) -> &OmegaRegex {
        &self.expr
    }

    /// Consumes the result and returns the synthesized ω-expression.
    pub fn into_expr(self) -> OmegaRegex {
        self.expr
    }

    /// Returns the elapsed times of the pipeline stages in this result.
    pub fn times(&self) -> StageTimes {
        self.times
    }
}

/// Synthesizes an ω-regular expression for the automaton produced by the
/// given source.
///
/// Returns the result of the synthesis procedure. This function uses the
/// default values for [`SynthesisOptions`].
///
/// # Errors
///
/// Returns an error if no requested automaton shape can be constructed, or
/// if the constructed automaton is unsupported.
pub fn synthesize<S: NbaSource>(source: &S) -> Result<SynthesisResult, SynthesisError> {
    synthesize_with(source, &SynthesisOptions::default())
}

/// Synthesizes an ω-regular expression for the automaton produced by the
/// given source, using the given synthesis options.
///
/// Returns the result of the synthesis procedure.
///
/// # Errors
///
/// Returns an error if no requested automaton shape can be constructed, or
/// if the constructed automaton is unsupported.
pub fn synthesize_with<S: NbaSource>(
    source: &S,
    options: &SynthesisOptions,
) -> Result<SynthesisResult, SynthesisError> {
    let start = Instant::now();
    let graph = build_graph(source, options.automaton_shape)?;
    let automaton = start.elapsed();
    info!(
        "Automaton imported: {} states, {} final",
        graph.num_states(),
        graph.num_final_states()
    );

    let start = Instant::now();
    let mut expr = decompose(&graph, options.regex_method);
    let construction = start.elapsed();
    debug!("Synthesized expression of size {}", expr.size());

    let simplification = if options.simplify {
        let start = Instant::now();
        expr = simplify(&expr);
        debug!("Simplified expression to size {}", expr.size());
        Some(start.elapsed())
    } else {
        None
    };

    Ok(SynthesisResult {
        expr,
        times: StageTimes {
            automaton,
            construction,
            simplification,
        },
    })
}

/// Builds the transition graph for the requested automaton shape.
fn build_graph<S: NbaSource>(
    source: &S,
    shape: AutomatonShape,
) -> Result<TransitionGraph, SynthesisError> {
    match shape {
        AutomatonShape::State => Ok(to_transition_graph(&source.state_based()?)?),
        AutomatonShape::Transition => Ok(to_transition_graph(&source.transition_based()?)?),
        AutomatonShape::TransitionToState => {
            Ok(to_transition_graph(&source.transition_to_state()?)?)
        }
        AutomatonShape::Auto => select_graph(source),
    }
}

/// Builds both candidate shapes and picks the preferred one, falling back
/// to the shape that could be constructed when the other fails.
fn select_graph<S: NbaSource>(source: &S) -> Result<TransitionGraph, SynthesisError> {
    match (source.state_based(), source.transition_based()) {
        (Err(state_error), Err(transition_error)) => {
            warn!(
                "Transition-based construction also failed: {}",
                transition_error
            );
            Err(SynthesisError::Translation(state_error))
        }
        (Ok(nba), Err(error)) => {
            warn!(
                "Transition-based construction failed ({}), using state-based automaton",
                error
            );
            Ok(to_transition_graph(&nba)?)
        }
        (Err(error), Ok(nba)) => {
            warn!(
                "State-based construction failed ({}), using transition-based automaton",
                error
            );
            Ok(to_transition_graph(&nba)?)
        }
        (Ok(state_nba), Ok(transition_nba)) => {
            let state = to_transition_graph(&state_nba)?;
            let transition = to_transition_graph(&transition_nba)?;
            Ok(select_preferred(state, transition))
        }
    }
}

fn select_preferred(state: TransitionGraph, transition: TransitionGraph) -> TransitionGraph {
    let state_finals = state.num_final_states();
    let transition_finals = transition.num_final_states();
    debug!(
        "Shape selection: state {}/{} final, transition {}/{} final",
        state_finals,
        state.num_states(),
        transition_finals,
        transition.num_states()
    );
    if state_finals > transition_finals {
        state
    } else if transition_finals > state_finals {
        transition
    } else if transition.num_states() < state.num_states() {
        transition
    } else {
        state
    }
}
