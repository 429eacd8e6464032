//! Options for the synthesis procedure.

use std::fmt;

use clap::{Args, Parser, ValueEnum};

/// Implement [`Display`](std::fmt::Display) with the information in
/// [`clap::ValueEnum`].
///
/// This ensures consistent names for parsing of the default argument.
macro_rules! value_display {
    ($t:ty) => {
        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let value = clap::ValueEnum::to_possible_value(self).unwrap();
                write!(f, "{}", value.get_name())
            }
        }
    };
}

/// The algorithm to use for constructing path expressions from the
/// transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegexMethod {
    /// Use state elimination: states between the query endpoints are
    /// successively removed while edge labels are rewritten to preserve
    /// the path language.
    #[value(name = "bmc")]
    Bmc,
    /// Use the McNaughton-Yamada closed form r(i, j, k), memoized per
    /// path query.
    #[value(name = "mny")]
    Mny,
}
impl Default for RegexMethod {
    fn default() -> Self {
        Self::Bmc
    }
}
value_display!(RegexMethod);

/// The acceptance shape of the automaton requested from the external
/// translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AutomatonShape {
    /// Acceptance pushed to states.
    #[value(name = "state")]
    State,
    /// Acceptance on individual transitions.
    #[value(name = "transition")]
    Transition,
    /// The transition-based automaton degeneralized to state-based
    /// acceptance by the translator.
    #[value(name = "transition-to-state")]
    TransitionToState,
    /// Request both the state-based and the transition-based automaton and
    /// pick the more favorable one: strictly more accepting states win,
    /// then fewer total states, then the state-based shape.
    #[value(name = "auto")]
    Auto,
}
impl Default for AutomatonShape {
    fn default() -> Self {
        Self::Auto
    }
}
value_display!(AutomatonShape);

/// The trace level / verbosity for the logging framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraceLevel {
    /// Turn logging off.
    #[value(name = "off")]
    Off,
    /// Only print errors.
    #[value(name = "error")]
    Error,
    /// Print errors and warnings.
    #[value(name = "warn")]
    Warn,
    /// Print errors, warnings and useful information.
    #[value(name = "info")]
    Info,
    /// Print errors, warnings, useful and debug information.
    #[value(name = "debug")]
    Debug,
    /// Print all information, including very verbose output.
    #[value(name = "trace")]
    Trace,
}
impl Default for TraceLevel {
    fn default() -> Self {
        Self::Error
    }
}
value_display!(TraceLevel);

impl From<TraceLevel> for log::LevelFilter {
    fn from(level: TraceLevel) -> Self {
        match level {
            TraceLevel::Off => Self::Off,
            TraceLevel::Error => Self::Error,
            TraceLevel::Warn => Self::Warn,
            TraceLevel::Info => Self::Info,
            TraceLevel::Debug => Self::Debug,
            TraceLevel::Trace => Self::Trace,
        }
    }
}

/// Options to control the synthesis procedure.
///
/// These options can be used with [`synthesize_with`](crate::synthesize_with).
///
/// # Examples
///
/// ```
/// use lariat::options::*;
/// let options = SynthesisOptions {
///     regex_method: RegexMethod::Mny,
///     simplify: true,
///     ..SynthesisOptions::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct SynthesisOptions {
    /// The algorithm for constructing path expressions.
    #[arg(
        value_enum,
        short = 'm',
        long = "method",
        value_name = "regex-method",
        default_value_t,
        help = "Algorithm for expression construction (state elimination or McNaughton-Yamada)",
        display_order = 1
    )]
    pub regex_method: RegexMethod,
    /// The automaton shape requested from the translator.
    #[arg(
        value_enum,
        short = 's',
        long = "shape",
        value_name = "shape",
        default_value_t,
        help = "Acceptance shape of the automaton requested from the translator",
        display_order = 2
    )]
    pub automaton_shape: AutomatonShape,
    /// Apply algebraic simplification to the synthesized expression as a
    /// post-processing stage.
    #[arg(
        long = "simplify",
        help = "Apply algebraic simplification to the synthesized expression",
        display_order = 3
    )]
    pub simplify: bool,
}

/// A group of options used for parsing the arguments of the command-line
/// interface.
///
/// This struct should mainly be used with [`clap`] and not instantiated
/// manually. For using this crate as library, please use
/// [`SynthesisOptions`] directly instead. This struct only includes
/// additional fields for specifying input and output options.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct CliOptions {
    /// The file from which the input automaton is read.
    #[arg(
        value_name = "automaton-file",
        help = "Read automaton in BA format from the given file"
    )]
    pub automaton_file: String,
    /// The output file where the expression should be written to.
    #[arg(
        short = 'O',
        long = "output-file",
        value_name = "file",
        help = "Write expression to the given file",
        display_order = 4
    )]
    pub output_file: Option<String>,
    /// The trace level to use for instantiating the logging framework.
    #[arg(
        value_enum,
        short = 't',
        long = "trace",
        value_name = "trace-level",
        default_value_t,
        help = "Trace level",
        display_order = 5
    )]
    pub trace_level: TraceLevel,
    /// The set of options for the synthesis process.
    #[command(flatten)]
    pub synthesis_options: SynthesisOptions,
}

impl From<&CliOptions> for SynthesisOptions {
    fn from(options: &CliOptions) -> Self {
        options.synthesis_options
    }
}
