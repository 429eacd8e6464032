//! Lariat binary crate.

use std::io::{self, Write};

use clap::Parser;
use fs_err as fs;

use lariat::automaton::{parse_ba, PrecomputedAutomata};
use lariat::options::{CliOptions, SynthesisOptions, TraceLevel};
use lariat::synthesize_with;

fn main() {
    if let Err(error) = lariat_main() {
        // discard result as we cannot further propagate a write error
        let _ = write!(io::stderr(), "Error: {}", error);
        std::process::exit(1);
    }
}

/// Initialize the logging framework with the given trace level.
///
/// # Errors
///
/// Returns an error if the logging framework has already been initialized.
fn initialize_logging(level: TraceLevel) -> io::Result<()> {
    env_logger::builder()
        .filter(None, level.into())
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))
}

/// Main function that parses the options, reads the input automaton,
/// calls the synthesis procedure and writes the output.
///
/// # Errors
///
/// Returns an error if an I/O error occurred, if the automaton file is
/// malformed, or if the synthesis procedure fails.
fn lariat_main() -> io::Result<()> {
    let options = CliOptions::parse();
    initialize_logging(options.trace_level)?;

    let text = fs::read_to_string(&options.automaton_file)?;
    let nba = parse_ba(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    // the BA format carries state-based acceptance; the automatic shape
    // selection falls back to the shape that is available
    let source = PrecomputedAutomata::new().with_state_based(nba);

    let synthesis_options = SynthesisOptions::from(&options);
    let result = synthesize_with(&source, &synthesis_options)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let expr = result.expr();
    writeln!(io::stdout(), "{}", expr)?;
    writeln!(
        io::stdout(),
        "length: {}, size: {}, star height: {}",
        expr.length(),
        expr.size(),
        expr.star_height()
    )?;
    writeln!(io::stdout(), "{}", result.times())?;

    if let Some(output_file) = &options.output_file {
        let mut file = fs::File::create(output_file)?;
        writeln!(file, "{}", expr)?;
    }
    Ok(())
}
