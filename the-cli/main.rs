//! Terminal front-end for the-args.
//!
//! Loads a command schema from a TOML file, parses the given input against
//! it, prints the rendered diagnostics to stderr and what the input resolved
//! to as JSON on stdout. The process exits with the combined error code of
//! the parse.

mod cli;
mod logging;
mod report;
mod schema_file;

use eyre::Result;

use crate::cli::CliOptions;

fn main() -> Result<()> {
  let options = CliOptions::parse()?;
  logging::setup_logging(options.verbosity, options.log_file.as_deref())?;

  let command = schema_file::load(&options.schema)?;
  log::info!(
    "loaded schema '{}' from {}",
    command.name(),
    options.schema.display()
  );

  let result = command.parse(&options.input);
  let code = report::write(
    &result,
    options.formatter().as_ref(),
    std::io::stdout().lock(),
    std::io::stderr().lock(),
  )?;

  if code != 0 {
    std::process::exit(code);
  }
  Ok(())
}
