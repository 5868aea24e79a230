use std::{
  ffi::OsString,
  path::PathBuf,
};

use clap::{
  ArgAction,
  Parser,
};
use crossterm::tty::IsTty;
use eyre::Result;
use the_args::{
  format::{
    ErrorFormatter,
    FormatConfig,
    Pretty,
    Simple,
  },
  join_args,
};

/// Narrowest wrap width that still leaves room for the diagnostic frame.
const MIN_WIDTH: usize = 10;

#[derive(Clone, Debug)]
pub struct CliOptions {
  pub schema:    PathBuf,
  pub simple:    bool,
  pub format:    FormatConfig,
  pub verbosity: u8,
  pub log_file:  Option<PathBuf>,
  /// The words to parse, joined back into one input string.
  pub input:     String,
}

impl CliOptions {
  pub fn parse() -> Result<Self> {
    let raw = RawCli::parse();
    raw.try_into()
  }

  pub fn formatter(&self) -> Box<dyn ErrorFormatter> {
    if self.simple {
      Box::new(Simple::new(self.format))
    } else {
      Box::new(Pretty::new(self.format))
    }
  }
}

#[derive(Parser, Debug)]
#[command(
  name = "the-args",
  about = "Parse command line input against a schema and report what it resolved to",
  long_about = None,
  version
)]
struct RawCli {
  /// Schema file describing the command tree (TOML)
  #[arg(short = 's', long = "schema", value_name = "FILE")]
  schema: PathBuf,

  /// Print one line per diagnostic
  #[arg(long = "simple")]
  simple: bool,

  /// Never emit ANSI escape sequences
  #[arg(long = "no-ansi")]
  no_ansi: bool,

  /// Wrap diagnostic messages at this column (0 disables wrapping)
  #[arg(long = "width", value_name = "COLUMNS", default_value_t = FormatConfig::DEFAULT_LINE_WIDTH)]
  width: usize,

  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  verbosity: u8,

  /// Save logs to a specific file
  #[arg(long = "log", value_name = "FILE")]
  log_file: Option<PathBuf>,

  /// Input to parse; put it after `--` when it starts with a dash
  #[arg(value_name = "INPUT", trailing_var_arg = true, allow_hyphen_values = true)]
  inputs: Vec<String>,
}

impl TryFrom<RawCli> for CliOptions {
  type Error = eyre::Report;

  fn try_from(raw: RawCli) -> Result<Self> {
    if raw.width != 0 && raw.width < MIN_WIDTH {
      return Err(eyre::eyre!(
        "width must be 0 or at least {MIN_WIDTH}, got {}",
        raw.width
      ));
    }

    let ansi = use_ansi(
      raw.no_ansi,
      std::env::var_os("NO_COLOR"),
      std::io::stderr().is_tty(),
    );

    Ok(Self {
      schema: raw.schema,
      simple: raw.simple,
      format: FormatConfig {
        ansi,
        line_width: raw.width,
      },
      verbosity: raw.verbosity,
      log_file: raw.log_file,
      input: join_args(&raw.inputs),
    })
  }
}

/// Diagnostics go to stderr, so that is the stream whose terminal matters.
fn use_ansi(no_ansi: bool, no_color: Option<OsString>, is_tty: bool) -> bool {
  let no_color = no_color.is_some_and(|value| !value.is_empty());
  !no_ansi && !no_color && is_tty
}
