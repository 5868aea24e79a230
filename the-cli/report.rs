use std::{
  collections::BTreeMap,
  io::Write,
};

use eyre::{
  Result,
  WrapErr,
};
use serde::Serialize;
use the_args::{
  ParseResult,
  arg_type::Value,
  format::ErrorFormatter,
};

/// What a parse resolved to, as printed on stdout.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
  pub failed:    bool,
  pub exit_code: i32,
  /// The invoked command chain, root first.
  pub commands:  Vec<CommandReport<'a>>,
  pub forward:   Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct CommandReport<'a> {
  pub name:   &'a str,
  pub values: BTreeMap<&'a str, &'a Value>,
}

impl<'a> Report<'a> {
  pub fn new(result: &'a ParseResult<'_>) -> Self {
    Self {
      failed:    result.is_failed(),
      exit_code: result.exit_code(),
      commands:  result
        .invoked()
        .map(|command| {
          CommandReport {
            name:   command.name(),
            values: command.values().collect(),
          }
        })
        .collect(),
      forward:   result.forward_value(),
    }
  }
}

/// Writes the rendered diagnostics to `diagnostics` and the JSON report to
/// `out`. Returns the exit code of the parse.
pub fn write(
  result: &ParseResult<'_>,
  formatter: &dyn ErrorFormatter,
  mut out: impl Write,
  mut diagnostics: impl Write,
) -> Result<i32> {
  for rendered in result.render(formatter) {
    writeln!(diagnostics, "{rendered}").wrap_err("failed to write diagnostics")?;
  }

  let report = Report::new(result);
  serde_json::to_writer_pretty(&mut out, &report).wrap_err("failed to write report")?;
  writeln!(out).wrap_err("failed to write report")?;
  log::debug!(
    "reported {} command level(s), exit code {}",
    report.commands.len(),
    report.exit_code
  );
  Ok(report.exit_code)
}
