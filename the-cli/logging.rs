use std::path::Path;

use eyre::{
  Result,
  WrapErr,
};
use log::LevelFilter;

pub fn level_filter(verbosity: u8) -> LevelFilter {
  match verbosity {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

/// Routes `log` records, and the library's `tracing` events through them, to
/// `log_file` or stderr.
pub fn setup_logging(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
  let dispatch = fern::Dispatch::new()
    .level(level_filter(verbosity))
    .format(|out, message, record| {
      out.finish(format_args!(
        "[{}] {}: {}",
        record.level(),
        record.target(),
        message
      ))
    });

  let dispatch = match log_file {
    Some(path) => {
      let file = fern::log_file(path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
      dispatch.chain(file)
    },
    None => dispatch.chain(std::io::stderr()),
  };

  dispatch.apply().wrap_err("failed to install logger")?;
  Ok(())
}
