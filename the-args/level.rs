//! Diagnostic severities and the thresholds that gate them.

use std::{
  fmt,
  str::FromStr,
};

use serde::{
  Deserialize,
  Serialize,
};
use the_core::ansi::Color;
use thiserror::Error;

use crate::schema::SchemaError;

/// Severity of a diagnostic, ordered from least to most severe.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorLevel {
  Debug,
  Info,
  Warning,
  Error,
}

impl ErrorLevel {
  pub const ALL: [Self; 4] = [Self::Error, Self::Warning, Self::Info, Self::Debug];

  /// Whether `self` is at least as severe as `minimum`.
  pub fn is_in_minimum(self, minimum: ErrorLevel) -> bool {
    self >= minimum
  }

  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Error => "ERROR",
      Self::Warning => "WARNING",
      Self::Info => "INFO",
      Self::Debug => "DEBUG",
    }
  }

  pub const fn color(self) -> Color {
    match self {
      Self::Error => Color::Red,
      Self::Warning => Color::Yellow,
      Self::Info => Color::Blue,
      Self::Debug => Color::Green,
    }
  }
}

impl fmt::Display for ErrorLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error level '{0}', expected one of: error, warning, info, debug")]
pub struct UnknownErrorLevel(pub String);

impl FromStr for ErrorLevel {
  type Err = UnknownErrorLevel;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|level| level.as_str().eq_ignore_ascii_case(s))
      .ok_or_else(|| UnknownErrorLevel(s.to_string()))
  }
}

/// Exit and display thresholds of one command level.
///
/// Unset thresholds are inherited from the parent command when the schema is
/// built and fall back to [`Thresholds::DEFAULT_EXIT`] and
/// [`Thresholds::DEFAULT_DISPLAY`] when read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thresholds {
  exit:    Option<ErrorLevel>,
  display: Option<ErrorLevel>,
}

impl Thresholds {
  pub const DEFAULT_EXIT: ErrorLevel = ErrorLevel::Error;
  pub const DEFAULT_DISPLAY: ErrorLevel = ErrorLevel::Info;

  /// Creates explicit thresholds. The exit threshold must imply the display
  /// threshold: every diagnostic that fails a parse must also be shown.
  pub fn new(exit: ErrorLevel, display: ErrorLevel) -> Result<Self, SchemaError> {
    Self::default().with_exit(exit)?.with_display(display)
  }

  pub fn with_exit(mut self, exit: ErrorLevel) -> Result<Self, SchemaError> {
    self.exit = Some(exit);
    self.check()?;
    Ok(self)
  }

  pub fn with_display(mut self, display: ErrorLevel) -> Result<Self, SchemaError> {
    self.display = Some(display);
    self.check()?;
    Ok(self)
  }

  pub fn exit(&self) -> ErrorLevel {
    self.exit.unwrap_or(Self::DEFAULT_EXIT)
  }

  pub fn display(&self) -> ErrorLevel {
    self.display.unwrap_or(Self::DEFAULT_DISPLAY)
  }

  /// Fills unset thresholds from `parent`.
  pub(crate) fn inherit(&self, parent: &Thresholds) -> Result<Self, SchemaError> {
    let inherited = Self {
      exit:    self.exit.or(parent.exit),
      display: self.display.or(parent.display),
    };
    inherited.check()?;
    Ok(inherited)
  }

  fn check(&self) -> Result<(), SchemaError> {
    let (exit, display) = (self.exit(), self.display());
    if exit.is_in_minimum(display) {
      Ok(())
    } else {
      Err(SchemaError::InconsistentThresholds { exit, display })
    }
  }
}
