//! Rendering diagnostics for the user.
//!
//! A formatter turns one [`Diagnostic`] into text. Two are provided: [`Pretty`]
//! draws a box with the highlighted input above the message and [`Simple`]
//! prints a single line. Callers can plug their own through
//! [`ErrorFormatter`].

pub mod pretty;
pub mod simple;

pub use pretty::Pretty;
pub use simple::Simple;
use the_core::ansi::{
  Attribute,
  Style,
};

use crate::{
  context::{
    Diagnostic,
    DiagnosticContext,
  },
  level::ErrorLevel,
};

/// Options shared by the built-in formatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
  /// Emit ANSI escape sequences. Without them highlights are drawn with
  /// `->` and `<-` arrows.
  pub ansi:       bool,
  /// Column at which message bodies are wrapped; zero disables wrapping.
  pub line_width: usize,
}

impl FormatConfig {
  pub const DEFAULT_LINE_WIDTH: usize = 110;

  /// No escape sequences, default width.
  pub fn plain() -> Self {
    Self {
      ansi: false,
      ..Self::default()
    }
  }

  pub fn with_line_width(mut self, line_width: usize) -> Self {
    self.line_width = line_width;
    self
  }
}

impl Default for FormatConfig {
  fn default() -> Self {
    Self {
      ansi:       true,
      line_width: Self::DEFAULT_LINE_WIDTH,
    }
  }
}

pub trait ErrorFormatter {
  fn format(&self, diagnostic: &Diagnostic, cx: &DiagnosticContext<'_>) -> String;
}

fn level_style(level: ErrorLevel) -> Style {
  Style::new().fg(level.color())
}

/// The style of highlighted input and arrows.
fn highlight_style(level: ErrorLevel) -> Style {
  level_style(level)
    .add(Attribute::Reverse)
    .add(Attribute::Bold)
}
