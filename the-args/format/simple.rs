use the_core::ansi::Painter;

use super::{
  ErrorFormatter,
  FormatConfig,
  level_style,
};
use crate::context::{
  Diagnostic,
  DiagnosticContext,
  Origin,
};

/// Renders a diagnostic on one line, e.g.
/// `[ERROR (token 3)]: Invalid integer value: 'bar'.`
#[derive(Debug, Clone, Copy, Default)]
pub struct Simple {
  config: FormatConfig,
}

impl Simple {
  pub fn new(config: FormatConfig) -> Self {
    Self { config }
  }
}

impl ErrorFormatter for Simple {
  fn format(&self, diagnostic: &Diagnostic, _cx: &DiagnosticContext<'_>) -> String {
    let position = diagnostic.highlight.map(|highlight| {
      match diagnostic.origin {
        Origin::Input => format!(" (char {})", highlight.start),
        Origin::Tokens { .. } if highlight.explicit || highlight.is_single() => {
          format!(" (token {})", highlight.start)
        },
        Origin::Tokens { .. } => format!(" (token {} to {})", highlight.start, highlight.end),
      }
    });

    let tag = format!("[{}{}]", diagnostic.level, position.unwrap_or_default());
    let painter = Painter::new(self.config.ansi);
    format!(
      "{}: {}",
      painter.paint(&tag, level_style(diagnostic.level)),
      diagnostic.content.replace('\n', " ")
    )
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    error::Highlight,
    level::ErrorLevel,
  };

  #[track_caller]
  fn assert_format(diagnostic: Diagnostic, expected: &str) {
    let cx = DiagnosticContext {
      tokens:    &[],
      root_name: "Testing",
      input:     "",
    };
    assert_eq!(Simple::new(FormatConfig::plain()).format(&diagnostic, &cx), expected);
  }

  fn diagnostic(highlight: Option<Highlight>, origin: Origin) -> Diagnostic {
    Diagnostic {
      level: ErrorLevel::Error,
      content: "Incorrect number of values.\nExpected 1 value, but got 0.".into(),
      highlight,
      origin,
    }
  }

  #[test]
  fn positions() {
    let tokens = Origin::Tokens { level_offset: 0 };
    assert_format(
      diagnostic(Some(Highlight::at(3)), tokens),
      "[ERROR (token 3)]: Incorrect number of values. Expected 1 value, but got 0.",
    );
    assert_format(
      diagnostic(Some(Highlight::span(1, 4)), tokens),
      "[ERROR (token 1 to 4)]: Incorrect number of values. Expected 1 value, but got 0.",
    );
    assert_format(
      diagnostic(Some(Highlight::point(5)), tokens),
      "[ERROR (token 5)]: Incorrect number of values. Expected 1 value, but got 0.",
    );
    assert_format(
      diagnostic(Some(Highlight::span(2, 9)), Origin::Input),
      "[ERROR (char 2)]: Incorrect number of values. Expected 1 value, but got 0.",
    );
    assert_format(
      diagnostic(None, tokens),
      "[ERROR]: Incorrect number of values. Expected 1 value, but got 0.",
    );
  }

  #[test]
  fn paints_the_tag() {
    let cx = DiagnosticContext {
      tokens:    &[],
      root_name: "Testing",
      input:     "",
    };
    let rendered = Simple::default().format(&diagnostic(None, Origin::Input), &cx);
    assert!(rendered.starts_with('\u{1b}'));
    assert!(rendered.ends_with("Expected 1 value, but got 0."));
  }
}
