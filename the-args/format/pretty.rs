use std::borrow::Cow;

use the_core::{
  ansi::{
    Attribute,
    Painter,
    Style,
  },
  text,
  wrap::wrap,
};

use super::{
  ErrorFormatter,
  FormatConfig,
  highlight_style,
  level_style,
};
use crate::{
  context::{
    Diagnostic,
    DiagnosticContext,
    Origin,
  },
  error::Highlight,
  token::TokenKind,
};

/// Renders a diagnostic as a box:
///
/// ```text
///  ┌─ERROR
/// Testing --what -> [ 1 2 3 4 ] <-
///  │ Incorrect number of values for argument 'what'.
///  │ Expected from 1 to 3 values, but got 4.
///  └────────────────────────────────────────── ───── ── ─
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Pretty {
  config: FormatConfig,
}

impl Pretty {
  pub fn new(config: FormatConfig) -> Self {
    Self { config }
  }

  /// The root name followed by every token, with the highlight applied and
  /// the tokens of ancestor levels dimmed.
  fn tokens_view(
    &self,
    diagnostic: &Diagnostic,
    highlight: Highlight,
    level_offset: usize,
    cx: &DiagnosticContext<'_>,
  ) -> String {
    let painter = Painter::new(self.config.ansi);
    let mut parts: Vec<(Cow<'_, str>, Style)> =
      vec![(Cow::Borrowed(cx.root_name), Style::new().fg(TokenKind::SubCommand.color()))];
    parts.extend(cx.tokens.iter().map(|token| (token.display(), token.style())));

    if level_offset > 0 {
      for (_, style) in parts.iter_mut().take(level_offset + 1) {
        *style = style.add(Attribute::Dim);
      }
    }

    // Index 0 of the view is the root name.
    let highlight = highlight.offset(1);
    let arrow_style = highlight_style(diagnostic.level);
    let arrow = |text: &'static str| (Cow::Borrowed(text), arrow_style);

    if highlight.explicit {
      let at = highlight.start.min(parts.len());
      parts.insert(at, arrow("<-"));
    } else if !self.config.ansi {
      let after = (highlight.end + 1).min(parts.len());
      parts.insert(after, arrow("<-"));
      if !highlight.is_single() {
        parts.insert(highlight.start.min(parts.len()), arrow("->"));
      }
    } else {
      for (_, style) in parts
        .iter_mut()
        .skip(highlight.start)
        .take(highlight.end - highlight.start + 1)
      {
        *style = style.patch(arrow_style);
      }
    }

    parts
      .iter()
      .map(|(text, style)| painter.paint(text, *style))
      .collect::<Vec<_>>()
      .join(" ")
  }

  /// The root name followed by the raw input, with the highlighted characters
  /// marked.
  fn input_view(
    &self,
    diagnostic: &Diagnostic,
    highlight: Highlight,
    cx: &DiagnosticContext<'_>,
  ) -> String {
    let painter = Painter::new(self.config.ansi);
    let style = highlight_style(diagnostic.level);
    let chars = format!("{} {}", cx.root_name, cx.input)
      .chars()
      .collect::<Vec<_>>();
    let highlight = highlight.offset(cx.root_name.chars().count() + 1);

    let collect = |range: &[char]| range.iter().collect::<String>();
    if highlight.start >= chars.len() {
      return format!("{}{}", collect(&chars), painter.paint("<-", style));
    }

    let end = highlight.end.min(chars.len() - 1);
    let before = collect(&chars[..highlight.start]);
    let marked = collect(&chars[highlight.start..=end]);
    let after = collect(&chars[end + 1..]);

    if highlight.explicit || !self.config.ansi {
      format!(
        "{before}{}{}{}{after}",
        painter.paint("->", style),
        painter.paint(&marked, style),
        painter.paint("<-", style),
      )
    } else {
      format!("{before}{}{after}", painter.paint(&marked, style))
    }
  }
}

impl ErrorFormatter for Pretty {
  fn format(&self, diagnostic: &Diagnostic, cx: &DiagnosticContext<'_>) -> String {
    let painter = Painter::new(self.config.ansi);
    let style = level_style(diagnostic.level);
    let content = wrap(&diagnostic.content, self.config.line_width);

    let mut out = painter
      .paint(&format!(" ┌─{}", diagnostic.level), style)
      .into_owned();

    let view = diagnostic.highlight.map(|highlight| {
      match diagnostic.origin {
        Origin::Tokens { level_offset } => {
          self.tokens_view(diagnostic, highlight, level_offset, cx)
        },
        Origin::Input => self.input_view(diagnostic, highlight, cx),
      }
    });
    if let Some(view) = view {
      out.push('\n');
      out.push_str(&view);
    }

    let bar = painter.paint("\n │ ", style);
    for line in content.split('\n') {
      out.push_str(&bar);
      out.push_str(line);
    }

    let rule = "─".repeat(text::longest_line_width(&content).saturating_sub(5));
    out.push_str(&painter.paint(&format!("\n └{rule} ───── ── ─"), style));
    out
  }
}
