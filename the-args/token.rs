use std::borrow::Cow;

use the_core::{
  ansi::{
    Color,
    Style,
  },
  text,
};

/// The classification of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  /// A prefixed argument name, e.g. `--foo` or `-f`.
  ArgumentName,
  /// A cluster of single-character argument names after one prefix, e.g.
  /// `-abc`.
  ArgumentNameList,
  /// A bare value.
  ArgumentValue,
  TupleStart,
  TupleEnd,
  /// A word naming a subcommand of the command level that produced it.
  SubCommand,
  /// Everything after a `-- ` separator, verbatim.
  ForwardValue,
}

impl TokenKind {
  pub const fn is_tuple(self) -> bool {
    matches!(self, Self::TupleStart | Self::TupleEnd)
  }

  pub const fn color(self) -> Color {
    match self {
      Self::ArgumentName => Color::Green,
      Self::ArgumentNameList => Color::Blue,
      Self::ArgumentValue => Color::Yellow,
      Self::TupleStart | Self::TupleEnd => Color::Magenta,
      Self::SubCommand => Color::Cyan,
      Self::ForwardValue => Color::DarkGrey,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind:    TokenKind,
  /// The literal text of the token with quotes and escapes resolved.
  pub content: String,
}

impl Token {
  pub fn new(kind: TokenKind, content: impl Into<String>) -> Self {
    Self {
      kind,
      content: content.into(),
    }
  }

  /// The token as it is shown in diagnostics. Values that would not read back
  /// as a single word are quoted and forwarded values keep their separator.
  pub fn display(&self) -> Cow<'_, str> {
    match self.kind {
      TokenKind::ArgumentValue => text::quote(&self.content),
      TokenKind::ForwardValue if self.content.is_empty() => Cow::Borrowed("--"),
      TokenKind::ForwardValue => Cow::Owned(format!("-- {}", self.content)),
      _ => Cow::Borrowed(&self.content),
    }
  }

  pub fn style(&self) -> Style {
    Style::new().fg(self.kind.color())
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn display_quotes_values() {
    assert_eq!(Token::new(TokenKind::ArgumentValue, "foo").display(), "foo");
    assert_eq!(
      Token::new(TokenKind::ArgumentValue, "foo bar").display(),
      r#""foo bar""#
    );
    assert_eq!(Token::new(TokenKind::ArgumentValue, "").display(), r#""""#);
    assert_eq!(Token::new(TokenKind::ArgumentName, "--foo").display(), "--foo");
  }

  #[test]
  fn display_forward() {
    assert_eq!(Token::new(TokenKind::ForwardValue, "a b").display(), "-- a b");
    assert_eq!(Token::new(TokenKind::ForwardValue, "").display(), "--");
  }
}
