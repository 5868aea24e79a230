//! Diagnostics positioned on the whole input.
//!
//! Errors are raised with positions local to their command level. A
//! [`Diagnostic`] is the rendered message of one error with its highlight
//! translated to the global token list (or the whole input string, for
//! tokenize errors), which is what formatters work with.

use crate::{
  error::{
    Highlight,
    ParseError,
    TokenizeError,
  },
  level::ErrorLevel,
  schema::Command,
  token::Token,
};

/// What the highlight of a [`Diagnostic`] indexes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
  /// Characters of the whole input.
  Input,
  /// The global token list. `level_offset` is the index of the first token of
  /// the command level that raised the error.
  Tokens { level_offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
  pub level:     ErrorLevel,
  pub content:   String,
  pub highlight: Option<Highlight>,
  pub origin:    Origin,
}

impl Diagnostic {
  /// `char_offset` and `input_len` locate the input of the level that raised
  /// the error within the whole input.
  pub fn from_tokenize(error: &TokenizeError, char_offset: usize, input_len: usize) -> Self {
    let message = error.handle(input_len);
    Self {
      level:     error.level(),
      content:   message.content,
      highlight: message.highlight.map(|highlight| highlight.offset(char_offset)),
      origin:    Origin::Input,
    }
  }

  /// `tokens` is the slice of the level that raised the error, starting at
  /// `token_offset` in the global token list.
  pub fn from_parse(
    error: &ParseError,
    command: &Command,
    tokens: &[Token],
    token_offset: usize,
  ) -> Self {
    let message = error.handle(command, tokens);
    Self {
      level:     error.level(),
      content:   message.content,
      highlight: message.highlight.map(|highlight| highlight.offset(token_offset)),
      origin:    Origin::Tokens {
        level_offset: token_offset,
      },
    }
  }

  /// Tokenize errors come first, in input order, followed by parse errors in
  /// token order.
  fn sort_key(&self) -> (bool, usize) {
    let position = self.highlight.map_or(0, |highlight| highlight.start);
    (matches!(self.origin, Origin::Tokens { .. }), position)
  }
}

/// Orders diagnostics the way the input reads. Diagnostics at the same
/// position keep the order they were raised in.
pub fn sort(diagnostics: &mut [Diagnostic]) {
  diagnostics.sort_by_key(Diagnostic::sort_key);
}

/// Everything a formatter needs besides the diagnostic itself.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticContext<'a> {
  /// Tokens of every parsed level, root first.
  pub tokens:    &'a [Token],
  pub root_name: &'a str,
  /// The whole input string.
  pub input:     &'a str,
}
