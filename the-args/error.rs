//! Diagnostics raised while tokenizing and parsing.
//!
//! Errors are plain data carrying the positions they refer to. Positions are
//! local to the command level that raised them: character indices into the
//! level's input for [`TokenizeError`], token indices into the level's slice
//! for [`ParseError`]. [`crate::context`] translates them into positions of the
//! whole input before formatting.

use the_core::text::plural;
use thiserror::Error;

use crate::{
  level::ErrorLevel,
  schema::{
    ArgId,
    Command,
    GroupId,
  },
  token::Token,
};

/// A range of tokens (or characters) a diagnostic points at, inclusive on
/// both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
  pub start:    usize,
  pub end:      usize,
  /// Point between elements with an arrow instead of marking an element.
  /// `start` may then equal the element count.
  pub explicit: bool,
}

impl Highlight {
  pub fn at(index: usize) -> Self {
    Self::span(index, index)
  }

  pub fn span(start: usize, end: usize) -> Self {
    Self {
      start,
      end: end.max(start),
      explicit: false,
    }
  }

  /// An arrow right before the element at `index`.
  pub fn point(index: usize) -> Self {
    Self {
      start:    index,
      end:      index,
      explicit: true,
    }
  }

  pub fn is_single(&self) -> bool {
    self.start == self.end
  }

  pub(crate) fn offset(self, by: usize) -> Self {
    Self {
      start: self.start + by,
      end: self.end + by,
      ..self
    }
  }

  /// Keeps the highlight inside `count` elements. Explicit points may sit
  /// right past the last one.
  pub(crate) fn clamp(self, count: usize) -> Self {
    let last = if self.explicit { count } else { count.saturating_sub(1) };
    Self {
      start: self.start.min(last),
      end: self.end.min(last),
      ..self
    }
  }
}

/// The rendered text of an error and what to highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
  pub content:   String,
  pub highlight: Option<Highlight>,
}

impl Message {
  fn new(content: impl Into<String>, highlight: Highlight) -> Self {
    Self {
      content:   content.into(),
      highlight: Some(highlight),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenizeError {
  #[error("Tuple already open.")]
  TupleAlreadyOpen { index: usize },
  /// `index` is the tuple start character.
  #[error("Tuple not closed.")]
  TupleNotClosed { index: usize },
  #[error("Unexpected tuple close.")]
  UnexpectedTupleClose { index: usize },
  /// `index` is the opening quote.
  #[error("String not closed.")]
  StringNotClosed { index: usize },
  #[error("A space is required between these characters.")]
  SpaceRequired { index: usize },
}

impl TokenizeError {
  pub fn index(&self) -> usize {
    match *self {
      Self::TupleAlreadyOpen { index }
      | Self::TupleNotClosed { index }
      | Self::UnexpectedTupleClose { index }
      | Self::StringNotClosed { index }
      | Self::SpaceRequired { index } => index,
    }
  }

  pub fn level(&self) -> ErrorLevel {
    ErrorLevel::Error
  }

  /// `input_len` is the character count of the level's input.
  pub fn handle(&self, input_len: usize) -> Message {
    let index = self.index();
    let highlight = match self {
      Self::TupleAlreadyOpen { .. } | Self::UnexpectedTupleClose { .. } => Highlight::at(index),
      Self::TupleNotClosed { .. } | Self::StringNotClosed { .. } => {
        Highlight::span(index, input_len.saturating_sub(1))
      },
      Self::SpaceRequired { .. } => Highlight::span(index, index + 1),
    };
    Message::new(self.to_string(), highlight)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
  /// `index` is the first collected value, the tuple start, the name list
  /// carrying a packed value, or the position where values were expected
  /// when none were received.
  IncorrectValueNumber {
    argument:     ArgId,
    index:        usize,
    received:     usize,
    in_name_list: bool,
    in_tuple:     bool,
  },
  IncorrectUsagesCount {
    argument: ArgId,
    start:    usize,
    end:      usize,
    usages:   usize,
  },
  RequiredArgumentNotUsed {
    argument: ArgId,
  },
  UnmatchedToken {
    index: usize,
  },
  /// A character of a name list that names no argument. `argument` is the
  /// flag before it and `rest` the remainder of the list.
  UnmatchedInArgNameList {
    argument: ArgId,
    index:    usize,
    rest:     String,
  },
  MultipleArgsInRestrictedGroupUsed {
    group: GroupId,
    start: usize,
    end:   usize,
  },
  UniqueArgumentUsed {
    argument: ArgId,
    start:    usize,
    end:      usize,
  },
  SimilarArgument {
    argument: ArgId,
    index:    usize,
  },
  /// Raised by an argument type while converting values.
  Custom {
    index:   usize,
    len:     usize,
    message: String,
    level:   ErrorLevel,
  },
}

impl ParseError {
  pub fn level(&self) -> ErrorLevel {
    match self {
      Self::UnmatchedToken { .. }
      | Self::UnmatchedInArgNameList { .. }
      | Self::SimilarArgument { .. } => ErrorLevel::Warning,
      Self::Custom { level, .. } => *level,
      _ => ErrorLevel::Error,
    }
  }

  pub fn argument(&self) -> Option<ArgId> {
    match self {
      Self::IncorrectValueNumber { argument, .. }
      | Self::IncorrectUsagesCount { argument, .. }
      | Self::RequiredArgumentNotUsed { argument }
      | Self::UnmatchedInArgNameList { argument, .. }
      | Self::UniqueArgumentUsed { argument, .. }
      | Self::SimilarArgument { argument, .. } => Some(*argument),
      _ => None,
    }
  }

  /// Whether `other` becomes redundant when reported together with `self`.
  pub fn supersedes(&self, other: &ParseError) -> bool {
    match (self, other) {
      (
        Self::IncorrectValueNumber { argument, .. },
        Self::RequiredArgumentNotUsed { argument: other },
      ) => argument == other,
      (Self::SimilarArgument { index, .. }, Self::UnmatchedToken { index: other }) => {
        index == other
      },
      _ => false,
    }
  }

  /// Renders the message. `command` is the level that raised the error and
  /// `tokens` its token slice.
  pub fn handle(&self, command: &Command, tokens: &[Token]) -> Message {
    let token_content = |index: usize| tokens.get(index).map_or("", |token| token.content.as_str());
    let message = match self {
      Self::IncorrectValueNumber {
        argument,
        index,
        received,
        in_name_list,
        in_tuple,
      } => {
        let argument = command.argument(*argument);
        let highlight = if *in_name_list {
          Highlight::at(*index)
        } else if *in_tuple {
          Highlight::span(*index, index + received + 1)
        } else if *received == 0 {
          Highlight::point(*index)
        } else {
          Highlight::span(*index, index + received - 1)
        };
        Message::new(
          format!(
            "Incorrect number of values for argument '{}'.\nExpected {}, but got {received}.",
            argument.name(),
            argument.value_count().message("value"),
          ),
          highlight,
        )
      },
      Self::IncorrectUsagesCount {
        argument,
        start,
        end,
        usages,
      } => {
        let argument = command.argument(*argument);
        Message::new(
          format!(
            "Argument '{}' was used an incorrect amount of times.\nExpected {}, but was used {}.",
            argument.name(),
            argument.usage_count().message("usage"),
            plural("time", *usages),
          ),
          Highlight::span(*start, *end),
        )
      },
      Self::RequiredArgumentNotUsed { argument } => {
        let name = command.argument(*argument).name();
        let content = if command.is_root() {
          format!("Required argument '{name}' not used.")
        } else {
          format!(
            "Required argument '{name}' for command '{}' not used.",
            command.name()
          )
        };
        Message::new(content, Highlight::point(0))
      },
      Self::UnmatchedToken { index } => {
        Message::new(
          format!(
            "Token '{}' does not correspond with a valid argument, argument list, value, or \
             command.",
            token_content(*index)
          ),
          Highlight::at(*index),
        )
      },
      Self::UnmatchedInArgNameList {
        argument,
        index,
        rest,
      } => {
        Message::new(
          format!(
            "Argument '{}' does not take any values, but got '{rest}'.",
            command.argument(*argument).name()
          ),
          Highlight::at(*index),
        )
      },
      Self::MultipleArgsInRestrictedGroupUsed { group, start, end } => {
        Message::new(
          format!(
            "Multiple arguments in restricted group '{}' used.",
            command.group(*group).name()
          ),
          Highlight::span(*start, *end),
        )
      },
      Self::UniqueArgumentUsed {
        argument,
        start,
        end,
      } => {
        Message::new(
          format!(
            "Argument '{}' cannot be used together with other arguments.",
            command.argument(*argument).name()
          ),
          Highlight::span(*start, *end),
        )
      },
      Self::SimilarArgument { argument, index } => {
        Message::new(
          format!(
            "Found argument with name given, but with a different prefix ({}).",
            command.argument(*argument).prefix()
          ),
          Highlight::at(*index),
        )
      },
      Self::Custom {
        index,
        len,
        message,
        ..
      } => Message::new(message.clone(), Highlight::span(*index, index + len)),
    };

    Message {
      highlight: message.highlight.map(|highlight| highlight.clamp(tokens.len())),
      ..message
    }
  }
}

/// Drops every error some other error of the same level supersedes.
pub(crate) fn remove_superseded(errors: &mut Vec<ParseError>) {
  let keep = errors
    .iter()
    .map(|error| !errors.iter().any(|other| other.supersedes(error)))
    .collect::<Vec<_>>();
  let mut keep = keep.into_iter();
  errors.retain(|_| keep.next().unwrap_or(true));
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    arg_type::{
      Action,
      Integer,
    },
    schema::Argument,
    token::TokenKind,
  };

  fn command() -> Command {
    Command::builder("Testing")
      .argument(Argument::new("what", Integer).required())
      .argument(Argument::new("flag", Action).with_prefix('+'))
      .subcommand(Command::builder("sub").argument(Argument::new("number", Integer).required()))
      .build()
      .unwrap()
  }

  #[test]
  fn tokenize_highlights() {
    assert_eq!(
      TokenizeError::TupleNotClosed { index: 3 }.handle(10).highlight,
      Some(Highlight::span(3, 9))
    );
    assert_eq!(
      TokenizeError::SpaceRequired { index: 4 }.handle(10).highlight,
      Some(Highlight::span(4, 5))
    );
    assert_eq!(
      TokenizeError::UnexpectedTupleClose { index: 2 }.handle(3).content,
      "Unexpected tuple close."
    );
  }

  #[test]
  fn value_number_highlights() {
    let command = command();
    let what = command.argument_by_name("what").unwrap();
    let tokens = [
      Token::new(TokenKind::ArgumentName, "--what"),
      Token::new(TokenKind::TupleStart, "["),
      Token::new(TokenKind::TupleEnd, "]"),
    ];
    let error = |index, received, in_tuple| {
      ParseError::IncorrectValueNumber {
        argument: what,
        index,
        received,
        in_name_list: false,
        in_tuple,
      }
    };

    let message = error(1, 0, true).handle(&command, &tokens);
    assert_eq!(message.highlight, Some(Highlight::span(1, 2)));
    assert_eq!(
      message.content,
      "Incorrect number of values for argument 'what'.\nExpected 1 value, but got 0."
    );
    assert_eq!(
      error(1, 0, false).handle(&command, &tokens[..1]).highlight,
      Some(Highlight::point(1))
    );
  }

  #[test]
  fn required_messages() {
    let command = command();
    let what = command.argument_by_name("what").unwrap();
    let message = ParseError::RequiredArgumentNotUsed { argument: what }.handle(&command, &[]);
    assert_eq!(message.content, "Required argument 'what' not used.");
    assert_eq!(message.highlight, Some(Highlight::point(0)));

    let sub = &command.commands()[0];
    let number = sub.argument_by_name("number").unwrap();
    let message = ParseError::RequiredArgumentNotUsed { argument: number }.handle(sub, &[]);
    assert_eq!(
      message.content,
      "Required argument 'number' for command 'sub' not used."
    );
  }

  #[test]
  fn similar_supersedes_unmatched() {
    let command = command();
    let flag = command.argument_by_name("flag").unwrap();
    let mut errors = vec![
      ParseError::UnmatchedToken { index: 0 },
      ParseError::SimilarArgument {
        argument: flag,
        index:    0,
      },
      ParseError::UnmatchedToken { index: 1 },
    ];
    remove_superseded(&mut errors);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[1], ParseError::UnmatchedToken { index: 1 });

    let tokens = [Token::new(TokenKind::ArgumentValue, "--flag")];
    assert_eq!(
      errors[0].handle(&command, &tokens).content,
      "Found argument with name given, but with a different prefix (+)."
    );
  }

  #[test]
  fn value_number_supersedes_required() {
    let what = ArgId(0);
    let mut errors = vec![
      ParseError::RequiredArgumentNotUsed { argument: what },
      ParseError::IncorrectValueNumber {
        argument:     what,
        index:        1,
        received:     0,
        in_name_list: false,
        in_tuple:     false,
      },
    ];
    remove_superseded(&mut errors);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].level(), ErrorLevel::Error);
  }
}
