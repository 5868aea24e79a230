//! The declared command tree the tokenizer and parser consult.
//!
//! A schema is assembled with [`CommandBuilder`] and [`GroupBuilder`] and is
//! read-only once [`CommandBuilder::build`] returns. Building resolves every
//! inherited setting (tuple delimiters, thresholds) and validates names, so a
//! [`Command`] can be shared by any number of concurrent parses.

mod argument;
mod command;
mod group;

use std::{
  fmt,
  str::FromStr,
};

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

pub use self::{
  argument::Argument,
  command::{
    Command,
    CommandBuilder,
  },
  group::{
    Group,
    GroupBuilder,
  },
};
use crate::level::ErrorLevel;

/// Index of an [`Argument`] within its [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArgId(pub(crate) usize);

impl ArgId {
  pub fn index(self) -> usize {
    self.0
  }
}

/// Index of a [`Group`] within its [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub(crate) usize);

impl GroupId {
  pub fn index(self) -> usize {
    self.0
  }
}

/// The character pair that delimits a tuple of values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TupleChars {
  #[default]
  SquareBrackets,
  Parenthesis,
  Braces,
  AngleBrackets,
}

impl TupleChars {
  pub const ALL: [Self; 4] = [
    Self::SquareBrackets,
    Self::Parenthesis,
    Self::Braces,
    Self::AngleBrackets,
  ];

  pub const fn open(self) -> char {
    match self {
      Self::SquareBrackets => '[',
      Self::Parenthesis => '(',
      Self::Braces => '{',
      Self::AngleBrackets => '<',
    }
  }

  pub const fn close(self) -> char {
    match self {
      Self::SquareBrackets => ']',
      Self::Parenthesis => ')',
      Self::Braces => '}',
      Self::AngleBrackets => '>',
    }
  }

  pub const fn as_str(self) -> &'static str {
    match self {
      Self::SquareBrackets => "square_brackets",
      Self::Parenthesis => "parenthesis",
      Self::Braces => "braces",
      Self::AngleBrackets => "angle_brackets",
    }
  }
}

impl fmt::Display for TupleChars {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}", self.open(), self.close())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tuple delimiters '{0}', expected one of: [], (), {{}}, <>")]
pub struct UnknownTupleChars(pub String);

impl FromStr for TupleChars {
  type Err = UnknownTupleChars;

  /// Accepts either the delimiter pair (`"()"`) or the snake case name
  /// (`"parenthesis"`).
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|chars| chars.to_string() == s || chars.as_str() == s)
      .ok_or_else(|| UnknownTupleChars(s.to_string()))
  }
}

/// A schema that cannot be built. These are mistakes of the program declaring
/// the schema, never of the user typing the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
  #[error("invalid name '{name}': {reason}")]
  InvalidName { name: String, reason: &'static str },
  #[error("argument '{name}' is defined more than once in command '{command}'")]
  DuplicateArgument { command: String, name: String },
  #[error("group '{name}' is defined more than once in command '{command}'")]
  DuplicateGroup { command: String, name: String },
  #[error("subcommand '{name}' is defined more than once in command '{command}'")]
  DuplicateCommand { command: String, name: String },
  #[error("positional argument '{name}' must accept at least one value")]
  PositionalWithoutValues { name: String },
  #[error(
    "exit threshold {exit} is looser than display threshold {display}; every failing \
     diagnostic must be displayed"
  )]
  InconsistentThresholds {
    exit:    ErrorLevel,
    display: ErrorLevel,
  },
}

pub(crate) fn check_name(name: &str) -> Result<(), SchemaError> {
  let reason = if name.is_empty() {
    "names cannot be empty"
  } else if name.chars().any(char::is_whitespace) {
    "names cannot contain whitespace"
  } else if name.contains('=') {
    "names cannot contain '='"
  } else {
    return Ok(());
  };
  Err(SchemaError::InvalidName {
    name: name.to_string(),
    reason,
  })
}
