//! Splits the input of a command level into tokens.
//!
//! The tokenizer walks the input once, character by character. Words are
//! classified against the schema of the level when they are flushed, so a
//! word naming a subcommand hands the rest of the input to a tokenizer for
//! that subcommand and ends the current level.

use std::mem;

use crate::{
  error::TokenizeError,
  schema::Command,
  token::{
    Token,
    TokenKind,
  },
};

/// The tokens of one command level.
#[derive(Debug)]
pub struct TokenizedLevel<'c> {
  pub command:     &'c Command,
  pub tokens:      Vec<Token>,
  pub errors:      Vec<TokenizeError>,
  /// Position of the level's input within the whole input, in characters.
  pub char_offset: usize,
  /// Character count of the level's input.
  pub input_len:   usize,
}

#[derive(Debug)]
pub struct Tokenizer<'c> {
  command:     &'c Command,
  chars:       Vec<char>,
  char_offset: usize,
  pos:         usize,
  buffer:      String,
  tuple_open:  bool,
  string_open: Option<char>,
  stopped:     bool,
  tokens:      Vec<Token>,
  errors:      Vec<TokenizeError>,
  /// Levels of the subcommand chain started from this level.
  nested:      Vec<TokenizedLevel<'c>>,
}

impl<'c> Tokenizer<'c> {
  pub fn new(command: &'c Command, input: &str) -> Self {
    Self::nested(command, input, 0)
  }

  fn nested(command: &'c Command, input: &str, char_offset: usize) -> Self {
    Self {
      command,
      chars: input.chars().collect(),
      char_offset,
      pos: 0,
      buffer: String::new(),
      tuple_open: false,
      string_open: None,
      stopped: false,
      tokens: Vec::new(),
      errors: Vec::new(),
      nested: Vec::new(),
    }
  }

  /// Tokenizes the whole input. The first level returned belongs to the
  /// command this tokenizer was created for, followed by one level per
  /// subcommand found, outermost first.
  pub fn tokenize(mut self) -> Vec<TokenizedLevel<'c>> {
    let tuple_chars = self.command.tuple_chars();
    let mut string_start = 0;
    let mut tuple_start = 0;

    while self.pos < self.chars.len() && self.nested.is_empty() {
      let ch = self.chars[self.pos];

      if ch == '\\' {
        match self.chars.get(self.pos + 1) {
          Some(&escaped) => {
            self.buffer.push(escaped);
            self.pos += 1;
          },
          None => self.buffer.push(ch),
        }
      } else if ch == '"' || ch == '\'' {
        if self.string_open == Some(ch) {
          if !self.followed_by_space() {
            self.error(TokenizeError::SpaceRequired { index: self.pos });
          }
          let value = mem::take(&mut self.buffer);
          self.push(TokenKind::ArgumentValue, value);
          self.string_open = None;
        } else if self.string_open.is_some() {
          self.buffer.push(ch);
        } else if !self.buffer.is_empty() {
          self.error(TokenizeError::SpaceRequired {
            index: self.pos - 1,
          });
        } else {
          self.string_open = Some(ch);
          string_start = self.pos;
        }
      } else if self.string_open.is_some() {
        self.buffer.push(ch);
      } else if ch == tuple_chars.open() {
        if self.tuple_open {
          self.error(TokenizeError::TupleAlreadyOpen { index: self.pos });
          self.stopped = true;
          break;
        }
        if !self.buffer.is_empty() {
          self.flush();
          if !self.nested.is_empty() {
            break;
          }
        }
        self.push(TokenKind::TupleStart, ch.to_string());
        self.tuple_open = true;
        tuple_start = self.pos;
      } else if ch == tuple_chars.close() {
        if !self.tuple_open {
          self.error(TokenizeError::UnexpectedTupleClose { index: self.pos });
          self.stopped = true;
          break;
        }
        if !self.followed_by_space() {
          self.error(TokenizeError::SpaceRequired { index: self.pos });
        }
        if !self.buffer.is_empty() {
          let value = mem::take(&mut self.buffer);
          self.push(TokenKind::ArgumentValue, value);
        }
        self.push(TokenKind::TupleEnd, ch.to_string());
        self.tuple_open = false;
      } else if ch == '-' && self.buffer.is_empty() && self.starts_forward() {
        let rest = self.chars[self.pos + 3..].iter().collect::<String>();
        self.push(TokenKind::ForwardValue, rest);
        self.pos = self.chars.len();
        break;
      } else if (ch.is_whitespace() && !self.buffer.is_empty())
        || (ch == '=' && !self.tuple_open && self.command.is_argument_specifier(&self.buffer))
      {
        self.flush();
      } else if !ch.is_whitespace() {
        self.buffer.push(ch);
      }

      self.pos += 1;
    }

    if !self.stopped && self.nested.is_empty() {
      if self.tuple_open {
        self.error(TokenizeError::TupleNotClosed { index: tuple_start });
      }
      if self.string_open.is_some() {
        self.error(TokenizeError::StringNotClosed {
          index: string_start,
        });
      }
    }
    if !self.buffer.is_empty() {
      self.flush();
    }

    tracing::debug!(
      command = self.command.name(),
      tokens = self.tokens.len(),
      errors = self.errors.len(),
      "tokenized command level"
    );

    let level = TokenizedLevel {
      command:     self.command,
      tokens:      self.tokens,
      errors:      self.errors,
      char_offset: self.char_offset,
      input_len:   self.chars.len(),
    };
    let mut levels = vec![level];
    levels.append(&mut self.nested);
    levels
  }

  /// Whether the character after the current one is whitespace or the input
  /// ends here.
  fn followed_by_space(&self) -> bool {
    self
      .chars
      .get(self.pos + 1)
      .is_none_or(|ch| ch.is_whitespace())
  }

  /// Whether a `-- ` separator starts at the current character.
  fn starts_forward(&self) -> bool {
    self.chars.get(self.pos + 1) == Some(&'-')
      && self
        .chars
        .get(self.pos + 2)
        .is_some_and(|ch| ch.is_whitespace())
  }

  fn classify(&self, word: &str) -> TokenKind {
    if self.tuple_open || self.string_open.is_some() {
      TokenKind::ArgumentValue
    } else if word.chars().count() > 1 && self.command.find_argument(word).is_some() {
      TokenKind::ArgumentName
    } else if self.command.is_name_list(word) {
      TokenKind::ArgumentNameList
    } else if self.command.find_command(word).is_some() {
      TokenKind::SubCommand
    } else {
      TokenKind::ArgumentValue
    }
  }

  /// Pushes the buffered word as a classified token. A subcommand name
  /// tokenizes the rest of the input as that subcommand, unless the level
  /// stopped, in which case it stays a plain value.
  fn flush(&mut self) {
    let word = mem::take(&mut self.buffer);
    let kind = match self.classify(&word) {
      TokenKind::SubCommand if self.stopped => TokenKind::ArgumentValue,
      kind => kind,
    };
    let subcommand = match kind {
      TokenKind::SubCommand => self.command.find_command(&word),
      _ => None,
    };
    self.push(kind, word);

    if let Some(command) = subcommand {
      let rest = self.chars[self.pos..].iter().collect::<String>();
      self.nested = Tokenizer::nested(command, &rest, self.char_offset + self.pos).tokenize();
    }
  }

  fn push(&mut self, kind: TokenKind, content: String) {
    tracing::trace!(?kind, %content, "token");
    self.tokens.push(Token::new(kind, content));
  }

  fn error(&mut self, error: TokenizeError) {
    tracing::trace!(%error, index = error.index(), "tokenize error");
    self.errors.push(error);
  }
}
