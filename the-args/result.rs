//! Running the pipeline over an input and reading what it produced.

use std::ops::Range;

use crate::{
  arg_type::Value,
  context::{
    self,
    Diagnostic,
    DiagnosticContext,
  },
  error::TokenizeError,
  format::ErrorFormatter,
  level::ErrorLevel,
  parser::{
    ParsedLevel,
    Parser,
  },
  schema::Command,
  token::{
    Token,
    TokenKind,
  },
  tokenizer::Tokenizer,
};

/// One invoked command level.
#[derive(Debug)]
struct Level<'c> {
  command:         &'c Command,
  /// The level's slice of the global token list.
  tokens:          Range<usize>,
  char_offset:     usize,
  input_len:       usize,
  tokenize_errors: Vec<TokenizeError>,
  /// Values with defaults filled in for unused arguments.
  parsed:          ParsedLevel,
}

impl Level<'_> {
  fn error_levels(&self) -> impl Iterator<Item = ErrorLevel> + '_ {
    self
      .tokenize_errors
      .iter()
      .map(TokenizeError::level)
      .chain(self.parsed.errors.iter().map(|error| error.level()))
  }

  fn has_exit_errors(&self) -> bool {
    let exit = self.command.thresholds().exit();
    self.error_levels().any(|level| level.is_in_minimum(exit))
  }
}

/// The outcome of parsing one input against a root [`Command`].
#[derive(Debug)]
pub struct ParseResult<'c> {
  input:   String,
  tokens:  Vec<Token>,
  /// Root first, deepest last.
  levels:  Vec<Level<'c>>,
  forward: Option<String>,
}

impl<'c> ParseResult<'c> {
  pub(crate) fn new(root: &'c Command, input: &str) -> Self {
    let mut tokens = Vec::new();
    let mut levels = Vec::new();

    for level in Tokenizer::new(root, input).tokenize() {
      let mut parsed = Parser::new(level.command, &level.tokens).parse();
      for id in level.command.argument_ids() {
        if parsed.usages[id.index()] == 0 {
          parsed.values[id.index()] = level.command.argument(id).default_value();
        }
      }

      let start = tokens.len();
      tokens.extend(level.tokens);
      levels.push(Level {
        command: level.command,
        tokens: start..tokens.len(),
        char_offset: level.char_offset,
        input_len: level.input_len,
        tokenize_errors: level.errors,
        parsed,
      });
    }

    if let Some(deepest) = levels.iter().rposition(|level| level.parsed.unique_used) {
      for level in &mut levels[..deepest] {
        level.parsed.forgive_required();
      }
    }

    let forward = tokens
      .iter()
      .find(|token| token.kind == TokenKind::ForwardValue)
      .map(|token| token.content.clone());

    let result = Self {
      input: input.to_string(),
      tokens,
      levels,
      forward,
    };
    tracing::debug!(
      root = root.name(),
      levels = result.levels.len(),
      tokens = result.tokens.len(),
      failed = result.is_failed(),
      "parsed input"
    );
    result
  }

  /// Tokens of every invoked level, root first.
  pub fn tokens(&self) -> &[Token] {
    &self.tokens
  }

  pub fn input(&self) -> &str {
    &self.input
  }

  /// The invoked command chain, root first.
  pub fn invoked(&self) -> impl Iterator<Item = CommandResult<'_>> {
    self.levels.iter().map(|level| {
      CommandResult {
        command: level.command,
        parsed:  &level.parsed,
      }
    })
  }

  pub fn root(&self) -> CommandResult<'_> {
    let level = &self.levels[0];
    CommandResult {
      command: level.command,
      parsed:  &level.parsed,
    }
  }

  /// The deepest invoked command.
  pub fn last(&self) -> CommandResult<'_> {
    let level = &self.levels[self.levels.len() - 1];
    CommandResult {
      command: level.command,
      parsed:  &level.parsed,
    }
  }

  /// The text after a `--` separator, if there was one.
  pub fn forward_value(&self) -> Option<&str> {
    self.forward.as_deref()
  }

  /// Whether any level has an error at or above its exit threshold.
  pub fn is_failed(&self) -> bool {
    self.levels.iter().any(Level::has_exit_errors)
  }

  /// The codes of every failing level and of all their ancestors, OR'ed
  /// together. Zero when nothing failed.
  pub fn exit_code(&self) -> i32 {
    let mut code = 0;
    for (depth, level) in self.levels.iter().enumerate() {
      if level.has_exit_errors() {
        code = self.levels[..=depth]
          .iter()
          .fold(code, |code, level| code | level.command.error_code());
      }
    }
    code
  }

  /// Every diagnostic at or above the display threshold of the level that
  /// raised it, in input order.
  pub fn diagnostics(&self) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for level in &self.levels {
      let display = level.command.thresholds().display();
      let tokens = &self.tokens[level.tokens.clone()];

      let tokenize = level
        .tokenize_errors
        .iter()
        .map(|error| Diagnostic::from_tokenize(error, level.char_offset, level.input_len));
      let parse = level.parsed.errors.iter().map(|error| {
        Diagnostic::from_parse(error, level.command, tokens, level.tokens.start)
      });
      diagnostics.extend(
        tokenize
          .chain(parse)
          .filter(|diagnostic| diagnostic.level.is_in_minimum(display)),
      );
    }
    context::sort(&mut diagnostics);
    diagnostics
  }

  pub fn context(&self) -> DiagnosticContext<'_> {
    DiagnosticContext {
      tokens:    &self.tokens,
      root_name: self.levels[0].command.name(),
      input:     &self.input,
    }
  }

  /// Renders every diagnostic with `formatter`.
  pub fn render(&self, formatter: &dyn ErrorFormatter) -> Vec<String> {
    let cx = self.context();
    self
      .diagnostics()
      .iter()
      .map(|diagnostic| formatter.format(diagnostic, &cx))
      .collect()
  }
}

/// The resolved values of one invoked command level.
#[derive(Debug, Clone, Copy)]
pub struct CommandResult<'a> {
  command: &'a Command,
  parsed:  &'a ParsedLevel,
}

impl<'a> CommandResult<'a> {
  pub fn command(&self) -> &'a Command {
    self.command
  }

  pub fn name(&self) -> &'a str {
    self.command.name()
  }

  /// The value of the argument called `name`, or its default when it was not
  /// used. `None` for unknown names and for arguments whose values failed to
  /// convert.
  pub fn get(&self, name: &str) -> Option<&'a Value> {
    let id = self.command.argument_by_name(name)?;
    self.parsed.values[id.index()].as_ref()
  }

  pub fn usage_count(&self, name: &str) -> usize {
    self
      .command
      .argument_by_name(name)
      .map_or(0, |id| self.parsed.usages[id.index()])
  }

  pub fn was_used(&self, name: &str) -> bool {
    self.usage_count(name) > 0
  }

  /// Every argument that resolved to a value, in declaration order.
  pub fn values(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
    let (command, parsed) = (self.command, self.parsed);
    parsed
      .values
      .iter()
      .zip(command.arguments())
      .filter_map(|(value, argument)| value.as_ref().map(|value| (argument.name(), value)))
  }
}
