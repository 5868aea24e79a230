//! Matches the tokens of one command level against its arguments.
//!
//! The parser walks the level's token slice once with a cursor. Names and name
//! lists select an argument and hand the tokens after them to value
//! extraction; bare values fill positional arguments until the first name is
//! seen. Everything else is reported and skipped. Group, uniqueness and
//! required checks run once the scan is over.

use crate::{
  arg_type::{
    TypeContext,
    Value,
  },
  error::{
    ParseError,
    remove_superseded,
  },
  schema::{
    ArgId,
    Command,
    GroupId,
  },
  token::{
    Token,
    TokenKind,
  },
};

/// What a parsed level resolved, indexed by [`ArgId`].
#[derive(Debug, Default)]
pub struct ParsedLevel {
  pub values:      Vec<Option<Value>>,
  pub usages:      Vec<usize>,
  pub errors:      Vec<ParseError>,
  /// Whether a unique argument was used. Required arguments of this level
  /// and of its ancestors are not reported then.
  pub unique_used: bool,
}

impl ParsedLevel {
  /// Drops the required-argument errors of this level.
  pub fn forgive_required(&mut self) {
    self
      .errors
      .retain(|error| !matches!(error, ParseError::RequiredArgumentNotUsed { .. }));
  }
}

/// One accepted usage of an argument and the tokens it spans.
#[derive(Debug, Clone, Copy)]
struct Usage {
  argument: ArgId,
  start:    usize,
  end:      usize,
}

/// A member of a restricted group: one of its arguments or a whole subgroup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Member {
  Argument(ArgId),
  Group(GroupId),
}

#[derive(Debug)]
pub struct Parser<'a> {
  command:          &'a Command,
  tokens:           &'a [Token],
  cursor:           usize,
  positional_index: usize,
  found_named:      bool,
  values:           Vec<Option<Value>>,
  usage_counts:     Vec<usize>,
  used:             Vec<Usage>,
  errors:           Vec<ParseError>,
}

impl<'a> Parser<'a> {
  pub fn new(command: &'a Command, tokens: &'a [Token]) -> Self {
    let count = command.arguments().len();
    Self {
      command,
      tokens,
      cursor: 0,
      positional_index: 0,
      found_named: false,
      values: vec![None; count],
      usage_counts: vec![0; count],
      used: Vec::new(),
      errors: Vec::new(),
    }
  }

  pub fn parse(mut self) -> ParsedLevel {
    let tokens = self.tokens;
    while let Some(token) = tokens.get(self.cursor) {
      let positional = if self.found_named {
        None
      } else {
        self.command.positional(self.positional_index)
      };

      match (token.kind, positional) {
        (TokenKind::ArgumentName, _) => {
          let start = self.cursor;
          self.cursor += 1;
          if let Some(id) = self.command.find_argument(&token.content) {
            self.extract(id, start);
          }
          self.found_named = true;
        },
        (TokenKind::ArgumentNameList, _) => {
          self.parse_name_list();
          self.found_named = true;
        },
        (TokenKind::ArgumentValue | TokenKind::TupleStart, Some(id)) => {
          self.extract(id, self.cursor);
          self.positional_index += 1;
        },
        (TokenKind::SubCommand | TokenKind::ForwardValue, _) => self.cursor += 1,
        _ => {
          let index = self.cursor;
          if let Some(argument) = self.command.similar_argument(&token.content) {
            self.error(ParseError::SimilarArgument { argument, index });
          }
          self.error(ParseError::UnmatchedToken { index });
          self.cursor += 1;
        },
      }
    }

    self.finish()
  }

  /// Reads the values of `id` starting at the cursor. `start` is the token
  /// that selected the argument.
  fn extract(&mut self, id: ArgId, start: usize) {
    let tokens = self.tokens;
    let count = self.command.argument(id).value_count();
    if count.is_zero() {
      self.apply(id, start, start, start, &[]);
      return;
    }

    let first = self.cursor;
    let in_tuple = tokens
      .get(first)
      .is_some_and(|token| token.kind == TokenKind::TupleStart);
    let values_start = if in_tuple { first + 1 } else { first };

    let mut end = values_start;
    while let Some(token) = tokens.get(end) {
      let done = if in_tuple {
        token.kind.is_tuple()
      } else {
        token.kind != TokenKind::ArgumentValue || end - values_start >= count.max_or_usize()
      };
      if done {
        break;
      }
      end += 1;
    }

    let received = end - values_start;
    let closed = in_tuple && tokens.get(end).is_some_and(|token| token.kind == TokenKind::TupleEnd);
    self.cursor = if closed { end + 1 } else { end };

    if !count.contains(received) {
      self.error(ParseError::IncorrectValueNumber {
        argument: id,
        index: first,
        received,
        in_name_list: false,
        in_tuple,
      });
      return;
    }

    let values = tokens[values_start..end]
      .iter()
      .map(|token| token.content.as_str())
      .collect::<Vec<_>>();
    let usage_end = self.cursor.saturating_sub(1).max(start);
    self.apply(id, start, usage_end, values_start, &values);
  }

  /// Applies every character of the name list at the cursor. A character that
  /// takes values ends the list: the remaining characters become its value, or
  /// when it is the last one, the tokens after the list are extracted.
  fn parse_name_list(&mut self) {
    let index = self.cursor;
    let chars = self.tokens[index].content.chars().skip(1).collect::<Vec<_>>();
    self.cursor += 1;

    let mut previous = None;
    for (i, &ch) in chars.iter().enumerate() {
      let Some(id) = self.command.argument_by_char(ch) else {
        let rest = chars[i..].iter().collect::<String>();
        match previous {
          Some(argument) => {
            self.error(ParseError::UnmatchedInArgNameList {
              argument,
              index,
              rest,
            });
          },
          None => self.error(ParseError::UnmatchedToken { index }),
        }
        return;
      };

      let count = self.command.argument(id).value_count();
      if count.is_zero() {
        self.apply(id, index, index, index, &[]);
      } else if i + 1 == chars.len() {
        self.extract(id, index);
        return;
      } else {
        let packed = chars[i + 1..].iter().collect::<String>();
        if count.min() > 1 {
          self.error(ParseError::IncorrectValueNumber {
            argument:     id,
            index,
            received:     1,
            in_name_list: true,
            in_tuple:     false,
          });
        } else {
          self.apply(id, index, index, index, &[packed.as_str()]);
        }
        return;
      }
      previous = Some(id);
    }
  }

  /// Counts a usage of `id` spanning `start..=end` and converts its values.
  /// `values_start` is the token of the first value.
  fn apply(&mut self, id: ArgId, start: usize, end: usize, values_start: usize, values: &[&str]) {
    let command = self.command;
    let argument = command.argument(id);
    self.usage_counts[id.0] += 1;
    let usages = self.usage_counts[id.0];
    if usages > argument.usage_count().max_or_usize() {
      self.error(ParseError::IncorrectUsagesCount {
        argument: id,
        start,
        end,
        usages,
      });
      return;
    }
    self.used.push(Usage {
      argument: id,
      start,
      end,
    });

    let mut cx = TypeContext::new(values, self.values[id.0].as_ref());
    let value = argument.arg_type().parse(&mut cx);
    let failed = cx.has_errors();
    let type_errors = cx.into_errors();

    tracing::trace!(
      argument = argument.name(),
      ty = argument.arg_type().name(),
      ?value,
      "parsed argument usage"
    );
    for error in type_errors {
      self.error(ParseError::Custom {
        index:   values_start + error.index,
        len:     error.len,
        message: error.message,
        level:   error.level,
      });
    }
    if let Some(value) = value.filter(|_| !failed) {
      self.values[id.0] = Some(value);
    }
  }

  fn finish(mut self) -> ParsedLevel {
    let command = self.command;

    for id in command.argument_ids() {
      let usages = self.usage_counts[id.0];
      if usages == 0 || usages >= command.argument(id).usage_count().min() {
        continue;
      }
      if let Some(usage) = self.used.iter().rev().find(|usage| usage.argument == id) {
        let (start, end) = (usage.start, usage.end);
        self.error(ParseError::IncorrectUsagesCount {
          argument: id,
          start,
          end,
          usages,
        });
      }
    }

    self.check_groups();
    let unique_used = self.check_unique();

    if !unique_used {
      for id in command.argument_ids() {
        let argument = command.argument(id);
        if argument.is_required() && !self.used.iter().any(|usage| usage.argument == id) {
          self.error(ParseError::RequiredArgumentNotUsed { argument: id });
        }
      }
    }

    remove_superseded(&mut self.errors);
    tracing::debug!(
      command = command.name(),
      used = self.used.len(),
      errors = self.errors.len(),
      "parsed command level"
    );

    ParsedLevel {
      values: self.values,
      usages: self.usage_counts,
      errors: self.errors,
      unique_used,
    }
  }

  /// Walks the group chain of every usage in token order. A restricted group
  /// is violated when a member other than the one leading to this usage was
  /// already used. The violating argument resolves to its default.
  fn check_groups(&mut self) {
    let command = self.command;
    let mut used_members: Vec<Option<Member>> = vec![None; command.groups().len()];
    let mut violations = Vec::new();

    for usage in &self.used {
      let mut member = Member::Argument(usage.argument);
      let mut current = command.argument(usage.argument).group();
      let mut reported = false;
      while let Some(id) = current {
        let group = command.group(id);
        match used_members[id.0] {
          Some(used) if used != member && group.is_restricted() && !reported => {
            violations.push((usage.argument, ParseError::MultipleArgsInRestrictedGroupUsed {
              group: id,
              start: usage.start,
              end:   usage.end,
            }));
            reported = true;
          },
          Some(_) => {},
          None => used_members[id.0] = Some(member),
        }
        member = Member::Group(id);
        current = group.parent();
      }
    }

    for (argument, violation) in violations {
      self.values[argument.0] = command.argument(argument).default_value();
      self.error(violation);
    }
  }

  /// Reports unique arguments used along with others. Returns whether any
  /// unique argument was used at all.
  fn check_unique(&mut self) -> bool {
    let command = self.command;
    let mut unique_used = false;
    let mut violations: Vec<ParseError> = Vec::new();

    for usage in &self.used {
      if !command.argument(usage.argument).is_unique() {
        continue;
      }
      unique_used = true;
      let reported = violations
        .iter()
        .any(|error| error.argument() == Some(usage.argument));
      let others = self.used.iter().any(|other| other.argument != usage.argument);
      if others && !reported {
        violations.push(ParseError::UniqueArgumentUsed {
          argument: usage.argument,
          start:    usage.start,
          end:      usage.end,
        });
      }
    }

    for violation in violations {
      self.error(violation);
    }
    unique_used
  }

  fn error(&mut self, error: ParseError) {
    tracing::trace!(?error, "parse error");
    self.errors.push(error);
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    arg_type::{
      Action,
      Counter,
      Integer,
      Many,
      Text,
    },
    level::ErrorLevel,
    range::Range,
    schema::{
      Argument,
      GroupBuilder,
    },
    tokenizer::Tokenizer,
  };

  fn schema() -> Command {
    Command::builder("Testing")
      .argument(Argument::new("what", Many::new(Text, Range::between(1, 3))).positional())
      .argument(Argument::new("a", Action))
      .argument(Argument::new("b", Action))
      .argument(Argument::new("c", Counter))
      .argument(Argument::new("n", Integer))
      .argument(Argument::new("pair", Many::new(Integer, Range::exactly(2))))
      .argument(Argument::new("help", Action).unique())
      .argument(Argument::new("plus", Action).with_prefix('+'))
      .argument(Argument::new("once", Integer).required())
      .group(
        GroupBuilder::new("mode")
          .restricted()
          .argument(Argument::new("fast", Action))
          .group(
            GroupBuilder::new("slow")
              .argument(Argument::new("careful", Action))
              .argument(Argument::new("thorough", Action)),
          ),
      )
      .build()
      .unwrap()
  }

  fn parse(command: &Command, input: &str) -> ParsedLevel {
    let levels = Tokenizer::new(command, input).tokenize();
    Parser::new(command, &levels[0].tokens).parse()
  }

  fn value<'p>(command: &Command, parsed: &'p ParsedLevel, name: &str) -> Option<&'p Value> {
    let id = command.argument_by_name(name).unwrap();
    parsed.values[id.index()].as_ref()
  }

  /// Errors other than the required `once` argument missing.
  fn errors(command: &Command, parsed: &ParsedLevel) -> Vec<ParseError> {
    let once = command.argument_by_name("once").unwrap();
    parsed
      .errors
      .iter()
      .filter(|error| **error != ParseError::RequiredArgumentNotUsed { argument: once })
      .cloned()
      .collect()
  }

  #[test]
  fn positional_and_named() {
    let command = schema();
    let parsed = parse(&command, "x y --n 5 --once=1");
    assert_eq!(
      value(&command, &parsed, "what"),
      Some(&Value::List(vec![Value::Text("x".into()), Value::Text("y".into())]))
    );
    assert_eq!(value(&command, &parsed, "n"), Some(&Value::Int(5)));
    assert_eq!(value(&command, &parsed, "once"), Some(&Value::Int(1)));
    assert!(parsed.errors.is_empty());
  }

  #[test]
  fn positional_after_name_is_unmatched() {
    let command = schema();
    let parsed = parse(&command, "-a x");
    assert_eq!(errors(&command, &parsed), [ParseError::UnmatchedToken { index: 1 }]);
    assert_eq!(value(&command, &parsed, "what"), None);
  }

  #[test]
  fn greedy_values_stop_at_max() {
    let command = schema();
    let parsed = parse(&command, "--pair 1 2 3");
    assert_eq!(
      value(&command, &parsed, "pair"),
      Some(&Value::List(vec![Value::Int(1), Value::Int(2)]))
    );
    assert_eq!(errors(&command, &parsed), [ParseError::UnmatchedToken { index: 3 }]);
  }

  #[test]
  fn incorrect_value_number() {
    let command = schema();
    let pair = command.argument_by_name("pair").unwrap();
    let parsed = parse(&command, "--pair 1 -a");
    assert_eq!(errors(&command, &parsed), [ParseError::IncorrectValueNumber {
      argument:     pair,
      index:        1,
      received:     1,
      in_name_list: false,
      in_tuple:     false,
    }]);
    assert_eq!(value(&command, &parsed, "a"), Some(&Value::Bool(true)));

    let parsed = parse(&command, "--pair []");
    assert_eq!(errors(&command, &parsed), [ParseError::IncorrectValueNumber {
      argument:     pair,
      index:        1,
      received:     0,
      in_name_list: false,
      in_tuple:     true,
    }]);
  }

  #[test]
  fn tuples_ignore_max() {
    let command = schema();
    let parsed = parse(&command, "--pair [1 2] [3 4]");
    assert_eq!(
      value(&command, &parsed, "pair"),
      Some(&Value::List(vec![Value::Int(1), Value::Int(2)]))
    );
    assert_eq!(errors(&command, &parsed), [
      ParseError::UnmatchedToken { index: 5 },
      ParseError::UnmatchedToken { index: 6 },
      ParseError::UnmatchedToken { index: 7 },
      ParseError::UnmatchedToken { index: 8 },
    ]);
  }

  #[test]
  fn name_lists() {
    let command = schema();
    let parsed = parse(&command, "-cccc -ab");
    assert_eq!(value(&command, &parsed, "c"), Some(&Value::Int(4)));
    assert_eq!(value(&command, &parsed, "a"), Some(&Value::Bool(true)));
    assert_eq!(value(&command, &parsed, "b"), Some(&Value::Bool(true)));
    assert!(errors(&command, &parsed).is_empty());
  }

  #[test]
  fn name_list_values() {
    let command = schema();
    let parsed = parse(&command, "-an42");
    assert_eq!(value(&command, &parsed, "n"), Some(&Value::Int(42)));

    let parsed = parse(&command, "-an 7");
    assert_eq!(value(&command, &parsed, "n"), Some(&Value::Int(7)));
    assert!(errors(&command, &parsed).is_empty());

    let parsed = parse(&command, "-anx");
    assert_eq!(errors(&command, &parsed), [ParseError::Custom {
      index:   0,
      len:     0,
      message: "Invalid integer value: 'x'.".into(),
      level:   ErrorLevel::Error,
    }]);
  }

  #[test]
  fn unmatched_in_name_list() {
    let command = schema();
    let a = command.argument_by_name("a").unwrap();
    let parsed = parse(&command, "-axyz -b");
    assert_eq!(errors(&command, &parsed), [ParseError::UnmatchedInArgNameList {
      argument: a,
      index:    0,
      rest:     "xyz".into(),
    }]);
    assert_eq!(value(&command, &parsed, "b"), Some(&Value::Bool(true)));
  }

  #[test]
  fn zero_value_arguments_consume_nothing() {
    let command = schema();
    let parsed = parse(&command, "x -a y");
    assert_eq!(errors(&command, &parsed), [ParseError::UnmatchedToken { index: 2 }]);
  }

  #[test]
  fn usage_limits() {
    let command = schema();
    let n = command.argument_by_name("n").unwrap();
    let parsed = parse(&command, "--n 1 --n 2");
    assert_eq!(errors(&command, &parsed), [ParseError::IncorrectUsagesCount {
      argument: n,
      start:    2,
      end:      3,
      usages:   2,
    }]);
    assert_eq!(value(&command, &parsed, "n"), Some(&Value::Int(1)));
  }

  #[test]
  fn restricted_groups() {
    let command = schema();
    let fast = command.argument_by_name("fast").unwrap();
    let mode = command.argument(fast).group().unwrap();
    assert!(command.group(mode).is_restricted());

    let parsed = parse(&command, "--careful --thorough");
    assert!(errors(&command, &parsed).is_empty());

    let parsed = parse(&command, "--careful --fast");
    assert_eq!(value(&command, &parsed, "careful"), Some(&Value::Bool(true)));
    assert_eq!(value(&command, &parsed, "fast"), Some(&Value::Bool(false)));
    let errors = errors(&command, &parsed);
    assert_eq!(errors.len(), 1);
    assert!(matches!(
      errors[0],
      ParseError::MultipleArgsInRestrictedGroupUsed { group, start: 1, end: 1 } if group == mode
    ));
  }

  #[test]
  fn unique_arguments() {
    let command = schema();
    let parsed = parse(&command, "--help");
    assert!(parsed.errors.is_empty());

    let help = command.argument_by_name("help").unwrap();
    let parsed = parse(&command, "-a --help");
    assert_eq!(parsed.errors, [ParseError::UniqueArgumentUsed {
      argument: help,
      start:    1,
      end:      1,
    }]);
  }

  #[test]
  fn required_suppressed_by_value_number() {
    let command = schema();
    let once = command.argument_by_name("once").unwrap();
    let parsed = parse(&command, "--once");
    assert_eq!(parsed.errors, [ParseError::IncorrectValueNumber {
      argument:     once,
      index:        1,
      received:     0,
      in_name_list: false,
      in_tuple:     false,
    }]);

    let parsed = parse(&command, "");
    assert_eq!(parsed.errors, [ParseError::RequiredArgumentNotUsed { argument: once }]);
  }

  #[test]
  fn similar_argument() {
    let command = schema();
    let plus = command.argument_by_name("plus").unwrap();
    let parsed = parse(&command, "-a --plus");
    assert_eq!(errors(&command, &parsed), [ParseError::SimilarArgument {
      argument: plus,
      index:    1,
    }]);
  }

  #[test]
  fn type_errors_point_at_values() {
    let command = schema();
    let parsed = parse(&command, "--pair 1 x");
    assert_eq!(errors(&command, &parsed), [ParseError::Custom {
      index:   2,
      len:     0,
      message: "Invalid integer value: 'x'.".into(),
      level:   ErrorLevel::Error,
    }]);
    assert_eq!(value(&command, &parsed, "pair"), None);
  }

  quickcheck::quickcheck! {
    fn flags_never_take_values(words: Vec<u8>) -> bool {
      let command = schema();
      let input = words
        .iter()
        .map(|n| format!("v{n}"))
        .collect::<Vec<_>>()
        .join(" ");
      let parsed = parse(&command, &format!("-a {input}"));
      errors(&command, &parsed).len() == words.len()
    }
  }
}
