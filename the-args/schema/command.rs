use std::collections::HashSet;

use tracing::debug;

use super::{
  ArgId,
  Argument,
  Group,
  GroupBuilder,
  GroupId,
  SchemaError,
  TupleChars,
  check_name,
};
use crate::{
  level::Thresholds,
  result::ParseResult,
};

/// Prefixes accepted in front of a cluster of single character names, on top
/// of the prefixes of the clustered arguments themselves.
const COMMON_PREFIXES: [char; 2] = ['-', '/'];

/// A built, read-only command level.
#[derive(Debug)]
pub struct Command {
  names:       Vec<String>,
  description: Option<String>,
  arguments:   Vec<Argument>,
  groups:      Vec<Group>,
  commands:    Vec<Command>,
  tuple_chars: TupleChars,
  error_code:  i32,
  thresholds:  Thresholds,
  is_root:     bool,
}

impl Command {
  pub fn builder(name: impl Into<String>) -> CommandBuilder {
    CommandBuilder::new(name)
  }

  pub fn name(&self) -> &str {
    &self.names[0]
  }

  pub fn aliases(&self) -> &[String] {
    &self.names[1..]
  }

  pub fn has_name(&self, name: &str) -> bool {
    self.names.iter().any(|n| n == name)
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn arguments(&self) -> &[Argument] {
    &self.arguments
  }

  pub fn argument(&self, id: ArgId) -> &Argument {
    &self.arguments[id.0]
  }

  pub fn argument_ids(&self) -> impl Iterator<Item = ArgId> + '_ {
    (0..self.arguments.len()).map(ArgId)
  }

  /// The argument named by `word`, prefix included.
  pub fn find_argument(&self, word: &str) -> Option<ArgId> {
    self
      .arguments
      .iter()
      .position(|arg| arg.matches(word))
      .map(ArgId)
  }

  /// The argument with `name` as one of its names, prefix excluded.
  pub fn argument_by_name(&self, name: &str) -> Option<ArgId> {
    self
      .arguments
      .iter()
      .position(|arg| arg.has_name(name))
      .map(ArgId)
  }

  /// The argument with the single character name `ch`.
  pub fn argument_by_char(&self, ch: char) -> Option<ArgId> {
    self
      .arguments
      .iter()
      .position(|arg| arg.has_char_name(ch))
      .map(ArgId)
  }

  /// The `index`th positional argument in declaration order.
  pub fn positional(&self, index: usize) -> Option<ArgId> {
    self
      .arguments
      .iter()
      .enumerate()
      .filter(|(_, arg)| arg.is_positional())
      .nth(index)
      .map(|(i, _)| ArgId(i))
  }

  pub fn groups(&self) -> &[Group] {
    &self.groups
  }

  pub fn group(&self, id: GroupId) -> &Group {
    &self.groups[id.0]
  }

  pub fn commands(&self) -> &[Command] {
    &self.commands
  }

  pub fn find_command(&self, word: &str) -> Option<&Command> {
    self.commands.iter().find(|command| command.has_name(word))
  }

  pub fn tuple_chars(&self) -> TupleChars {
    self.tuple_chars
  }

  pub fn error_code(&self) -> i32 {
    self.error_code
  }

  pub fn thresholds(&self) -> Thresholds {
    self.thresholds
  }

  pub fn is_root(&self) -> bool {
    self.is_root
  }

  /// Whether `word` is a cluster of single character names such as `-abc`.
  ///
  /// The second character must be alphabetic and name an argument. Scanning
  /// stops at the first character that names nothing; the parser reports the
  /// remainder. The first character must be one of the common prefixes or the
  /// prefix of a matched argument.
  pub fn is_name_list(&self, word: &str) -> bool {
    let mut chars = word.chars();
    let (Some(prefix), Some(second)) = (chars.next(), chars.clone().next()) else {
      return false;
    };
    if !second.is_alphabetic() {
      return false;
    }

    let mut found = false;
    let mut prefix_matches = COMMON_PREFIXES.contains(&prefix);
    for ch in chars {
      let Some(id) = self.argument_by_char(ch) else {
        break;
      };
      found = true;
      prefix_matches |= self.argument(id).prefix() == prefix;
    }
    found && prefix_matches
  }

  /// Names and name lists end the value collection of the argument before
  /// them, and let `=` split a fused value off.
  pub fn is_argument_specifier(&self, word: &str) -> bool {
    (word.chars().count() > 1 && self.find_argument(word).is_some()) || self.is_name_list(word)
  }

  /// The argument `word` would name if it used that argument's prefix.
  pub fn similar_argument(&self, word: &str) -> Option<ArgId> {
    self
      .arguments
      .iter()
      .position(|arg| arg.matches_other_prefix(word))
      .map(ArgId)
  }

  /// Tokenizes and parses `input` with this command as the root level.
  pub fn parse(&self, input: &str) -> ParseResult<'_> {
    ParseResult::new(self, input)
  }
}

#[derive(Debug)]
pub struct CommandBuilder {
  names:       Vec<String>,
  description: Option<String>,
  arguments:   Vec<Argument>,
  groups:      Vec<GroupBuilder>,
  commands:    Vec<CommandBuilder>,
  tuple_chars: Option<TupleChars>,
  error_code:  i32,
  thresholds:  Thresholds,
}

impl CommandBuilder {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      names:       vec![name.into()],
      description: None,
      arguments:   Vec::new(),
      groups:      Vec::new(),
      commands:    Vec::new(),
      tuple_chars: None,
      error_code:  1,
      thresholds:  Thresholds::default(),
    }
  }

  pub fn alias(mut self, name: impl Into<String>) -> Self {
    self.names.push(name.into());
    self
  }

  pub fn description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn argument(mut self, argument: Argument) -> Self {
    self.arguments.push(argument);
    self
  }

  pub fn group(mut self, group: GroupBuilder) -> Self {
    self.groups.push(group);
    self
  }

  pub fn subcommand(mut self, command: CommandBuilder) -> Self {
    self.commands.push(command);
    self
  }

  /// Inherited by subcommands that do not set their own.
  pub fn tuple_chars(mut self, tuple_chars: TupleChars) -> Self {
    self.tuple_chars = Some(tuple_chars);
    self
  }

  /// The code this level contributes to the exit code when it fails. Not
  /// inherited.
  pub fn error_code(mut self, code: i32) -> Self {
    self.error_code = code;
    self
  }

  /// Unset thresholds are inherited from the parent command.
  pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
    self.thresholds = thresholds;
    self
  }

  pub fn build(self) -> Result<Command, SchemaError> {
    let command = self.build_level(None)?;
    debug!(
      command = command.name(),
      subcommands = command.commands.len(),
      "built command schema"
    );
    Ok(command)
  }

  fn build_level(self, parent: Option<(TupleChars, Thresholds)>) -> Result<Command, SchemaError> {
    for name in &self.names {
      check_name(name)?;
    }
    let name = self.names[0].clone();

    let (tuple_chars, thresholds) = match parent {
      Some((tuple_chars, thresholds)) => {
        (
          self.tuple_chars.unwrap_or(tuple_chars),
          self.thresholds.inherit(&thresholds)?,
        )
      },
      None => (self.tuple_chars.unwrap_or_default(), self.thresholds),
    };

    let mut arguments = self.arguments;
    let mut groups = Vec::new();
    for group in self.groups {
      flatten_group(group, None, &mut arguments, &mut groups)?;
    }

    let mut seen = HashSet::new();
    for argument in &arguments {
      argument.validate()?;
      for arg_name in argument.names() {
        if !seen.insert(arg_name.as_str()) {
          return Err(SchemaError::DuplicateArgument {
            command: name.clone(),
            name:    arg_name.clone(),
          });
        }
      }
    }

    let mut seen = HashSet::new();
    for group in &groups {
      if !seen.insert(group.name.as_str()) {
        return Err(SchemaError::DuplicateGroup {
          command: name.clone(),
          name:    group.name.clone(),
        });
      }
    }

    let mut seen = HashSet::new();
    for command in &self.commands {
      for command_name in &command.names {
        if !seen.insert(command_name.as_str()) {
          return Err(SchemaError::DuplicateCommand {
            command: name.clone(),
            name:    command_name.clone(),
          });
        }
      }
    }

    let commands = self
      .commands
      .into_iter()
      .map(|command| command.build_level(Some((tuple_chars, thresholds))))
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Command {
      names: self.names,
      description: self.description,
      arguments,
      groups,
      commands,
      tuple_chars,
      error_code: self.error_code,
      thresholds,
      is_root: parent.is_none(),
    })
  }
}

/// Moves the arguments of `builder` and its subgroups into `arguments`, and
/// the groups themselves into `groups` in pre-order.
fn flatten_group(
  builder: GroupBuilder,
  parent: Option<GroupId>,
  arguments: &mut Vec<Argument>,
  groups: &mut Vec<Group>,
) -> Result<GroupId, SchemaError> {
  check_name(&builder.name)?;
  let id = GroupId(groups.len());
  groups.push(Group {
    name: builder.name,
    restricted: builder.restricted,
    arguments: Vec::new(),
    groups: Vec::new(),
    parent,
  });

  for mut argument in builder.arguments {
    argument.group = Some(id);
    groups[id.0].arguments.push(ArgId(arguments.len()));
    arguments.push(argument);
  }
  for subgroup in builder.groups {
    let sub_id = flatten_group(subgroup, Some(id), arguments, groups)?;
    groups[id.0].groups.push(sub_id);
  }
  Ok(id)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    arg_type::{
      Action,
      Counter,
      Integer,
      Text,
    },
    level::ErrorLevel,
  };

  fn schema() -> Command {
    Command::builder("Testing")
      .argument(Argument::new("what", Text).positional())
      .argument(Argument::new("a", Action))
      .argument(Argument::new("c", Counter).with_prefix('+'))
      .group(
        GroupBuilder::new("mode")
          .restricted()
          .argument(Argument::new("fast", Action))
          .group(GroupBuilder::new("inner").argument(Argument::new("slow", Action))),
      )
      .subcommand(
        Command::builder("sub")
          .alias("s")
          .argument(Argument::new("number", Integer).positional()),
      )
      .build()
      .unwrap()
  }

  #[test]
  fn groups_are_flattened() {
    let command = schema();
    let fast = command.argument_by_name("fast").unwrap();
    let slow = command.argument_by_name("slow").unwrap();
    assert_eq!(fast.index(), 3);
    assert_eq!(slow.index(), 4);

    let mode = command.argument(fast).group().unwrap();
    let inner = command.argument(slow).group().unwrap();
    assert_eq!(command.group(mode).name(), "mode");
    assert!(command.group(mode).is_restricted());
    assert_eq!(command.group(mode).groups(), &[inner]);
    assert_eq!(command.group(inner).parent(), Some(mode));
  }

  #[test]
  fn lookups() {
    let command = schema();
    assert_eq!(command.find_argument("--what"), command.argument_by_name("what"));
    assert_eq!(command.find_argument("+c"), command.argument_by_char('c'));
    assert_eq!(command.find_argument("-c"), None);
    assert_eq!(command.positional(0), command.argument_by_name("what"));
    assert_eq!(command.positional(1), None);
    assert_eq!(command.find_command("s").map(Command::name), Some("sub"));
    assert!(command.is_root());
    assert!(!command.commands()[0].is_root());
    assert_eq!(command.similar_argument("-c"), command.argument_by_char('c'));
  }

  #[test]
  fn name_lists() {
    let command = schema();
    assert!(command.is_name_list("-ac"));
    assert!(command.is_name_list("+cc"));
    assert!(command.is_name_list("/a"));
    assert!(command.is_name_list("-axyz"));
    assert!(!command.is_name_list("-x"));
    assert!(!command.is_name_list("*a"));
    assert!(!command.is_name_list("-1"));
    assert!(!command.is_name_list("-"));
    assert!(command.is_argument_specifier("-ac"));
    assert!(command.is_argument_specifier("--what"));
    assert!(!command.is_argument_specifier("what"));
  }

  #[test]
  fn inheritance() {
    let command = Command::builder("root")
      .tuple_chars(TupleChars::Parenthesis)
      .thresholds(Thresholds::new(ErrorLevel::Warning, ErrorLevel::Debug).unwrap())
      .error_code(4)
      .subcommand(Command::builder("child"))
      .subcommand(Command::builder("other").tuple_chars(TupleChars::Braces))
      .build()
      .unwrap();
    let child = &command.commands()[0];
    assert_eq!(child.tuple_chars(), TupleChars::Parenthesis);
    assert_eq!(child.thresholds().exit(), ErrorLevel::Warning);
    assert_eq!(child.thresholds().display(), ErrorLevel::Debug);
    assert_eq!(child.error_code(), 1);
    assert_eq!(command.commands()[1].tuple_chars(), TupleChars::Braces);
  }

  #[test]
  fn inconsistent_inherited_thresholds() {
    let result = Command::builder("root")
      .thresholds(Thresholds::new(ErrorLevel::Warning, ErrorLevel::Warning).unwrap())
      .subcommand(
        Command::builder("child").thresholds(Thresholds::default().with_exit(ErrorLevel::Info).unwrap()),
      )
      .build();
    assert!(matches!(
      result,
      Err(SchemaError::InconsistentThresholds { .. })
    ));
  }

  #[test]
  fn duplicates() {
    let result = Command::builder("root")
      .argument(Argument::new("a", Action))
      .group(GroupBuilder::new("g").argument(Argument::new("b", Action).alias("a")))
      .build();
    assert_eq!(
      result.err(),
      Some(SchemaError::DuplicateArgument {
        command: "root".into(),
        name:    "a".into(),
      })
    );

    let result = Command::builder("root")
      .subcommand(Command::builder("x"))
      .subcommand(Command::builder("y").alias("x"))
      .build();
    assert!(matches!(result, Err(SchemaError::DuplicateCommand { .. })));

    let result = Command::builder("root")
      .group(GroupBuilder::new("g"))
      .group(GroupBuilder::new("h").group(GroupBuilder::new("g")))
      .build();
    assert!(matches!(result, Err(SchemaError::DuplicateGroup { .. })));
  }

  #[test]
  fn invalid_names() {
    assert!(Command::builder("two words").build().is_err());
    assert!(
      Command::builder("root")
        .argument(Argument::new("", Action))
        .build()
        .is_err()
    );
  }
}
