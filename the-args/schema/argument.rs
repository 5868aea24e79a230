use super::{
  GroupId,
  SchemaError,
  check_name,
};
use crate::{
  arg_type::{
    ArgumentType,
    Value,
  },
  range::Range,
};

/// A named or positional argument of a command.
///
/// An argument with prefix `-` and name `what` matches both `-what` and
/// `--what`. Single character names can also be clustered behind one prefix,
/// e.g. `-abc`.
#[derive(Debug)]
pub struct Argument {
  names:            Vec<String>,
  prefix:           char,
  positional:       bool,
  required:         bool,
  unique:           bool,
  arg_type:         Box<dyn ArgumentType>,
  default:          Option<Value>,
  description:      Option<String>,
  pub(crate) group: Option<GroupId>,
}

impl Argument {
  pub const DEFAULT_PREFIX: char = '-';

  pub fn new(name: impl Into<String>, arg_type: impl ArgumentType + 'static) -> Self {
    Self {
      names:       vec![name.into()],
      prefix:      Self::DEFAULT_PREFIX,
      positional:  false,
      required:    false,
      unique:      false,
      arg_type:    Box::new(arg_type),
      default:     None,
      description: None,
      group:       None,
    }
  }

  pub fn alias(mut self, name: impl Into<String>) -> Self {
    self.names.push(name.into());
    self
  }

  pub fn with_prefix(mut self, prefix: char) -> Self {
    self.prefix = prefix;
    self
  }

  /// Lets the argument receive bare values by position, in declaration order.
  /// Positional arguments can still be given by name.
  pub fn positional(mut self) -> Self {
    self.positional = true;
    self
  }

  pub fn required(mut self) -> Self {
    self.required = true;
    self
  }

  /// Marks an argument that is meant to be used on its own, such as `help`.
  pub fn unique(mut self) -> Self {
    self.unique = true;
    self
  }

  pub fn with_default(mut self, value: Value) -> Self {
    self.default = Some(value);
    self
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// The primary name.
  pub fn name(&self) -> &str {
    &self.names[0]
  }

  pub fn names(&self) -> &[String] {
    &self.names
  }

  pub fn prefix(&self) -> char {
    self.prefix
  }

  pub fn is_positional(&self) -> bool {
    self.positional
  }

  pub fn is_required(&self) -> bool {
    self.required
  }

  pub fn is_unique(&self) -> bool {
    self.unique
  }

  pub fn arg_type(&self) -> &dyn ArgumentType {
    self.arg_type.as_ref()
  }

  pub fn value_count(&self) -> Range {
    self.arg_type.value_count()
  }

  pub fn usage_count(&self) -> Range {
    self.arg_type.usage_count()
  }

  /// The value the argument resolves to when it is not used, either declared
  /// on the argument or provided by its type.
  pub fn default_value(&self) -> Option<Value> {
    self
      .default
      .clone()
      .or_else(|| self.arg_type.default_value())
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn group(&self) -> Option<GroupId> {
    self.group
  }

  pub fn has_name(&self, name: &str) -> bool {
    self.names.iter().any(|n| n == name)
  }

  pub fn has_char_name(&self, ch: char) -> bool {
    self.names.iter().any(|n| {
      let mut chars = n.chars();
      chars.next() == Some(ch) && chars.next().is_none()
    })
  }

  /// Whether `word` is one of the names preceded by one or two prefix
  /// characters.
  pub fn matches(&self, word: &str) -> bool {
    let Some(rest) = word.strip_prefix(self.prefix) else {
      return false;
    };
    let doubled = rest.strip_prefix(self.prefix);
    self
      .names
      .iter()
      .any(|name| rest == name || doubled == Some(name.as_str()))
  }

  /// Whether `word` names this argument behind a prefix other than its own,
  /// e.g. `--foo` for an argument declared with `+` as prefix.
  pub fn matches_other_prefix(&self, word: &str) -> bool {
    let Some(first) = word.chars().next() else {
      return false;
    };
    if first == self.prefix || first.is_alphanumeric() {
      return false;
    }
    let Some(rest) = word.strip_prefix(first) else {
      return false;
    };
    let doubled = rest.strip_prefix(first);
    self
      .names
      .iter()
      .any(|name| rest == name || doubled == Some(name.as_str()))
  }

  pub(crate) fn validate(&self) -> Result<(), SchemaError> {
    for name in &self.names {
      check_name(name)?;
      if name.starts_with(self.prefix) {
        return Err(SchemaError::InvalidName {
          name:   name.clone(),
          reason: "names cannot start with their prefix character",
        });
      }
    }
    if self.prefix.is_alphanumeric() || self.prefix.is_whitespace() {
      return Err(SchemaError::InvalidName {
        name:   self.prefix.to_string(),
        reason: "prefixes must be punctuation characters",
      });
    }
    if self.positional && self.value_count().is_zero() {
      return Err(SchemaError::PositionalWithoutValues {
        name: self.name().to_string(),
      });
    }
    Ok(())
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::arg_type::{
    Action,
    Counter,
    Text,
  };

  #[test]
  fn name_matching() {
    let arg = Argument::new("what", Text).alias("w");
    assert!(arg.matches("--what"));
    assert!(arg.matches("-what"));
    assert!(arg.matches("-w"));
    assert!(arg.matches("--w"));
    assert!(!arg.matches("what"));
    assert!(!arg.matches("---what"));
    assert!(!arg.matches("+what"));
    assert!(arg.has_char_name('w'));
    assert!(!arg.has_char_name('h'));
  }

  #[test]
  fn custom_prefix() {
    let arg = Argument::new("foo", Action).with_prefix('+');
    assert!(arg.matches("+foo"));
    assert!(arg.matches("++foo"));
    assert!(!arg.matches("--foo"));
    assert!(arg.matches_other_prefix("--foo"));
    assert!(arg.matches_other_prefix("/foo"));
    assert!(!arg.matches_other_prefix("+foo"));
    assert!(!arg.matches_other_prefix("foo"));
  }

  #[test]
  fn defaults() {
    assert_eq!(Argument::new("c", Counter).default_value(), Some(Value::Int(0)));
    assert_eq!(
      Argument::new("c", Counter)
        .with_default(Value::Int(7))
        .default_value(),
      Some(Value::Int(7))
    );
    assert_eq!(Argument::new("t", Text).default_value(), None);
  }

  #[test]
  fn validation() {
    assert!(Argument::new("what", Text).positional().validate().is_ok());
    assert_eq!(
      Argument::new("flag", Action).positional().validate(),
      Err(SchemaError::PositionalWithoutValues {
        name: "flag".into(),
      })
    );
    assert!(Argument::new("-what", Text).validate().is_err());
    assert!(Argument::new("what", Text).with_prefix('x').validate().is_err());
  }
}
