//! Schemas declared in TOML.
//!
//! ```toml
//! name = "app"
//! tuple-chars = "()"
//!
//! [[argument]]
//! name = "number"
//! type = "integer"
//! positional = true
//! required = true
//!
//! [[argument]]
//! name = "define"
//! aliases = ["D"]
//! type = { kind = "key-values", of = "integer" }
//!
//! [[group]]
//! name = "mode"
//! restricted = true
//! argument = [{ name = "fast", type = "action" }, { name = "safe", type = "action" }]
//!
//! [[command]]
//! name = "run"
//! error-code = 2
//! ```

use std::{
  collections::BTreeMap,
  path::Path,
};

use eyre::{
  Result,
  WrapErr,
};
use serde::Deserialize;
use the_args::{
  arg_type::{
    Action,
    ArgumentType,
    Boolean,
    Choice,
    Counter,
    File,
    Float,
    IntRange,
    Integer,
    KeyValues,
    Many,
    Text,
    Value,
  },
  level::{
    ErrorLevel,
    Thresholds,
  },
  range::Range,
  schema::{
    Argument,
    Command,
    CommandBuilder,
    GroupBuilder,
    TupleChars,
  },
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct CommandDecl {
  name:              String,
  #[serde(default)]
  aliases:           Vec<String>,
  description:       Option<String>,
  /// A delimiter pair such as `"()"` or its name.
  tuple_chars:       Option<String>,
  error_code:        Option<i32>,
  exit_threshold:    Option<ErrorLevel>,
  display_threshold: Option<ErrorLevel>,
  #[serde(default, rename = "argument")]
  arguments:         Vec<ArgumentDecl>,
  #[serde(default, rename = "group")]
  groups:            Vec<GroupDecl>,
  #[serde(default, rename = "command")]
  commands:          Vec<CommandDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct ArgumentDecl {
  name:        String,
  #[serde(default)]
  aliases:     Vec<String>,
  prefix:      Option<char>,
  #[serde(rename = "type")]
  ty:          Option<TypeDecl>,
  #[serde(default)]
  positional:  bool,
  #[serde(default)]
  required:    bool,
  #[serde(default)]
  unique:      bool,
  default:     Option<toml::Value>,
  description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GroupDecl {
  name:       String,
  #[serde(default)]
  restricted: bool,
  #[serde(default, rename = "argument")]
  arguments:  Vec<ArgumentDecl>,
  #[serde(default, rename = "group")]
  groups:     Vec<GroupDecl>,
}

/// `type = "integer"` or `type = { kind = "many", of = "integer", max = 3 }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TypeDecl {
  Simple(SimpleType),
  Detailed(DetailedType),
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum SimpleType {
  Action,
  Boolean,
  Counter,
  Text,
  Integer,
  Float,
  File,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum DetailedType {
  IntRange {
    min: i64,
    max: i64,
  },
  Choice {
    options: Vec<String>,
  },
  File {
    #[serde(default, rename = "must-exist")]
    must_exist: bool,
  },
  Many {
    of:  Box<TypeDecl>,
    #[serde(default = "one")]
    min: usize,
    max: Option<usize>,
  },
  KeyValues {
    of: Box<TypeDecl>,
  },
}

fn one() -> usize {
  1
}

impl TypeDecl {
  fn build(&self) -> Result<Box<dyn ArgumentType>> {
    let ty: Box<dyn ArgumentType> = match self {
      Self::Simple(simple) => {
        match simple {
          SimpleType::Action => Box::new(Action),
          SimpleType::Boolean => Box::new(Boolean),
          SimpleType::Counter => Box::new(Counter),
          SimpleType::Text => Box::new(Text),
          SimpleType::Integer => Box::new(Integer),
          SimpleType::Float => Box::new(Float),
          SimpleType::File => Box::new(File::default()),
        }
      },
      Self::Detailed(DetailedType::IntRange { min, max }) => {
        if min > max {
          return Err(eyre::eyre!("int-range minimum {min} is greater than maximum {max}"));
        }
        Box::new(IntRange::new(*min, *max))
      },
      Self::Detailed(DetailedType::Choice { options }) => {
        if options.is_empty() {
          return Err(eyre::eyre!("choice needs at least one option"));
        }
        Box::new(Choice::new(options.iter().cloned()))
      },
      Self::Detailed(DetailedType::File { must_exist }) => {
        Box::new(File {
          must_exist: *must_exist,
        })
      },
      Self::Detailed(DetailedType::Many { of, min, max }) => {
        let count = match *max {
          Some(max) if max < *min => {
            return Err(eyre::eyre!("many minimum {min} is greater than maximum {max}"));
          },
          Some(max) => Range::between(*min, max),
          None => Range::at_least(*min),
        };
        Box::new(Many::new(of.build()?, count))
      },
      Self::Detailed(DetailedType::KeyValues { of }) => Box::new(KeyValues::new(of.build()?)),
    };
    Ok(ty)
  }
}

fn convert_value(value: toml::Value) -> Value {
  match value {
    toml::Value::String(text) => Value::Text(text),
    toml::Value::Integer(int) => Value::Int(int),
    toml::Value::Float(float) => Value::Float(float),
    toml::Value::Boolean(value) => Value::Bool(value),
    toml::Value::Datetime(datetime) => Value::Text(datetime.to_string()),
    toml::Value::Array(values) => Value::List(values.into_iter().map(convert_value).collect()),
    toml::Value::Table(table) => {
      Value::Map(
        table
          .into_iter()
          .map(|(key, value)| (key, convert_value(value)))
          .collect::<BTreeMap<_, _>>(),
      )
    },
  }
}

impl ArgumentDecl {
  fn into_argument(self) -> Result<Argument> {
    let ty = match &self.ty {
      Some(ty) => ty.build(),
      None => Ok(Box::new(Text) as Box<dyn ArgumentType>),
    }
    .wrap_err_with(|| format!("invalid type for argument '{}'", self.name))?;

    let mut argument = Argument::new(self.name, ty);
    for alias in self.aliases {
      argument = argument.alias(alias);
    }
    if let Some(prefix) = self.prefix {
      argument = argument.with_prefix(prefix);
    }
    if self.positional {
      argument = argument.positional();
    }
    if self.required {
      argument = argument.required();
    }
    if self.unique {
      argument = argument.unique();
    }
    if let Some(default) = self.default {
      argument = argument.with_default(convert_value(default));
    }
    if let Some(description) = self.description {
      argument = argument.with_description(description);
    }
    Ok(argument)
  }
}

impl GroupDecl {
  fn into_builder(self) -> Result<GroupBuilder> {
    let mut group = GroupBuilder::new(self.name);
    if self.restricted {
      group = group.restricted();
    }
    for argument in self.arguments {
      group = group.argument(argument.into_argument()?);
    }
    for subgroup in self.groups {
      group = group.group(subgroup.into_builder()?);
    }
    Ok(group)
  }
}

impl CommandDecl {
  fn into_builder(self) -> Result<CommandBuilder> {
    let mut builder = Command::builder(&self.name);
    for alias in self.aliases {
      builder = builder.alias(alias);
    }
    if let Some(description) = self.description {
      builder = builder.description(description);
    }
    if let Some(tuple_chars) = self.tuple_chars {
      builder = builder.tuple_chars(tuple_chars.parse::<TupleChars>()?);
    }
    if let Some(code) = self.error_code {
      builder = builder.error_code(code);
    }

    let mut thresholds = Thresholds::default();
    if let Some(exit) = self.exit_threshold {
      thresholds = thresholds.with_exit(exit)?;
    }
    if let Some(display) = self.display_threshold {
      thresholds = thresholds.with_display(display)?;
    }
    builder = builder.thresholds(thresholds);

    for argument in self.arguments {
      builder = builder.argument(argument.into_argument()?);
    }
    for group in self.groups {
      builder = builder.group(group.into_builder()?);
    }
    for command in self.commands {
      let name = command.name.clone();
      let command = command
        .into_builder()
        .wrap_err_with(|| format!("in subcommand '{name}'"))?;
      builder = builder.subcommand(command);
    }
    Ok(builder)
  }
}

/// Builds a command tree from the TOML text of a schema.
pub fn parse_schema(text: &str) -> Result<Command> {
  let decl: CommandDecl = toml::from_str(text).wrap_err("malformed schema")?;
  let command = decl.into_builder()?.build()?;
  Ok(command)
}

pub fn load(path: &Path) -> Result<Command> {
  let text = std::fs::read_to_string(path)
    .wrap_err_with(|| format!("failed to read schema {}", path.display()))?;
  parse_schema(&text).wrap_err_with(|| format!("invalid schema {}", path.display()))
}
