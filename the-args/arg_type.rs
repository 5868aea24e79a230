//! The capability interface argument types implement, and the values they
//! produce.
//!
//! A type declares how many values it takes per usage, how many usages it
//! accepts, and converts the raw strings of one usage into a [`Value`].
//! Conversion problems are reported through the [`TypeContext`] and end up in
//! the same diagnostic list as structural parse errors.
//!
//! Composite types such as [`Many`](builtin::Many) and
//! [`KeyValues`](builtin::KeyValues) wrap another type and run it over a
//! subset of the values with [`TypeContext::convert`], which shifts the
//! wrapped type's error positions into place.

pub mod builtin;

use std::{
  collections::BTreeMap,
  fmt,
  path::PathBuf,
};

use serde::Serialize;

pub use self::builtin::*;
use crate::{
  level::ErrorLevel,
  range::Range,
};

/// A converted argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
  Bool(bool),
  Int(i64),
  Float(f64),
  Text(String),
  Path(PathBuf),
  List(Vec<Value>),
  Map(BTreeMap<String, Value>),
}

impl Value {
  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Bool(value) => Some(*value),
      _ => None,
    }
  }

  pub fn as_int(&self) -> Option<i64> {
    match self {
      Self::Int(value) => Some(*value),
      _ => None,
    }
  }

  pub fn as_float(&self) -> Option<f64> {
    match self {
      Self::Float(value) => Some(*value),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::Text(value) => Some(value),
      _ => None,
    }
  }

  pub fn as_path(&self) -> Option<&PathBuf> {
    match self {
      Self::Path(value) => Some(value),
      _ => None,
    }
  }

  pub fn as_list(&self) -> Option<&[Value]> {
    match self {
      Self::List(values) => Some(values),
      _ => None,
    }
  }

  pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
    match self {
      Self::Map(map) => Some(map),
      _ => None,
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Bool(value) => write!(f, "{value}"),
      Self::Int(value) => write!(f, "{value}"),
      Self::Float(value) => write!(f, "{value}"),
      Self::Text(value) => f.write_str(value),
      Self::Path(path) => write!(f, "{}", path.display()),
      Self::List(values) => {
        f.write_str("[")?;
        for (i, value) in values.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{value}")?;
        }
        f.write_str("]")
      },
      Self::Map(map) => {
        f.write_str("{")?;
        for (i, (key, value)) in map.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{key}={value}")?;
        }
        f.write_str("}")
      },
    }
  }
}

/// A conversion problem raised by an argument type.
///
/// `index` is relative to the first value handed to the type and `len` is the
/// number of additional values the error covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
  pub message: String,
  pub level:   ErrorLevel,
  pub index:   usize,
  pub len:     usize,
}

/// Everything a type sees while converting one usage of its argument.
#[derive(Debug)]
pub struct TypeContext<'a> {
  values:   &'a [&'a str],
  previous: Option<&'a Value>,
  errors:   Vec<TypeError>,
}

impl<'a> TypeContext<'a> {
  pub fn new(values: &'a [&'a str], previous: Option<&'a Value>) -> Self {
    Self {
      values,
      previous,
      errors: Vec::new(),
    }
  }

  pub fn values(&self) -> &'a [&'a str] {
    self.values
  }

  /// The only value of a single-value usage. Returns an empty string for
  /// zero-value usages.
  pub fn value(&self) -> &'a str {
    self.values.first().copied().unwrap_or_default()
  }

  /// The value the argument resolved to on its previous usage in this parse.
  pub fn previous(&self) -> Option<&'a Value> {
    self.previous
  }

  /// Reports an error covering every value of this usage.
  pub fn error(&mut self, message: impl Into<String>) {
    let len = self.values.len().saturating_sub(1);
    self.report(message, ErrorLevel::Error, 0, len);
  }

  /// Reports an error on the value at `index`.
  pub fn error_at(&mut self, index: usize, message: impl Into<String>) {
    self.report(message, ErrorLevel::Error, index, 0);
  }

  pub fn warning_at(&mut self, index: usize, message: impl Into<String>) {
    self.report(message, ErrorLevel::Warning, index, 0);
  }

  pub fn report(&mut self, message: impl Into<String>, level: ErrorLevel, index: usize, len: usize) {
    self.errors.push(TypeError {
      message: message.into(),
      level,
      index,
      len,
    });
  }

  /// Runs `ty` over the values at `offset..offset + values.len()` of this
  /// usage and moves its errors into this context.
  pub fn convert(&mut self, ty: &dyn ArgumentType, offset: usize, values: &[&str]) -> Option<Value> {
    let mut nested = TypeContext::new(values, None);
    let value = ty.parse(&mut nested);
    self.errors.extend(nested.errors.into_iter().map(|error| TypeError {
      index: error.index + offset,
      ..error
    }));
    value
  }

  /// Whether any reported error is severe enough to reject the value.
  pub fn has_errors(&self) -> bool {
    self.errors.iter().any(|error| error.level == ErrorLevel::Error)
  }

  pub fn into_errors(self) -> Vec<TypeError> {
    self.errors
  }
}

/// The contract between the parser and a type of argument.
pub trait ArgumentType: fmt::Debug + Send + Sync {
  /// How many values a single usage takes.
  fn value_count(&self) -> Range {
    Range::ONE
  }

  /// How many times the argument may be used in one command level.
  fn usage_count(&self) -> Range {
    Range::ONE
  }

  /// Converts the values of one usage. Returning `None` marks the conversion
  /// as failed; the reason should have been reported on `cx`.
  fn parse(&self, cx: &mut TypeContext<'_>) -> Option<Value>;

  /// The value an unused argument resolves to.
  fn default_value(&self) -> Option<Value> {
    None
  }

  /// A short name used in logs and representations, e.g. `"integer"`.
  fn name(&self) -> &'static str;
}

/// Lets types chosen at runtime, e.g. from a schema file, be wrapped and
/// declared like static ones.
impl<T: ArgumentType + ?Sized> ArgumentType for Box<T> {
  fn value_count(&self) -> Range {
    (**self).value_count()
  }

  fn usage_count(&self) -> Range {
    (**self).usage_count()
  }

  fn parse(&self, cx: &mut TypeContext<'_>) -> Option<Value> {
    (**self).parse(cx)
  }

  fn default_value(&self) -> Option<Value> {
    (**self).default_value()
  }

  fn name(&self) -> &'static str {
    (**self).name()
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn context_value() {
    let values = ["a", "b"];
    let cx = TypeContext::new(&values, None);
    assert_eq!(cx.value(), "a");
    assert_eq!(cx.values(), &["a", "b"]);
    let cx = TypeContext::new(&[], None);
    assert_eq!(cx.value(), "");
  }

  #[test]
  fn error_spans() {
    let values = ["a", "b", "c"];
    let mut cx = TypeContext::new(&values, None);
    cx.error("whole");
    cx.error_at(2, "third");
    cx.warning_at(1, "second");
    assert!(cx.has_errors());
    let errors = cx.into_errors();
    assert_eq!((errors[0].index, errors[0].len), (0, 2));
    assert_eq!((errors[1].index, errors[1].len), (2, 0));
    assert_eq!(errors[2].level, ErrorLevel::Warning);
  }

  #[test]
  fn convert_offsets_nested_errors() {
    let values = ["1", "x", "3"];
    let mut cx = TypeContext::new(&values, None);
    assert_eq!(cx.convert(&Integer, 1, &values[1..2]), None);
    let errors = cx.into_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].index, 1);
    assert_eq!(errors[0].message, "Invalid integer value: 'x'.");
  }

  #[test]
  fn value_display() {
    let list = Value::List(vec![Value::Int(1), Value::Text("a".into())]);
    assert_eq!(list.to_string(), "[1, a]");
    let map = Value::Map(BTreeMap::from([("k".to_string(), Value::Bool(true))]));
    assert_eq!(map.to_string(), "{k=true}");
  }
}
