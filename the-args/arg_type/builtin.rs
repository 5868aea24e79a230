//! Built-in argument types.

use std::{
  collections::BTreeMap,
  path::PathBuf,
};

use super::{
  ArgumentType,
  TypeContext,
  Value,
};
use crate::range::Range;

/// Takes no values and resolves to `true` when used.
#[derive(Debug, Clone, Copy, Default)]
pub struct Action;

impl ArgumentType for Action {
  fn value_count(&self) -> Range {
    Range::NONE
  }

  fn parse(&self, _cx: &mut TypeContext<'_>) -> Option<Value> {
    Some(Value::Bool(true))
  }

  fn default_value(&self) -> Option<Value> {
    Some(Value::Bool(false))
  }

  fn name(&self) -> &'static str {
    "action"
  }
}

/// Takes an optional boolean value; used without one it resolves to `true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

impl ArgumentType for Boolean {
  fn value_count(&self) -> Range {
    Range::ZERO_OR_ONE
  }

  fn parse(&self, cx: &mut TypeContext<'_>) -> Option<Value> {
    if cx.values().is_empty() {
      return Some(Value::Bool(true));
    }

    let value = cx.value();
    match value.to_ascii_lowercase().as_str() {
      "true" | "yes" | "1" => Some(Value::Bool(true)),
      "false" | "no" | "0" => Some(Value::Bool(false)),
      _ => {
        cx.error(format!("Invalid boolean value: '{value}'."));
        None
      },
    }
  }

  fn default_value(&self) -> Option<Value> {
    Some(Value::Bool(false))
  }

  fn name(&self) -> &'static str {
    "boolean"
  }
}

/// Counts how many times it is used, e.g. `-vvv` resolves to `3`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counter;

impl ArgumentType for Counter {
  fn value_count(&self) -> Range {
    Range::NONE
  }

  fn usage_count(&self) -> Range {
    Range::AT_LEAST_ONE
  }

  fn parse(&self, cx: &mut TypeContext<'_>) -> Option<Value> {
    let previous = cx.previous().and_then(Value::as_int).unwrap_or(0);
    Some(Value::Int(previous + 1))
  }

  fn default_value(&self) -> Option<Value> {
    Some(Value::Int(0))
  }

  fn name(&self) -> &'static str {
    "counter"
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl ArgumentType for Text {
  fn parse(&self, cx: &mut TypeContext<'_>) -> Option<Value> {
    Some(Value::Text(cx.value().to_string()))
  }

  fn name(&self) -> &'static str {
    "text"
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Integer;

impl ArgumentType for Integer {
  fn parse(&self, cx: &mut TypeContext<'_>) -> Option<Value> {
    let value = cx.value();
    match value.parse::<i64>() {
      Ok(int) => Some(Value::Int(int)),
      Err(_) => {
        cx.error(format!("Invalid integer value: '{value}'."));
        None
      },
    }
  }

  fn name(&self) -> &'static str {
    "integer"
  }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Float;

impl ArgumentType for Float {
  fn parse(&self, cx: &mut TypeContext<'_>) -> Option<Value> {
    let value = cx.value();
    match value.parse::<f64>() {
      Ok(float) => Some(Value::Float(float)),
      Err(_) => {
        cx.error(format!("Invalid float value: '{value}'."));
        None
      },
    }
  }

  fn name(&self) -> &'static str {
    "float"
  }
}

/// An integer within inclusive bounds.
#[derive(Debug, Clone, Copy)]
pub struct IntRange {
  pub min: i64,
  pub max: i64,
}

impl IntRange {
  pub const fn new(min: i64, max: i64) -> Self {
    Self { min, max }
  }
}

impl ArgumentType for IntRange {
  fn parse(&self, cx: &mut TypeContext<'_>) -> Option<Value> {
    let int = cx.convert(&Integer, 0, cx.values())?.as_int()?;
    if int < self.min || int > self.max {
      cx.error(format!(
        "Value must be between {} and {}.",
        self.min, self.max
      ));
      return None;
    }
    Some(Value::Int(int))
  }

  fn name(&self) -> &'static str {
    "int-range"
  }
}

/// One of a fixed set of options, matched case-insensitively. Resolves to the
/// option as declared.
#[derive(Debug, Clone)]
pub struct Choice {
  options: Vec<String>,
}

impl Choice {
  pub fn new<I, S>(options: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      options: options.into_iter().map(Into::into).collect(),
    }
  }

  pub fn options(&self) -> &[String] {
    &self.options
  }
}

impl ArgumentType for Choice {
  fn parse(&self, cx: &mut TypeContext<'_>) -> Option<Value> {
    let value = cx.value();
    match self
      .options
      .iter()
      .find(|option| option.eq_ignore_ascii_case(value))
    {
      Some(option) => Some(Value::Text(option.clone())),
      None => {
        cx.error(format!(
          "Invalid value: '{value}'. Expected one of: {}.",
          self.options.join(", ")
        ));
        None
      },
    }
  }

  fn name(&self) -> &'static str {
    "choice"
  }
}

/// A file system path, optionally required to exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct File {
  pub must_exist: bool,
}

impl File {
  pub const fn existing() -> Self {
    Self { must_exist: true }
  }
}

impl ArgumentType for File {
  fn parse(&self, cx: &mut TypeContext<'_>) -> Option<Value> {
    let path = PathBuf::from(cx.value());
    if self.must_exist && !path.exists() {
      cx.error(format!("File '{}' does not exist.", path.display()));
      return None;
    }
    Some(Value::Path(path))
  }

  fn name(&self) -> &'static str {
    "file"
  }
}

/// Several values of the wrapped type in a single usage, e.g. a tuple
/// `[1 2 3]` of integers.
#[derive(Debug)]
pub struct Many<T> {
  inner: T,
  count: Range,
}

impl<T: ArgumentType> Many<T> {
  pub fn new(inner: T, count: Range) -> Self {
    Self { inner, count }
  }
}

impl<T: ArgumentType> ArgumentType for Many<T> {
  fn value_count(&self) -> Range {
    self.count
  }

  fn parse(&self, cx: &mut TypeContext<'_>) -> Option<Value> {
    let values = cx.values();
    let mut out = Vec::with_capacity(values.len());
    let mut failed = false;
    for (i, value) in values.iter().enumerate() {
      match cx.convert(&self.inner, i, std::slice::from_ref(value)) {
        Some(value) => out.push(value),
        None => failed = true,
      }
    }
    (!failed).then_some(Value::List(out))
  }

  fn name(&self) -> &'static str {
    "many"
  }
}

/// `key=value` pairs whose values are converted by the wrapped type.
#[derive(Debug)]
pub struct KeyValues<T> {
  inner: T,
}

impl<T: ArgumentType> KeyValues<T> {
  pub fn new(inner: T) -> Self {
    Self { inner }
  }
}

impl<T: ArgumentType> ArgumentType for KeyValues<T> {
  fn value_count(&self) -> Range {
    Range::AT_LEAST_ONE
  }

  fn parse(&self, cx: &mut TypeContext<'_>) -> Option<Value> {
    let values = cx.values();
    let mut map = BTreeMap::new();
    let mut failed = false;

    for (i, pair) in values.iter().enumerate() {
      let Some((key, value)) = pair.split_once('=') else {
        cx.error_at(i, format!("Invalid key-value pair: '{pair}'."));
        failed = true;
        continue;
      };

      let key = key.trim();
      if key.is_empty() {
        cx.error_at(i, "Key cannot be empty.");
        failed = true;
        continue;
      }
      if map.contains_key(key) {
        cx.error_at(i, format!("Duplicate key: '{key}'."));
        failed = true;
        continue;
      }

      match cx.convert(&self.inner, i, &[value]) {
        Some(value) => {
          map.insert(key.to_string(), value);
        },
        None => failed = true,
      }
    }

    (!failed).then_some(Value::Map(map))
  }

  fn name(&self) -> &'static str {
    "key-values"
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::arg_type::TypeError;

  #[track_caller]
  fn convert(ty: &dyn ArgumentType, values: &[&str]) -> (Option<Value>, Vec<TypeError>) {
    let mut cx = TypeContext::new(values, None);
    let value = ty.parse(&mut cx);
    (value, cx.into_errors())
  }

  #[track_caller]
  fn messages(errors: &[TypeError]) -> Vec<&str> {
    errors.iter().map(|error| error.message.as_str()).collect()
  }

  #[test]
  fn booleans() {
    assert_eq!(convert(&Boolean, &[]).0, Some(Value::Bool(true)));
    assert_eq!(convert(&Boolean, &["YES"]).0, Some(Value::Bool(true)));
    assert_eq!(convert(&Boolean, &["0"]).0, Some(Value::Bool(false)));
    let (value, errors) = convert(&Boolean, &["maybe"]);
    assert_eq!(value, None);
    assert_eq!(messages(&errors), ["Invalid boolean value: 'maybe'."]);
  }

  #[test]
  fn counter_increments_previous() {
    let previous = Value::Int(2);
    let mut cx = TypeContext::new(&[], Some(&previous));
    assert_eq!(Counter.parse(&mut cx), Some(Value::Int(3)));
    assert_eq!(convert(&Counter, &[]).0, Some(Value::Int(1)));
  }

  #[test]
  fn numbers() {
    assert_eq!(convert(&Integer, &["-42"]).0, Some(Value::Int(-42)));
    let (value, errors) = convert(&Integer, &["bar"]);
    assert_eq!(value, None);
    assert_eq!(messages(&errors), ["Invalid integer value: 'bar'."]);
    assert_eq!(convert(&Float, &["2.5"]).0, Some(Value::Float(2.5)));
    assert_eq!(
      messages(&convert(&Float, &["x"]).1),
      ["Invalid float value: 'x'."]
    );
  }

  #[test]
  fn int_range() {
    let ty = IntRange::new(1, 10);
    assert_eq!(convert(&ty, &["10"]).0, Some(Value::Int(10)));
    assert_eq!(
      messages(&convert(&ty, &["11"]).1),
      ["Value must be between 1 and 10."]
    );
    assert_eq!(
      messages(&convert(&ty, &["ten"]).1),
      ["Invalid integer value: 'ten'."]
    );
  }

  #[test]
  fn choices() {
    let ty = Choice::new(["Red", "Green"]);
    assert_eq!(convert(&ty, &["red"]).0, Some(Value::Text("Red".into())));
    assert_eq!(
      messages(&convert(&ty, &["blue"]).1),
      ["Invalid value: 'blue'. Expected one of: Red, Green."]
    );
  }

  #[test]
  fn files() {
    let dir = tempfile::tempdir().unwrap();
    let existing = dir.path().join("present.txt");
    std::fs::write(&existing, "").unwrap();
    let existing = existing.to_str().unwrap();
    let missing = dir.path().join("missing.txt");
    let missing = missing.to_str().unwrap();

    assert!(convert(&File::existing(), &[existing]).0.is_some());
    assert!(convert(&File::default(), &[missing]).0.is_some());
    let (value, errors) = convert(&File::existing(), &[missing]);
    assert_eq!(value, None);
    assert_eq!(errors.len(), 1);
  }

  #[test]
  fn many_offsets_errors() {
    let ty = Many::new(Integer, Range::between(1, 3));
    assert_eq!(ty.value_count(), Range::between(1, 3));
    assert_eq!(
      convert(&ty, &["1", "2"]).0,
      Some(Value::List(vec![Value::Int(1), Value::Int(2)]))
    );
    let (value, errors) = convert(&ty, &["1", "x", "y"]);
    assert_eq!(value, None);
    assert_eq!(
      errors.iter().map(|error| error.index).collect::<Vec<_>>(),
      [1, 2]
    );
  }

  #[test]
  fn key_values() {
    let ty = KeyValues::new(Integer);
    let (value, errors) = convert(&ty, &["a=1", "b=2"]);
    assert!(errors.is_empty());
    let map = value.unwrap();
    assert_eq!(map.as_map().unwrap()["b"], Value::Int(2));

    let (value, errors) = convert(&ty, &["a=1", "oops", "=3", "a=4", "c=x"]);
    assert_eq!(value, None);
    assert_eq!(messages(&errors), [
      "Invalid key-value pair: 'oops'.",
      "Key cannot be empty.",
      "Duplicate key: 'a'.",
      "Invalid integer value: 'x'.",
    ]);
    assert_eq!(
      errors.iter().map(|error| error.index).collect::<Vec<_>>(),
      [1, 2, 3, 4]
    );
  }
}
