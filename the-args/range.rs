//! Inclusive count bounds for argument values and usages.

use std::fmt;

use the_core::text::plural;

/// A `(min, max)` pair where `max` may be unbounded.
///
/// `Range::NONE` (`0..=0`) marks arguments that take no values, such as flags
/// and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
  min: usize,
  max: Option<usize>,
}

impl Range {
  pub const NONE: Self = Self::exactly(0);
  pub const ONE: Self = Self::exactly(1);
  pub const ZERO_OR_ONE: Self = Self::between(0, 1);
  pub const ANY: Self = Self::at_least(0);
  pub const AT_LEAST_ONE: Self = Self::at_least(1);

  pub const fn exactly(count: usize) -> Self {
    Self {
      min: count,
      max: Some(count),
    }
  }

  /// Panics if `max < min`; bounds are declared by the schema author, never
  /// derived from user input.
  pub const fn between(min: usize, max: usize) -> Self {
    assert!(min <= max, "range minimum is greater than its maximum");
    Self {
      min,
      max: Some(max),
    }
  }

  pub const fn at_least(min: usize) -> Self {
    Self { min, max: None }
  }

  pub const fn min(&self) -> usize {
    self.min
  }

  /// The upper bound, or `None` when unbounded.
  pub const fn max(&self) -> Option<usize> {
    self.max
  }

  pub fn max_or_usize(&self) -> usize {
    self.max.unwrap_or(usize::MAX)
  }

  pub fn is_zero(&self) -> bool {
    self.max == Some(0)
  }

  pub fn is_unbounded(&self) -> bool {
    self.max.is_none()
  }

  /// Whether the bounds differ, e.g. `1..=3` as opposed to `2..=2`.
  pub fn is_range(&self) -> bool {
    self.max != Some(self.min)
  }

  pub fn contains(&self, count: usize) -> bool {
    count >= self.min && count <= self.max_or_usize()
  }

  /// Describes the bounds for an error message, for example `"2 values"` or
  /// `"from 1 to 3 values"`.
  pub fn message(&self, noun: &str) -> String {
    match self.max {
      Some(max) if max == self.min => plural(noun, max),
      Some(max) => format!("from {} to {max} {noun}s", self.min),
      None => format!("from {} to any number of {noun}s", self.min),
    }
  }
}

impl fmt::Display for Range {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.max {
      Some(max) if max == self.min => write!(f, "{{{max}}}"),
      Some(max) => write!(f, "{{{}, {max}}}", self.min),
      None => write!(f, "{{{}, ...}}", self.min),
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn bounds() {
    assert!(Range::NONE.is_zero());
    assert!(!Range::ONE.is_zero());
    assert!(Range::ANY.contains(0));
    assert!(Range::ANY.contains(usize::MAX));
    assert!(!Range::AT_LEAST_ONE.contains(0));
    assert!(Range::between(1, 3).contains(3));
    assert!(!Range::between(1, 3).contains(4));
  }

  #[test]
  fn messages() {
    assert_eq!(Range::ONE.message("value"), "1 value");
    assert_eq!(Range::exactly(2).message("value"), "2 values");
    assert_eq!(Range::NONE.message("value"), "0 values");
    assert_eq!(Range::between(1, 3).message("value"), "from 1 to 3 values");
    assert_eq!(Range::between(2, 4).message("usage"), "from 2 to 4 usages");
    assert_eq!(
      Range::AT_LEAST_ONE.message("usage"),
      "from 1 to any number of usages"
    );
  }

  #[test]
  fn display() {
    assert_eq!(Range::ONE.to_string(), "{1}");
    assert_eq!(Range::between(1, 3).to_string(), "{1, 3}");
    assert_eq!(Range::ANY.to_string(), "{0, ...}");
  }

  #[test]
  #[should_panic]
  fn inverted_bounds_panic() {
    let _ = Range::between(3, 1);
  }
}
