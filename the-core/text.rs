//! Small string helpers for user-facing messages.

use std::borrow::Cow;

use crate::ansi;

/// Formats a count with its noun, adding an `s` unless the count is one.
///
/// ```
/// use the_core::text::plural;
///
/// assert_eq!(plural("value", 1), "1 value");
/// assert_eq!(plural("time", 3), "3 times");
/// ```
pub fn plural(noun: &str, count: usize) -> String {
  if count == 1 {
    format!("{count} {noun}")
  } else {
    format!("{count} {noun}s")
  }
}

/// Returns the display width of the widest line of `text`, ignoring escape
/// sequences.
pub fn longest_line_width(text: &str) -> usize {
  text.lines().map(ansi::display_width).max().unwrap_or(0)
}

fn needs_quoting(text: &str) -> bool {
  text.is_empty()
    || text
      .chars()
      .any(|ch| ch.is_whitespace() || matches!(ch, '"' | '\'' | '\\'))
}

/// Wraps `text` in double quotes when it would not survive whitespace
/// splitting as a single word. Embedded `"` and `\` are escaped with a
/// backslash.
pub fn quote(text: &str) -> Cow<'_, str> {
  if !needs_quoting(text) {
    return Cow::Borrowed(text);
  }

  let mut out = String::with_capacity(text.len() + 2);
  out.push('"');
  for ch in text.chars() {
    if matches!(ch, '"' | '\\') {
      out.push('\\');
    }
    out.push(ch);
  }
  out.push('"');
  Cow::Owned(out)
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn plural_forms() {
    assert_eq!(plural("value", 0), "0 values");
    assert_eq!(plural("value", 1), "1 value");
    assert_eq!(plural("usage", 2), "2 usages");
  }

  #[test]
  fn longest_line() {
    assert_eq!(longest_line_width(""), 0);
    assert_eq!(longest_line_width("ab\nabcd\nabc"), 4);
    assert_eq!(longest_line_width("\u{1b}[31mabcdef\u{1b}[0m\nab"), 6);
  }

  #[test]
  fn quoting() {
    assert_eq!(quote("plain"), "plain");
    assert_eq!(quote(""), r#""""#);
    assert_eq!(quote("two words"), r#""two words""#);
    assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
    assert_eq!(quote(r"a\b"), r#""a\\b""#);
  }
}
