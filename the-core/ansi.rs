//! ANSI styling and escape-sequence aware measurement.
//!
//! Styling is delegated to crossterm. Whether sequences are emitted at all is
//! decided by a [`Painter`], which is passed around explicitly instead of
//! living in a process-wide toggle.

use std::borrow::Cow;

pub use crossterm::style::{
  Attribute,
  Color,
};
use crossterm::style::{
  Attributes,
  ContentStyle,
  StyledContent,
};
use unicode_width::UnicodeWidthStr;

const ESC: char = '\u{1b}';

/// A foreground color plus a set of text attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
  pub fg:         Option<Color>,
  pub attributes: Attributes,
}

impl Style {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn fg(mut self, color: Color) -> Self {
    self.fg = Some(color);
    self
  }

  pub fn add(mut self, attribute: Attribute) -> Self {
    self.attributes.set(attribute);
    self
  }

  /// Layers `other` on top of `self`. The foreground of `other` wins when set
  /// and attributes are merged.
  pub fn patch(mut self, other: Style) -> Self {
    if other.fg.is_some() {
      self.fg = other.fg;
    }
    self.attributes.extend(other.attributes);
    self
  }

  pub fn is_plain(&self) -> bool {
    self.fg.is_none() && self.attributes.is_empty()
  }

  fn content_style(self) -> ContentStyle {
    let mut style = ContentStyle::new();
    style.foreground_color = self.fg;
    style.attributes = self.attributes;
    style
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
  enabled: bool,
}

impl Painter {
  pub const fn new(enabled: bool) -> Self {
    Self { enabled }
  }

  pub const fn is_enabled(&self) -> bool {
    self.enabled
  }

  /// Wraps `text` in the escape sequences for `style`. Returns the text
  /// untouched when the painter is disabled.
  pub fn paint<'a>(&self, text: &'a str, style: Style) -> Cow<'a, str> {
    if !self.enabled || text.is_empty() || style.is_plain() {
      return Cow::Borrowed(text);
    }
    Cow::Owned(StyledContent::new(style.content_style(), text).to_string())
  }
}

/// Removes every ANSI escape sequence from `text`.
///
/// CSI sequences (`ESC [ ... final`) are skipped up to and including their
/// final byte. Any other escape drops the `ESC` and the character after it.
pub fn strip_sequences(text: &str) -> Cow<'_, str> {
  if !text.contains(ESC) {
    return Cow::Borrowed(text);
  }

  let mut out = String::with_capacity(text.len());
  let mut chars = text.chars();
  while let Some(ch) = chars.next() {
    if ch != ESC {
      out.push(ch);
      continue;
    }
    match chars.next() {
      Some('[') => {
        for ch in chars.by_ref() {
          if ('\u{40}'..='\u{7e}').contains(&ch) {
            break;
          }
        }
      },
      Some(_) | None => {},
    }
  }
  Cow::Owned(out)
}

/// Returns the number of terminal columns `text` occupies, ignoring escape
/// sequences.
pub fn display_width(text: &str) -> usize {
  strip_sequences(text).width()
}
