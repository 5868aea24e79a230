//! Word wrapping on Unicode line-break opportunities.

pub use unicode_linebreak::BreakOpportunity;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Returns an iterator over line break opportunities in the given string.
///
/// Each item is a `(byte_index, BreakOpportunity)` pair indicating where a line
/// break may or must occur.
#[inline]
pub fn soft_breaks(text: &str) -> impl Iterator<Item = (usize, BreakOpportunity)> + '_ {
  unicode_linebreak::linebreaks(text)
}

/// Wraps `text` so that no line is wider than `width` columns.
///
/// Existing newlines are kept. Lines are broken at the allowed break
/// opportunities, and a single word wider than `width` is split between
/// grapheme clusters. A `width` of zero disables wrapping.
pub fn wrap(text: &str, width: usize) -> String {
  if width == 0 {
    return text.to_string();
  }

  let mut out = String::with_capacity(text.len());
  for (i, line) in text.split('\n').enumerate() {
    if i > 0 {
      out.push('\n');
    }
    wrap_line(line, width, &mut out);
  }
  out
}

fn wrap_line(line: &str, width: usize, out: &mut String) {
  let mut current = String::new();
  let mut current_width = 0;
  let mut start = 0;

  for (end, _) in soft_breaks(line) {
    let segment = &line[start..end];
    start = end;
    if segment.is_empty() {
      continue;
    }

    let segment_width = segment.trim_end().width();
    if current_width > 0 && current_width + segment_width > width {
      flush(&mut current, &mut current_width, out);
    }

    if segment_width > width {
      for grapheme in segment.graphemes(true) {
        let grapheme_width = grapheme.width();
        if current_width > 0 && current_width + grapheme_width > width {
          flush(&mut current, &mut current_width, out);
        }
        current.push_str(grapheme);
        current_width += grapheme_width;
      }
      continue;
    }

    current.push_str(segment);
    current_width += segment.width();
  }

  out.push_str(current.trim_end());
}

fn flush(current: &mut String, current_width: &mut usize, out: &mut String) {
  out.push_str(current.trim_end());
  out.push('\n');
  current.clear();
  *current_width = 0;
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn short_text_is_untouched() {
    assert_eq!(wrap("hello world", 80), "hello world");
    assert_eq!(wrap("", 80), "");
  }

  #[test]
  fn keeps_newlines() {
    assert_eq!(wrap("one\ntwo", 80), "one\ntwo");
  }

  #[test]
  fn breaks_between_words() {
    assert_eq!(wrap("aaa bbb ccc", 7), "aaa bbb\nccc");
    assert_eq!(wrap("aaa bbb ccc", 3), "aaa\nbbb\nccc");
  }

  #[test]
  fn splits_long_words() {
    assert_eq!(wrap("abcdefgh", 3), "abc\ndef\ngh");
  }

  #[test]
  fn zero_width_disables_wrapping() {
    assert_eq!(wrap("aaa bbb ccc", 0), "aaa bbb ccc");
  }

  quickcheck::quickcheck! {
    fn wrapped_lines_fit(text: String, width: u8) -> bool {
      let width = (width as usize % 40) + 2;
      let text: String = text.chars().filter(|ch| !ch.is_control()).collect();
      wrap(&text, width).lines().all(|line| line.width() <= width)
    }
  }
}
