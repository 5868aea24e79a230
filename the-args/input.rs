//! Building the input string from a process argument vector.

use the_core::text::quote;

/// Joins `args` into one input string. Elements that would not read back as
/// a single word are quoted.
///
/// ```
/// use the_args::join_args;
///
/// assert_eq!(join_args(["--name", "John Doe"]), r#"--name "John Doe""#);
/// ```
pub fn join_args<I, S>(args: I) -> String
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut out = String::new();
  for (i, arg) in args.into_iter().enumerate() {
    if i > 0 {
      out.push(' ');
    }
    out.push_str(&quote(arg.as_ref()));
  }
  out
}
