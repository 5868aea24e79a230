//! Command line argument parsing with diagnostics that point at the input.
//!
//! An input string is split into tokens by the [`tokenizer`], one command
//! level at a time, and each level's tokens are matched against its
//! [`schema::Command`] by the [`parser`]. Problems never abort a parse: they
//! are collected per level and rendered by a [`format::ErrorFormatter`] with
//! the offending tokens highlighted.
//!
//! ```
//! use the_args::{
//!   arg_type::{Counter, Integer},
//!   schema::{Argument, Command},
//! };
//!
//! let command = Command::builder("app")
//!   .argument(Argument::new("number", Integer).positional())
//!   .argument(Argument::new("v", Counter))
//!   .build()
//!   .unwrap();
//!
//! let result = command.parse("12 -vv");
//! assert!(!result.is_failed());
//! assert_eq!(result.root().get("number").and_then(|value| value.as_int()), Some(12));
//! assert_eq!(result.root().usage_count("v"), 2);
//! ```

pub mod arg_type;
pub mod context;
pub mod error;
pub mod format;
pub mod input;
pub mod level;
pub mod parser;
pub mod range;
pub mod result;
pub mod schema;
pub mod token;
pub mod tokenizer;

pub use crate::{
  input::join_args,
  level::ErrorLevel,
  result::{
    CommandResult,
    ParseResult,
  },
};
