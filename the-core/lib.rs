//! Terminal text primitives shared by the argument parser and its front-ends.

pub mod ansi;
pub mod text;
pub mod wrap;
