//! `mysh`: a minimal command interpreter.
//!
//! A line is split into words, `*` patterns are expanded against the
//! filesystem, and the result either runs a builtin (`cd`, `pwd`) in-process
//! or forks and execs an external program. A single `|` connects two
//! programs through a pipe.

pub mod builtins;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod session;

pub use error::ShellError;
