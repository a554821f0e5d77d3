//! Parse shell-style `.env` files.
//!
//! Input is read as `KEY=VALUE` (or `KEY: VALUE`) statements with optional
//! `export` prefixes, `#` comments, single-quoted literals and double-quoted
//! values that support backslash escapes. `$NAME` and `${NAME}` references
//! are expanded as each value is parsed, against earlier assignments first
//! and an [`EnvLookup`] second.
//!
//! Parsing never mutates the process environment; applying the resulting
//! [`EnvMap`] is left to the caller.

mod env;
mod error;
mod expand;
mod model;
mod parser;
mod serialize;
mod statement;

pub use env::{EnvLookup, FnEnv, NoEnv, ProcessEnv};
pub use error::{Error, ParseError, ParseErrorKind};
pub use expand::{expand_variables, unescape};
pub use model::{EnvMap, QuoteMode};
pub use parser::{EnvParser, parse_bytes, parse_into, parse_reader, parse_str};
pub use serialize::{double_quote_escape, marshal};
