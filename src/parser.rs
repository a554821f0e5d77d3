use std::borrow::Cow;
use std::io::BufRead;

use tracing::{debug, trace};

use crate::env::{EnvLookup, ProcessEnv};
use crate::error::{Error, ParseError};
use crate::model::{EnvMap, QuoteMode};
use crate::statement::{Failure, extract_key, extract_value, statement_start};

/// Parse dotenv text, expanding references against the process environment.
pub fn parse_str(input: &str) -> Result<EnvMap, Error> {
    EnvParser::new().parse_str(input)
}

/// Parse dotenv text from UTF-8 bytes.
pub fn parse_bytes(input: &[u8]) -> Result<EnvMap, Error> {
    EnvParser::new().parse_bytes(input)
}

/// Parse dotenv text from a buffered reader.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<EnvMap, Error> {
    EnvParser::new().parse_reader(reader)
}

/// Parse dotenv text into an existing map.
///
/// Entries already in `out` are visible to expansion and are overwritten by
/// assignments of the same name. On error, assignments before the failing
/// statement remain in `out`.
pub fn parse_into(input: &str, out: &mut EnvMap) -> Result<(), Error> {
    EnvParser::new().parse_into(input, out)
}

/// Builder-style dotenv parser.
///
/// ```
/// use dotscan::{EnvMap, EnvParser, QuoteMode};
///
/// let mut ambient = EnvMap::new();
/// ambient.insert("HOME".to_string(), "/home/app".to_string());
///
/// let vars = EnvParser::new()
///     .lookup(ambient)
///     .quote_mode(QuoteMode::Strict)
///     .parse_str("CACHE=${HOME}/.cache\n")
///     .unwrap();
/// assert_eq!(vars["CACHE"], "/home/app/.cache");
/// ```
#[derive(Debug, Clone)]
pub struct EnvParser<E = ProcessEnv> {
    lookup: E,
    quote_mode: QuoteMode,
}

impl EnvParser {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for EnvParser {
    fn default() -> Self {
        Self {
            lookup: ProcessEnv,
            quote_mode: QuoteMode::default(),
        }
    }
}

impl<E: EnvLookup> EnvParser<E> {
    /// Replace the fallback source consulted for names not yet parsed.
    pub fn lookup<L: EnvLookup>(self, lookup: L) -> EnvParser<L> {
        EnvParser {
            lookup,
            quote_mode: self.quote_mode,
        }
    }

    pub fn quote_mode(mut self, quote_mode: QuoteMode) -> Self {
        self.quote_mode = quote_mode;
        self
    }

    pub fn parse_str(&self, input: &str) -> Result<EnvMap, Error> {
        let mut out = EnvMap::new();
        self.parse_into(input, &mut out)?;
        Ok(out)
    }

    pub fn parse_bytes(&self, input: &[u8]) -> Result<EnvMap, Error> {
        let text = std::str::from_utf8(input)?;
        self.parse_str(text)
    }

    pub fn parse_reader<R: BufRead>(&self, mut reader: R) -> Result<EnvMap, Error> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.parse_bytes(&buf)
    }

    pub fn parse_into(&self, input: &str, out: &mut EnvMap) -> Result<(), Error> {
        parse_statements(input, out, &self.lookup, self.quote_mode).map_err(Error::from)
    }
}

fn parse_statements<E>(
    input: &str,
    out: &mut EnvMap,
    env: &E,
    quote_mode: QuoteMode,
) -> Result<(), ParseError>
where
    E: EnvLookup + ?Sized,
{
    let normalized = normalize_newlines(input);
    let input = normalized.as_ref();
    let locate = |failure: Failure<'_>| ParseError::at(input, failure.at, failure.kind);

    let mut cursor = input;
    while let Some(statement) = statement_start(cursor) {
        let (key, rest) = extract_key(statement).map_err(locate)?;
        let (value, rest) = extract_value(rest, out, env, quote_mode).map_err(locate)?;

        trace!(key, "parsed variable");
        if out.insert(key.to_owned(), value).is_some() {
            debug!(key, "replaced earlier value");
        }
        cursor = rest;
    }

    Ok(())
}

fn normalize_newlines(input: &str) -> Cow<'_, str> {
    if input.contains("\r\n") {
        Cow::Owned(input.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(input)
    }
}
