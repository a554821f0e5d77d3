use tracing::debug;

use crate::env::EnvLookup;
use crate::error::ParseErrorKind;
use crate::expand::{expand_variables, unescape};
use crate::model::{EnvMap, QuoteMode};

const EXPORT_PREFIX: &str = "export";

/// A failure anchored at the unconsumed input where it was detected.
#[derive(Debug)]
pub(crate) struct Failure<'a> {
    pub(crate) at: &'a str,
    pub(crate) kind: ParseErrorKind,
}

/// Skip blank space and comment lines, returning the input at the start of
/// the next assignment or `None` once nothing but those remains.
pub(crate) fn statement_start(cursor: &str) -> Option<&str> {
    let mut src = cursor;
    loop {
        src = src.trim_start();
        if src.is_empty() {
            return None;
        }
        if !src.starts_with('#') {
            return Some(src);
        }
        src = &src[src.find('\n')?..];
    }
}

/// Split `src` into a variable name and the input following its `=` or `:`.
///
/// The returned remainder has leading inline whitespace removed.
pub(crate) fn extract_key(src: &str) -> Result<(&str, &str), Failure<'_>> {
    let mut src = src;
    if let Some(rest) = src.strip_prefix(EXPORT_PREFIX)
        && rest.starts_with(char::is_whitespace)
    {
        src = rest.trim_start();
    }

    let mut key_end = 0usize;
    let mut gap: Option<(usize, char)> = None;

    for (idx, ch) in src.char_indices() {
        match ch {
            '=' | ':' => {
                let key = &src[..key_end];
                if key.is_empty() {
                    return Err(Failure {
                        at: &src[idx..],
                        kind: ParseErrorKind::EmptyKey,
                    });
                }
                let rest = src[idx + 1..].trim_start_matches(is_inline_space);
                return Ok((key, rest));
            }
            '\n' => {
                return Err(Failure {
                    at: &src[idx..],
                    kind: ParseErrorKind::MissingDelimiter,
                });
            }
            ch if is_inline_space(ch) => {
                if key_end > 0 && gap.is_none() {
                    gap = Some((idx, ch));
                }
            }
            ch if is_key_char(ch) => {
                if let Some((gap_idx, gap_ch)) = gap {
                    return Err(invalid_key_character(src, gap_idx, gap_ch));
                }
                key_end = idx + ch.len_utf8();
            }
            ch => return Err(invalid_key_character(src, idx, ch)),
        }
    }

    Err(Failure {
        at: &src[src.len()..],
        kind: ParseErrorKind::MissingDelimiter,
    })
}

/// Read the value at the start of `src`, returning it with the unconsumed
/// input that follows.
pub(crate) fn extract_value<'a, E>(
    src: &'a str,
    known: &EnvMap,
    env: &E,
    quote_mode: QuoteMode,
) -> Result<(String, &'a str), Failure<'a>>
where
    E: EnvLookup + ?Sized,
{
    let Some(quote) = src.chars().next().filter(|ch| matches!(*ch, '\'' | '"')) else {
        return Ok(extract_unquoted(src, known, env));
    };

    let Some(end_idx) = find_closing_quote(src, quote) else {
        return match quote_mode {
            QuoteMode::Strict => Err(Failure {
                at: src,
                kind: ParseErrorKind::UnterminatedQuote { quote },
            }),
            QuoteMode::Truncate => {
                debug!(%quote, "unterminated quote, discarding the rest of the input");
                Ok((String::new(), ""))
            }
        };
    };

    let body = &src[1..end_idx];
    let value = if quote == '"' {
        expand_variables(&unescape(body), known, env)
    } else {
        body.to_owned()
    };

    Ok((value, &src[end_idx + 1..]))
}

fn extract_unquoted<'a, E>(src: &'a str, known: &EnvMap, env: &E) -> (String, &'a str)
where
    E: EnvLookup + ?Sized,
{
    let line_end = src.find(['\n', '\r']).unwrap_or(src.len());
    let line = &src[..line_end];
    let value_end = inline_comment_start(line).unwrap_or(line.len());
    let value = line[..value_end].trim();

    (expand_variables(value, known, env), &src[line_end..])
}

// `#` only opens a comment right after whitespace; `A=#c` keeps `#c`.
fn inline_comment_start(line: &str) -> Option<usize> {
    let mut prev: Option<char> = None;
    for (idx, ch) in line.char_indices() {
        if ch == '#' && prev.is_some_and(is_inline_space) {
            return Some(idx);
        }
        prev = Some(ch);
    }
    None
}

// Any quote directly after a backslash is escaped, even when that backslash
// is itself escaped: `"a\\"b"` closes on the last quote.
fn find_closing_quote(src: &str, quote: char) -> Option<usize> {
    src.char_indices()
        .skip(1)
        .find(|&(idx, ch)| ch == quote && src.as_bytes()[idx - 1] != b'\\')
        .map(|(idx, _)| idx)
}

fn invalid_key_character(src: &str, idx: usize, character: char) -> Failure<'_> {
    let near = src.lines().next().unwrap_or_default().to_owned();
    Failure {
        at: &src[idx..],
        kind: ParseErrorKind::InvalidKeyCharacter { character, near },
    }
}

fn is_key_char(ch: char) -> bool {
    ch == '_' || ch == '.' || ch.is_alphabetic() || ch.is_numeric()
}

/// Whitespace allowed inside a statement: tab, vertical tab, form feed,
/// carriage return, space, NEL and NBSP. Line feed ends the statement.
fn is_inline_space(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\u{0B}' | '\u{0C}' | '\r' | ' ' | '\u{85}' | '\u{A0}'
    )
}
