use crate::env::EnvLookup;
use crate::model::EnvMap;

/// Substitute `$NAME` and `${NAME}` references in `input`.
///
/// Names are one or more of `A-Z`, `0-9` and `_`. A name resolves to its
/// value in `known`, then in `env`, and to an empty string when neither has
/// it. Substituted text is not scanned again.
///
/// `\$` produces a literal `$` and `$(` is copied through unchanged; in both
/// cases the name that follows is not expanded. Every other `$` is literal.
pub fn expand_variables<E>(input: &str, known: &EnvMap, env: &E) -> String
where
    E: EnvLookup + ?Sized,
{
    if !input.contains('$') {
        return input.to_owned();
    }

    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut cursor = 0usize;
    let mut idx = 0usize;

    while idx < bytes.len() {
        let escaped = bytes[idx] == b'\\' && bytes.get(idx + 1) == Some(&b'$');
        if bytes[idx] != b'$' && !escaped {
            idx += 1;
            continue;
        }

        let dollar = if escaped { idx + 1 } else { idx };
        let reference = scan_reference(bytes, dollar);
        out.push_str(&input[cursor..idx]);

        match reference.name {
            _ if escaped => out.push_str(&input[dollar..reference.end]),
            Some((start, end)) if !reference.subshell => {
                out.push_str(&resolve(&input[start..end], known, env));
            }
            _ => out.push_str(&input[idx..reference.end]),
        }

        cursor = reference.end;
        idx = reference.end;
    }

    out.push_str(&input[cursor..]);
    out
}

/// Resolve backslash escapes in the body of a double-quoted value.
///
/// `\n` and `\r` become line feed and carriage return. Any other `\X` becomes
/// `X`, except `\$`, which is kept for [`expand_variables`].
pub fn unescape(input: &str) -> String {
    if !input.contains('\\') {
        return input.to_owned();
    }
    strip_backslashes(&resolve_control_escapes(input))
}

struct Reference {
    /// Byte range of the variable name, if one follows the `$`.
    name: Option<(usize, usize)>,
    subshell: bool,
    end: usize,
}

fn scan_reference(bytes: &[u8], dollar: usize) -> Reference {
    let mut end = dollar + 1;

    let subshell = bytes.get(end) == Some(&b'(');
    if subshell {
        end += 1;
    }

    let braced = bytes.get(end) == Some(&b'{');
    if braced {
        end += 1;
    }

    let name_start = end;
    while end < bytes.len() && is_name_byte(bytes[end]) {
        end += 1;
    }
    let name = (end > name_start).then_some((name_start, end));

    if braced && bytes.get(end) == Some(&b'}') {
        end += 1;
    }

    Reference {
        name,
        subshell,
        end,
    }
}

fn resolve<E>(name: &str, known: &EnvMap, env: &E) -> String
where
    E: EnvLookup + ?Sized,
{
    known
        .get(name)
        .cloned()
        .or_else(|| env.lookup(name))
        .unwrap_or_default()
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte.is_ascii_digit() || byte == b'_'
}

// Pairs are consumed left to right, so in `\\n` the escaped backslash shields the `n`.
fn resolve_control_escapes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.peek().copied() {
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('r') => {
                chars.next();
                out.push('\r');
            }
            Some(next) if next != '\n' => {
                chars.next();
                out.push('\\');
                out.push(next);
            }
            _ => out.push('\\'),
        }
    }

    out
}

fn strip_backslashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\'
            && let Some(&next) = chars.peek()
            && next != '$'
        {
            chars.next();
            out.push(next);
            continue;
        }
        out.push(ch);
    }

    out
}
