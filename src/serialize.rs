use crate::model::EnvMap;

const DOUBLE_QUOTE_SPECIAL_CHARS: [char; 7] = ['\\', '\n', '\r', '"', '!', '$', '`'];

/// Render `vars` as dotenv text that parses back to the same map.
///
/// Lines are sorted by key and joined with `\n`. Integer values are written
/// bare, everything else double-quoted with [`double_quote_escape`].
///
/// A value ending in a backslash does not survive the round trip: the escaped
/// backslash sits right before the closing quote, which the parser then treats
/// as escaped.
pub fn marshal(vars: &EnvMap) -> String {
    vars.iter()
        .map(|(key, value)| {
            if value.parse::<i64>().is_ok() {
                format!("{key}={value}")
            } else {
                format!("{key}=\"{}\"", double_quote_escape(value))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape `value` for use between double quotes.
///
/// Line feed and carriage return are written as `\n` and `\r`; backslash,
/// `"`, `!`, `$` and backtick get a leading backslash.
pub fn double_quote_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ch if DOUBLE_QUOTE_SPECIAL_CHARS.contains(&ch) => {
                out.push('\\');
                out.push(ch);
            }
            ch => out.push(ch),
        }
    }
    out
}
