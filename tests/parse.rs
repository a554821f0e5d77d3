use std::collections::HashMap;

use dotscan::{EnvMap, EnvParser, Error, FnEnv, NoEnv, ParseErrorKind, parse_str};

fn parse(input: &str) -> Result<EnvMap, Error> {
    EnvParser::new().lookup(NoEnv).parse_str(input)
}

fn map(pairs: &[(&str, &str)]) -> EnvMap {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn parse_error_kind(input: &str) -> ParseErrorKind {
    match parse(input).expect_err("expected parse error") {
        Error::Parse(err) => err.kind,
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn comments_are_skipped() {
    assert_eq!(parse("# comment\nA=1").expect("parse"), map(&[("A", "1")]));
    assert_eq!(parse("A=1 # trailing").expect("parse"), map(&[("A", "1")]));
    assert_eq!(
        parse("A=1#nospace").expect("parse"),
        map(&[("A", "1#nospace")])
    );
}

#[test]
fn leading_hash_is_part_of_the_value() {
    assert_eq!(
        parse("COLOR=#ff0000\nB=1").expect("parse"),
        map(&[("B", "1"), ("COLOR", "#ff0000")])
    );
}

#[test]
fn quote_after_escaped_backslash_stays_open() {
    assert_eq!(
        parse("A=\"a\\\\\"b\"\nB=1").expect("parse"),
        map(&[("A", "a\\\"b"), ("B", "1")])
    );
    assert_eq!(
        parse("A='x\\\\' y'").expect("parse"),
        map(&[("A", "x\\\\' y")])
    );
}

#[test]
fn single_quotes_are_literal() {
    assert_eq!(
        parse("A='lit$eral'").expect("parse"),
        map(&[("A", "lit$eral")])
    );
}

#[test]
fn escaped_closing_quote_is_unterminated() {
    assert_eq!(
        parse_error_kind("A='x\\'"),
        ParseErrorKind::UnterminatedQuote { quote: '\'' }
    );
}

#[test]
fn double_quotes_resolve_newlines() {
    assert_eq!(
        parse("A=\"line1\\nline2\"").expect("parse"),
        map(&[("A", "line1\nline2")])
    );
}

#[test]
fn escaped_dollar_is_not_expanded() {
    let parsed = EnvParser::new()
        .lookup(FnEnv(|_: &str| Some("ambient".to_string())))
        .parse_str("A=\"a\\$b\"")
        .expect("parse");

    assert_eq!(parsed, map(&[("A", "a$b")]));
}

#[test]
fn references_resolve_in_file_order() {
    assert_eq!(
        parse("A=1\nB=${A}2").expect("parse"),
        map(&[("A", "1"), ("B", "12")])
    );
    assert_eq!(
        parse("B=${A}\nA=1").expect("parse"),
        map(&[("A", "1"), ("B", "")])
    );
}

#[test]
fn forward_references_fall_back_to_ambient_environment() {
    let ambient = HashMap::from([("A".to_string(), "ambient".to_string())]);
    let parsed = EnvParser::new()
        .lookup(ambient)
        .parse_str("B=${A}\nA=1")
        .expect("parse");

    assert_eq!(parsed, map(&[("A", "1"), ("B", "ambient")]));
}

#[test]
fn parsed_values_shadow_ambient_environment() {
    let ambient = map(&[("A", "ambient")]);
    let parsed = EnvParser::new()
        .lookup(&ambient)
        .parse_str("A=file\nB=$A\n")
        .expect("parse");

    assert_eq!(parsed["B"], "file");
}

#[test]
fn export_prefix_is_ignored() {
    assert_eq!(parse("export A=1").expect("parse"), parse("A=1").expect("parse"));
}

#[test]
fn invalid_key_reports_offending_space() {
    match parse("A B=1").expect_err("expected parse error") {
        Error::Parse(err) => {
            assert_eq!((err.line, err.column), (1, 2));
            assert_eq!(
                err.kind,
                ParseErrorKind::InvalidKeyCharacter {
                    character: ' ',
                    near: "A B=1".to_string(),
                }
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn error_messages_name_the_problem() {
    let err = parse("A-B=1").expect_err("expected parse error");

    assert_eq!(
        err.to_string(),
        "parse error at line 1, column 2: unexpected character '-' in variable name near \"A-B=1\""
    );
}

#[test]
fn single_quoted_values_round_trip() {
    let original = map(&[("A", "one two"), ("B", "$HOME \\n"), ("C", "")]);
    let serialized = original
        .iter()
        .map(|(key, value)| format!("{key}='{value}'"))
        .collect::<Vec<_>>()
        .join("\n");

    assert_eq!(parse(&serialized).expect("parse"), original);
}

#[test]
fn subshell_syntax_is_left_alone() {
    assert_eq!(
        parse("CMD=\"$(date) at ${HOUR}\"").expect("parse")["CMD"],
        "$(date) at "
    );
}

#[test]
fn unquoted_values_keep_backslashes() {
    assert_eq!(parse("P=C:\\dir\\n").expect("parse")["P"], "C:\\dir\\n");
}

#[test]
fn process_environment_is_the_default_fallback() {
    let Some((name, value)) = std::env::vars_os()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
        .find(|(name, _)| {
            !name.is_empty()
                && name
                    .bytes()
                    .all(|byte| byte.is_ascii_uppercase() || byte.is_ascii_digit() || byte == b'_')
        })
    else {
        return;
    };

    let parsed = parse_str(&format!("X_DOTSCAN_TEST=${{{name}}}")).expect("parse");
    assert_eq!(parsed["X_DOTSCAN_TEST"], value);
}
