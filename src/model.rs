use std::collections::BTreeMap;

/// Parsed variables, keyed by name.
pub type EnvMap = BTreeMap<String, String>;

/// Behavior when a quoted value is opened but never closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteMode {
    /// Fail with [`ParseErrorKind::UnterminatedQuote`](crate::ParseErrorKind::UnterminatedQuote).
    #[default]
    Strict,
    /// Store an empty value for the key and stop parsing, keeping every
    /// earlier entry. Matches what legacy godotenv-style parsers do.
    Truncate,
}
