//! Parser configuration options.

use serde::{Deserialize, Serialize};

/// Default nesting limit for expressions, subqueries and joins.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default limit on the links of one operator, postfix, join or set-operation chain.
pub const DEFAULT_MAX_CHAIN_LEN: usize = 256;

/// Options controlling a single parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Reject inputs longer than this many bytes before lexing (None = no limit).
    pub max_input_len: Option<usize>,
    /// Maximum nesting depth of expressions, subqueries and joins.
    pub max_depth: usize,
    /// Maximum number of open chain links (`a + b + ...`, `a JOIN b JOIN ...`).
    ///
    /// Chains are parsed in a loop but produce left-deep trees. Together with
    /// `max_depth` this bounds the depth of every tree the parser returns.
    pub max_chain_len: usize,
    /// Whether `?` in operand position is a positional parameter marker.
    pub allow_question_mark_parameters: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_input_len: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_chain_len: DEFAULT_MAX_CHAIN_LEN,
            allow_question_mark_parameters: true,
        }
    }
}

impl ParserOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input size limit in bytes.
    #[must_use]
    pub const fn max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = Some(len);
        self
    }

    /// Sets the nesting limit.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the chain length limit.
    #[must_use]
    pub const fn max_chain_len(mut self, len: usize) -> Self {
        self.max_chain_len = len;
        self
    }

    /// Enables or disables `?` parameter markers.
    #[must_use]
    pub const fn allow_question_mark_parameters(mut self, allow: bool) -> Self {
        self.allow_question_mark_parameters = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParserOptions::default();
        assert_eq!(options.max_input_len, None);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(options.max_chain_len, DEFAULT_MAX_CHAIN_LEN);
        assert!(options.allow_question_mark_parameters);
    }

    #[test]
    fn test_builder() {
        let options = ParserOptions::new()
            .max_input_len(1024)
            .max_depth(16)
            .max_chain_len(32)
            .allow_question_mark_parameters(false);
        assert_eq!(options.max_input_len, Some(1024));
        assert_eq!(options.max_depth, 16);
        assert_eq!(options.max_chain_len, 32);
        assert!(!options.allow_question_mark_parameters);
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let options: ParserOptions = serde_json::from_str(r#"{"max_depth": 8}"#).unwrap();
        assert_eq!(options.max_depth, 8);
        assert_eq!(options.max_chain_len, DEFAULT_MAX_CHAIN_LEN);
        assert!(options.allow_question_mark_parameters);
    }
}
