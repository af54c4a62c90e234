//! Identifiers and qualified names.

use serde::{Deserialize, Serialize};

use super::SourceSpan;
use crate::lexer::Span;

/// An identifier.
///
/// Unquoted identifiers are stored folded to lower case; quoted identifiers
/// keep their case. Equality compares the folded value only, so `"abc"` and
/// `abc` name the same thing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ident {
    /// The identifier value.
    pub value: String,
    /// Whether the identifier was written in double quotes.
    pub quoted: bool,
    /// Source range.
    pub span: SourceSpan,
}

impl Ident {
    /// Creates an unquoted identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
            span: SourceSpan::default(),
        }
    }

    /// Creates a quoted identifier.
    #[must_use]
    pub fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: true,
            span: SourceSpan::default(),
        }
    }

    /// Sets the source range.
    #[must_use]
    pub const fn with_span(mut self, span: Span) -> Self {
        self.span = SourceSpan(span);
        self
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Ident {}

/// A possibly qualified name (`schema.table`, `db.schema.table.column`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectName {
    /// The dot-separated parts, outermost first.
    pub parts: Vec<Ident>,
    /// Source range.
    pub span: SourceSpan,
}

impl ObjectName {
    /// Creates a name from its parts, spanning from the first to the last.
    #[must_use]
    pub fn new(parts: Vec<Ident>) -> Self {
        let span = match (parts.first(), parts.last()) {
            (Some(first), Some(last)) => first.span.get().merge(last.span.get()),
            _ => Span::default(),
        };
        Self {
            parts,
            span: SourceSpan(span),
        }
    }

    /// Returns the unqualified (last) part.
    #[must_use]
    pub fn base(&self) -> Option<&Ident> {
        self.parts.last()
    }

    /// Returns true if the name has a single part equal to `value`.
    #[must_use]
    pub fn is_simple(&self, value: &str) -> bool {
        matches!(self.parts.as_slice(), [only] if only.value == value)
    }
}

impl From<Ident> for ObjectName {
    fn from(ident: Ident) -> Self {
        Self::new(vec![ident])
    }
}

/// A table alias with optional column aliases: `AS t (a, b)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAlias {
    /// Alias name.
    pub name: Ident,
    /// Column aliases.
    pub columns: Vec<Ident>,
    /// Source range.
    pub span: SourceSpan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_equality_ignores_quoting() {
        assert_eq!(Ident::new("abc"), Ident::quoted("abc"));
        assert_ne!(Ident::new("abc"), Ident::quoted("Abc"));
    }

    #[test]
    fn test_object_name_span() {
        let name = ObjectName::new(vec![
            Ident::new("s").with_span(Span::new(5, 6)),
            Ident::new("t").with_span(Span::new(7, 8)),
        ]);
        assert_eq!(name.span.get(), Span::new(5, 8));
        assert_eq!(name.base().map(|i| i.value.as_str()), Some("t"));
        assert!(!name.is_simple("t"));
    }
}
