//! Token types for the SQL lexer.

use serde::Serialize;

use super::{Keyword, LexErrorKind, Span};

/// Token kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    // Literals
    /// Integer literal that fits in an `i64`.
    Integer(i64),
    /// Any other numeric literal, kept as written (`1.5`, `1e10`, huge integers).
    Numeric(String),
    /// String literal with escapes already resolved.
    String(String),
    /// Bit-string literal (`B'0101'`), digits only.
    BitString(String),
    /// Hexadecimal bit-string literal (`X'1F'`), digits only.
    HexString(String),
    /// Numbered parameter (`$1`).
    Parameter(u32),

    // Names
    /// Unquoted identifier, folded to lower case.
    Identifier(String),
    /// Quoted identifier, case preserved.
    QuotedIdentifier(String),
    /// Keyword.
    Keyword(Keyword),

    // Operators
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `^`
    Caret,
    /// `=`
    Eq,
    /// `<>` or `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `||`
    Concat,
    /// `->`
    Arrow,
    /// `->>`
    LongArrow,
    /// `#>`
    HashArrow,
    /// `#>>`
    HashLongArrow,
    /// `@>`
    AtArrow,
    /// `<@`
    ArrowAt,
    /// `?` (parameter marker or JSON key-exists operator)
    Question,
    /// `?|`
    QuestionPipe,
    /// `?&`
    QuestionAnd,
    /// `#-`
    HashMinus,
    /// `@?`
    AtQuestion,
    /// `@@`
    AtAt,
    /// Any other operator (`~`, `!~*`, `&&`, `<<`, ...).
    Operator(String),

    // Punctuation
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `.`
    Dot,
    /// `:`
    Colon,
    /// `::`
    DoubleColon,
    /// `:=`
    ColonEquals,
    /// `=>`
    FatArrow,

    // Special
    /// A malformed token.
    Error(LexErrorKind),
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Maps operator text to its token kind.
    #[must_use]
    pub fn from_operator(text: &str) -> Self {
        match text {
            "+" => Self::Plus,
            "-" => Self::Minus,
            "*" => Self::Star,
            "/" => Self::Slash,
            "%" => Self::Percent,
            "^" => Self::Caret,
            "=" => Self::Eq,
            "<>" | "!=" => Self::NotEq,
            "<" => Self::Lt,
            "<=" => Self::LtEq,
            ">" => Self::Gt,
            ">=" => Self::GtEq,
            "||" => Self::Concat,
            "->" => Self::Arrow,
            "->>" => Self::LongArrow,
            "#>" => Self::HashArrow,
            "#>>" => Self::HashLongArrow,
            "@>" => Self::AtArrow,
            "<@" => Self::ArrowAt,
            "?" => Self::Question,
            "?|" => Self::QuestionPipe,
            "?&" => Self::QuestionAnd,
            "#-" => Self::HashMinus,
            "@?" => Self::AtQuestion,
            "@@" => Self::AtAt,
            "=>" => Self::FatArrow,
            _ => Self::Operator(text.to_string()),
        }
    }

    /// Returns the operator text if this token is an operator.
    #[must_use]
    pub fn operator_text(&self) -> Option<&str> {
        Some(match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Caret => "^",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Concat => "||",
            Self::Arrow => "->",
            Self::LongArrow => "->>",
            Self::HashArrow => "#>",
            Self::HashLongArrow => "#>>",
            Self::AtArrow => "@>",
            Self::ArrowAt => "<@",
            Self::Question => "?",
            Self::QuestionPipe => "?|",
            Self::QuestionAnd => "?&",
            Self::HashMinus => "#-",
            Self::AtQuestion => "@?",
            Self::AtAt => "@@",
            Self::Operator(op) => op,
            _ => return None,
        })
    }

    /// Returns true for tokens that are operators.
    #[must_use]
    pub fn is_operator(&self) -> bool {
        self.operator_text().is_some()
    }

    /// Returns the keyword if this token is one.
    #[must_use]
    pub const fn keyword(&self) -> Option<Keyword> {
        match self {
            Self::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }
}

/// A token with its kind, raw source text and span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token<'a> {
    /// The token kind.
    pub kind: TokenKind,
    /// The slice of the input covered by the token.
    pub text: &'a str,
    /// The source location.
    pub span: Span,
}

impl<'a> Token<'a> {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, text: &'a str, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this is a keyword token.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword(_))
    }

    /// Returns true if this token is the given keyword.
    #[must_use]
    pub fn is(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_operator_known() {
        assert_eq!(TokenKind::from_operator("->>"), TokenKind::LongArrow);
        assert_eq!(TokenKind::from_operator("!="), TokenKind::NotEq);
        assert_eq!(TokenKind::from_operator("<>"), TokenKind::NotEq);
        assert_eq!(TokenKind::from_operator("@@"), TokenKind::AtAt);
    }

    #[test]
    fn test_from_operator_custom() {
        assert_eq!(
            TokenKind::from_operator("!~*"),
            TokenKind::Operator(String::from("!~*"))
        );
    }

    #[test]
    fn test_operator_text() {
        assert_eq!(TokenKind::HashMinus.operator_text(), Some("#-"));
        assert_eq!(TokenKind::Comma.operator_text(), None);
        assert!(TokenKind::Operator(String::from("&&")).is_operator());
    }

    #[test]
    fn test_token_predicates() {
        let tok = Token::new(TokenKind::Keyword(Keyword::Select), "select", Span::new(0, 6));
        assert!(tok.is_keyword());
        assert!(tok.is(Keyword::Select));
        assert!(!tok.is_eof());
    }
}
