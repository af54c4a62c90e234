//! Pratt parsing utilities for expression parsing.
//!
//! Binding powers follow PostgreSQL's operator precedence table. Each level
//! uses an odd left power and the next even right power, so operators at
//! the same level associate to the left.

use crate::ast::{BinaryOp, LikeKind};
use crate::lexer::TokenKind;

pub(super) use crate::ast::precedence as bp;

/// An operator in infix or postfix position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum InfixOp {
    /// A plain binary operator.
    Binary(BinaryOp),
    /// `OPERATOR(schema.op)`; the operator itself is parsed after dispatch.
    Qualified,
    /// `IS [NOT] ...`
    Is,
    /// `ISNULL`
    IsNull,
    /// `NOTNULL`
    NotNull,
    /// `[NOT] BETWEEN`
    Between { negated: bool },
    /// `[NOT] IN`
    In { negated: bool },
    /// `[NOT] LIKE | ILIKE | SIMILAR TO`
    Like { kind: LikeKind, negated: bool },
    /// `AT TIME ZONE`
    AtTimeZone,
    /// `COLLATE`
    Collate,
}

impl InfixOp {
    /// Returns true for the non-associative levels: a second operator of
    /// the same level directly on the result is a syntax error.
    pub(super) const fn is_non_associative(&self) -> bool {
        matches!(
            infix_binding_power(self).0,
            bp::IS | bp::COMPARISON | bp::PATTERN
        )
    }
}

/// Returns the binding power for prefix operators.
///
/// The value is the minimum binding power of the operand.
pub(super) const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Minus | TokenKind::Plus => Some(bp::UNARY),
        TokenKind::Operator(_) => Some(bp::OTHER_OP + 1),
        _ => None,
    }
}

/// Returns the (left, right) binding power for an infix operator.
pub(super) const fn infix_binding_power(op: &InfixOp) -> (u8, u8) {
    let level = match op {
        InfixOp::Binary(op) => op.precedence(),
        InfixOp::Qualified => bp::OTHER_OP,
        InfixOp::Is | InfixOp::IsNull | InfixOp::NotNull => bp::IS,
        InfixOp::Between { .. } | InfixOp::In { .. } | InfixOp::Like { .. } => bp::PATTERN,
        InfixOp::AtTimeZone => bp::AT_TIME_ZONE,
        InfixOp::Collate => bp::COLLATE,
    };
    (level, level + 1)
}

/// Converts a token to a binary operator.
pub(super) fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Plus,
        TokenKind::Minus => BinaryOp::Minus,
        TokenKind::Star => BinaryOp::Multiply,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::Percent => BinaryOp::Modulo,
        TokenKind::Caret => BinaryOp::Exponent,
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::Concat => BinaryOp::Concat,
        TokenKind::Arrow => BinaryOp::Arrow,
        TokenKind::LongArrow => BinaryOp::LongArrow,
        TokenKind::HashArrow => BinaryOp::HashArrow,
        TokenKind::HashLongArrow => BinaryOp::HashLongArrow,
        TokenKind::AtArrow => BinaryOp::AtArrow,
        TokenKind::ArrowAt => BinaryOp::ArrowAt,
        TokenKind::Question => BinaryOp::Question,
        TokenKind::QuestionPipe => BinaryOp::QuestionPipe,
        TokenKind::QuestionAnd => BinaryOp::QuestionAnd,
        TokenKind::HashMinus => BinaryOp::HashMinus,
        TokenKind::AtQuestion => BinaryOp::AtQuestion,
        TokenKind::AtAt => BinaryOp::AtAt,
        TokenKind::Operator(op) => BinaryOp::Custom(op.clone()),
        _ => return None,
    })
}

/// Maps a pattern operator to the operator used in quantified form
/// (`x LIKE ANY (...)`).
pub(super) fn like_operator(kind: LikeKind, negated: bool) -> Option<BinaryOp> {
    let op = match (kind, negated) {
        (LikeKind::Like, false) => "~~",
        (LikeKind::Like, true) => "!~~",
        (LikeKind::ILike, false) => "~~*",
        (LikeKind::ILike, true) => "!~~*",
        (LikeKind::SimilarTo, _) => return None,
    };
    Some(BinaryOp::Custom(op.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        let or = infix_binding_power(&InfixOp::Binary(BinaryOp::Or));
        let and = infix_binding_power(&InfixOp::Binary(BinaryOp::And));
        let eq = infix_binding_power(&InfixOp::Binary(BinaryOp::Eq));
        let arrow = infix_binding_power(&InfixOp::Binary(BinaryOp::Arrow));
        let plus = infix_binding_power(&InfixOp::Binary(BinaryOp::Plus));
        let mul = infix_binding_power(&InfixOp::Binary(BinaryOp::Multiply));

        assert!(or.0 < and.0);
        assert!(and.0 < eq.0);
        assert!(eq.0 < arrow.0);
        assert!(arrow.0 < plus.0);
        assert!(plus.0 < mul.0);
    }

    #[test]
    fn test_binary_levels_match_printer() {
        for (op, level) in [
            (BinaryOp::Or, bp::OR),
            (BinaryOp::And, bp::AND),
            (BinaryOp::GtEq, bp::COMPARISON),
            (BinaryOp::Concat, bp::OTHER_OP),
            (BinaryOp::Minus, bp::ADDITIVE),
            (BinaryOp::Modulo, bp::MULTIPLICATIVE),
            (BinaryOp::Exponent, bp::EXPONENT),
        ] {
            assert_eq!(op.precedence(), level);
            assert_eq!(infix_binding_power(&InfixOp::Binary(op)), (level, level + 1));
        }
    }

    #[test]
    fn test_left_associativity() {
        let (l, r) = infix_binding_power(&InfixOp::Binary(BinaryOp::Arrow));
        assert!(l < r);
    }

    #[test]
    fn test_non_associative_levels() {
        assert!(InfixOp::Binary(BinaryOp::Lt).is_non_associative());
        assert!(InfixOp::Is.is_non_associative());
        assert!(InfixOp::Between { negated: false }.is_non_associative());
        assert!(!InfixOp::Binary(BinaryOp::Plus).is_non_associative());
        assert!(!InfixOp::Collate.is_non_associative());
    }

    #[test]
    fn test_prefix_binding_power() {
        assert_eq!(prefix_binding_power(&TokenKind::Minus), Some(bp::UNARY));
        assert_eq!(
            prefix_binding_power(&TokenKind::Operator(String::from("~"))),
            Some(bp::OTHER_OP + 1)
        );
        assert_eq!(prefix_binding_power(&TokenKind::Star), None);
    }

    #[test]
    fn test_token_to_binary_op() {
        assert_eq!(token_to_binary_op(&TokenKind::HashLongArrow), Some(BinaryOp::HashLongArrow));
        assert_eq!(
            token_to_binary_op(&TokenKind::Operator(String::from("&&"))),
            Some(BinaryOp::Custom(String::from("&&")))
        );
        assert_eq!(token_to_binary_op(&TokenKind::Comma), None);
    }

    #[test]
    fn test_like_operator() {
        assert_eq!(
            like_operator(LikeKind::ILike, true),
            Some(BinaryOp::Custom(String::from("!~~*")))
        );
        assert_eq!(like_operator(LikeKind::SimilarTo, false), None);
    }
}
