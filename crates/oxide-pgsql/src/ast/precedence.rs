//! Operator precedence levels, lowest first.
//!
//! The parser uses these as left binding powers and the printer uses them to
//! decide where parentheses are needed. Each level is odd so that the next
//! even number can serve as its right binding power.

pub const OR: u8 = 1;
pub const AND: u8 = 3;
/// Prefix `NOT`.
pub const NOT: u8 = 5;
pub const IS: u8 = 7;
pub const COMPARISON: u8 = 9;
/// `BETWEEN`, `IN`, `LIKE`, `ILIKE` and `SIMILAR TO`.
pub const PATTERN: u8 = 11;
pub const OTHER_OP: u8 = 13;
pub const ADDITIVE: u8 = 15;
pub const MULTIPLICATIVE: u8 = 17;
pub const EXPONENT: u8 = 19;
pub const AT_TIME_ZONE: u8 = 21;
pub const COLLATE: u8 = 23;
/// Prefix `-` and `+`.
pub const UNARY: u8 = 25;
/// Literals, names, calls and anything else printed without parentheses.
pub const ATOM: u8 = 30;
