//! PostgreSQL keywords and their grammar categories.
//!
//! Every keyword belongs to exactly one of four disjoint categories. The
//! category decides where a keyword may still be used as a name:
//!
//! | context              | identifier | unreserved | col name | type/func name | reserved |
//! |----------------------|:----------:|:----------:|:--------:|:--------------:|:--------:|
//! | `colId`              | yes        | yes        | yes      |                |          |
//! | `typeFunctionName`   | yes        | yes        |          | yes            |          |
//! | `nonReservedWord`    | yes        | yes        | yes      | yes            |          |
//! | `colLabel`           | yes        | yes        | yes      | yes            | yes      |
//! | bare select alias    | yes        | yes        |          |                |          |

use serde::{Deserialize, Serialize};

/// The grammar category of a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeywordCategory {
    /// Usable as any kind of name.
    Unreserved,
    /// Usable as a column name but not as a function or type name.
    ColName,
    /// Usable as a function or type name but not as a column name.
    TypeFuncName,
    /// Only usable as a label (`AS name`, `t.name`).
    Reserved,
}

macro_rules! define_keywords {
    ($($variant:ident => $text:literal, $category:ident;)*) => {
        /// SQL keywords.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Keyword {
            $(
                #[doc = concat!("`", $text, "`")]
                $variant,
            )*
        }

        impl Keyword {
            /// Every keyword, in alphabetical order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// Attempts to parse a keyword from a string (case-insensitive).
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                if s.len() > MAX_KEYWORD_LEN {
                    return None;
                }
                match s.to_ascii_uppercase().as_str() {
                    $($text => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Returns the keyword as an uppercase string.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }

            /// Returns the grammar category of the keyword.
            #[must_use]
            pub const fn category(self) -> KeywordCategory {
                match self {
                    $(Self::$variant => KeywordCategory::$category,)*
                }
            }
        }
    };
}

/// Length of the longest keyword (`CURRENT_TIMESTAMP`).
const MAX_KEYWORD_LEN: usize = 17;

define_keywords! {
    Abort => "ABORT", Unreserved;
    Absolute => "ABSOLUTE", Unreserved;
    Access => "ACCESS", Unreserved;
    Action => "ACTION", Unreserved;
    Add => "ADD", Unreserved;
    Admin => "ADMIN", Unreserved;
    After => "AFTER", Unreserved;
    Aggregate => "AGGREGATE", Unreserved;
    All => "ALL", Reserved;
    Also => "ALSO", Unreserved;
    Alter => "ALTER", Unreserved;
    Always => "ALWAYS", Unreserved;
    Analyse => "ANALYSE", Reserved;
    Analyze => "ANALYZE", Reserved;
    And => "AND", Reserved;
    Any => "ANY", Reserved;
    Array => "ARRAY", Reserved;
    As => "AS", Reserved;
    Asc => "ASC", Reserved;
    Assertion => "ASSERTION", Unreserved;
    Assignment => "ASSIGNMENT", Unreserved;
    Asymmetric => "ASYMMETRIC", Reserved;
    At => "AT", Unreserved;
    Attach => "ATTACH", Unreserved;
    Attribute => "ATTRIBUTE", Unreserved;
    Authorization => "AUTHORIZATION", TypeFuncName;
    Backward => "BACKWARD", Unreserved;
    Before => "BEFORE", Unreserved;
    Begin => "BEGIN", Unreserved;
    Between => "BETWEEN", ColName;
    Bigint => "BIGINT", ColName;
    Binary => "BINARY", TypeFuncName;
    Bit => "BIT", ColName;
    Boolean => "BOOLEAN", ColName;
    Both => "BOTH", Reserved;
    By => "BY", Unreserved;
    Cache => "CACHE", Unreserved;
    Call => "CALL", Unreserved;
    Called => "CALLED", Unreserved;
    Cascade => "CASCADE", Unreserved;
    Cascaded => "CASCADED", Unreserved;
    Case => "CASE", Reserved;
    Cast => "CAST", Reserved;
    Catalog => "CATALOG", Unreserved;
    Chain => "CHAIN", Unreserved;
    Char => "CHAR", ColName;
    Character => "CHARACTER", ColName;
    Characteristics => "CHARACTERISTICS", Unreserved;
    Check => "CHECK", Reserved;
    Checkpoint => "CHECKPOINT", Unreserved;
    Class => "CLASS", Unreserved;
    Close => "CLOSE", Unreserved;
    Cluster => "CLUSTER", Unreserved;
    Coalesce => "COALESCE", ColName;
    Collate => "COLLATE", Reserved;
    Collation => "COLLATION", TypeFuncName;
    Column => "COLUMN", Reserved;
    Columns => "COLUMNS", Unreserved;
    Comment => "COMMENT", Unreserved;
    Comments => "COMMENTS", Unreserved;
    Commit => "COMMIT", Unreserved;
    Committed => "COMMITTED", Unreserved;
    Concurrently => "CONCURRENTLY", TypeFuncName;
    Configuration => "CONFIGURATION", Unreserved;
    Conflict => "CONFLICT", Unreserved;
    Connection => "CONNECTION", Unreserved;
    Constraint => "CONSTRAINT", Reserved;
    Constraints => "CONSTRAINTS", Unreserved;
    Content => "CONTENT", Unreserved;
    Continue => "CONTINUE", Unreserved;
    Conversion => "CONVERSION", Unreserved;
    Copy => "COPY", Unreserved;
    Cost => "COST", Unreserved;
    Create => "CREATE", Reserved;
    Cross => "CROSS", TypeFuncName;
    Csv => "CSV", Unreserved;
    Cube => "CUBE", Unreserved;
    Current => "CURRENT", Unreserved;
    CurrentCatalog => "CURRENT_CATALOG", Reserved;
    CurrentDate => "CURRENT_DATE", Reserved;
    CurrentRole => "CURRENT_ROLE", Reserved;
    CurrentSchema => "CURRENT_SCHEMA", TypeFuncName;
    CurrentTime => "CURRENT_TIME", Reserved;
    CurrentTimestamp => "CURRENT_TIMESTAMP", Reserved;
    CurrentUser => "CURRENT_USER", Reserved;
    Cursor => "CURSOR", Unreserved;
    Cycle => "CYCLE", Unreserved;
    Data => "DATA", Unreserved;
    Database => "DATABASE", Unreserved;
    Day => "DAY", Unreserved;
    Deallocate => "DEALLOCATE", Unreserved;
    Dec => "DEC", ColName;
    Decimal => "DECIMAL", ColName;
    Declare => "DECLARE", Unreserved;
    Default => "DEFAULT", Reserved;
    Defaults => "DEFAULTS", Unreserved;
    Deferrable => "DEFERRABLE", Reserved;
    Deferred => "DEFERRED", Unreserved;
    Definer => "DEFINER", Unreserved;
    Delete => "DELETE", Unreserved;
    Delimiter => "DELIMITER", Unreserved;
    Delimiters => "DELIMITERS", Unreserved;
    Depends => "DEPENDS", Unreserved;
    Desc => "DESC", Reserved;
    Detach => "DETACH", Unreserved;
    Dictionary => "DICTIONARY", Unreserved;
    Disable => "DISABLE", Unreserved;
    Discard => "DISCARD", Unreserved;
    Distinct => "DISTINCT", Reserved;
    Do => "DO", Reserved;
    Document => "DOCUMENT", Unreserved;
    Domain => "DOMAIN", Unreserved;
    Double => "DOUBLE", Unreserved;
    Drop => "DROP", Unreserved;
    Each => "EACH", Unreserved;
    Else => "ELSE", Reserved;
    Enable => "ENABLE", Unreserved;
    Encoding => "ENCODING", Unreserved;
    Encrypted => "ENCRYPTED", Unreserved;
    End => "END", Reserved;
    Enum => "ENUM", Unreserved;
    Escape => "ESCAPE", Unreserved;
    Event => "EVENT", Unreserved;
    Except => "EXCEPT", Reserved;
    Exclude => "EXCLUDE", Unreserved;
    Excluding => "EXCLUDING", Unreserved;
    Exclusive => "EXCLUSIVE", Unreserved;
    Execute => "EXECUTE", Unreserved;
    Exists => "EXISTS", ColName;
    Explain => "EXPLAIN", Unreserved;
    Expression => "EXPRESSION", Unreserved;
    Extension => "EXTENSION", Unreserved;
    External => "EXTERNAL", Unreserved;
    Extract => "EXTRACT", ColName;
    False => "FALSE", Reserved;
    Family => "FAMILY", Unreserved;
    Fetch => "FETCH", Reserved;
    Filter => "FILTER", Unreserved;
    First => "FIRST", Unreserved;
    Float => "FLOAT", ColName;
    Following => "FOLLOWING", Unreserved;
    For => "FOR", Reserved;
    Force => "FORCE", Unreserved;
    Foreign => "FOREIGN", Reserved;
    Forward => "FORWARD", Unreserved;
    Freeze => "FREEZE", TypeFuncName;
    From => "FROM", Reserved;
    Full => "FULL", TypeFuncName;
    Function => "FUNCTION", Unreserved;
    Functions => "FUNCTIONS", Unreserved;
    Generated => "GENERATED", Unreserved;
    Global => "GLOBAL", Unreserved;
    Grant => "GRANT", Reserved;
    Granted => "GRANTED", Unreserved;
    Greatest => "GREATEST", ColName;
    Group => "GROUP", Reserved;
    Grouping => "GROUPING", ColName;
    Groups => "GROUPS", Unreserved;
    Handler => "HANDLER", Unreserved;
    Having => "HAVING", Reserved;
    Header => "HEADER", Unreserved;
    Hold => "HOLD", Unreserved;
    Hour => "HOUR", Unreserved;
    Identity => "IDENTITY", Unreserved;
    If => "IF", Unreserved;
    Ilike => "ILIKE", TypeFuncName;
    Immediate => "IMMEDIATE", Unreserved;
    Immutable => "IMMUTABLE", Unreserved;
    Implicit => "IMPLICIT", Unreserved;
    Import => "IMPORT", Unreserved;
    In => "IN", Reserved;
    Include => "INCLUDE", Unreserved;
    Including => "INCLUDING", Unreserved;
    Increment => "INCREMENT", Unreserved;
    Index => "INDEX", Unreserved;
    Indexes => "INDEXES", Unreserved;
    Inherit => "INHERIT", Unreserved;
    Inherits => "INHERITS", Unreserved;
    Initially => "INITIALLY", Reserved;
    Inline => "INLINE", Unreserved;
    Inner => "INNER", TypeFuncName;
    Inout => "INOUT", ColName;
    Input => "INPUT", Unreserved;
    Insensitive => "INSENSITIVE", Unreserved;
    Insert => "INSERT", Unreserved;
    Instead => "INSTEAD", Unreserved;
    Int => "INT", ColName;
    Integer => "INTEGER", ColName;
    Intersect => "INTERSECT", Reserved;
    Interval => "INTERVAL", ColName;
    Into => "INTO", Reserved;
    Invoker => "INVOKER", Unreserved;
    Is => "IS", TypeFuncName;
    Isnull => "ISNULL", TypeFuncName;
    Isolation => "ISOLATION", Unreserved;
    Join => "JOIN", TypeFuncName;
    Key => "KEY", Unreserved;
    Label => "LABEL", Unreserved;
    Language => "LANGUAGE", Unreserved;
    Large => "LARGE", Unreserved;
    Last => "LAST", Unreserved;
    Lateral => "LATERAL", Reserved;
    Leading => "LEADING", Reserved;
    Leakproof => "LEAKPROOF", Unreserved;
    Least => "LEAST", ColName;
    Left => "LEFT", TypeFuncName;
    Level => "LEVEL", Unreserved;
    Like => "LIKE", TypeFuncName;
    Limit => "LIMIT", Reserved;
    Listen => "LISTEN", Unreserved;
    Load => "LOAD", Unreserved;
    Local => "LOCAL", Unreserved;
    Localtime => "LOCALTIME", Reserved;
    Localtimestamp => "LOCALTIMESTAMP", Reserved;
    Location => "LOCATION", Unreserved;
    Lock => "LOCK", Unreserved;
    Locked => "LOCKED", Unreserved;
    Logged => "LOGGED", Unreserved;
    Mapping => "MAPPING", Unreserved;
    Match => "MATCH", Unreserved;
    Materialized => "MATERIALIZED", Unreserved;
    Maxvalue => "MAXVALUE", Unreserved;
    Method => "METHOD", Unreserved;
    Minute => "MINUTE", Unreserved;
    Minvalue => "MINVALUE", Unreserved;
    Mode => "MODE", Unreserved;
    Month => "MONTH", Unreserved;
    Move => "MOVE", Unreserved;
    Name => "NAME", Unreserved;
    Names => "NAMES", Unreserved;
    National => "NATIONAL", ColName;
    Natural => "NATURAL", TypeFuncName;
    Nchar => "NCHAR", ColName;
    New => "NEW", Unreserved;
    Next => "NEXT", Unreserved;
    Nfc => "NFC", Unreserved;
    Nfd => "NFD", Unreserved;
    Nfkc => "NFKC", Unreserved;
    Nfkd => "NFKD", Unreserved;
    No => "NO", Unreserved;
    None => "NONE", ColName;
    Normalize => "NORMALIZE", ColName;
    Normalized => "NORMALIZED", Unreserved;
    Not => "NOT", Reserved;
    Nothing => "NOTHING", Unreserved;
    Notify => "NOTIFY", Unreserved;
    Notnull => "NOTNULL", TypeFuncName;
    Nowait => "NOWAIT", Unreserved;
    Null => "NULL", Reserved;
    Nullif => "NULLIF", ColName;
    Nulls => "NULLS", Unreserved;
    Numeric => "NUMERIC", ColName;
    Object => "OBJECT", Unreserved;
    Of => "OF", Unreserved;
    Off => "OFF", Unreserved;
    Offset => "OFFSET", Reserved;
    Oids => "OIDS", Unreserved;
    Old => "OLD", Unreserved;
    On => "ON", Reserved;
    Only => "ONLY", Reserved;
    Operator => "OPERATOR", Unreserved;
    Option => "OPTION", Unreserved;
    Options => "OPTIONS", Unreserved;
    Or => "OR", Reserved;
    Order => "ORDER", Reserved;
    Ordinality => "ORDINALITY", Unreserved;
    Others => "OTHERS", Unreserved;
    Out => "OUT", ColName;
    Outer => "OUTER", TypeFuncName;
    Over => "OVER", Unreserved;
    Overlaps => "OVERLAPS", TypeFuncName;
    Overlay => "OVERLAY", ColName;
    Overriding => "OVERRIDING", Unreserved;
    Owned => "OWNED", Unreserved;
    Owner => "OWNER", Unreserved;
    Parallel => "PARALLEL", Unreserved;
    Parser => "PARSER", Unreserved;
    Partial => "PARTIAL", Unreserved;
    Partition => "PARTITION", Unreserved;
    Passing => "PASSING", Unreserved;
    Password => "PASSWORD", Unreserved;
    Placing => "PLACING", Reserved;
    Plans => "PLANS", Unreserved;
    Policy => "POLICY", Unreserved;
    Position => "POSITION", ColName;
    Preceding => "PRECEDING", Unreserved;
    Precision => "PRECISION", ColName;
    Prepare => "PREPARE", Unreserved;
    Prepared => "PREPARED", Unreserved;
    Preserve => "PRESERVE", Unreserved;
    Primary => "PRIMARY", Reserved;
    Prior => "PRIOR", Unreserved;
    Privileges => "PRIVILEGES", Unreserved;
    Procedural => "PROCEDURAL", Unreserved;
    Procedure => "PROCEDURE", Unreserved;
    Procedures => "PROCEDURES", Unreserved;
    Program => "PROGRAM", Unreserved;
    Publication => "PUBLICATION", Unreserved;
    Quote => "QUOTE", Unreserved;
    Range => "RANGE", Unreserved;
    Read => "READ", Unreserved;
    Real => "REAL", ColName;
    Reassign => "REASSIGN", Unreserved;
    Recheck => "RECHECK", Unreserved;
    Recursive => "RECURSIVE", Unreserved;
    Ref => "REF", Unreserved;
    References => "REFERENCES", Reserved;
    Referencing => "REFERENCING", Unreserved;
    Refresh => "REFRESH", Unreserved;
    Reindex => "REINDEX", Unreserved;
    Relative => "RELATIVE", Unreserved;
    Release => "RELEASE", Unreserved;
    Rename => "RENAME", Unreserved;
    Repeatable => "REPEATABLE", Unreserved;
    Replace => "REPLACE", Unreserved;
    Replica => "REPLICA", Unreserved;
    Reset => "RESET", Unreserved;
    Restart => "RESTART", Unreserved;
    Restrict => "RESTRICT", Unreserved;
    Returning => "RETURNING", Reserved;
    Returns => "RETURNS", Unreserved;
    Revoke => "REVOKE", Unreserved;
    Right => "RIGHT", TypeFuncName;
    Role => "ROLE", Unreserved;
    Rollback => "ROLLBACK", Unreserved;
    Rollup => "ROLLUP", Unreserved;
    Routine => "ROUTINE", Unreserved;
    Routines => "ROUTINES", Unreserved;
    Row => "ROW", ColName;
    Rows => "ROWS", Unreserved;
    Rule => "RULE", Unreserved;
    Savepoint => "SAVEPOINT", Unreserved;
    Schema => "SCHEMA", Unreserved;
    Schemas => "SCHEMAS", Unreserved;
    Scroll => "SCROLL", Unreserved;
    Search => "SEARCH", Unreserved;
    Second => "SECOND", Unreserved;
    Security => "SECURITY", Unreserved;
    Select => "SELECT", Reserved;
    Sequence => "SEQUENCE", Unreserved;
    Sequences => "SEQUENCES", Unreserved;
    Serializable => "SERIALIZABLE", Unreserved;
    Server => "SERVER", Unreserved;
    Session => "SESSION", Unreserved;
    SessionUser => "SESSION_USER", Reserved;
    Set => "SET", Unreserved;
    Setof => "SETOF", ColName;
    Sets => "SETS", Unreserved;
    Share => "SHARE", Unreserved;
    Show => "SHOW", Unreserved;
    Similar => "SIMILAR", TypeFuncName;
    Simple => "SIMPLE", Unreserved;
    Skip => "SKIP", Unreserved;
    Smallint => "SMALLINT", ColName;
    Snapshot => "SNAPSHOT", Unreserved;
    Some => "SOME", Reserved;
    Sql => "SQL", Unreserved;
    Stable => "STABLE", Unreserved;
    Standalone => "STANDALONE", Unreserved;
    Start => "START", Unreserved;
    Statement => "STATEMENT", Unreserved;
    Statistics => "STATISTICS", Unreserved;
    Stdin => "STDIN", Unreserved;
    Stdout => "STDOUT", Unreserved;
    Storage => "STORAGE", Unreserved;
    Stored => "STORED", Unreserved;
    Strict => "STRICT", Unreserved;
    Strip => "STRIP", Unreserved;
    Subscription => "SUBSCRIPTION", Unreserved;
    Substring => "SUBSTRING", ColName;
    Support => "SUPPORT", Unreserved;
    Symmetric => "SYMMETRIC", Reserved;
    Sysid => "SYSID", Unreserved;
    System => "SYSTEM", Unreserved;
    Table => "TABLE", Reserved;
    Tables => "TABLES", Unreserved;
    Tablesample => "TABLESAMPLE", TypeFuncName;
    Tablespace => "TABLESPACE", Unreserved;
    Temp => "TEMP", Unreserved;
    Template => "TEMPLATE", Unreserved;
    Temporary => "TEMPORARY", Unreserved;
    Text => "TEXT", Unreserved;
    Then => "THEN", Reserved;
    Ties => "TIES", Unreserved;
    Time => "TIME", ColName;
    Timestamp => "TIMESTAMP", ColName;
    To => "TO", Reserved;
    Trailing => "TRAILING", Reserved;
    Transaction => "TRANSACTION", Unreserved;
    Transform => "TRANSFORM", Unreserved;
    Treat => "TREAT", ColName;
    Trigger => "TRIGGER", Unreserved;
    Trim => "TRIM", ColName;
    True => "TRUE", Reserved;
    Truncate => "TRUNCATE", Unreserved;
    Trusted => "TRUSTED", Unreserved;
    Type => "TYPE", Unreserved;
    Types => "TYPES", Unreserved;
    Uescape => "UESCAPE", Unreserved;
    Unbounded => "UNBOUNDED", Unreserved;
    Uncommitted => "UNCOMMITTED", Unreserved;
    Unencrypted => "UNENCRYPTED", Unreserved;
    Union => "UNION", Reserved;
    Unique => "UNIQUE", Reserved;
    Unknown => "UNKNOWN", Unreserved;
    Unlisten => "UNLISTEN", Unreserved;
    Unlogged => "UNLOGGED", Unreserved;
    Until => "UNTIL", Unreserved;
    Update => "UPDATE", Unreserved;
    User => "USER", Reserved;
    Using => "USING", Reserved;
    Vacuum => "VACUUM", Unreserved;
    Valid => "VALID", Unreserved;
    Validate => "VALIDATE", Unreserved;
    Validator => "VALIDATOR", Unreserved;
    Value => "VALUE", Unreserved;
    Values => "VALUES", ColName;
    Varchar => "VARCHAR", ColName;
    Variadic => "VARIADIC", Reserved;
    Varying => "VARYING", Unreserved;
    Verbose => "VERBOSE", TypeFuncName;
    Version => "VERSION", Unreserved;
    View => "VIEW", Unreserved;
    Views => "VIEWS", Unreserved;
    Volatile => "VOLATILE", Unreserved;
    When => "WHEN", Reserved;
    Where => "WHERE", Reserved;
    Whitespace => "WHITESPACE", Unreserved;
    Window => "WINDOW", Reserved;
    With => "WITH", Reserved;
    Within => "WITHIN", Unreserved;
    Without => "WITHOUT", Unreserved;
    Work => "WORK", Unreserved;
    Wrapper => "WRAPPER", Unreserved;
    Write => "WRITE", Unreserved;
    Xml => "XML", Unreserved;
    Xmlattributes => "XMLATTRIBUTES", ColName;
    Xmlconcat => "XMLCONCAT", ColName;
    Xmlelement => "XMLELEMENT", ColName;
    Xmlexists => "XMLEXISTS", ColName;
    Xmlforest => "XMLFOREST", ColName;
    Xmlnamespaces => "XMLNAMESPACES", ColName;
    Xmlparse => "XMLPARSE", ColName;
    Xmlpi => "XMLPI", ColName;
    Xmlroot => "XMLROOT", ColName;
    Xmlserialize => "XMLSERIALIZE", ColName;
    Xmltable => "XMLTABLE", ColName;
    Year => "YEAR", Unreserved;
    Yes => "YES", Unreserved;
    Zone => "ZONE", Unreserved;
}

impl Keyword {
    /// Returns true if the keyword is usable as a `colId`.
    #[must_use]
    pub const fn is_col_id(self) -> bool {
        matches!(
            self.category(),
            KeywordCategory::Unreserved | KeywordCategory::ColName
        )
    }

    /// Returns true if the keyword is usable as a `typeFunctionName`.
    #[must_use]
    pub const fn is_type_function_name(self) -> bool {
        matches!(
            self.category(),
            KeywordCategory::Unreserved | KeywordCategory::TypeFuncName
        )
    }

    /// Returns true if the keyword is usable as a `nonReservedWord`.
    #[must_use]
    pub const fn is_non_reserved_word(self) -> bool {
        !matches!(self.category(), KeywordCategory::Reserved)
    }

    /// Returns true if the keyword may follow a select-list expression as an
    /// alias without `AS`.
    #[must_use]
    pub const fn is_bare_label(self) -> bool {
        matches!(self.category(), KeywordCategory::Unreserved)
    }

    /// Returns true if the keyword is reserved.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        matches!(self.category(), KeywordCategory::Reserved)
    }
}

impl core::fmt::Display for Keyword {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("selects"), None);
    }

    #[test]
    fn test_as_str_round_trips() {
        for kw in Keyword::ALL {
            assert_eq!(Keyword::from_str(kw.as_str()), Some(*kw));
            assert!(kw.as_str().len() <= MAX_KEYWORD_LEN);
        }
    }

    #[test]
    fn test_list_is_sorted() {
        let words: Vec<&str> = Keyword::ALL.iter().map(|k| k.as_str()).collect();
        let mut sorted = words.clone();
        sorted.sort_unstable();
        assert_eq!(words, sorted);
    }

    #[test]
    fn test_categories() {
        assert_eq!(Keyword::User.category(), KeywordCategory::Reserved);
        assert_eq!(Keyword::Left.category(), KeywordCategory::TypeFuncName);
        assert_eq!(Keyword::Position.category(), KeywordCategory::ColName);
        assert_eq!(Keyword::Name.category(), KeywordCategory::Unreserved);
    }

    #[test]
    fn test_context_sets() {
        assert!(Keyword::Position.is_col_id());
        assert!(!Keyword::Position.is_type_function_name());
        assert!(Keyword::Left.is_type_function_name());
        assert!(!Keyword::Left.is_col_id());
        assert!(Keyword::Left.is_non_reserved_word());
        assert!(!Keyword::Select.is_non_reserved_word());
        assert!(Keyword::Name.is_bare_label());
        assert!(!Keyword::Between.is_bare_label());
    }
}
