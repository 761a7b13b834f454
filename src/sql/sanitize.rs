//! SQL Identifier Quoting and Literal Escaping
//!
//! Identifiers are emitted bare whenever PostgreSQL would fold them to the same
//! name, and double-quoted otherwise. String literals have embedded single
//! quotes doubled.

use std::sync::LazyLock;

use regex::Regex;

/// Names that survive case folding unquoted: lowercase letters, digits and
/// underscores, not starting with a digit.
static SIMPLE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap());

/// PostgreSQL reserved keywords that cannot be used as unquoted identifiers,
/// including those reserved everywhere except as function or type names
pub const POSTGRES_RESERVED_WORDS: &[&str] = &[
    "ALL",
    "ANALYSE",
    "ANALYZE",
    "AND",
    "ANY",
    "ARRAY",
    "AS",
    "ASC",
    "ASYMMETRIC",
    "AUTHORIZATION",
    "BINARY",
    "BOTH",
    "CASE",
    "CAST",
    "CHECK",
    "COLLATE",
    "COLLATION",
    "COLUMN",
    "CONCURRENTLY",
    "CONSTRAINT",
    "CREATE",
    "CROSS",
    "CURRENT_CATALOG",
    "CURRENT_DATE",
    "CURRENT_ROLE",
    "CURRENT_SCHEMA",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
    "CURRENT_USER",
    "DEFAULT",
    "DEFERRABLE",
    "DESC",
    "DISTINCT",
    "DO",
    "ELSE",
    "END",
    "EXCEPT",
    "FALSE",
    "FETCH",
    "FOR",
    "FOREIGN",
    "FREEZE",
    "FROM",
    "FULL",
    "GRANT",
    "GROUP",
    "HAVING",
    "ILIKE",
    "IN",
    "INITIALLY",
    "INNER",
    "INTERSECT",
    "INTO",
    "IS",
    "ISNULL",
    "JOIN",
    "LATERAL",
    "LEADING",
    "LEFT",
    "LIKE",
    "LIMIT",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "NATURAL",
    "NOT",
    "NOTNULL",
    "NULL",
    "OFFSET",
    "ON",
    "ONLY",
    "OR",
    "ORDER",
    "OUTER",
    "OVERLAPS",
    "PLACING",
    "PRIMARY",
    "REFERENCES",
    "RETURNING",
    "RIGHT",
    "SELECT",
    "SESSION_USER",
    "SIMILAR",
    "SOME",
    "SYMMETRIC",
    "TABLE",
    "TABLESAMPLE",
    "THEN",
    "TO",
    "TRAILING",
    "TRUE",
    "UNION",
    "UNIQUE",
    "USER",
    "USING",
    "VARIADIC",
    "VERBOSE",
    "WHEN",
    "WHERE",
    "WINDOW",
    "WITH",
];

/// Whether `name` has to be double-quoted to survive a round trip
pub fn needs_quoting(name: &str) -> bool {
    !SIMPLE_IDENTIFIER.is_match(name)
        || POSTGRES_RESERVED_WORDS.contains(&name.to_uppercase().as_str())
}

/// Quote a SQL identifier only when PostgreSQL requires it
///
/// # Example
/// ```
/// use pg_globals_ddl::sql::quote_ident;
///
/// assert_eq!(quote_ident("testrole1"), "testrole1");
/// assert_eq!(quote_ident("testRole2"), "\"testRole2\"");
/// assert_eq!(quote_ident("group"), "\"group\"");
/// ```
pub fn quote_ident(name: &str) -> String {
    if !needs_quoting(name) {
        return name.to_string();
    }
    // Escape any double quotes in the identifier by doubling them
    let escaped = name.replace('"', "\"\"");
    format!("\"{}\"", escaped)
}

/// Double embedded single quotes so `value` can sit inside a string literal
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Wrap `value` in single quotes, escaping as needed
///
/// # Example
/// ```
/// use pg_globals_ddl::sql::quote_literal;
///
/// assert_eq!(quote_literal("it's"), "'it''s'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_literal(value))
}
