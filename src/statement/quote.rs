//! Identifier quoting for generated SQL.

use std::collections::HashSet;
use std::sync::OnceLock;

const RESERVED_WORDS: &str = "ABORT ACTION ADD AFTER ALL ALTER ANALYZE AND AS ASC ATTACH \
    AUTOINCREMENT BEFORE BEGIN BETWEEN BY CASCADE CASE CAST CHECK COLLATE COLUMN COMMIT \
    CONFLICT CONSTRAINT CREATE CROSS CURRENT_DATE CURRENT_TIME CURRENT_TIMESTAMP DATABASE \
    DEFAULT DEFERRABLE DEFERRED DELETE DESC DETACH DISTINCT DROP EACH ELSE END ESCAPE EXCEPT \
    EXCLUSIVE EXISTS EXPLAIN FAIL FOR FOREIGN FROM FULL GLOB GROUP HAVING IF IGNORE IMMEDIATE \
    IN INDEX INDEXED INITIALLY INNER INSERT INSTEAD INTERSECT INTO IS ISNULL JOIN KEY LEFT \
    LIKE LIMIT MATCH NATURAL NO NOT NOTNULL NULL OF OFFSET ON OR ORDER OUTER PLAN PRAGMA \
    PRIMARY QUERY RAISE RECURSIVE REFERENCES REGEXP REINDEX RELEASE RENAME REPLACE RESTRICT \
    RIGHT ROLLBACK ROW SAVEPOINT SELECT SET TABLE TEMP TEMPORARY THEN TO TRANSACTION TRIGGER \
    UNION UNIQUE UPDATE USING VACUUM VALUES VIEW VIRTUAL WHEN WHERE WITH WITHOUT";

static RESERVED: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn reserved_words() -> &'static HashSet<&'static str> {
    RESERVED.get_or_init(|| RESERVED_WORDS.split_whitespace().collect())
}

/// True if `value` is an SQL keyword (case-insensitive, surrounding whitespace ignored).
pub fn is_reserved_word(value: &str) -> bool {
    reserved_words().contains(value.trim().to_ascii_uppercase().as_str())
}

/// True for `[A-Za-z_][A-Za-z0-9_]*`.
fn is_bare_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Wrap in double quotes, doubling any embedded double quote.
pub fn double_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Safe form of an identifier: bare names pass through, keywords and anything else are quoted.
pub fn quote_identifier(value: &str) -> String {
    if !is_reserved_word(value) && is_bare_identifier(value) {
        value.to_string()
    } else {
        double_quote(value)
    }
}

/// Comma-separated [`quote_identifier`] of each value.
pub fn quote_identifiers<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| quote_identifier(v.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}
