//! Statement builder tests: exact statement text for each builder and modifier.

use fsindexer::Error;
use fsindexer::statement::{
    Column, CreateTable, DeclType, Delete, DropTable, Insert, Select, Source, double_quote,
    is_reserved_word, quote_identifier, quote_identifiers,
};

fn abc_columns() -> Vec<Column> {
    vec![
        Column::new("a", DeclType::Integer).primary(),
        Column::new("b", DeclType::Text).primary(),
        Column::new("c", DeclType::Text).nullable(),
    ]
}

// --- quoting ---

#[test]
fn test_quote_bare_identifier_unchanged() {
    assert_eq!(quote_identifier("inode"), "inode");
    assert_eq!(quote_identifier("_tmp1"), "_tmp1");
}

#[test]
fn test_quote_reserved_word() {
    assert!(is_reserved_word("order"));
    assert!(is_reserved_word(" Select "));
    assert!(!is_reserved_word("inode"));
    assert_eq!(quote_identifier("order"), "\"order\"");
    assert_eq!(quote_identifier("TABLE"), "\"TABLE\"");
}

#[test]
fn test_quote_non_bare_identifier() {
    assert_eq!(quote_identifier("my col"), "\"my col\"");
    assert_eq!(quote_identifier("1abc"), "\"1abc\"");
    assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    assert_eq!(double_quote(""), "\"\"");
}

#[test]
fn test_quote_identifiers_joined() {
    assert_eq!(quote_identifiers(&["a", "group", "b c"]), "a,\"group\",\"b c\"");
    assert_eq!(quote_identifiers::<&str>(&[]), "");
}

// --- column ---

#[test]
fn test_column_query() {
    assert_eq!(Column::new("a", DeclType::Integer).query(), "a INTEGER NOT NULL");
    assert_eq!(Column::new("a", DeclType::Blob).nullable().query(), "a BLOB");
    assert_eq!(
        Column::new("select", DeclType::Text).query(),
        "\"select\" TEXT NOT NULL"
    );
}

#[test]
fn test_decl_type_from_str() {
    assert_eq!("integer".parse::<DeclType>().unwrap(), DeclType::Integer);
    assert_eq!(" Timestamp ".parse::<DeclType>().unwrap(), DeclType::Timestamp);
    assert!(matches!(
        "varchar".parse::<DeclType>(),
        Err(Error::UnsupportedType(_))
    ));
}

// --- CREATE TABLE ---

#[test]
fn test_create_table_primary_key_in_declaration_order() {
    let q = CreateTable::new("t", &abc_columns()).query();
    assert_eq!(
        q,
        "CREATE TABLE t (a INTEGER NOT NULL,b TEXT NOT NULL,c TEXT,PRIMARY KEY (a,b))"
    );
}

#[test]
fn test_create_table_primary_key_follows_input_not_name() {
    let cols = vec![
        Column::new("b", DeclType::Text).primary(),
        Column::new("x", DeclType::Float),
        Column::new("a", DeclType::Integer).primary(),
    ];
    let q = CreateTable::new("t", &cols).query();
    assert!(q.ends_with("PRIMARY KEY (b,a))"), "{q}");
}

#[test]
fn test_create_table_is_deterministic() {
    let build = || {
        CreateTable::new("t", &abc_columns())
            .if_not_exists()
            .unique(&["c"])
            .query()
    };
    assert_eq!(build(), build());
}

#[test]
fn test_create_table_all_modifiers() {
    let q = CreateTable::new("t", &[Column::new("a", DeclType::Integer)])
        .schema("main")
        .temporary()
        .if_not_exists()
        .without_rowid()
        .query();
    assert_eq!(
        q,
        "CREATE TEMPORARY TABLE IF NOT EXISTS main.t (a INTEGER NOT NULL) WITHOUT ROWID"
    );
}

#[test]
fn test_create_table_unique_clauses_in_order() {
    let q = CreateTable::new("t", &abc_columns())
        .unique(&["a", "c"])
        .unique(&["b"])
        .unique::<&str>(&[])
        .query();
    assert_eq!(
        q,
        "CREATE TABLE t (a INTEGER NOT NULL,b TEXT NOT NULL,c TEXT,PRIMARY KEY (a,b),UNIQUE (a,c),UNIQUE (b))"
    );
}

#[test]
fn test_create_table_quotes_reserved_names() {
    let q = CreateTable::new("table", &[Column::new("order", DeclType::Integer)]).query();
    assert_eq!(q, "CREATE TABLE \"table\" (\"order\" INTEGER NOT NULL)");
}

// --- DROP TABLE ---

#[test]
fn test_drop_table() {
    assert_eq!(DropTable::new("t").query(), "DROP TABLE t");
    assert_eq!(DropTable::new("t").if_exists().query(), "DROP TABLE IF EXISTS t");
    assert_eq!(DropTable::new("t").schema("s").query(), "DROP TABLE s.t");
}

#[test]
fn test_blank_schema_is_omitted() {
    assert_eq!(DropTable::new("t").schema("  ").query(), "DROP TABLE t");
    assert_eq!(Source::new("t").schema("").query(), "t");
}

// --- INSERT ---

#[test]
fn test_insert_placeholders() {
    assert_eq!(
        Insert::new("t", &["a", "b", "c"]).query(),
        "INSERT INTO t (a,b,c) VALUES (?,?,?)"
    );
    assert_eq!(
        Insert::replace("t", &["a"]).query(),
        "REPLACE INTO t (a) VALUES (?)"
    );
}

#[test]
fn test_insert_zero_columns_is_default_values() {
    assert_eq!(
        Insert::new::<&str>("t", &[]).query(),
        "INSERT INTO t DEFAULT VALUES"
    );
    assert_eq!(
        Insert::new::<&str>("t", &[]).default_values().query(),
        "INSERT INTO t DEFAULT VALUES"
    );
}

#[test]
fn test_insert_on_conflict_update() {
    let q = Insert::new("t", &["a", "b", "c"])
        .on_conflict_update(&["a", "b"])
        .query();
    assert_eq!(
        q,
        "INSERT INTO t (a,b,c) VALUES (?,?,?) ON CONFLICT (a,b) DO UPDATE SET a=excluded.a,b=excluded.b,c=excluded.c"
    );
}

#[test]
fn test_insert_schema_and_columns() {
    let ins = Insert::new("t", &["a", "b"]).schema("aux");
    assert_eq!(ins.columns(), ["a".to_string(), "b".to_string()]);
    assert_eq!(ins.query(), "INSERT INTO aux.t (a,b) VALUES (?,?)");
}

// --- DELETE ---

#[test]
fn test_delete_where_key_columns() {
    assert_eq!(
        Delete::new("t", &["a", "b"]).query(),
        "DELETE FROM t WHERE a=? AND b=?"
    );
    assert_eq!(Delete::new("t", &["a"]).query(), "DELETE FROM t WHERE a=?");
}

#[test]
fn test_delete_without_key_deletes_all() {
    assert_eq!(Delete::new::<&str>("t", &[]).query(), "DELETE FROM t");
}

#[test]
fn test_delete_quotes_schema_table_and_columns() {
    assert_eq!(
        Delete::new("order", &["group"]).schema("s").query(),
        "DELETE FROM s.\"order\" WHERE \"group\"=?"
    );
}

// --- SELECT ---

#[test]
fn test_select_without_source() {
    assert_eq!(Select::new(None).query(), "SELECT *");
}

#[test]
fn test_select_limit_offset_forms() {
    let from_t = || Select::new(Some(Source::new("t")));
    assert_eq!(from_t().limit_offset(0, 0).query(), "SELECT * FROM t");
    assert_eq!(from_t().limit_offset(0, 5).query(), "SELECT * FROM t OFFSET 5");
    assert_eq!(from_t().limit_offset(10, 0).query(), "SELECT * FROM t LIMIT 10");
    assert_eq!(
        from_t().limit_offset(100, 1).query(),
        "SELECT * FROM t LIMIT 100,1"
    );
}

#[test]
fn test_select_distinct_and_count() {
    assert_eq!(
        Select::new(Some(Source::new("t"))).distinct().query(),
        "SELECT DISTINCT * FROM t"
    );
    assert_eq!(
        Select::new(Some(Source::new("t"))).count().query(),
        "SELECT COUNT(*) FROM t"
    );
}

#[test]
fn test_source_alias() {
    assert_eq!(Source::new("t").alias("x").query(), "t AS x");
    assert_eq!(Source::new("t").schema("s").alias("x").query(), "s.t AS x");
    assert_eq!(Source::new("t").alias(" ").query(), "t");
    assert_eq!(
        Select::new(Some(Source::new("order").alias("o"))).query(),
        "SELECT * FROM \"order\" AS o"
    );
}
