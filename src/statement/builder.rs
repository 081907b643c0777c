//! Statement builders: CREATE TABLE, DROP TABLE, INSERT, DELETE, SELECT.
//!
//! Builders are plain values; `query()` renders the text and never touches a connection.

use super::column::Column;
use super::quote::{quote_identifier, quote_identifiers};

/// Optionally schema-qualified table name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableName {
    name: String,
    schema: Option<String>,
}

impl TableName {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            schema: None,
        }
    }

    /// Set the schema. Blank is the same as none.
    pub fn set_schema(&mut self, schema: &str) {
        let schema = schema.trim();
        self.schema = (!schema.is_empty()).then(|| schema.to_string());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn query(&self) -> String {
        match &self.schema {
            Some(schema) => format!(
                "{}.{}",
                quote_identifier(schema),
                quote_identifier(&self.name)
            ),
            None => quote_identifier(&self.name),
        }
    }
}

/// `CREATE [TEMPORARY] TABLE [IF NOT EXISTS] name (...) [WITHOUT ROWID]`
#[derive(Clone, Debug)]
pub struct CreateTable {
    table: TableName,
    temporary: bool,
    if_not_exists: bool,
    without_rowid: bool,
    unique: Vec<String>,
    columns: Vec<Column>,
}

impl CreateTable {
    pub fn new(name: &str, columns: &[Column]) -> Self {
        Self {
            table: TableName::new(name),
            temporary: false,
            if_not_exists: false,
            without_rowid: false,
            unique: Vec::new(),
            columns: columns.to_vec(),
        }
    }

    pub fn schema(mut self, schema: &str) -> Self {
        self.table.set_schema(schema);
        self
    }

    pub fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn without_rowid(mut self) -> Self {
        self.without_rowid = true;
        self
    }

    /// Add a UNIQUE (...) constraint. Clauses are emitted in the order added; empty is ignored.
    pub fn unique<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        if !columns.is_empty() {
            self.unique.push(quote_identifiers(columns));
        }
        self
    }

    pub fn query(&self) -> String {
        let mut defs: Vec<String> = self.columns.iter().map(Column::query).collect();

        let primary: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| c.primary)
            .map(|c| c.name.as_str())
            .collect();
        if !primary.is_empty() {
            defs.push(format!("PRIMARY KEY ({})", quote_identifiers(&primary)));
        }
        for key in &self.unique {
            defs.push(format!("UNIQUE ({key})"));
        }

        let mut tokens = vec!["CREATE".to_string()];
        if self.temporary {
            tokens.push("TEMPORARY".to_string());
        }
        if self.if_not_exists {
            tokens.push("TABLE IF NOT EXISTS".to_string());
        } else {
            tokens.push("TABLE".to_string());
        }
        tokens.push(self.table.query());
        tokens.push(format!("({})", defs.join(",")));
        if self.without_rowid {
            tokens.push("WITHOUT ROWID".to_string());
        }
        tokens.join(" ")
    }
}

/// `DROP TABLE [IF EXISTS] name`
#[derive(Clone, Debug)]
pub struct DropTable {
    table: TableName,
    if_exists: bool,
}

impl DropTable {
    pub fn new(name: &str) -> Self {
        Self {
            table: TableName::new(name),
            if_exists: false,
        }
    }

    pub fn schema(mut self, schema: &str) -> Self {
        self.table.set_schema(schema);
        self
    }

    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    pub fn query(&self) -> String {
        let mut tokens = vec!["DROP TABLE".to_string()];
        if self.if_exists {
            tokens.push("IF EXISTS".to_string());
        }
        tokens.push(self.table.query());
        tokens.join(" ")
    }
}

/// `INSERT|REPLACE INTO name [(cols)] VALUES (?,...) [ON CONFLICT (...) DO UPDATE SET ...]`
#[derive(Clone, Debug)]
pub struct Insert {
    token: &'static str,
    table: TableName,
    default_values: bool,
    columns: Vec<String>,
    conflict: Option<Vec<String>>,
}

impl Insert {
    pub fn new<S: AsRef<str>>(name: &str, columns: &[S]) -> Self {
        Self::with_token("INSERT", name, columns)
    }

    pub fn replace<S: AsRef<str>>(name: &str, columns: &[S]) -> Self {
        Self::with_token("REPLACE", name, columns)
    }

    fn with_token<S: AsRef<str>>(token: &'static str, name: &str, columns: &[S]) -> Self {
        Self {
            token,
            table: TableName::new(name),
            default_values: false,
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            conflict: None,
        }
    }

    pub fn schema(mut self, schema: &str) -> Self {
        self.table.set_schema(schema);
        self
    }

    pub fn default_values(mut self) -> Self {
        self.default_values = true;
        self
    }

    /// On a conflict over `target`, overwrite every inserted column with the new value.
    pub fn on_conflict_update<S: AsRef<str>>(mut self, target: &[S]) -> Self {
        self.conflict = Some(target.iter().map(|c| c.as_ref().to_string()).collect());
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn query(&self) -> String {
        let mut tokens = vec![self.token.to_string(), "INTO".to_string(), self.table.query()];
        if !self.columns.is_empty() {
            tokens.push(format!("({})", quote_identifiers(&self.columns)));
        }
        if self.default_values || self.columns.is_empty() {
            tokens.push("DEFAULT VALUES".to_string());
            return tokens.join(" ");
        }
        tokens.push("VALUES".to_string());
        tokens.push(placeholders(self.columns.len()));

        if let Some(target) = &self.conflict {
            let mut clause = vec!["ON CONFLICT".to_string()];
            if !target.is_empty() {
                clause.push(format!("({})", quote_identifiers(target)));
            }
            let set = self
                .columns
                .iter()
                .map(|c| {
                    let c = quote_identifier(c);
                    format!("{c}=excluded.{c}")
                })
                .collect::<Vec<_>>()
                .join(",");
            clause.push("DO UPDATE SET".to_string());
            clause.push(set);
            tokens.push(clause.join(" "));
        }
        tokens.join(" ")
    }
}

/// `DELETE FROM name [WHERE a=? AND b=? ...]`
#[derive(Clone, Debug)]
pub struct Delete {
    table: TableName,
    key: Vec<String>,
}

impl Delete {
    /// One `col=?` term per `key` column, joined with AND. No key columns deletes every row.
    pub fn new<S: AsRef<str>>(name: &str, key: &[S]) -> Self {
        Self {
            table: TableName::new(name),
            key: key.iter().map(|c| c.as_ref().to_string()).collect(),
        }
    }

    pub fn schema(mut self, schema: &str) -> Self {
        self.table.set_schema(schema);
        self
    }

    pub fn query(&self) -> String {
        let mut tokens = vec!["DELETE FROM".to_string(), self.table.query()];
        if !self.key.is_empty() {
            tokens.push("WHERE".to_string());
            let terms = self
                .key
                .iter()
                .map(|c| format!("{}=?", quote_identifier(c)))
                .collect::<Vec<_>>();
            tokens.push(terms.join(" AND "));
        }
        tokens.join(" ")
    }
}

/// `(?,?,...)` with `n` placeholders.
fn placeholders(n: usize) -> String {
    format!("({})", vec!["?"; n].join(","))
}

/// A FROM source: table name with optional alias.
#[derive(Clone, Debug)]
pub struct Source {
    table: TableName,
    alias: Option<String>,
}

impl Source {
    pub fn new(name: &str) -> Self {
        Self {
            table: TableName::new(name),
            alias: None,
        }
    }

    pub fn schema(mut self, schema: &str) -> Self {
        self.table.set_schema(schema);
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        let alias = alias.trim();
        self.alias = (!alias.is_empty()).then(|| alias.to_string());
        self
    }

    pub fn query(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS {}", self.table.query(), quote_identifier(alias)),
            None => self.table.query(),
        }
    }
}

/// `SELECT [DISTINCT] *|COUNT(*) [FROM source] [LIMIT/OFFSET]`
#[derive(Clone, Debug, Default)]
pub struct Select {
    source: Option<Source>,
    distinct: bool,
    count: bool,
    limit: u64,
    offset: u64,
}

impl Select {
    pub fn new(source: Option<Source>) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Select `COUNT(*)` instead of `*`.
    pub fn count(mut self) -> Self {
        self.count = true;
        self
    }

    pub fn limit_offset(mut self, limit: u64, offset: u64) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    pub fn query(&self) -> String {
        let mut tokens = vec!["SELECT".to_string()];
        if self.distinct {
            tokens.push("DISTINCT".to_string());
        }
        tokens.push(if self.count { "COUNT(*)" } else { "*" }.to_string());
        if let Some(source) = &self.source {
            tokens.push("FROM".to_string());
            tokens.push(source.query());
        }
        // Offset follows the comma in the two-value form.
        match (self.limit, self.offset) {
            (0, 0) => {}
            (0, offset) => tokens.push(format!("OFFSET {offset}")),
            (limit, 0) => tokens.push(format!("LIMIT {limit}")),
            (limit, offset) => tokens.push(format!("LIMIT {limit},{offset}")),
        }
        tokens.join(" ")
    }
}
