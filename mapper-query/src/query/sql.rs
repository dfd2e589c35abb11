//! SQL text assembly.

use std::fmt;

use super::value::SqlValue;

const RESERVED: &[&str] = &[
    "user", "order", "group", "select", "from", "where", "table", "index", "key", "primary",
    "foreign", "check", "default", "null", "not", "and", "or", "in", "is", "like", "between",
    "case", "when", "then", "else", "end", "as", "on", "join", "limit", "offset", "union", "all",
    "distinct", "having", "values", "set",
];

/// SQL dialect, controlling placeholders and identifier quoting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    /// `$1`, `$2` placeholders, `"double"` quoted identifiers.
    #[default]
    Postgres,
    /// `?` placeholders, `` `backtick` `` quoted identifiers.
    MySql,
    /// `?` placeholders, `"double"` quoted identifiers.
    Sqlite,
}

impl Dialect {
    /// Parse a dialect name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            "mysql" | "mariadb" => Some(Self::MySql),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// Get the placeholder for the parameter at a 1-based index.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::Postgres => format!("${}", index),
            Self::MySql | Self::Sqlite => "?".to_string(),
        }
    }

    /// Quote an identifier if it is reserved or contains special characters.
    pub fn quote(&self, name: &str) -> String {
        if !needs_quoting(name) {
            return name.to_string();
        }
        match self {
            Self::MySql => format!("`{}`", name.replace('`', "``")),
            Self::Postgres | Self::Sqlite => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }
}

/// Check if an identifier needs quoting.
pub fn needs_quoting(name: &str) -> bool {
    if RESERVED.contains(&name.to_lowercase().as_str()) {
        return true;
    }
    name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A finished statement: SQL text and its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text with placeholders.
    pub sql: String,
    /// Parameters in placeholder order.
    pub params: Vec<SqlValue>,
}

impl Statement {
    /// A statement with no parameters.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Incremental builder for a [`Statement`].
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    dialect: Dialect,
    sql: String,
    params: Vec<SqlValue>,
}

impl SqlBuilder {
    /// Create a builder for a dialect.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push literal SQL.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Push an identifier, quoted when needed.
    pub fn push_identifier(&mut self, name: &str) -> &mut Self {
        let quoted = self.dialect.quote(name);
        self.sql.push_str(&quoted);
        self
    }

    /// Push a placeholder and bind its value.
    pub fn push_param(&mut self, value: SqlValue) -> &mut Self {
        self.params.push(value);
        let placeholder = self.dialect.placeholder(self.params.len());
        self.sql.push_str(&placeholder);
        self
    }

    /// Push a comma-separated, parenthesized list of placeholders.
    pub fn push_param_list(&mut self, values: impl IntoIterator<Item = SqlValue>) -> &mut Self {
        self.push("(");
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push_param(value);
        }
        self.push(")")
    }

    /// Finish the statement.
    pub fn build(self) -> Statement {
        Statement {
            sql: self.sql,
            params: self.params,
        }
    }
}
