//! Defines the `Dialect` trait for database-specific identifier quoting.

use super::error::TemplateError;

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect.
    ///
    /// - ANSI and PostgreSQL use double quotes: `"my_column"`
    /// - MySQL uses backticks: `` `my_column` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the name of the dialect (e.g., "PostgreSQL", "MySQL").
    fn name(&self) -> String;

    /// Quotes each part and joins them with `.`; empty parts are skipped.
    fn qualify(&self, parts: &[&str]) -> String {
        parts
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }
}

#[derive(Debug, Clone)]
pub struct Ansi;

impl Dialect for Ansi {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }

    fn name(&self) -> String {
        "ANSI".into()
    }
}

#[derive(Debug, Clone)]
pub struct Postgres;

impl Dialect for Postgres {
    fn quote_identifier(&self, ident: &str) -> String {
        format!(r#""{}""#, ident.replace('"', r#""""#))
    }

    fn name(&self) -> String {
        "PostgreSQL".into()
    }
}

#[derive(Debug, Clone)]
pub struct MySql;

impl Dialect for MySql {
    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }

    fn name(&self) -> String {
        "MySQL".into()
    }
}

/// Emits identifiers as crawled, without quotes.
#[derive(Debug, Clone)]
pub struct Unquoted;

impl Dialect for Unquoted {
    fn quote_identifier(&self, ident: &str) -> String {
        ident.to_string()
    }

    fn name(&self) -> String {
        "Unquoted".into()
    }
}

/// Resolves a dialect by its command-line name.
pub fn by_name(name: &str) -> Result<Box<dyn Dialect>, TemplateError> {
    match name.to_ascii_lowercase().as_str() {
        "ansi" => Ok(Box::new(Ansi)),
        "postgres" | "pg" | "postgresql" => Ok(Box::new(Postgres)),
        "mysql" => Ok(Box::new(MySql)),
        "none" | "unquoted" => Ok(Box::new(Unquoted)),
        other => Err(TemplateError::UnknownDialect(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_and_escapes_identifiers() {
        assert_eq!(Postgres.quote_identifier("users"), r#""users""#);
        assert_eq!(Ansi.quote_identifier(r#"we"ird"#), r#""we""ird""#);
        assert_eq!(MySql.quote_identifier("a`b"), "`a``b`");
        assert_eq!(Unquoted.quote_identifier("users"), "users");
    }

    #[test]
    fn qualifies_skipping_empty_parts() {
        assert_eq!(
            Postgres.qualify(&["PUBLIC", "", "BOOKS"]),
            r#""PUBLIC"."BOOKS""#
        );
        assert_eq!(MySql.qualify(&["shop", "orders"]), "`shop`.`orders`");
    }

    #[test]
    fn resolves_dialects_by_name() {
        assert_eq!(by_name("PG").unwrap().name(), "PostgreSQL");
        assert!(matches!(
            by_name("oracle"),
            Err(TemplateError::UnknownDialect(name)) if name == "oracle"
        ));
    }
}
