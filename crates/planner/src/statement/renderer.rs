use super::{
    dialect::Dialect,
    error::TemplateError,
    template::{expand, variables},
};
use model::catalog::{column::Column, table::Table};
use std::collections::HashMap;

/// Variables a statement template may reference.
pub const KNOWN_VARIABLES: [&str; 6] = [
    "table",
    "tablename",
    "schema",
    "tabletype",
    "columns",
    "orderbycolumns",
];

/// Renders statement templates against catalog tables, quoting identifiers
/// with the configured dialect.
pub struct StatementRenderer<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> StatementRenderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect
    }

    /// Rejects empty templates and templates using variables no table provides.
    pub fn check(template: &str) -> Result<(), TemplateError> {
        if template.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        match variables(template)
            .into_iter()
            .find(|var| !KNOWN_VARIABLES.contains(&var.as_str()))
        {
            Some(unknown) => Err(TemplateError::UnknownVariable(unknown)),
            None => Ok(()),
        }
    }

    pub fn render(&self, template: &str, table: Table<'_>) -> String {
        expand(template, &self.variables(table))
    }

    fn variables(&self, table: Table<'_>) -> HashMap<&'static str, String> {
        let schema = table.schema();
        let schema_parts = [
            schema.catalog_name().unwrap_or_default(),
            schema.name().unwrap_or_default(),
        ];

        let mut qualified: Vec<&str> = schema_parts.to_vec();
        qualified.push(table.name());

        let columns = self.column_list(table, |_| true);
        let order_by = self.column_list(table, |col| !col.is_large_object());

        HashMap::from([
            ("table", self.dialect.qualify(&qualified)),
            ("tablename", self.dialect.quote_identifier(table.name())),
            ("schema", self.dialect.qualify(&schema_parts)),
            ("tabletype", table.table_type().to_string()),
            ("columns", columns),
            ("orderbycolumns", order_by),
        ])
    }

    fn column_list(&self, table: Table<'_>, keep: impl Fn(&Column) -> bool) -> String {
        table
            .columns()
            .iter()
            .filter(|col| keep(col))
            .map(|col| self.dialect.quote_identifier(&col.name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::dialect::{MySql, Postgres};
    use model::catalog::{Catalog, table::TableType};

    fn catalog() -> Catalog {
        let mut b = Catalog::builder();
        let s = b.add_schema(Some("PUBLIC"), Some("BOOKS")).unwrap();
        let t = b.add_table(s, "AUTHORS", TableType::Table).unwrap();
        b.add_column(t, Column::new("ID", 1, "INTEGER")).unwrap();
        b.add_column(t, Column::new("LASTNAME", 2, "VARCHAR"))
            .unwrap();
        b.add_column(t, Column::new("PHOTO", 3, "BLOB")).unwrap();
        b.add_table(s, "AUTHORSLIST", TableType::View).unwrap();
        let bare = b.add_schema(None, None).unwrap();
        b.add_table(bare, "loose", TableType::Table).unwrap();
        b.build()
    }

    #[test]
    fn renders_qualified_table_and_columns() {
        let catalog = catalog();
        let table = catalog.table("PUBLIC.BOOKS.AUTHORS").unwrap();
        let renderer = StatementRenderer::new(&Postgres);

        assert_eq!(
            renderer.render("SELECT ${columns} FROM ${table}", table),
            r#"SELECT "ID", "LASTNAME", "PHOTO" FROM "PUBLIC"."BOOKS"."AUTHORS""#
        );
        assert_eq!(
            renderer.render("${schema} / ${tablename}", table),
            r#""PUBLIC"."BOOKS" / "AUTHORS""#
        );
    }

    #[test]
    fn order_by_columns_leave_out_large_objects() {
        let catalog = catalog();
        let table = catalog.table("PUBLIC.BOOKS.AUTHORS").unwrap();

        assert_eq!(
            StatementRenderer::new(&Postgres).render("ORDER BY ${orderbycolumns}", table),
            r#"ORDER BY "ID", "LASTNAME""#
        );
        assert!(StatementRenderer::check("SELECT ${orderbycolumns} FROM ${table}").is_ok());
    }

    #[test]
    fn renders_table_type_for_views() {
        let catalog = catalog();
        let view = catalog.table("PUBLIC.BOOKS.AUTHORSLIST").unwrap();
        let renderer = StatementRenderer::new(&MySql);

        assert_eq!(
            renderer.render("DROP ${tabletype} ${table}", view),
            "DROP VIEW `PUBLIC`.`BOOKS`.`AUTHORSLIST`"
        );
    }

    #[test]
    fn unqualified_table_has_no_schema_prefix() {
        let catalog = catalog();
        let table = catalog.table("loose").unwrap();

        assert_eq!(
            StatementRenderer::new(&Postgres).render("DELETE FROM ${table}", table),
            r#"DELETE FROM "loose""#
        );
    }

    #[test]
    fn check_rejects_unknown_variables() {
        assert_eq!(StatementRenderer::check("   "), Err(TemplateError::Empty));
        assert_eq!(
            StatementRenderer::check("SELECT * FROM ${tbl}"),
            Err(TemplateError::UnknownVariable("tbl".into()))
        );
        assert!(StatementRenderer::check("SELECT COUNT(*) FROM ${table}").is_ok());
    }
}
