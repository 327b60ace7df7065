use super::{
    Catalog, SchemaIndex, TableIndex,
    column::Column,
    crawl_info::CrawlInfo,
    error::CatalogError,
    relationship::{ColumnPair, Relationship, RelationshipKind},
    schema::SchemaEntry,
    table::{TableEntry, TableType},
};
use std::collections::HashMap;

/// Incrementally assembles a [`Catalog`]. This is the contract a crawler uses to
/// hand over what it discovered; every `add_*` call validates name uniqueness
/// within the parent scope, and table full names are unique across the whole
/// catalog, so [`CatalogBuilder::build`] cannot fail.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    crawl_info: CrawlInfo,
    schemas: Vec<SchemaEntry>,
    tables: Vec<TableEntry>,
    relationships: Vec<Relationship>,
    table_names: HashMap<String, TableIndex>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crawl_info(mut self, crawl_info: CrawlInfo) -> Self {
        self.crawl_info = crawl_info;
        self
    }

    pub fn set_crawl_info(&mut self, crawl_info: CrawlInfo) {
        self.crawl_info = crawl_info;
    }

    pub fn add_schema(
        &mut self,
        catalog_name: Option<&str>,
        name: Option<&str>,
    ) -> Result<SchemaIndex, CatalogError> {
        let entry = SchemaEntry {
            catalog_name: catalog_name.map(str::to_string),
            name: name.map(str::to_string),
        };

        let full_name = entry.full_name();
        if self.schemas.iter().any(|s| s.full_name() == full_name) {
            return Err(CatalogError::DuplicateSchema(full_name));
        }

        self.schemas.push(entry);
        Ok(SchemaIndex(self.schemas.len() - 1))
    }

    /// Tables are kept in the order they are added, which is the crawl order.
    pub fn add_table(
        &mut self,
        schema: SchemaIndex,
        name: &str,
        table_type: TableType,
    ) -> Result<TableIndex, CatalogError> {
        if name.is_empty() {
            return Err(CatalogError::EmptyTableName);
        }

        let schema_entry = self
            .schemas
            .get(schema.0)
            .ok_or_else(|| CatalogError::UnknownSchema(format!("#{}", schema.0)))?;

        if self
            .tables
            .iter()
            .any(|t| t.schema == schema && t.name == name)
        {
            return Err(CatalogError::DuplicateTable {
                schema: schema_entry.full_name(),
                table: name.to_string(),
            });
        }

        let full_name = qualified(&schema_entry.full_name(), name);
        if self.table_names.contains_key(&full_name) {
            return Err(CatalogError::DuplicateFullName(full_name));
        }

        let index = TableIndex(self.tables.len());
        self.tables.push(TableEntry {
            schema,
            name: name.to_string(),
            table_type,
            remarks: None,
            columns: Vec::new(),
        });
        self.table_names.insert(full_name, index);
        Ok(index)
    }

    pub fn set_remarks(&mut self, table: TableIndex, remarks: &str) -> Result<(), CatalogError> {
        let entry = self.table_entry_mut(table)?;
        entry.remarks = Some(remarks.to_string());
        Ok(())
    }

    pub fn add_column(&mut self, table: TableIndex, column: Column) -> Result<(), CatalogError> {
        let entry = self.table_entry_mut(table)?;
        if entry.columns.iter().any(|c| c.name == column.name) {
            return Err(CatalogError::DuplicateColumn {
                table: entry.name.clone(),
                column: column.name,
            });
        }

        entry.columns.push(column);
        Ok(())
    }

    /// Records a directed edge from `parent` (referenced) to `child` (referencing).
    /// `parent == child` models a self-referencing key.
    pub fn add_relationship(
        &mut self,
        name: &str,
        parent: TableIndex,
        child: TableIndex,
        kind: RelationshipKind,
        column_pairs: Vec<ColumnPair>,
    ) -> Result<(), CatalogError> {
        for end in [parent, child] {
            if end.0 >= self.tables.len() {
                return Err(CatalogError::UnknownTable(format!("#{}", end.0)));
            }
        }

        self.relationships.push(Relationship {
            name: name.to_string(),
            parent,
            child,
            kind,
            column_pairs,
        });
        Ok(())
    }

    /// Index of an already added table, by its full name.
    pub fn find_table(&self, full_name: &str) -> Option<TableIndex> {
        self.table_names.get(full_name).copied()
    }

    pub fn find_schema(&self, full_name: &str) -> Option<SchemaIndex> {
        self.schemas
            .iter()
            .position(|s| s.full_name() == full_name)
            .map(SchemaIndex)
    }

    pub fn build(self) -> Catalog {
        Catalog::from_parts(
            self.crawl_info,
            self.schemas,
            self.tables,
            self.relationships,
        )
    }

    fn table_entry_mut(&mut self, table: TableIndex) -> Result<&mut TableEntry, CatalogError> {
        self.tables
            .get_mut(table.0)
            .ok_or_else(|| CatalogError::UnknownTable(format!("#{}", table.0)))
    }
}

fn qualified(schema: &str, table: &str) -> String {
    if schema.is_empty() {
        table.to_string()
    } else {
        format!("{schema}.{table}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_names_within_parent() {
        let mut b = CatalogBuilder::new();
        let s = b.add_schema(None, Some("APP")).unwrap();
        b.add_table(s, "USERS", TableType::Table).unwrap();

        assert!(matches!(
            b.add_schema(None, Some("APP")),
            Err(CatalogError::DuplicateSchema(name)) if name == "APP"
        ));
        assert!(matches!(
            b.add_table(s, "USERS", TableType::View),
            Err(CatalogError::DuplicateTable { .. })
        ));
    }

    #[test]
    fn same_table_name_allowed_in_sibling_schemas() {
        let mut b = CatalogBuilder::new();
        let a = b.add_schema(None, Some("A")).unwrap();
        let c = b.add_schema(None, Some("C")).unwrap();
        b.add_table(a, "T", TableType::Table).unwrap();
        b.add_table(c, "T", TableType::Table).unwrap();

        let catalog = b.build();
        assert!(catalog.table("A.T").is_some());
        assert!(catalog.table("C.T").is_some());
        assert_ne!(catalog.table("A.T"), catalog.table("C.T"));
    }

    #[test]
    fn rejects_tables_whose_full_names_collide_across_schemas() {
        let mut b = CatalogBuilder::new();
        let a = b.add_schema(None, Some("A")).unwrap();
        let ab = b.add_schema(None, Some("A.B")).unwrap();
        b.add_table(a, "B.C", TableType::Table).unwrap();

        assert!(matches!(
            b.add_table(ab, "C", TableType::View),
            Err(CatalogError::DuplicateFullName(name)) if name == "A.B.C"
        ));

        let catalog = b.build();
        assert_eq!(catalog.tables(None).len(), 1);
        assert_eq!(
            catalog.table("A.B.C").map(|t| t.table_type().clone()),
            Some(TableType::Table)
        );
    }

    #[test]
    fn rejects_duplicate_columns_and_dangling_edges() {
        let mut b = CatalogBuilder::new();
        let s = b.add_schema(None, Some("APP")).unwrap();
        let t = b.add_table(s, "USERS", TableType::Table).unwrap();
        b.add_column(t, Column::new("ID", 1, "INT")).unwrap();

        assert!(matches!(
            b.add_column(t, Column::new("ID", 2, "INT")),
            Err(CatalogError::DuplicateColumn { .. })
        ));
        assert!(matches!(
            b.add_relationship("FK", t, TableIndex(9), RelationshipKind::ForeignKey, vec![]),
            Err(CatalogError::UnknownTable(_))
        ));
    }

    #[test]
    fn finds_tables_by_full_name() {
        let mut b = CatalogBuilder::new();
        let s = b.add_schema(Some("DB"), Some("APP")).unwrap();
        let bare = b.add_schema(None, None).unwrap();
        let t = b.add_table(s, "USERS", TableType::Table).unwrap();
        let u = b.add_table(bare, "LOOSE", TableType::Table).unwrap();

        assert_eq!(b.find_table("DB.APP.USERS"), Some(t));
        assert_eq!(b.find_table("LOOSE"), Some(u));
        assert_eq!(b.find_table("DB.APPXUSERS"), None);
        assert_eq!(b.find_schema("DB.APP"), Some(s));
    }
}
