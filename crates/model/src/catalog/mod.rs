//! Immutable snapshot of a crawled database's structure.
//!
//! Entities live in flat, ordered vectors owned by [`Catalog`]. Schemas, tables and
//! relationship edges refer to each other by arena index, so there are no back
//! pointers and no ownership cycles, even for self-referencing tables. The borrowed
//! handles [`Schema`] and [`Table`] compute full names on demand.

pub mod builder;
pub mod column;
pub mod crawl_info;
pub mod error;
pub mod relationship;
pub mod schema;
pub mod snapshot;
pub mod table;

use column::Column;
use crawl_info::CrawlInfo;
use relationship::{Relationship, RelationshipRef};
use schema::{Schema, SchemaEntry};
use serde::Serialize;
use table::{Table, TableEntry};

pub use builder::CatalogBuilder;
pub use error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SchemaIndex(pub(crate) usize);

/// Position of a table in crawl order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TableIndex(pub(crate) usize);

impl TableIndex {
    pub fn position(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    crawl_info: CrawlInfo,
    schemas: Vec<SchemaEntry>,
    /// Tables in crawl (discovery) order.
    tables: Vec<TableEntry>,
    relationships: Vec<Relationship>,
    /// Per table, indices into `relationships` where the table is the child.
    edges_by_child: Vec<Vec<usize>>,
    /// Per table, indices into `relationships` where the table is the parent.
    edges_by_parent: Vec<Vec<usize>>,
}

impl Catalog {
    pub(crate) fn from_parts(
        crawl_info: CrawlInfo,
        schemas: Vec<SchemaEntry>,
        mut tables: Vec<TableEntry>,
        relationships: Vec<Relationship>,
    ) -> Self {
        for table in &mut tables {
            table.columns.sort_by_key(|col: &Column| col.ordinal);
        }

        let mut edges_by_child = vec![Vec::new(); tables.len()];
        let mut edges_by_parent = vec![Vec::new(); tables.len()];
        for (i, rel) in relationships.iter().enumerate() {
            edges_by_child[rel.child.0].push(i);
            edges_by_parent[rel.parent.0].push(i);
        }

        Self {
            crawl_info,
            schemas,
            tables,
            relationships,
            edges_by_child,
            edges_by_parent,
        }
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Tool, data source and driver information recorded by the crawl.
    pub fn crawl_info(&self) -> &CrawlInfo {
        &self.crawl_info
    }

    pub fn schemas(&self) -> impl Iterator<Item = Schema<'_>> {
        (0..self.schemas.len()).map(move |i| Schema {
            catalog: self,
            index: SchemaIndex(i),
        })
    }

    pub fn schema(&self, full_name: &str) -> Option<Schema<'_>> {
        self.schemas().find(|schema| schema.full_name() == full_name)
    }

    /// Tables in crawl order, optionally restricted to one schema (by full name).
    /// An unknown schema yields no tables.
    pub fn tables(&self, schema: Option<&str>) -> Vec<Table<'_>> {
        match schema {
            None => self.all_tables().collect(),
            Some(name) => self
                .schema(name)
                .map(|schema| schema.tables().collect())
                .unwrap_or_default(),
        }
    }

    pub fn table(&self, full_name: &str) -> Option<Table<'_>> {
        self.all_tables().find(|table| table.full_name() == full_name)
    }

    pub fn relationships(&self) -> impl Iterator<Item = RelationshipRef<'_>> {
        self.relationships
            .iter()
            .map(move |edge| RelationshipRef { catalog: self, edge })
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub(crate) fn all_tables(&self) -> impl Iterator<Item = Table<'_>> {
        (0..self.tables.len()).map(move |i| Table {
            catalog: self,
            index: TableIndex(i),
        })
    }

    /// Indices handed out by this catalog are always in range.
    pub(crate) fn table_at(&self, index: TableIndex) -> Table<'_> {
        Table {
            catalog: self,
            index,
        }
    }
}
