use super::{Catalog, SchemaIndex, table::Table};
use std::{fmt, hash::Hash};

#[derive(Debug, Clone)]
pub(crate) struct SchemaEntry {
    pub(crate) catalog_name: Option<String>,
    pub(crate) name: Option<String>,
}

impl SchemaEntry {
    pub(crate) fn full_name(&self) -> String {
        [self.catalog_name.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Borrowed view of a schema inside a [`Catalog`].
#[derive(Clone, Copy)]
pub struct Schema<'a> {
    pub(crate) catalog: &'a Catalog,
    pub(crate) index: SchemaIndex,
}

impl<'a> Schema<'a> {
    fn entry(&self) -> &'a SchemaEntry {
        &self.catalog.schemas[self.index.0]
    }

    pub fn index(&self) -> SchemaIndex {
        self.index
    }

    pub fn catalog_name(&self) -> Option<&'a str> {
        self.entry().catalog_name.as_deref()
    }

    pub fn name(&self) -> Option<&'a str> {
        self.entry().name.as_deref()
    }

    /// Catalog qualifier and schema name joined with `.`, skipping absent parts.
    pub fn full_name(&self) -> String {
        self.entry().full_name()
    }

    /// Tables of this schema in crawl order.
    pub fn tables(self) -> impl Iterator<Item = Table<'a>> {
        let catalog = self.catalog;
        let index = self.index;
        catalog
            .all_tables()
            .filter(move |table| table.schema_index() == index)
    }
}

impl PartialEq for Schema<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.full_name() == other.full_name()
    }
}

impl Eq for Schema<'_> {}

impl Hash for Schema<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.full_name().hash(state);
    }
}

impl fmt::Debug for Schema<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Schema").field(&self.full_name()).finish()
    }
}

impl fmt::Display for Schema<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}
