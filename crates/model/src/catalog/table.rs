use super::{
    Catalog, SchemaIndex, TableIndex,
    column::Column,
    relationship::{Direction, RelationshipRef},
    schema::Schema,
};
use serde::{Deserialize, Serialize};
use std::{fmt, hash::Hash};

/// Type tag reported by the data source for a table-like object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TableType {
    #[default]
    Table,
    View,
    Other(String),
}

impl TableType {
    pub fn as_str(&self) -> &str {
        match self {
            TableType::Table => "TABLE",
            TableType::View => "VIEW",
            TableType::Other(tag) => tag,
        }
    }
}

impl From<String> for TableType {
    fn from(tag: String) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "TABLE" | "BASE TABLE" => TableType::Table,
            "VIEW" => TableType::View,
            _ => TableType::Other(tag),
        }
    }
}

impl From<&str> for TableType {
    fn from(tag: &str) -> Self {
        TableType::from(tag.to_string())
    }
}

impl From<TableType> for String {
    fn from(table_type: TableType) -> Self {
        table_type.as_str().to_string()
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TableEntry {
    pub(crate) schema: SchemaIndex,
    pub(crate) name: String,
    pub(crate) table_type: TableType,
    pub(crate) remarks: Option<String>,
    /// Kept sorted by ordinal.
    pub(crate) columns: Vec<Column>,
}

/// Borrowed view of a table inside a [`Catalog`].
///
/// Identity is the full name: two handles for the same table compare equal
/// regardless of how they were obtained.
#[derive(Clone, Copy)]
pub struct Table<'a> {
    pub(crate) catalog: &'a Catalog,
    pub(crate) index: TableIndex,
}

impl<'a> Table<'a> {
    fn entry(&self) -> &'a TableEntry {
        &self.catalog.tables[self.index.0]
    }

    pub fn index(&self) -> TableIndex {
        self.index
    }

    pub fn name(&self) -> &'a str {
        &self.entry().name
    }

    pub fn table_type(&self) -> &'a TableType {
        &self.entry().table_type
    }

    pub fn remarks(&self) -> Option<&'a str> {
        self.entry().remarks.as_deref()
    }

    pub fn schema(&self) -> Schema<'a> {
        Schema {
            catalog: self.catalog,
            index: self.entry().schema,
        }
    }

    pub(crate) fn schema_index(&self) -> SchemaIndex {
        self.entry().schema
    }

    /// Schema full name + `.` + table name.
    pub fn full_name(&self) -> String {
        let schema = self.schema().full_name();
        if schema.is_empty() {
            self.name().to_string()
        } else {
            format!("{schema}.{}", self.name())
        }
    }

    /// Columns ordered by ordinal position.
    pub fn columns(&self) -> &'a [Column] {
        &self.entry().columns
    }

    pub fn column(&self, name: &str) -> Option<&'a Column> {
        self.columns().iter().find(|col| col.name == name)
    }

    pub fn primary_key_columns(self) -> impl Iterator<Item = &'a Column> + 'a {
        self.columns().iter().filter(|col| col.part_of_primary_key)
    }

    /// Relationship edges touching this table on the given side: with
    /// [`Direction::Parent`] the edges where this table is the child, with
    /// [`Direction::Child`] the edges where it is the parent.
    pub fn relationships(self, direction: Direction) -> impl Iterator<Item = RelationshipRef<'a>> {
        let catalog = self.catalog;
        let edges = match direction {
            Direction::Parent => &catalog.edges_by_child[self.index.0],
            Direction::Child => &catalog.edges_by_parent[self.index.0],
        };
        edges.iter().map(move |&edge| RelationshipRef {
            catalog,
            edge: &catalog.relationships[edge],
        })
    }

    /// Direct neighbours one hop away, in edge order, without duplicates.
    /// A self-referencing table lists itself once and is not expanded further.
    pub fn related_tables(self, direction: Direction) -> Vec<Table<'a>> {
        let mut related: Vec<Table<'a>> = Vec::new();
        for rel in self.relationships(direction) {
            let other = rel.other_end(direction);
            if !related.iter().any(|t| t.index == other.index) {
                related.push(other);
            }
        }
        related
    }

    pub fn is_self_referencing(self) -> bool {
        self.relationships(Direction::Parent)
            .any(|rel| rel.is_self_referencing())
    }
}

impl PartialEq for Table<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.full_name() == other.full_name()
    }
}

impl Eq for Table<'_> {}

impl Hash for Table<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.full_name().hash(state);
    }
}

impl fmt::Debug for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Table").field(&self.full_name()).finish()
    }
}

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}
