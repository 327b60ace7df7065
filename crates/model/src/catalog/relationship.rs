use super::{Catalog, TableIndex, table::Table};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    /// Declared foreign key constraint.
    #[default]
    ForeignKey,
    /// Association inferred from naming conventions, not backed by a constraint.
    Inferred,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipKind::ForeignKey => f.write_str("foreign key"),
            RelationshipKind::Inferred => f.write_str("inferred"),
        }
    }
}

/// Which end of a relationship to follow from a given table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    /// Tables the given table references.
    Parent,
    /// Tables that reference the given table.
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPair {
    pub parent: String,
    pub child: String,
}

impl ColumnPair {
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

/// A directed edge from a parent (referenced) table to a child (referencing) table.
/// Both ends are arena indices into the owning catalog.
#[derive(Debug, Clone)]
pub(crate) struct Relationship {
    pub(crate) name: String,
    pub(crate) parent: TableIndex,
    pub(crate) child: TableIndex,
    pub(crate) kind: RelationshipKind,
    pub(crate) column_pairs: Vec<ColumnPair>,
}

/// Borrowed view of a relationship edge.
#[derive(Clone, Copy)]
pub struct RelationshipRef<'a> {
    pub(crate) catalog: &'a Catalog,
    pub(crate) edge: &'a Relationship,
}

impl<'a> RelationshipRef<'a> {
    pub fn name(&self) -> &'a str {
        &self.edge.name
    }

    pub fn kind(&self) -> RelationshipKind {
        self.edge.kind
    }

    pub fn parent(&self) -> Table<'a> {
        self.catalog.table_at(self.edge.parent)
    }

    pub fn child(&self) -> Table<'a> {
        self.catalog.table_at(self.edge.child)
    }

    pub fn column_pairs(&self) -> &'a [ColumnPair] {
        &self.edge.column_pairs
    }

    pub fn is_self_referencing(&self) -> bool {
        self.edge.parent == self.edge.child
    }

    /// The table at the far end of this edge when standing on `from`.
    pub fn other_end(&self, from: Direction) -> Table<'a> {
        match from {
            Direction::Parent => self.parent(),
            Direction::Child => self.child(),
        }
    }
}

impl fmt::Debug for RelationshipRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relationship")
            .field("name", &self.edge.name)
            .field("parent", &self.parent().full_name())
            .field("child", &self.child().full_name())
            .field("kind", &self.edge.kind)
            .finish()
    }
}
