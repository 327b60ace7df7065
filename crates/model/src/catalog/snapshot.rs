//! Offline JSON form of a [`Catalog`], so front-ends can work against a previously
//! crawled database without a live connection.
//!
//! Tables are stored as one flat list so that crawl order survives a round trip.

use super::{
    Catalog, CatalogBuilder,
    column::Column,
    crawl_info::CrawlInfo,
    error::CatalogError,
    relationship::{ColumnPair, RelationshipKind},
    table::TableType,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub crawl_info: CrawlInfo,
    #[serde(default)]
    pub schemas: Vec<SchemaSnapshot>,
    #[serde(default)]
    pub tables: Vec<TableSnapshot>,
    #[serde(default)]
    pub relationships: Vec<RelationshipSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Full name of the owning schema.
    pub schema: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub table_type: TableType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipSnapshot {
    pub name: String,
    #[serde(default)]
    pub kind: RelationshipKind,
    /// Full name of the referenced table.
    pub parent: String,
    /// Full name of the referencing table.
    pub child: String,
    #[serde(default)]
    pub columns: Vec<ColumnPair>,
}

impl Catalog {
    /// Rebuilds a catalog through [`CatalogBuilder`], so every uniqueness and
    /// reference check applies to snapshot input as well.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Catalog, CatalogError> {
        let mut builder = CatalogBuilder::new().with_crawl_info(snapshot.crawl_info);

        for schema in &snapshot.schemas {
            builder.add_schema(schema.catalog.as_deref(), schema.name.as_deref())?;
        }

        for table in snapshot.tables {
            let schema = builder
                .find_schema(&table.schema)
                .ok_or_else(|| CatalogError::UnknownSchema(table.schema.clone()))?;
            let index = builder.add_table(schema, &table.name, table.table_type)?;
            if let Some(remarks) = &table.remarks {
                builder.set_remarks(index, remarks)?;
            }
            for column in table.columns {
                builder.add_column(index, column)?;
            }
        }

        for rel in snapshot.relationships {
            let parent = builder
                .find_table(&rel.parent)
                .ok_or_else(|| CatalogError::UnknownTable(rel.parent.clone()))?;
            let child = builder
                .find_table(&rel.child)
                .ok_or_else(|| CatalogError::UnknownTable(rel.child.clone()))?;
            builder.add_relationship(&rel.name, parent, child, rel.kind, rel.columns)?;
        }

        Ok(builder.build())
    }

    pub fn to_snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            crawl_info: self.crawl_info.clone(),
            schemas: self
                .schemas
                .iter()
                .map(|s| SchemaSnapshot {
                    catalog: s.catalog_name.clone(),
                    name: s.name.clone(),
                })
                .collect(),
            tables: self
                .all_tables()
                .map(|t| TableSnapshot {
                    schema: t.schema().full_name(),
                    name: t.name().to_string(),
                    table_type: t.table_type().clone(),
                    remarks: t.remarks().map(str::to_string),
                    columns: t.columns().to_vec(),
                })
                .collect(),
            relationships: self
                .relationships()
                .map(|r| RelationshipSnapshot {
                    name: r.name().to_string(),
                    kind: r.kind(),
                    parent: r.parent().full_name(),
                    child: r.child().full_name(),
                    columns: r.column_pairs().to_vec(),
                })
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Catalog, CatalogError> {
        let snapshot: CatalogSnapshot = serde_json::from_str(json)?;
        Catalog::from_snapshot(snapshot)
    }

    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|err| CatalogError::Io {
            path: path.display().to_string(),
            source: err,
        })?;
        Catalog::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Catalog, CatalogError, relationship::Direction, table::TableType};

    const SNAPSHOT: &str = r#"{
        "crawlInfo": { "productName": "HSQL Database Engine", "productVersion": "2.7.2" },
        "schemas": [ { "catalog": "PUBLIC", "name": "BOOKS" } ],
        "tables": [
            { "schema": "PUBLIC.BOOKS", "name": "AUTHORS",
              "columns": [ { "name": "ID", "ordinal": 1, "type": "INTEGER", "partOfPrimaryKey": true } ] },
            { "schema": "PUBLIC.BOOKS", "name": "BOOKAUTHORS",
              "columns": [ { "name": "AUTHORID", "ordinal": 1, "type": "INTEGER", "nullable": false } ] },
            { "schema": "PUBLIC.BOOKS", "name": "AUTHORSLIST", "type": "VIEW" }
        ],
        "relationships": [
            { "name": "FK_BA_AUTHOR", "parent": "PUBLIC.BOOKS.AUTHORS", "child": "PUBLIC.BOOKS.BOOKAUTHORS",
              "columns": [ { "parent": "ID", "child": "AUTHORID" } ] }
        ]
    }"#;

    #[test]
    fn loads_snapshot_json() {
        let catalog = Catalog::from_json(SNAPSHOT).unwrap();

        assert_eq!(catalog.crawl_info().product(), "HSQL Database Engine 2.7.2");
        assert_eq!(catalog.table_count(), 3);

        let view = catalog.table("PUBLIC.BOOKS.AUTHORSLIST").unwrap();
        assert_eq!(view.table_type(), &TableType::View);

        let ba = catalog.table("PUBLIC.BOOKS.BOOKAUTHORS").unwrap();
        let parents = ba.related_tables(Direction::Parent);
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].name(), "AUTHORS");
        assert!(!ba.columns()[0].nullable);
    }

    #[test]
    fn snapshot_preserves_crawl_order() {
        let catalog = Catalog::from_json(SNAPSHOT).unwrap();
        let reloaded = Catalog::from_json(&catalog.to_json_pretty().unwrap()).unwrap();

        let before: Vec<_> = catalog.tables(None).iter().map(|t| t.full_name()).collect();
        let after: Vec<_> = reloaded.tables(None).iter().map(|t| t.full_name()).collect();
        assert_eq!(before, after);
        assert_eq!(reloaded.relationship_count(), 1);
    }

    #[test]
    fn rejects_relationship_to_unknown_table() {
        let json = r#"{
            "schemas": [ { "name": "APP" } ],
            "tables": [ { "schema": "APP", "name": "A" } ],
            "relationships": [ { "name": "FK", "parent": "APP.A", "child": "APP.B" } ]
        }"#;

        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::UnknownTable(name)) if name == "APP.B"
        ));
    }
}
