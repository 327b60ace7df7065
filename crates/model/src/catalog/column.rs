use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,

    /// 1-based position of the column within its table.
    pub ordinal: u32,

    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default = "default_nullable")]
    pub nullable: bool,

    #[serde(default)]
    pub part_of_primary_key: bool,
}

fn default_nullable() -> bool {
    true
}

impl Column {
    pub fn new(name: impl Into<String>, ordinal: u32, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ordinal,
            type_name: type_name.into(),
            nullable: true,
            part_of_primary_key: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.part_of_primary_key = true;
        self.nullable = false;
        self
    }

    /// Binary and character large objects, which most databases cannot sort by.
    pub fn is_large_object(&self) -> bool {
        let base = self
            .type_name
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_uppercase();
        base.ends_with("LOB")
            || matches!(
                base.as_str(),
                "BYTEA" | "LONGVARBINARY" | "LONGVARCHAR" | "LONGTEXT" | "MEDIUMTEXT" | "IMAGE"
            )
    }
}
