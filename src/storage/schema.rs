//! Database schema definitions

use crate::Result;
use super::RelationalStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    /// RFC 3339 text
    Timestamp,
}

impl ColumnType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Text | ColumnType::Timestamp => "TEXT",
            ColumnType::Integer => "INTEGER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

const fn col(name: &'static str, ty: ColumnType) -> Column {
    Column { name, ty }
}

/// A fixed table layout. The first column is the primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl TableSchema {
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// SQL to create the table
    pub fn create_sql(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i == 0 {
                    format!("    {} {} PRIMARY KEY", c.name, c.ty.sql_type())
                } else {
                    format!("    {} {} NOT NULL", c.name, c.ty.sql_type())
                }
            })
            .collect();
        format!("CREATE TABLE {} (\n{}\n)", self.name, columns.join(",\n"))
    }

    /// SQL to insert one row with positional parameters
    pub fn insert_sql(&self) -> String {
        let placeholders: Vec<String> = (1..=self.columns.len()).map(|i| format!("?{}", i)).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name,
            self.column_names().join(", "),
            placeholders.join(", ")
        )
    }
}

pub const CONTAINERS: TableSchema = TableSchema {
    name: "containers",
    columns: &[
        col("id", ColumnType::Text),
        col("name", ColumnType::Text),
        col("names", ColumnType::Text),
        col("image", ColumnType::Text),
        col("image_id", ColumnType::Text),
        col("command", ColumnType::Text),
        col("state", ColumnType::Text),
        col("status", ColumnType::Text),
        col("created", ColumnType::Timestamp),
        col("ports", ColumnType::Text),
        col("labels", ColumnType::Text),
    ],
};

pub const IMAGES: TableSchema = TableSchema {
    name: "images",
    columns: &[
        col("id", ColumnType::Text),
        col("reference", ColumnType::Text),
        col("tags", ColumnType::Text),
        col("parent_id", ColumnType::Text),
        col("size", ColumnType::Integer),
        col("created", ColumnType::Timestamp),
        col("labels", ColumnType::Text),
    ],
};

/// All snapshot tables
pub fn all_tables() -> [TableSchema; 2] {
    [CONTAINERS, IMAGES]
}

/// Declare every snapshot table on a freshly opened store
pub fn build_schema(store: &dyn RelationalStore) -> Result<()> {
    for table in all_tables() {
        store.create_table(&table)?;
        tracing::debug!("Created table {}", table.name);
    }
    Ok(())
}
