//! SQLite schema table rows.

use super::constants::{SCHEMA_TBL_NAME_COLUMN, SCHEMA_TYPE_COLUMN};
use super::error::{DbError, Result};

/// An entry from the sqlite_schema table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    /// `table`, `index`, `view` or `trigger`.
    pub kind: String,
    pub name: String,
}

impl SchemaEntry {
    /// Parse a schema entry from a decoded sqlite_schema row.
    ///
    /// A full row is `type, name, tbl_name, rootpage, sql`, so the name comes
    /// from `tbl_name`. Shorter records carry the name in their first column
    /// and are taken to be tables.
    ///
    /// # Arguments
    ///
    /// * `row` - The column values of one schema cell, in column order
    ///
    /// # Returns
    ///
    /// Returns the entry, or [`DbError::Decode`] if the row has no columns.
    pub fn from_row(row: Vec<String>) -> Result<Self> {
        if row.len() > SCHEMA_TBL_NAME_COLUMN {
            let mut columns = row.into_iter();
            let kind = columns.nth(SCHEMA_TYPE_COLUMN).unwrap_or_default();
            let name = columns
                .nth(SCHEMA_TBL_NAME_COLUMN - SCHEMA_TYPE_COLUMN - 1)
                .unwrap_or_default();
            return Ok(Self { kind, name });
        }

        let name = row
            .into_iter()
            .next()
            .ok_or_else(|| DbError::Decode("schema row has no columns".to_string()))?;
        Ok(Self {
            kind: "table".to_string(),
            name,
        })
    }

    /// Check if this is a user table or view (not an index, trigger or
    /// internal sqlite_ table).
    pub fn is_user_table(&self) -> bool {
        matches!(self.kind.as_str(), "table" | "view") && !self.name.starts_with("sqlite_")
    }
}
