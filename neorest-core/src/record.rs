
//! Result columns and rows.
//!
//! The column header list is decoded once per result and shared by every
//! row; each row holds one decoded cell per column and is immutable after
//! construction.

use std::sync::Arc;

use serde_json::Value as Json;

use crate::error::NeorestError;
use crate::traits::FromValue;
use crate::value::Value;

/// The column schema of one result set: ordered names with stable ordinals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    names: Vec<String>,
}

impl Columns {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column names in ordinal order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Ordinal of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

/// One decoded result row: an ordered sequence of typed cells, one per
/// column. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<Columns>,
    cells: Vec<Value>,
}

impl Row {
    /// Decode one raw row against the shared column schema.
    ///
    /// A row whose length differs from the column count is a
    /// [`Malformed`](NeorestError::Malformed) result.
    pub fn decode(columns: Arc<Columns>, raw: &Json) -> Result<Self, NeorestError> {
        let cells = match raw {
            Json::Array(cells) => cells,
            _ => return Err(NeorestError::malformed("row is not an array")),
        };
        if cells.len() != columns.len() {
            return Err(NeorestError::malformed(format!(
                "row has {} cells but result declares {} columns",
                cells.len(),
                columns.len()
            )));
        }
        let cells = cells.iter().map(Value::decode).collect::<Result<Vec<_>, _>>()?;
        Ok(Row { columns, cells })
    }

    /// The column schema this row was decoded against.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Number of cells (equals the column count).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell by column name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.index_of(name).map(|i| &self.cells[i])
    }

    /// Cell by ordinal.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.cells.get(index)
    }

    /// Cell by column name, converted to `T`.
    ///
    /// Fails with [`MissingColumn`](NeorestError::MissingColumn) if the
    /// column does not exist, or the conversion's own error wrapped with the
    /// column name.
    pub fn get_as<T: FromValue>(&self, name: &str) -> Result<T, NeorestError> {
        match self.get(name) {
            Some(v) => {
                T::from_value(v.clone()).map_err(|e| e.with_context(format!("column '{name}'")))
            }
            None => Err(NeorestError::missing_column(name, "row")),
        }
    }

    /// Cell by ordinal, converted to `T`.
    pub fn get_index_as<T: FromValue>(&self, index: usize) -> Result<T, NeorestError> {
        match self.get_index(index) {
            Some(v) => {
                T::from_value(v.clone()).map_err(|e| e.with_context(format!("column #{index}")))
            }
            None => Err(NeorestError::missing_column(&index.to_string(), "row")),
        }
    }

    /// Consume the row, yielding its cells in column order.
    pub fn into_cells(self) -> Vec<Value> {
        self.cells
    }
}
