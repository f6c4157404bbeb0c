use super::{Column, ColumnId};

use std::fmt;

/// A named relation with an ordered set of columns.
#[derive(Debug)]
pub struct Table {
    /// Uniquely identifies the table in the snapshot.
    pub id: TableId,

    /// The name of the table in the database.
    pub name: String,

    pub columns: Vec<Column>,

    /// The designated primary-key column.
    pub primary_key: ColumnId,

    /// The designated primary-value (display) column, distinct from the
    /// primary key.
    pub primary_value: ColumnId,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(pub usize);

impl Table {
    pub fn pk(&self) -> &Column {
        &self.columns[self.primary_key.index]
    }

    pub fn pv(&self) -> &Column {
        &self.columns[self.primary_value.index]
    }

    /// Resolves a caller-supplied alias to a column via the column model.
    /// Titles are unique within a table's visible set.
    pub fn column_by_title(&self, title: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.title == title)
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TableId({})", self.0)
    }
}
