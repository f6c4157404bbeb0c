use crate::stmt::Direction;

use serde::Deserialize;

/// One ORDER BY entry: a column reference and a direction.
#[derive(Debug, Clone, Deserialize)]
pub struct Sort {
    /// Column title; resolved against the table's column model.
    pub column: String,

    #[serde(default)]
    pub direction: Direction,
}

impl Sort {
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}
