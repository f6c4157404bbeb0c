mod column;
pub use column::{
    Associative, Column, ColumnId, ColumnKind, Direct, Formula, Link, Lookup, RelationKind, Rollup,
    RollupFn,
};

mod filter;
pub use filter::{Filter, FilterGroup, FilterLeaf, FilterOp, LogicalOp};

mod sort;
pub use sort::Sort;

mod table;
pub use table::{Table, TableId};

mod view;
pub use view::View;

/// A fully resolved, immutable metadata snapshot.
///
/// Owned and mutated by the metadata layer; the compiler only reads it for
/// the duration of one compilation. No lazy loading happens here.
#[derive(Debug, Default)]
pub struct Meta {
    pub tables: Vec<Table>,
}

impl Meta {
    pub fn table(&self, id: TableId) -> &Table {
        &self.tables[id.0]
    }

    pub fn column(&self, id: ColumnId) -> &Column {
        &self.table(id.table).columns[id.index]
    }
}
