use super::TableId;
use crate::stmt;

use std::fmt;

/// A column belonging to exactly one [`Table`](super::Table).
#[derive(Debug, Clone)]
pub struct Column {
    /// Uniquely identifies the column in the snapshot.
    pub id: ColumnId,

    /// Display title. Used as the output key for the projected value.
    pub title: String,

    /// Direct, relation, lookup, ...
    pub kind: ColumnKind,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId {
    pub table: TableId,
    pub index: usize,
}

/// The closed set of column kinds the projector dispatches over. Adding a
/// kind without a corresponding match arm is a compile error.
#[derive(Debug, Clone)]
pub enum ColumnKind {
    /// Plain database column, selected directly off the row source.
    Direct(Direct),

    /// Link to another record: a relation to another table.
    Link(Link),

    /// Surfaces a column from a related table through a link column on the
    /// same table. The target may itself be any column kind.
    Lookup(Lookup),

    /// Computed column backed by a pre-compiled expression.
    Formula(Formula),

    /// Aggregate over a related table through a link column.
    Rollup(Rollup),

    /// Engine-managed column; never projected.
    System(Direct),
}

#[derive(Debug, Clone)]
pub struct Direct {
    /// The name of the underlying column in the database.
    pub column_name: String,
}

/// Options on a link column.
///
/// Key semantics by relation kind:
/// - `BelongsTo`: `child_key` is the foreign key on the owning table,
///   `parent_key` the referenced column on `related`.
/// - `HasMany`: `child_key` is the foreign key on `related`, `parent_key`
///   the referenced column on the owning table.
/// - `ManyToMany`: `child_key` is on the owning table, `parent_key` on
///   `related`, and `associative` carries the in-between table with its
///   foreign keys to each side.
#[derive(Debug, Clone)]
pub struct Link {
    pub kind: RelationKind,
    pub related: TableId,
    pub child_key: ColumnId,
    pub parent_key: ColumnId,
    pub associative: Option<Associative>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    BelongsTo,
    HasMany,
    ManyToMany,
}

#[derive(Debug, Clone)]
pub struct Associative {
    pub table: TableId,

    /// Foreign key on the associative table matching `child_key`.
    pub near_key: ColumnId,

    /// Foreign key on the associative table matching `parent_key`.
    pub far_key: ColumnId,
}

#[derive(Debug, Clone)]
pub struct Lookup {
    /// A link column on the same table.
    pub relation: ColumnId,

    /// The column on the related table whose value is surfaced.
    pub target: ColumnId,
}

/// A pre-parsed formula. The expression compiler is an external
/// collaborator; by the time metadata reaches the query compiler the
/// formula either carries a compiled expression or an error marker.
///
/// Column references inside the expression are unqualified and resolve
/// against the enclosing row source.
#[derive(Debug, Clone)]
pub struct Formula {
    pub expr: Option<stmt::Expr>,

    /// When set, the column contributes no projection.
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Rollup {
    /// A link column on the same table.
    pub relation: ColumnId,

    pub function: RollupFn,

    /// The column on the related table the aggregate runs over.
    pub target: ColumnId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollupFn {
    Count,
    Sum,
    Min,
    Max,
    Avg,
}

impl Column {
    /// The underlying SQL column name, for kinds that map to a real column.
    pub fn sql_name(&self) -> Option<&str> {
        match &self.kind {
            ColumnKind::Direct(direct) | ColumnKind::System(direct) => {
                Some(&direct.column_name)
            }
            _ => None,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self.kind, ColumnKind::System(_))
    }
}

impl RelationKind {
    pub fn is_to_many(&self) -> bool {
        !matches!(self, Self::BelongsTo)
    }
}

impl fmt::Debug for ColumnId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ColumnId({}/{})", self.table.0, self.index)
    }
}
