use crate::stmt::Value;

use serde::Deserialize;

/// A node in a filter tree: either a leaf comparison or a group of child
/// filters joined by one logical operator. Mixing AND and OR within a
/// single group is not supported; nest groups instead.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Filter {
    Group(FilterGroup),
    Leaf(FilterLeaf),
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterGroup {
    pub op: LogicalOp,

    #[serde(default)]
    pub children: Vec<Filter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterLeaf {
    /// Column title; resolved against the table's column model. Leaves
    /// referencing an unknown title are dropped by the condition compiler.
    pub column: String,

    pub op: FilterOp,

    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    Nlike,
    Null,
    NotNull,
    In,
    /// Value must be a two-element list: `[low, high]` of the date range.
    Within,
}

impl Filter {
    pub fn group(op: LogicalOp, children: Vec<Filter>) -> Self {
        Self::Group(FilterGroup { op, children })
    }

    pub fn leaf(column: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self::Leaf(FilterLeaf {
            column: column.into(),
            op,
            value: value.into(),
        })
    }
}
