use super::{Alias, Expr, ExprColumn, Select};

/// A row source in a FROM clause or a join.
#[derive(Debug, Clone)]
pub enum Source {
    Table {
        name: String,
        alias: Option<Alias>,
    },

    Subquery {
        query: Box<Select>,
        alias: Alias,
    },

    /// `json_array_elements(col) AS "alias"`; unnests a JSON array column
    /// one level.
    ArrayElements {
        expr: ExprColumn,
        alias: Alias,
    },
}

#[derive(Debug, Clone)]
pub struct Join {
    pub op: JoinOp,
    pub source: Source,
}

#[derive(Debug, Clone)]
pub enum JoinOp {
    /// `LEFT JOIN <source> ON <expr>`
    Left(Expr),

    /// `LEFT OUTER JOIN LATERAL <source> ON true`
    Lateral,
}
