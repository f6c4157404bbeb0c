use super::{Alias, BinaryOp, Select, Value};
use crate::meta::RollupFn;

/// A scalar SQL expression.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Conjunction. Empty serializes as TRUE.
    And(Vec<Expr>),

    /// Disjunction. Empty serializes as FALSE.
    Or(Vec<Expr>),

    BinaryOp(ExprBinaryOp),

    IsNull(ExprIsNull),

    Like(ExprLike),

    InList(ExprInList),

    Between(ExprBetween),

    /// A possibly qualified column reference.
    Column(ExprColumn),

    /// `CURRENT_DATE`
    CurrentDate,

    /// `CURRENT_DATE` shifted by a number of days; the day count binds
    /// as a parameter.
    DateOffset(ExprDateOffset),

    /// `"alias".*`
    TableStar(Alias),

    /// A literal bound as a parameter.
    Value(Value),

    /// `json_build_object(k1, v1, ...)`; keys are bound as parameters.
    JsonObject(Vec<(String, Expr)>),

    /// `coalesce(json_agg(arg), '[]'::json)`
    JsonAgg(Box<Expr>),

    /// An aggregate function call; `None` arg means `count(*)`.
    Aggregate(ExprAggregate),

    /// A scalar subquery.
    Stmt(Box<Select>),
}

#[derive(Debug, Clone)]
pub struct ExprBinaryOp {
    pub lhs: Box<Expr>,
    pub op: BinaryOp,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct ExprIsNull {
    pub expr: Box<Expr>,
    pub negate: bool,
}

#[derive(Debug, Clone)]
pub struct ExprLike {
    pub expr: Box<Expr>,
    pub pattern: Box<Expr>,
    pub negate: bool,
}

#[derive(Debug, Clone)]
pub struct ExprInList {
    pub expr: Box<Expr>,
    pub list: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct ExprBetween {
    pub expr: Box<Expr>,
    pub low: Box<Expr>,
    pub high: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct ExprColumn {
    pub qualifier: Option<Alias>,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ExprDateOffset {
    pub days: Box<Expr>,
    pub backward: bool,
}

#[derive(Debug, Clone)]
pub struct ExprAggregate {
    pub function: RollupFn,
    pub arg: Option<Box<Expr>>,
}

impl Expr {
    pub fn column(qualifier: &Alias, name: impl Into<String>) -> Self {
        Self::Column(ExprColumn {
            qualifier: Some(qualifier.clone()),
            name: name.into(),
        })
    }

    pub fn unqualified_column(name: impl Into<String>) -> Self {
        Self::Column(ExprColumn {
            qualifier: None,
            name: name.into(),
        })
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    pub fn binary_op(lhs: Expr, op: BinaryOp, rhs: Expr) -> Self {
        Self::BinaryOp(ExprBinaryOp {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        })
    }

    pub fn eq(lhs: Expr, rhs: Expr) -> Self {
        Self::binary_op(lhs, BinaryOp::Eq, rhs)
    }

    pub fn is_null(expr: Expr, negate: bool) -> Self {
        Self::IsNull(ExprIsNull {
            expr: Box::new(expr),
            negate,
        })
    }

    pub fn like(expr: Expr, pattern: Expr, negate: bool) -> Self {
        Self::Like(ExprLike {
            expr: Box::new(expr),
            pattern: Box::new(pattern),
            negate,
        })
    }

    pub fn in_list(expr: Expr, list: Vec<Expr>) -> Self {
        Self::InList(ExprInList {
            expr: Box::new(expr),
            list,
        })
    }

    pub fn date_offset(days: Expr, backward: bool) -> Self {
        Self::DateOffset(ExprDateOffset {
            days: Box::new(days),
            backward,
        })
    }

    pub fn between(expr: Expr, low: Expr, high: Expr) -> Self {
        Self::Between(ExprBetween {
            expr: Box::new(expr),
            low: Box::new(low),
            high: Box::new(high),
        })
    }

    /// Collapses a single operand instead of wrapping it.
    pub fn and(mut operands: Vec<Expr>) -> Self {
        if operands.len() == 1 {
            operands.remove(0)
        } else {
            Self::And(operands)
        }
    }

    /// Collapses a single operand instead of wrapping it.
    pub fn or(mut operands: Vec<Expr>) -> Self {
        if operands.len() == 1 {
            operands.remove(0)
        } else {
            Self::Or(operands)
        }
    }

    pub fn json_agg(arg: Expr) -> Self {
        Self::JsonAgg(Box::new(arg))
    }

    pub fn aggregate(function: RollupFn, arg: Expr) -> Self {
        Self::Aggregate(ExprAggregate {
            function,
            arg: Some(Box::new(arg)),
        })
    }

    pub fn count_all() -> Self {
        Self::Aggregate(ExprAggregate {
            function: RollupFn::Count,
            arg: None,
        })
    }

    pub fn stmt(select: Select) -> Self {
        Self::Stmt(Box::new(select))
    }
}
