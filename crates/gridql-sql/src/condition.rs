use crate::alias::AliasAllocator;
use crate::projector::{scalar_expr, Resolved};

use gridql_core::meta::{Filter, FilterLeaf, FilterOp, LogicalOp, Meta, Table};
use gridql_core::stmt::{Alias, BinaryOp, Expr, Value};
use gridql_core::Result;

/// Compiles a set of filters into one predicate, AND-joined.
///
/// Returns `None` when nothing survives compilation: leaves naming unknown
/// columns, or columns with no scalar reading, are silently dropped rather
/// than failing the request. The one exception is an authored empty OR
/// group, which keeps its meaning of matching nothing.
pub(crate) fn conditions_to_expr(
    meta: &Meta,
    table: &Table,
    filters: &[Filter],
    root: &Alias,
    aliases: &mut AliasAllocator,
) -> Result<Option<Expr>> {
    let mut operands = vec![];
    for filter in filters {
        if let Some(expr) = filter_to_expr(meta, table, filter, root, aliases)? {
            operands.push(expr);
        }
    }
    Ok(if operands.is_empty() {
        None
    } else {
        Some(Expr::and(operands))
    })
}

fn filter_to_expr(
    meta: &Meta,
    table: &Table,
    filter: &Filter,
    root: &Alias,
    aliases: &mut AliasAllocator,
) -> Result<Option<Expr>> {
    match filter {
        Filter::Group(group) => {
            if group.children.is_empty() {
                // An authored empty OR matches nothing; an empty AND is
                // vacuously true and drops out.
                return Ok(match group.op {
                    LogicalOp::Or => Some(Expr::Or(vec![])),
                    LogicalOp::And => None,
                });
            }

            let mut operands = vec![];
            for child in &group.children {
                if let Some(expr) = filter_to_expr(meta, table, child, root, aliases)? {
                    operands.push(expr);
                }
            }
            if operands.is_empty() {
                return Ok(None);
            }
            Ok(Some(match group.op {
                LogicalOp::And => Expr::and(operands),
                LogicalOp::Or => Expr::or(operands),
            }))
        }
        Filter::Leaf(leaf) => leaf_to_expr(meta, table, leaf, root, aliases),
    }
}

fn leaf_to_expr(
    meta: &Meta,
    table: &Table,
    leaf: &FilterLeaf,
    root: &Alias,
    aliases: &mut AliasAllocator,
) -> Result<Option<Expr>> {
    let Some(column) = table.column_by_title(&leaf.column) else {
        return Ok(None);
    };

    let scalar = match scalar_expr(meta, column, root, aliases)? {
        Resolved::Scalar(expr) => expr,
        Resolved::Multi | Resolved::Skip => return Ok(None),
    };

    let expr = match leaf.op {
        FilterOp::Eq if leaf.value.is_null() => Expr::is_null(scalar, false),
        FilterOp::Neq if leaf.value.is_null() => Expr::is_null(scalar, true),
        FilterOp::Eq => Expr::binary_op(scalar, BinaryOp::Eq, Expr::Value(leaf.value.clone())),
        FilterOp::Neq => Expr::binary_op(scalar, BinaryOp::Ne, Expr::Value(leaf.value.clone())),
        FilterOp::Gt => Expr::binary_op(scalar, BinaryOp::Gt, Expr::Value(leaf.value.clone())),
        FilterOp::Gte => Expr::binary_op(scalar, BinaryOp::Ge, Expr::Value(leaf.value.clone())),
        FilterOp::Lt => Expr::binary_op(scalar, BinaryOp::Lt, Expr::Value(leaf.value.clone())),
        FilterOp::Lte => Expr::binary_op(scalar, BinaryOp::Le, Expr::Value(leaf.value.clone())),
        FilterOp::Like => Expr::like(scalar, like_pattern(&leaf.value), false),
        FilterOp::Nlike => Expr::like(scalar, like_pattern(&leaf.value), true),
        FilterOp::Null => Expr::is_null(scalar, false),
        FilterOp::NotNull => Expr::is_null(scalar, true),
        FilterOp::In => {
            let values = match &leaf.value {
                Value::List(values) => values.clone(),
                other => vec![other.clone()],
            };
            if values.is_empty() {
                // IN over nothing matches nothing
                Expr::Or(vec![])
            } else {
                Expr::in_list(scalar, values.into_iter().map(Expr::Value).collect())
            }
        }
        FilterOp::Within => {
            let Value::List(bounds) = &leaf.value else {
                return Ok(None);
            };
            // Relative ranges anchor on the current date; anything else
            // is an exact pair of bounds.
            match bounds.as_slice() {
                [Value::String(sub), days] if sub == "pastNumberOfDays" => Expr::between(
                    scalar,
                    Expr::date_offset(Expr::Value(days.clone()), true),
                    Expr::CurrentDate,
                ),
                [Value::String(sub), days] if sub == "nextNumberOfDays" => Expr::between(
                    scalar,
                    Expr::CurrentDate,
                    Expr::date_offset(Expr::Value(days.clone()), false),
                ),
                [low, high] => {
                    Expr::between(scalar, Expr::Value(low.clone()), Expr::Value(high.clone()))
                }
                _ => return Ok(None),
            }
        }
    };

    Ok(Some(expr))
}

/// LIKE patterns default to a contains match unless the caller supplied
/// wildcards.
fn like_pattern(value: &Value) -> Expr {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::I64(i) => i.to_string(),
        Value::F64(f) => f.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::List(_) => String::new(),
    };
    let pattern = if raw.contains('%') {
        raw
    } else {
        format!("%{raw}%")
    };
    Expr::Value(Value::String(pattern))
}
