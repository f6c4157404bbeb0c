use crate::alias::AliasAllocator;
use crate::projector::{scalar_expr, Resolved};

use gridql_core::meta::{Meta, Sort, Table};
use gridql_core::stmt::{Alias, Direction, Expr, OrderByExpr, Select};
use gridql_core::{Error, Result};

/// Applies the requested sorts to the row source, then appends the primary
/// key ascending so pagination stays stable under ties.
///
/// Sorts naming unknown columns are dropped like filter leaves are. A sort
/// on a column that expands to multiple rows has no defined order and is
/// rejected.
pub(crate) fn apply_sorts(
    meta: &Meta,
    table: &Table,
    sorts: &[Sort],
    root: &Alias,
    qb: &mut Select,
    aliases: &mut AliasAllocator,
) -> Result<()> {
    for sort in sorts {
        let Some(column) = table.column_by_title(&sort.column) else {
            continue;
        };

        match scalar_expr(meta, column, root, aliases)? {
            Resolved::Scalar(expr) => qb.order_by.push(OrderByExpr {
                expr,
                direction: sort.direction,
            }),
            Resolved::Multi => {
                return Err(Error::configuration(
                    column.title.as_str(),
                    "cannot sort by a column that expands to multiple rows",
                ));
            }
            Resolved::Skip => continue,
        }
    }

    let pk = table.pk();
    let pk_name = pk.sql_name().ok_or_else(|| {
        Error::configuration(
            table.name.as_str(),
            format!("primary key `{}` has no storage column", pk.title),
        )
    })?;
    qb.order_by.push(OrderByExpr {
        expr: Expr::column(root, pk_name),
        direction: Direction::Asc,
    });

    Ok(())
}
