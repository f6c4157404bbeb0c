use super::{Comma, Formatter, Ident, Params, ToSql};

use gridql_core::meta::RollupFn;
use gridql_core::stmt::{self, BinaryOp, Expr};

impl ToSql for &Expr {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            Expr::And(operands) => {
                if operands.is_empty() {
                    fmt!(f, "TRUE");
                } else {
                    let mut s = "";
                    for operand in operands {
                        fmt!(f, s Grouped(operand));
                        s = " AND ";
                    }
                }
            }
            Expr::Or(operands) => {
                if operands.is_empty() {
                    fmt!(f, "FALSE");
                } else {
                    let mut s = "";
                    for operand in operands {
                        fmt!(f, s Grouped(operand));
                        s = " OR ";
                    }
                }
            }
            Expr::BinaryOp(e) => {
                let op = match e.op {
                    BinaryOp::Eq => " = ",
                    BinaryOp::Ne => " <> ",
                    BinaryOp::Gt => " > ",
                    BinaryOp::Ge => " >= ",
                    BinaryOp::Lt => " < ",
                    BinaryOp::Le => " <= ",
                };
                fmt!(f, &*e.lhs op e.rhs);
            }
            Expr::IsNull(e) => {
                let tail = if e.negate { " IS NOT NULL" } else { " IS NULL" };
                fmt!(f, &*e.expr tail);
            }
            Expr::Like(e) => {
                let op = if e.negate { " NOT LIKE " } else { " LIKE " };
                fmt!(f, &*e.expr op e.pattern);
            }
            Expr::InList(e) => {
                fmt!(f, &*e.expr " IN (" Comma(&e.list) ")");
            }
            Expr::Between(e) => {
                fmt!(f, &*e.expr " BETWEEN " e.low " AND " e.high);
            }
            Expr::Column(e) => fmt!(f, e),
            Expr::CurrentDate => fmt!(f, "CURRENT_DATE"),
            Expr::DateOffset(e) => {
                let op = if e.backward { " - " } else { " + " };
                fmt!(f, "CURRENT_DATE" op "CAST(" e.days " AS integer) * INTERVAL '1 day'");
            }
            Expr::TableStar(alias) => {
                fmt!(f, Ident(alias.as_str()) ".*");
            }
            Expr::Value(value) => fmt!(f, value),
            Expr::JsonObject(entries) => {
                fmt!(f, "json_build_object(");
                let mut s = "";
                for (key, value) in entries {
                    let key = stmt::Value::String(key.clone());
                    fmt!(f, s key ", " value);
                    s = ", ";
                }
                fmt!(f, ")");
            }
            Expr::JsonAgg(arg) => {
                fmt!(f, "coalesce(json_agg(" arg "), '[]'::json)");
            }
            Expr::Aggregate(e) => {
                let name = match e.function {
                    RollupFn::Count => "count",
                    RollupFn::Sum => "sum",
                    RollupFn::Min => "min",
                    RollupFn::Max => "max",
                    RollupFn::Avg => "avg",
                };
                match &e.arg {
                    Some(arg) => fmt!(f, name "(" arg ")"),
                    None => fmt!(f, name "(*)"),
                }
            }
            Expr::Stmt(select) => {
                fmt!(f, "(" select ")");
            }
        }
    }
}

impl ToSql for &stmt::ExprColumn {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        if let Some(qualifier) = &self.qualifier {
            fmt!(f, Ident(qualifier.as_str()) ".");
        }
        fmt!(f, Ident(&self.name));
    }
}

/// Parenthesizes nested AND/OR groups.
struct Grouped<'a>(&'a Expr);

impl ToSql for Grouped<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self.0 {
            Expr::And(_) | Expr::Or(_) => fmt!(f, "(" self.0 ")"),
            expr => fmt!(f, expr),
        }
    }
}
