use super::{Alias, Expr, Join, OrderByExpr, Source};

/// A SELECT statement. Built programmatically by the query compiler and
/// rendered by the serializer.
#[derive(Debug, Clone, Default)]
pub struct Select {
    pub from: Vec<Source>,
    pub joins: Vec<Join>,
    pub projections: Vec<Projection>,
    pub filter: Option<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone)]
pub enum Projection {
    /// `*`
    Wildcard,

    Expr { expr: Expr, alias: Option<String> },
}

impl Select {
    pub fn from_table(name: impl Into<String>, alias: Option<Alias>) -> Self {
        Self {
            from: vec![Source::Table {
                name: name.into(),
                alias,
            }],
            ..Default::default()
        }
    }

    pub fn select_expr(&mut self, expr: Expr, alias: Option<impl Into<String>>) {
        self.projections.push(Projection::Expr {
            expr,
            alias: alias.map(Into::into),
        });
    }

    /// ANDs a predicate into the statement's filter.
    pub fn and_where(&mut self, expr: Expr) {
        self.filter = Some(match self.filter.take() {
            Some(Expr::And(mut operands)) => {
                operands.push(expr);
                Expr::And(operands)
            }
            Some(existing) => Expr::And(vec![existing, expr]),
            None => expr,
        });
    }
}
