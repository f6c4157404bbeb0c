use super::{Comma, Formatter, Ident, Params, ToSql};

use gridql_core::stmt::{Direction, Join, JoinOp, OrderByExpr, Projection, Select, Source};

impl ToSql for &Select {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, "SELECT " Comma(&self.projections));

        if !self.from.is_empty() {
            fmt!(f, " FROM " Comma(&self.from));
        }

        for join in &self.joins {
            fmt!(f, join);
        }

        if let Some(filter) = &self.filter {
            fmt!(f, " WHERE " filter);
        }

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY " Comma(&self.order_by));
        }

        if let Some(limit) = self.limit {
            fmt!(f, " LIMIT " limit);
        }

        if let Some(offset) = self.offset {
            fmt!(f, " OFFSET " offset);
        }
    }
}

impl ToSql for &Projection {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            Projection::Wildcard => fmt!(f, "*"),
            Projection::Expr { expr, alias } => {
                fmt!(f, expr);
                if let Some(alias) = alias {
                    fmt!(f, " AS " Ident(alias));
                }
            }
        }
    }
}

impl ToSql for &Source {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            Source::Table { name, alias } => {
                fmt!(f, Ident(name));
                if let Some(alias) = alias {
                    fmt!(f, " AS " Ident(alias.as_str()));
                }
            }
            Source::Subquery { query, alias } => {
                fmt!(f, "(" query ") AS " Ident(alias.as_str()));
            }
            Source::ArrayElements { expr, alias } => {
                fmt!(f, "json_array_elements(" expr ") AS " Ident(alias.as_str()));
            }
        }
    }
}

impl ToSql for &Join {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match &self.op {
            JoinOp::Left(on) => {
                fmt!(f, " LEFT JOIN " self.source " ON " on);
            }
            JoinOp::Lateral => {
                fmt!(f, " LEFT OUTER JOIN LATERAL " self.source " ON true");
            }
        }
    }
}

impl ToSql for &OrderByExpr {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let direction = match self.direction {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        };
        fmt!(f, &self.expr direction);
    }
}
