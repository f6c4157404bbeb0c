use crate::alias::AliasAllocator;
use crate::args::{ListArgs, RawParams};
use crate::condition::conditions_to_expr;
use crate::projector::project_column;
use crate::serializer::Serializer;
use crate::sort::apply_sorts;

use gridql_core::driver::{Capability, ListPage};
use gridql_core::meta::{Meta, Table, View};
use gridql_core::stmt::{self, Alias, Expr, Projection, Select, Source};
use gridql_core::{bail, Driver, Error, Result};

/// Alias of the paginated row window the projection layer selects from.
pub const ROOT_ALIAS: &str = "_base";

/// A fully serialized list statement with its bound parameters.
#[derive(Debug)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<stmt::Value>,
}

/// Compiles one view of one table, together with per-request arguments,
/// into a single SQL statement returning the page rows as a JSON array
/// alongside the filtered row count.
#[derive(Debug)]
pub struct ListQuery<'a> {
    meta: &'a Meta,
    table: &'a Table,
    view: &'a View,
}

impl<'a> ListQuery<'a> {
    pub fn new(meta: &'a Meta, table: &'a Table, view: &'a View) -> Self {
        Self { meta, table, view }
    }

    /// Compiles the list statement.
    ///
    /// The statement is built inside out: the base window selects the
    /// filtered, sorted, paginated rows; the projection layer hangs
    /// lateral subqueries for nested data off that window; the outer wrap
    /// aggregates the page into one JSON array next to the count, which
    /// runs over the same predicate without pagination.
    pub fn compile(&self, capability: &Capability, raw: &RawParams) -> Result<CompiledQuery> {
        if !capability.supports_single_query() {
            bail!("database does not support single-statement list queries");
        }

        let args = ListArgs::normalize(raw)?;
        let mut aliases = AliasAllocator::new();

        let table_alias = Alias::new(self.table.name.as_str());

        let mut base = Select::from_table(self.table.name.as_str(), None);
        base.projections.push(Projection::Wildcard);

        let mut count = Select::from_table(self.table.name.as_str(), None);
        count.projections.push(Projection::Expr {
            expr: Expr::count_all(),
            alias: None,
        });

        if let Some(filter) = self.filter_forest(&args, &table_alias, &mut aliases)? {
            base.and_where(filter.clone());
            count.and_where(filter);
        }

        let sorts = if args.sorts.is_empty() {
            &self.view.sorts
        } else {
            &args.sorts
        };
        apply_sorts(
            self.meta,
            self.table,
            sorts,
            &table_alias,
            &mut base,
            &mut aliases,
        )?;

        base.limit = Some(args.limit);
        base.offset = Some(args.offset);

        let root = Alias::new(ROOT_ALIAS);
        let mut data = Select::default();
        data.from.push(Source::Subquery {
            query: Box::new(base),
            alias: root.clone(),
        });

        for column in &self.table.columns {
            if column.is_system() || !self.view.shows(column.id) {
                continue;
            }
            project_column(self.meta, column, &root, &mut data, &mut aliases)?;
        }

        if data.projections.is_empty() {
            // Every column hidden; the page still needs a stable shape
            let pk = self.table.pk();
            let pk_name = pk.sql_name().ok_or_else(|| {
                Error::configuration(
                    self.table.name.as_str(),
                    format!("primary key `{}` has no storage column", pk.title),
                )
            })?;
            data.select_expr(Expr::column(&root, pk_name), Some(pk.title.as_str()));
        }

        let data_alias = aliases.next_alias();
        let mut outer = Select::default();
        outer.from.push(Source::Subquery {
            query: Box::new(data),
            alias: data_alias.clone(),
        });
        outer.select_expr(Expr::json_agg(Expr::TableStar(data_alias)), Some("data"));
        outer.select_expr(Expr::Stmt(Box::new(count)), Some("count"));

        let mut params = vec![];
        let sql = Serializer.serialize(&outer, &mut params);

        Ok(CompiledQuery { sql, params })
    }

    /// Compiles and executes the statement, decoding the single result row
    /// into a page.
    pub async fn fetch(&self, driver: &dyn Driver, raw: &RawParams) -> Result<ListPage> {
        let compiled = self.compile(driver.capability(), raw)?;
        driver.fetch_list(&compiled.sql, &compiled.params).await
    }

    /// ANDs together the three filter sources: the view's persisted
    /// filters, the request's filter array, and the request's condition
    /// string. The same predicate is applied to the base window and the
    /// count.
    fn filter_forest(
        &self,
        args: &ListArgs,
        root: &Alias,
        aliases: &mut AliasAllocator,
    ) -> Result<Option<Expr>> {
        let mut operands = vec![];

        if let Some(expr) =
            conditions_to_expr(self.meta, self.table, &self.view.filters, root, aliases)?
        {
            operands.push(expr);
        }
        if let Some(expr) =
            conditions_to_expr(self.meta, self.table, &args.filters, root, aliases)?
        {
            operands.push(expr);
        }
        if let Some(where_filter) = &args.where_filter {
            if let Some(expr) = conditions_to_expr(
                self.meta,
                self.table,
                std::slice::from_ref(where_filter),
                root,
                aliases,
            )? {
                operands.push(expr);
            }
        }

        Ok(if operands.is_empty() {
            None
        } else {
            Some(Expr::and(operands))
        })
    }
}
