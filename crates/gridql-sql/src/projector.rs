use crate::alias::AliasAllocator;
use crate::rollup::rollup_select;

use gridql_core::meta::{Column, ColumnId, ColumnKind, Link, Lookup, Meta, RelationKind, Table};
use gridql_core::stmt::{Alias, Expr, ExprColumn, Join, JoinOp, Projection, Select, Source};
use gridql_core::{Error, Result};

/// Output keys of the record envelope nested relations are rendered as.
pub(crate) const PRIMARY_VALUE_KEY: &str = "primaryValue";
pub(crate) const PRIMARY_KEY_KEY: &str = "primaryKey";

/// Shape of one projected column: whether the rendered value is a JSON
/// array (to-many) or a single value.
pub(crate) struct Projected {
    pub(crate) is_array: bool,
}

/// Adds the projection for one column to the select under construction.
///
/// Direct columns and formulas become plain select expressions. Links and
/// lookups hang a lateral subquery off the row source and select its
/// single output column; rollups become scalar subqueries. System columns
/// and broken formulas contribute nothing.
pub(crate) fn project_column(
    meta: &Meta,
    column: &Column,
    root: &Alias,
    qb: &mut Select,
    aliases: &mut AliasAllocator,
) -> Result<Projected> {
    match &column.kind {
        ColumnKind::System(_) => Ok(Projected { is_array: false }),
        ColumnKind::Direct(direct) => {
            qb.select_expr(
                Expr::column(root, direct.column_name.as_str()),
                Some(column.title.as_str()),
            );
            Ok(Projected { is_array: false })
        }
        ColumnKind::Link(link) => project_link(meta, column, link, root, qb, aliases),
        ColumnKind::Lookup(lookup) => project_lookup(meta, column, lookup, root, qb, aliases),
        ColumnKind::Formula(formula) => {
            if formula.error.is_none() {
                if let Some(expr) = &formula.expr {
                    qb.select_expr(expr.clone(), Some(column.title.as_str()));
                }
            }
            Ok(Projected { is_array: false })
        }
        ColumnKind::Rollup(rollup) => {
            let select = rollup_select(meta, rollup, root, aliases)?;
            qb.select_expr(Expr::stmt(select), Some(column.title.as_str()));
            Ok(Projected { is_array: false })
        }
    }
}

fn project_link(
    meta: &Meta,
    column: &Column,
    link: &Link,
    root: &Alias,
    qb: &mut Select,
    aliases: &mut AliasAllocator,
) -> Result<Projected> {
    let related = meta.table(link.related);

    match link.kind {
        RelationKind::BelongsTo => {
            let join_alias = aliases.next_alias();
            let rel_alias = aliases.next_alias();

            let parent = key_name(meta, link.parent_key)?;
            let child = key_name(meta, link.child_key)?;

            // SELECT * FROM related WHERE parent_key = root.child_key
            let mut rel_qb = Select::from_table(related.name.as_str(), None);
            rel_qb.projections.push(Projection::Wildcard);
            rel_qb.and_where(Expr::eq(
                Expr::unqualified_column(parent),
                Expr::column(root, child),
            ));

            let mut lateral = Select::default();
            lateral.from.push(Source::Subquery {
                query: Box::new(rel_qb),
                alias: rel_alias.clone(),
            });
            lateral.select_expr(record_envelope(&rel_alias, related)?, Some(column.title.as_str()));

            push_lateral(qb, lateral, &join_alias, &column.title);
            Ok(Projected { is_array: false })
        }
        RelationKind::HasMany => {
            let join_alias = aliases.next_alias();
            let rel_alias = aliases.next_alias();

            let child = key_name(meta, link.child_key)?;
            let parent = key_name(meta, link.parent_key)?;

            // SELECT * FROM related WHERE child_key = root.parent_key
            let mut rel_qb = Select::from_table(related.name.as_str(), None);
            rel_qb.projections.push(Projection::Wildcard);
            rel_qb.and_where(Expr::eq(
                Expr::unqualified_column(child),
                Expr::column(root, parent),
            ));

            let mut lateral = Select::default();
            lateral.from.push(Source::Subquery {
                query: Box::new(rel_qb),
                alias: rel_alias.clone(),
            });
            lateral.select_expr(
                Expr::json_agg(record_envelope(&rel_alias, related)?),
                Some(column.title.as_str()),
            );

            push_lateral(qb, lateral, &join_alias, &column.title);
            Ok(Projected { is_array: true })
        }
        RelationKind::ManyToMany => {
            let associative = link.associative.as_ref().ok_or_else(|| {
                Error::configuration(
                    column.title.as_str(),
                    "many-to-many link is missing its associative table",
                )
            })?;
            let assoc_table = meta.table(associative.table);

            let assoc_alias = aliases.next_alias();
            let rel_alias = aliases.next_alias();
            let mm_alias = aliases.next_alias();
            let sub_alias = aliases.next_alias();
            let join_alias = aliases.next_alias();

            let near = key_name(meta, associative.near_key)?;
            let far = key_name(meta, associative.far_key)?;
            let child = key_name(meta, link.child_key)?;
            let parent = key_name(meta, link.parent_key)?;

            // SELECT * FROM assoc a WHERE a.near_key = root.child_key
            let mut assoc_qb =
                Select::from_table(assoc_table.name.as_str(), Some(assoc_alias.clone()));
            assoc_qb.projections.push(Projection::Wildcard);
            assoc_qb.and_where(Expr::eq(
                Expr::column(&assoc_alias, near),
                Expr::column(root, child),
            ));

            // SELECT rel.* FROM (assoc rows) LEFT JOIN related rel
            //   ON rel.parent_key = assoc.far_key
            let mut mm_qb = Select::default();
            mm_qb.from.push(Source::Subquery {
                query: Box::new(assoc_qb),
                alias: sub_alias.clone(),
            });
            mm_qb.joins.push(Join {
                op: JoinOp::Left(Expr::eq(
                    Expr::column(&rel_alias, parent),
                    Expr::column(&sub_alias, far),
                )),
                source: Source::Table {
                    name: related.name.clone(),
                    alias: Some(rel_alias.clone()),
                },
            });
            mm_qb.projections.push(Projection::Expr {
                expr: Expr::TableStar(rel_alias),
                alias: None,
            });

            let mut lateral = Select::default();
            lateral.from.push(Source::Subquery {
                query: Box::new(mm_qb),
                alias: mm_alias.clone(),
            });
            lateral.select_expr(
                Expr::json_agg(record_envelope(&mm_alias, related)?),
                Some(column.title.as_str()),
            );

            push_lateral(qb, lateral, &join_alias, &column.title);
            Ok(Projected { is_array: true })
        }
    }
}

fn project_lookup(
    meta: &Meta,
    column: &Column,
    lookup: &Lookup,
    root: &Alias,
    qb: &mut Select,
    aliases: &mut AliasAllocator,
) -> Result<Projected> {
    let link_column = meta.column(lookup.relation);
    let ColumnKind::Link(link) = &link_column.kind else {
        return Err(Error::configuration(
            column.title.as_str(),
            "lookup relation does not point at a link column",
        ));
    };

    let sub_alias = aliases.next_alias();
    let join_alias = aliases.next_alias();
    let rel_alias = aliases.next_alias();

    let related = meta.table(link.related);
    let target = meta.column(lookup.target);

    // The related row source the target column is projected off of
    let mut rel_qb = match link.kind {
        RelationKind::BelongsTo => {
            let parent = key_name(meta, link.parent_key)?;
            let child = key_name(meta, link.child_key)?;

            let mut rel_qb =
                Select::from_table(related.name.as_str(), Some(rel_alias.clone()));
            rel_qb.and_where(Expr::eq(
                Expr::column(&rel_alias, parent),
                Expr::column(root, child),
            ));
            rel_qb
        }
        RelationKind::HasMany => {
            let child = key_name(meta, link.child_key)?;
            let parent = key_name(meta, link.parent_key)?;

            let mut rel_qb =
                Select::from_table(related.name.as_str(), Some(rel_alias.clone()));
            rel_qb.and_where(Expr::eq(
                Expr::column(&rel_alias, child),
                Expr::column(root, parent),
            ));
            rel_qb
        }
        RelationKind::ManyToMany => {
            let associative = link.associative.as_ref().ok_or_else(|| {
                Error::configuration(
                    link_column.title.as_str(),
                    "many-to-many link is missing its associative table",
                )
            })?;
            let assoc_table = meta.table(associative.table);

            let assoc_alias = aliases.next_alias();
            let assoc_sub_alias = aliases.next_alias();

            let near = key_name(meta, associative.near_key)?;
            let far = key_name(meta, associative.far_key)?;
            let child = key_name(meta, link.child_key)?;
            let parent = key_name(meta, link.parent_key)?;

            let mut assoc_qb =
                Select::from_table(assoc_table.name.as_str(), Some(assoc_alias.clone()));
            assoc_qb.projections.push(Projection::Wildcard);
            assoc_qb.and_where(Expr::eq(
                Expr::column(&assoc_alias, near),
                Expr::column(root, child),
            ));

            let mut rel_qb = Select::default();
            rel_qb.from.push(Source::Subquery {
                query: Box::new(assoc_qb),
                alias: assoc_sub_alias.clone(),
            });
            rel_qb.joins.push(Join {
                op: JoinOp::Left(Expr::eq(
                    Expr::column(&rel_alias, parent),
                    Expr::column(&assoc_sub_alias, far),
                )),
                source: Source::Table {
                    name: related.name.clone(),
                    alias: Some(rel_alias.clone()),
                },
            });
            rel_qb
        }
    };

    let inner = project_column(meta, target, &rel_alias, &mut rel_qb, aliases)?;
    if rel_qb.projections.is_empty() {
        // The target contributed nothing (system column, broken formula);
        // there is no value to surface.
        return Ok(Projected { is_array: false });
    }

    let outer_is_array = link.kind.is_to_many();

    let lateral = if !outer_is_array {
        // SELECT sub.target AS title FROM (related rows) sub
        let mut lateral = Select::default();
        lateral.from.push(Source::Subquery {
            query: Box::new(rel_qb),
            alias: sub_alias.clone(),
        });
        lateral.select_expr(
            Expr::column(&sub_alias, target.title.as_str()),
            Some(column.title.as_str()),
        );
        lateral
    } else if inner.is_array {
        // The target is itself an array per related row; unnest one level
        // before re-aggregating so the output stays a flat array.
        let flat_alias = aliases.next_alias();

        let mut lateral = Select::default();
        lateral.from.push(Source::Subquery {
            query: Box::new(rel_qb),
            alias: sub_alias.clone(),
        });
        lateral.from.push(Source::ArrayElements {
            expr: ExprColumn {
                qualifier: Some(sub_alias.clone()),
                name: target.title.clone(),
            },
            alias: flat_alias.clone(),
        });
        lateral.select_expr(
            Expr::json_agg(Expr::Column(ExprColumn {
                qualifier: None,
                name: flat_alias.0,
            })),
            Some(column.title.as_str()),
        );
        lateral
    } else {
        // SELECT json_agg(sub.target) AS title FROM (related rows) sub
        let mut lateral = Select::default();
        lateral.from.push(Source::Subquery {
            query: Box::new(rel_qb),
            alias: sub_alias.clone(),
        });
        lateral.select_expr(
            Expr::json_agg(Expr::column(&sub_alias, target.title.as_str())),
            Some(column.title.as_str()),
        );
        lateral
    };

    push_lateral(qb, lateral, &join_alias, &column.title);
    Ok(Projected {
        is_array: outer_is_array || inner.is_array,
    })
}

/// Attaches a lateral subquery and selects its single output column.
fn push_lateral(qb: &mut Select, lateral: Select, join_alias: &Alias, title: &str) {
    qb.joins.push(Join {
        op: JoinOp::Lateral,
        source: Source::Subquery {
            query: Box::new(lateral),
            alias: join_alias.clone(),
        },
    });
    qb.select_expr(Expr::column(join_alias, title), Some(title));
}

/// `json_build_object('primaryValue', pv, 'primaryKey', pk)` off the given
/// row source.
fn record_envelope(rel: &Alias, related: &Table) -> Result<Expr> {
    let pv = storage_name(related, related.pv())?;
    let pk = storage_name(related, related.pk())?;

    Ok(Expr::JsonObject(vec![
        (PRIMARY_VALUE_KEY.to_string(), Expr::column(rel, pv)),
        (PRIMARY_KEY_KEY.to_string(), Expr::column(rel, pk)),
    ]))
}

/// Resolution of a column to a single scalar expression, shared by the
/// condition and sort compilers.
pub(crate) enum Resolved {
    Scalar(Expr),

    /// The column expands to multiple rows and has no scalar reading.
    Multi,

    /// The column contributes no value at all.
    Skip,
}

/// Resolves a column to the scalar expression comparisons and sorts run
/// over. Links and lookups through a to-one relation become scalar
/// subqueries; to-many paths resolve to [`Resolved::Multi`].
pub(crate) fn scalar_expr(
    meta: &Meta,
    column: &Column,
    root: &Alias,
    aliases: &mut AliasAllocator,
) -> Result<Resolved> {
    match &column.kind {
        ColumnKind::Direct(direct) | ColumnKind::System(direct) => Ok(Resolved::Scalar(
            Expr::column(root, direct.column_name.as_str()),
        )),
        ColumnKind::Formula(formula) => match (&formula.expr, &formula.error) {
            (Some(expr), None) => Ok(Resolved::Scalar(expr.clone())),
            _ => Ok(Resolved::Skip),
        },
        ColumnKind::Rollup(rollup) => {
            let select = rollup_select(meta, rollup, root, aliases)?;
            Ok(Resolved::Scalar(Expr::stmt(select)))
        }
        ColumnKind::Link(link) => {
            if link.kind.is_to_many() {
                return Ok(Resolved::Multi);
            }
            let related = meta.table(link.related);
            let rel_alias = aliases.next_alias();

            let pv = storage_name(related, related.pv())?;
            let parent = key_name(meta, link.parent_key)?;
            let child = key_name(meta, link.child_key)?;

            // The record's display value stands in for the record itself
            let mut sub = Select::from_table(related.name.as_str(), Some(rel_alias.clone()));
            sub.select_expr(Expr::column(&rel_alias, pv), None::<&str>);
            sub.and_where(Expr::eq(
                Expr::column(&rel_alias, parent),
                Expr::column(root, child),
            ));
            Ok(Resolved::Scalar(Expr::stmt(sub)))
        }
        ColumnKind::Lookup(lookup) => {
            let link_column = meta.column(lookup.relation);
            let ColumnKind::Link(link) = &link_column.kind else {
                return Err(Error::configuration(
                    column.title.as_str(),
                    "lookup relation does not point at a link column",
                ));
            };
            if link.kind.is_to_many() {
                return Ok(Resolved::Multi);
            }
            let related = meta.table(link.related);
            let target = meta.column(lookup.target);
            let rel_alias = aliases.next_alias();

            match scalar_expr(meta, target, &rel_alias, aliases)? {
                Resolved::Scalar(inner) => {
                    let parent = key_name(meta, link.parent_key)?;
                    let child = key_name(meta, link.child_key)?;

                    let mut sub =
                        Select::from_table(related.name.as_str(), Some(rel_alias.clone()));
                    sub.select_expr(inner, None::<&str>);
                    sub.and_where(Expr::eq(
                        Expr::column(&rel_alias, parent),
                        Expr::column(root, child),
                    ));
                    Ok(Resolved::Scalar(Expr::stmt(sub)))
                }
                other => Ok(other),
            }
        }
    }
}

/// The storage column name behind a relation key.
pub(crate) fn key_name(meta: &Meta, id: ColumnId) -> Result<String> {
    let table = meta.table(id.table);
    let column = meta.column(id);
    storage_name(table, column).map(str::to_string)
}

fn storage_name<'a>(table: &'a Table, column: &'a Column) -> Result<&'a str> {
    column.sql_name().ok_or_else(|| {
        Error::configuration(
            table.name.as_str(),
            format!("column `{}` has no storage column", column.title),
        )
    })
}
