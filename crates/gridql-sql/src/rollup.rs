use crate::alias::AliasAllocator;
use crate::projector::key_name;

use gridql_core::meta::{ColumnKind, Meta, RelationKind, Rollup};
use gridql_core::stmt::{Alias, Expr, Select, Source};
use gridql_core::{Error, Result};

/// Builds the scalar subquery a rollup column is projected as: the
/// aggregate over the related rows reachable through the rollup's link.
pub(crate) fn rollup_select(
    meta: &Meta,
    rollup: &Rollup,
    root: &Alias,
    aliases: &mut AliasAllocator,
) -> Result<Select> {
    let link_column = meta.column(rollup.relation);
    let ColumnKind::Link(link) = &link_column.kind else {
        return Err(Error::configuration(
            link_column.title.as_str(),
            "rollup relation does not point at a link column",
        ));
    };

    let related = meta.table(link.related);
    let target = meta.column(rollup.target);
    let target_name = key_name(meta, target.id)?;

    match link.kind {
        RelationKind::HasMany => {
            let rel_alias = aliases.next_alias();

            let child = key_name(meta, link.child_key)?;
            let parent = key_name(meta, link.parent_key)?;

            // SELECT fn(rel.target) FROM related rel
            //   WHERE rel.child_key = root.parent_key
            let mut select =
                Select::from_table(related.name.as_str(), Some(rel_alias.clone()));
            select.select_expr(
                Expr::aggregate(rollup.function, Expr::column(&rel_alias, target_name)),
                None::<&str>,
            );
            select.and_where(Expr::eq(
                Expr::column(&rel_alias, child),
                Expr::column(root, parent),
            ));
            Ok(select)
        }
        RelationKind::ManyToMany => {
            let associative = link.associative.as_ref().ok_or_else(|| {
                Error::configuration(
                    link_column.title.as_str(),
                    "many-to-many link is missing its associative table",
                )
            })?;
            let assoc_table = meta.table(associative.table);

            let rel_alias = aliases.next_alias();
            let assoc_alias = aliases.next_alias();

            let near = key_name(meta, associative.near_key)?;
            let far = key_name(meta, associative.far_key)?;
            let child = key_name(meta, link.child_key)?;
            let parent = key_name(meta, link.parent_key)?;

            // SELECT fn(rel.target) FROM related rel, assoc a
            //   WHERE a.far_key = rel.parent_key AND a.near_key = root.child_key
            let mut select =
                Select::from_table(related.name.as_str(), Some(rel_alias.clone()));
            select.from.push(Source::Table {
                name: assoc_table.name.clone(),
                alias: Some(assoc_alias.clone()),
            });
            select.select_expr(
                Expr::aggregate(rollup.function, Expr::column(&rel_alias, target_name)),
                None::<&str>,
            );
            select.and_where(Expr::eq(
                Expr::column(&assoc_alias, far),
                Expr::column(&rel_alias, parent),
            ));
            select.and_where(Expr::eq(
                Expr::column(&assoc_alias, near),
                Expr::column(root, child),
            ));
            Ok(select)
        }
        RelationKind::BelongsTo => Err(Error::configuration(
            link_column.title.as_str(),
            "rollups require a to-many relation",
        )),
    }
}
