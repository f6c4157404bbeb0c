#![allow(dead_code)]

use gridql_core::meta::{
    Associative, Column, ColumnId, ColumnKind, Direct, Formula, Link, Lookup, Meta, RelationKind,
    Rollup, RollupFn, Table, TableId,
};
use gridql_core::stmt::Expr;

pub fn column_id(table: usize, index: usize) -> ColumnId {
    ColumnId {
        table: TableId(table),
        index,
    }
}

fn column(table: usize, index: usize, title: &str, kind: ColumnKind) -> Column {
    Column {
        id: column_id(table, index),
        title: title.to_string(),
        kind,
    }
}

pub fn direct(table: usize, index: usize, title: &str, name: &str) -> Column {
    column(
        table,
        index,
        title,
        ColumnKind::Direct(Direct {
            column_name: name.to_string(),
        }),
    )
}

pub fn system(table: usize, index: usize, title: &str, name: &str) -> Column {
    column(
        table,
        index,
        title,
        ColumnKind::System(Direct {
            column_name: name.to_string(),
        }),
    )
}

pub fn link(
    table: usize,
    index: usize,
    title: &str,
    kind: RelationKind,
    related: usize,
    child_key: ColumnId,
    parent_key: ColumnId,
    associative: Option<Associative>,
) -> Column {
    column(
        table,
        index,
        title,
        ColumnKind::Link(Link {
            kind,
            related: TableId(related),
            child_key,
            parent_key,
            associative,
        }),
    )
}

pub fn lookup(
    table: usize,
    index: usize,
    title: &str,
    relation: ColumnId,
    target: ColumnId,
) -> Column {
    column(
        table,
        index,
        title,
        ColumnKind::Lookup(Lookup { relation, target }),
    )
}

pub fn rollup(
    table: usize,
    index: usize,
    title: &str,
    relation: ColumnId,
    function: RollupFn,
    target: ColumnId,
) -> Column {
    column(
        table,
        index,
        title,
        ColumnKind::Rollup(Rollup {
            relation,
            function,
            target,
        }),
    )
}

pub fn formula(
    table: usize,
    index: usize,
    title: &str,
    expr: Option<Expr>,
    error: Option<&str>,
) -> Column {
    column(
        table,
        index,
        title,
        ColumnKind::Formula(Formula {
            expr,
            error: error.map(str::to_string),
        }),
    )
}

pub fn table(id: usize, name: &str, columns: Vec<Column>, pk: usize, pv: usize) -> Table {
    Table {
        id: TableId(id),
        name: name.to_string(),
        primary_key: column_id(id, pk),
        primary_value: column_id(id, pv),
        columns,
    }
}

/// One flat table, no relations.
pub fn users() -> Meta {
    Meta {
        tables: vec![table(
            0,
            "users",
            vec![direct(0, 0, "Id", "id"), direct(0, 1, "Name", "name")],
            0,
            1,
        )],
    }
}

/// Two tables joined both ways: orders belong to customers, customers have
/// many orders, and orders surface the customer's name through a lookup.
pub fn orders_customers() -> Meta {
    Meta {
        tables: vec![
            table(
                0,
                "customers",
                vec![
                    direct(0, 0, "Id", "id"),
                    direct(0, 1, "Name", "name"),
                    link(
                        0,
                        2,
                        "Orders",
                        RelationKind::HasMany,
                        1,
                        column_id(1, 2),
                        column_id(0, 0),
                        None,
                    ),
                ],
                0,
                1,
            ),
            table(
                1,
                "orders",
                vec![
                    direct(1, 0, "Id", "id"),
                    direct(1, 1, "Number", "number"),
                    system(1, 2, "CustomerId", "customer_id"),
                    link(
                        1,
                        3,
                        "Customer",
                        RelationKind::BelongsTo,
                        0,
                        column_id(1, 2),
                        column_id(0, 0),
                        None,
                    ),
                    lookup(1, 4, "CustomerName", column_id(1, 3), column_id(0, 1)),
                    direct(1, 5, "Amount", "amount"),
                ],
                0,
                1,
            ),
        ],
    }
}
