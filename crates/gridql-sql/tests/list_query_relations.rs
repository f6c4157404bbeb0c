mod support;

use gridql_core::driver::Capability;
use gridql_core::meta::{Meta, RelationKind, RollupFn, View};
use gridql_core::stmt::{Expr, Value};
use gridql_sql::{ListQuery, RawParams};

use pretty_assertions::assert_eq;

fn compile(meta: &Meta, table: usize) -> gridql_sql::CompiledQuery {
    let view = View::default();
    ListQuery::new(meta, &meta.tables[table], &view)
        .compile(&Capability::POSTGRESQL, &RawParams::default())
        .unwrap()
}

#[test]
fn belongs_to_link_renders_a_record_envelope() {
    let meta = support::orders_customers();
    let compiled = compile(&meta, 1);

    assert_eq!(
        compiled.sql,
        "SELECT coalesce(json_agg(\"a5\".*), '[]'::json) AS \"data\", \
         (SELECT count(*) FROM \"orders\") AS \"count\" \
         FROM (SELECT \"_base\".\"id\" AS \"Id\", \"_base\".\"number\" AS \"Number\", \
         \"a0\".\"Customer\" AS \"Customer\", \"a3\".\"CustomerName\" AS \"CustomerName\", \
         \"_base\".\"amount\" AS \"Amount\" \
         FROM (SELECT * FROM \"orders\" ORDER BY \"orders\".\"id\" ASC LIMIT 25 OFFSET 0) AS \"_base\" \
         LEFT OUTER JOIN LATERAL (SELECT json_build_object($1, \"a1\".\"name\", $2, \"a1\".\"id\") AS \"Customer\" \
         FROM (SELECT * FROM \"customers\" WHERE \"id\" = \"_base\".\"customer_id\") AS \"a1\") AS \"a0\" ON true \
         LEFT OUTER JOIN LATERAL (SELECT \"a2\".\"Name\" AS \"CustomerName\" \
         FROM (SELECT \"a4\".\"name\" AS \"Name\" FROM \"customers\" AS \"a4\" \
         WHERE \"a4\".\"id\" = \"_base\".\"customer_id\") AS \"a2\") AS \"a3\" ON true) AS \"a5\";"
    );
    assert_eq!(
        compiled.params,
        vec![
            Value::String("primaryValue".into()),
            Value::String("primaryKey".into()),
        ]
    );
}

#[test]
fn has_many_link_aggregates_envelopes() {
    let meta = support::orders_customers();
    let compiled = compile(&meta, 0);

    assert_eq!(
        compiled.sql,
        "SELECT coalesce(json_agg(\"a2\".*), '[]'::json) AS \"data\", \
         (SELECT count(*) FROM \"customers\") AS \"count\" \
         FROM (SELECT \"_base\".\"id\" AS \"Id\", \"_base\".\"name\" AS \"Name\", \
         \"a0\".\"Orders\" AS \"Orders\" \
         FROM (SELECT * FROM \"customers\" ORDER BY \"customers\".\"id\" ASC LIMIT 25 OFFSET 0) AS \"_base\" \
         LEFT OUTER JOIN LATERAL (SELECT coalesce(json_agg(json_build_object($1, \"a1\".\"number\", $2, \"a1\".\"id\")), '[]'::json) AS \"Orders\" \
         FROM (SELECT * FROM \"orders\" WHERE \"customer_id\" = \"_base\".\"id\") AS \"a1\") AS \"a0\" ON true) AS \"a2\";"
    );
    assert_eq!(
        compiled.params,
        vec![
            Value::String("primaryValue".into()),
            Value::String("primaryKey".into()),
        ]
    );
}

fn tickets_tags() -> Meta {
    use gridql_core::meta::Associative;
    use gridql_core::meta::TableId;

    Meta {
        tables: vec![
            support::table(
                0,
                "tickets",
                vec![
                    support::direct(0, 0, "Id", "id"),
                    support::direct(0, 1, "Subject", "subject"),
                    support::link(
                        0,
                        2,
                        "Tags",
                        RelationKind::ManyToMany,
                        1,
                        support::column_id(0, 0),
                        support::column_id(1, 0),
                        Some(Associative {
                            table: TableId(2),
                            near_key: support::column_id(2, 0),
                            far_key: support::column_id(2, 1),
                        }),
                    ),
                ],
                0,
                1,
            ),
            support::table(
                1,
                "tags",
                vec![
                    support::direct(1, 0, "Id", "id"),
                    support::direct(1, 1, "Label", "label"),
                ],
                0,
                1,
            ),
            support::table(
                2,
                "ticket_tags",
                vec![
                    support::direct(2, 0, "TicketId", "ticket_id"),
                    support::direct(2, 1, "TagId", "tag_id"),
                ],
                0,
                1,
            ),
        ],
    }
}

#[test]
fn many_to_many_link_goes_through_the_associative_table() {
    let meta = tickets_tags();
    let compiled = compile(&meta, 0);

    assert_eq!(
        compiled.sql,
        "SELECT coalesce(json_agg(\"a5\".*), '[]'::json) AS \"data\", \
         (SELECT count(*) FROM \"tickets\") AS \"count\" \
         FROM (SELECT \"_base\".\"id\" AS \"Id\", \"_base\".\"subject\" AS \"Subject\", \
         \"a4\".\"Tags\" AS \"Tags\" \
         FROM (SELECT * FROM \"tickets\" ORDER BY \"tickets\".\"id\" ASC LIMIT 25 OFFSET 0) AS \"_base\" \
         LEFT OUTER JOIN LATERAL (SELECT coalesce(json_agg(json_build_object($1, \"a2\".\"label\", $2, \"a2\".\"id\")), '[]'::json) AS \"Tags\" \
         FROM (SELECT \"a1\".* FROM (SELECT * FROM \"ticket_tags\" AS \"a0\" \
         WHERE \"a0\".\"ticket_id\" = \"_base\".\"id\") AS \"a3\" \
         LEFT JOIN \"tags\" AS \"a1\" ON \"a1\".\"id\" = \"a3\".\"tag_id\") AS \"a2\") AS \"a4\" ON true) AS \"a5\";"
    );
}

#[test]
fn rollup_projects_a_scalar_aggregate() {
    let mut meta = support::orders_customers();
    meta.tables[0].columns.push(support::rollup(
        0,
        3,
        "OrderCount",
        support::column_id(0, 2),
        RollupFn::Count,
        support::column_id(1, 0),
    ));

    let compiled = compile(&meta, 0);

    assert!(compiled.sql.contains(
        "(SELECT count(\"a2\".\"id\") FROM \"orders\" AS \"a2\" \
         WHERE \"a2\".\"customer_id\" = \"_base\".\"id\") AS \"OrderCount\""
    ));
}

#[test]
fn formula_projects_its_expression() {
    let mut meta = support::users();
    meta.tables[0].columns.push(support::formula(
        0,
        2,
        "DisplayName",
        Some(Expr::unqualified_column("name")),
        None,
    ));
    meta.tables[0].columns.push(support::formula(
        0,
        3,
        "Broken",
        None,
        Some("circular reference"),
    ));

    let compiled = compile(&meta, 0);

    assert!(compiled.sql.contains("\"name\" AS \"DisplayName\""));
    assert!(!compiled.sql.contains("Broken"));
}
