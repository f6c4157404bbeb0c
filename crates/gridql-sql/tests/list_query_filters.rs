mod support;

use gridql_core::driver::Capability;
use gridql_core::meta::{Filter, FilterOp, View};
use gridql_core::stmt::Value;
use gridql_sql::{ListQuery, RawParams};

use pretty_assertions::assert_eq;

fn compile_with(raw: RawParams) -> gridql_sql::CompiledQuery {
    let meta = support::users();
    let view = View::default();
    ListQuery::new(&meta, &meta.tables[0], &view)
        .compile(&Capability::POSTGRESQL, &raw)
        .unwrap()
}

#[test]
fn where_string_applies_to_both_rows_and_count() {
    let compiled = compile_with(RawParams {
        where_clause: Some("(Name,eq,Alice)".into()),
        ..RawParams::default()
    });

    assert_eq!(
        compiled.sql,
        "SELECT coalesce(json_agg(\"a0\".*), '[]'::json) AS \"data\", \
         (SELECT count(*) FROM \"users\" WHERE \"users\".\"name\" = $1) AS \"count\" \
         FROM (SELECT \"_base\".\"id\" AS \"Id\", \"_base\".\"name\" AS \"Name\" \
         FROM (SELECT * FROM \"users\" WHERE \"users\".\"name\" = $2 \
         ORDER BY \"users\".\"id\" ASC LIMIT 25 OFFSET 0) AS \"_base\") AS \"a0\";"
    );
    assert_eq!(
        compiled.params,
        vec![Value::String("Alice".into()), Value::String("Alice".into())]
    );
}

#[test]
fn filter_json_or_group() {
    let compiled = compile_with(RawParams {
        filter: Some(
            r#"[{"op":"or","children":[
                {"column":"Name","op":"like","value":"al"},
                {"column":"Name","op":"null"}
            ]}]"#
                .into(),
        ),
        ..RawParams::default()
    });

    assert!(compiled
        .sql
        .contains("WHERE \"users\".\"name\" LIKE $1 OR \"users\".\"name\" IS NULL"));
    // Contains-match wildcards are added for the caller
    assert_eq!(compiled.params[0], Value::String("%al%".into()));
}

#[test]
fn unknown_filter_column_is_dropped() {
    let compiled = compile_with(RawParams {
        where_clause: Some("(Nope,eq,1)".into()),
        ..RawParams::default()
    });

    assert!(!compiled.sql.contains("WHERE"));
    assert!(compiled.params.is_empty());
}

#[test]
fn empty_or_group_matches_nothing() {
    let compiled = compile_with(RawParams {
        filter: Some(r#"[{"op":"or"}]"#.into()),
        ..RawParams::default()
    });

    assert!(compiled.sql.contains("WHERE FALSE"));
}

#[test]
fn empty_and_group_is_vacuously_true() {
    let compiled = compile_with(RawParams {
        filter: Some(r#"[{"op":"and"}]"#.into()),
        ..RawParams::default()
    });

    assert!(!compiled.sql.contains("WHERE"));
}

#[test]
fn in_operator_expands_to_a_list() {
    let compiled = compile_with(RawParams {
        where_clause: Some("(Name,in,Alice,Bob)".into()),
        ..RawParams::default()
    });

    assert!(compiled.sql.contains("\"users\".\"name\" IN ($1, $2)"));
    assert_eq!(compiled.params.len(), 4);
}

#[test]
fn within_exact_date_range_becomes_between() {
    let compiled = compile_with(RawParams {
        where_clause: Some("(Name,within,2026-01-01,2026-12-31)".into()),
        ..RawParams::default()
    });

    assert!(compiled.sql.contains("\"users\".\"name\" BETWEEN $1 AND $2"));
    assert_eq!(compiled.params.len(), 4);
}

#[test]
fn within_past_days_anchors_on_the_current_date() {
    let compiled = compile_with(RawParams {
        where_clause: Some("(Name,within,pastNumberOfDays,7)".into()),
        ..RawParams::default()
    });

    assert!(compiled.sql.contains(
        "\"users\".\"name\" BETWEEN CURRENT_DATE - CAST($1 AS integer) * INTERVAL '1 day' \
         AND CURRENT_DATE"
    ));
    assert_eq!(compiled.params[0], Value::I64(7));
}

#[test]
fn within_next_days_anchors_on_the_current_date() {
    let compiled = compile_with(RawParams {
        where_clause: Some("(Name,within,nextNumberOfDays,30)".into()),
        ..RawParams::default()
    });

    assert!(compiled.sql.contains(
        "\"users\".\"name\" BETWEEN CURRENT_DATE \
         AND CURRENT_DATE + CAST($1 AS integer) * INTERVAL '1 day'"
    ));
    assert_eq!(compiled.params[0], Value::I64(30));
}

#[test]
fn within_without_two_bounds_is_dropped() {
    let compiled = compile_with(RawParams {
        where_clause: Some("(Name,within,7)".into()),
        ..RawParams::default()
    });

    assert!(!compiled.sql.contains("WHERE"));
}

#[test]
fn view_filters_and_request_filters_are_anded() {
    let meta = support::users();
    let mut view = View::default();
    view.filters
        .push(Filter::leaf("Name", FilterOp::NotNull, Value::Null));
    let query = ListQuery::new(&meta, &meta.tables[0], &view);

    let raw = RawParams {
        where_clause: Some("(Name,eq,Alice)".into()),
        ..RawParams::default()
    };
    let compiled = query.compile(&Capability::POSTGRESQL, &raw).unwrap();

    assert!(compiled
        .sql
        .contains("WHERE \"users\".\"name\" IS NOT NULL AND \"users\".\"name\" = $2"));
}

#[test]
fn filter_on_belongs_to_compares_the_display_value() {
    let meta = support::orders_customers();
    let view = View::default();
    let query = ListQuery::new(&meta, &meta.tables[1], &view);

    let raw = RawParams {
        where_clause: Some("(Customer,eq,Alice)".into()),
        ..RawParams::default()
    };
    let compiled = query.compile(&Capability::POSTGRESQL, &raw).unwrap();

    // The predicate compiles once and lands in both statements; the scalar
    // subquery stands the customer's name in for the record.
    assert!(compiled.sql.contains(
        "WHERE (SELECT \"a0\".\"name\" FROM \"customers\" AS \"a0\" \
         WHERE \"a0\".\"id\" = \"orders\".\"customer_id\") = $1"
    ));
    assert_eq!(
        compiled.params,
        vec![
            Value::String("Alice".into()),
            Value::String("primaryValue".into()),
            Value::String("primaryKey".into()),
            Value::String("Alice".into()),
        ]
    );
}

#[test]
fn filter_on_to_many_link_is_dropped() {
    let meta = support::orders_customers();
    let view = View::default();
    let query = ListQuery::new(&meta, &meta.tables[0], &view);

    let raw = RawParams {
        where_clause: Some("(Orders,eq,5)".into()),
        ..RawParams::default()
    };
    let compiled = query.compile(&Capability::POSTGRESQL, &raw).unwrap();

    assert!(!compiled.sql.contains("WHERE \"orders\""));
    // Only the envelope keys remain as parameters
    assert_eq!(compiled.params.len(), 2);
}
