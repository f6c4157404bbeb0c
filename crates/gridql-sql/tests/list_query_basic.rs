mod support;

use gridql_core::driver::Capability;
use gridql_core::meta::View;
use gridql_sql::{ListQuery, RawParams};

use pretty_assertions::assert_eq;

#[test]
fn flat_table_default_page() {
    let meta = support::users();
    let view = View::default();
    let query = ListQuery::new(&meta, &meta.tables[0], &view);

    let compiled = query
        .compile(&Capability::POSTGRESQL, &RawParams::default())
        .unwrap();

    assert_eq!(
        compiled.sql,
        "SELECT coalesce(json_agg(\"a0\".*), '[]'::json) AS \"data\", \
         (SELECT count(*) FROM \"users\") AS \"count\" \
         FROM (SELECT \"_base\".\"id\" AS \"Id\", \"_base\".\"name\" AS \"Name\" \
         FROM (SELECT * FROM \"users\" ORDER BY \"users\".\"id\" ASC LIMIT 25 OFFSET 0) AS \"_base\") AS \"a0\";"
    );
    assert!(compiled.params.is_empty());
}

#[test]
fn pagination_is_clamped() {
    let meta = support::users();
    let view = View::default();
    let query = ListQuery::new(&meta, &meta.tables[0], &view);

    let raw = RawParams {
        limit: Some("500000".into()),
        offset: Some("50".into()),
        ..RawParams::default()
    };
    let compiled = query.compile(&Capability::POSTGRESQL, &raw).unwrap();

    assert!(compiled.sql.contains("LIMIT 1000 OFFSET 50"));
}

#[test]
fn hidden_columns_are_not_projected() {
    let meta = support::users();
    let mut view = View::default();
    view.visible.insert(support::column_id(0, 0), true);
    let query = ListQuery::new(&meta, &meta.tables[0], &view);

    let compiled = query
        .compile(&Capability::POSTGRESQL, &RawParams::default())
        .unwrap();

    assert!(compiled.sql.contains("\"_base\".\"id\" AS \"Id\""));
    assert!(!compiled.sql.contains("\"Name\""));
}

#[test]
fn all_columns_hidden_falls_back_to_primary_key() {
    let meta = support::users();
    let mut view = View::default();
    view.visible.insert(support::column_id(0, 0), false);
    view.visible.insert(support::column_id(0, 1), false);
    let query = ListQuery::new(&meta, &meta.tables[0], &view);

    let compiled = query
        .compile(&Capability::POSTGRESQL, &RawParams::default())
        .unwrap();

    assert!(compiled.sql.contains("\"_base\".\"id\" AS \"Id\""));
    assert!(!compiled.sql.contains("\"Name\""));
}

#[test]
fn requires_lateral_and_json_support() {
    let meta = support::users();
    let view = View::default();
    let query = ListQuery::new(&meta, &meta.tables[0], &view);

    assert!(query
        .compile(&Capability::SQLITE, &RawParams::default())
        .is_err());
    assert!(query
        .compile(&Capability::MYSQL, &RawParams::default())
        .is_err());
}
