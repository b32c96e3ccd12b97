//! End-to-end coverage of representative statements through the public
//! `dsql::format` entry point, one test per scenario.

use dsql::{format, Node, Opts, ParamValue, Statement};

#[test]
fn alias_with_default_dialect() {
    let stmt = Statement::new()
        .clause(
            "select",
            Node::from(vec![
                Node::ident("t/id"),
                Node::List(vec![Node::ident("name"), Node::ident("item")]),
            ]),
        )
        .clause(
            "from",
            Node::from(vec![Node::List(vec![Node::ident("table"), Node::ident("t")])]),
        )
        .clause(
            "where",
            Node::List(vec![Node::ident("="), Node::ident("id"), Node::from(1i64)]),
        );

    let (sql, params) = format(&stmt, &Opts::new()).unwrap();
    assert_eq!(
        sql,
        "SELECT t.id, name AS item FROM table AS t WHERE id = ?"
    );
    assert_eq!(params, vec![ParamValue::Number("1".into())]);
}

#[test]
fn values_with_heterogeneous_row_maps() {
    let row1 = Statement::new()
        .clause("a", Node::from(1i64))
        .clause("b", Node::from(2i64));
    let row2 = Statement::new()
        .clause("b", Node::from(3i64))
        .clause("c", Node::from(4i64));

    let stmt = Statement::new()
        .clause("insert-into", Node::ident("foo"))
        .clause("values", Node::from(vec![Node::Map(row1), Node::Map(row2)]));

    let (sql, params) = format(&stmt, &Opts::new()).unwrap();
    assert_eq!(
        sql,
        "INSERT INTO foo (a, b, c) VALUES (?, ?, ?), (?, ?, ?)"
    );
    assert_eq!(
        params,
        vec![
            ParamValue::Number("1".into()),
            ParamValue::Number("2".into()),
            ParamValue::Null,
            ParamValue::Null,
            ParamValue::Number("3".into()),
            ParamValue::Number("4".into()),
        ]
    );
}

#[test]
fn upsert_with_do_update() {
    let insert_target = Node::List(vec![
        Node::ident("distributors"),
        Node::from(vec![Node::ident("did"), Node::ident("dname")]),
    ]);
    let values = Node::from(vec![
        Node::List(vec![Node::from(5i64), Node::Str("Gizmo Transglobal".into())]),
        Node::List(vec![
            Node::from(6i64),
            Node::Str("Associated Computing, Inc".into()),
        ]),
    ]);
    let do_update_set = Node::Map(Statement::new().clause(
        "fields",
        Node::from(vec![Node::ident("dname")]),
    ));

    let stmt = Statement::new()
        .clause("insert-into", insert_target)
        .clause("values", values)
        .clause("on-conflict", Node::ident("did"))
        .clause("do-update-set", do_update_set)
        .clause("returning", Node::from(vec![Node::ident("*")]));

    let (sql, params) = format(&stmt, &Opts::new()).unwrap();
    assert_eq!(
        sql,
        "INSERT INTO distributors (did, dname) VALUES (?, ?), (?, ?) \
         ON CONFLICT (did) DO UPDATE SET dname = EXCLUDED.dname RETURNING *"
    );
    assert_eq!(
        params,
        vec![
            ParamValue::Number("5".into()),
            ParamValue::Str("Gizmo Transglobal".into()),
            ParamValue::Number("6".into()),
            ParamValue::Str("Associated Computing, Inc".into()),
        ]
    );
}

#[test]
fn mysql_dialect_moves_set_before_where() {
    let stmt = Statement::new()
        .clause("update", Node::ident("table"))
        .clause(
            "where",
            Node::List(vec![Node::ident("="), Node::ident("id"), Node::from(1i64)]),
        )
        .clause(
            "set",
            Node::Map(Statement::new().clause("col", Node::from(2i64))),
        );

    let (sql, params) = format(&stmt, &Opts::new().dialect("mysql")).unwrap();
    assert_eq!(
        sql,
        "UPDATE `table` SET `col` = ? WHERE `id` = ?"
    );
    assert_eq!(
        params,
        vec![ParamValue::Number("2".into()), ParamValue::Number("1".into())]
    );
}

#[test]
fn nrql_dialect_renders_its_own_clause_set_in_order() {
    let stmt = Statement::new()
        .clause("limit", Node::from(10i64))
        .clause("facet", Node::from(vec![Node::ident("appName")]))
        .clause("select", Node::from(vec![Node::ident("count(*)")]))
        .clause("from", Node::from(vec![Node::ident("Transaction")]))
        .clause(
            "where",
            Node::List(vec![Node::ident("="), Node::ident("appName"), Node::Str("api".into())]),
        );

    let (sql, params) = format(&stmt, &Opts::new().dialect("nrql").quoted(false)).unwrap();
    assert_eq!(
        sql,
        "SELECT count(*) FROM Transaction WHERE appName = ? FACET appName LIMIT ?"
    );
    assert_eq!(
        params,
        vec![ParamValue::Str("api".into()), ParamValue::Number("10".into())]
    );
}
