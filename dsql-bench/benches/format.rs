use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dsql::{format, Node, Opts, Statement};

fn small_statement() -> Statement {
    Statement::new()
        .clause("select", Node::from(vec![Node::ident("*")]))
        .clause("from", Node::from(vec![Node::ident("table1")]))
        .clause(
            "where",
            Node::List(vec![Node::ident("="), Node::ident("id"), Node::from(1i64)]),
        )
}

fn medium_statement() -> Statement {
    let derived = Statement::new()
        .clause(
            "select",
            Node::from(vec![Node::ident("id1"), Node::ident("id2")]),
        )
        .clause("from", Node::from(vec![Node::ident("table1")]))
        .clause(
            "where",
            Node::List(vec![
                Node::ident("and"),
                Node::List(vec![Node::ident(">"), Node::ident("id1"), Node::from(100i64)]),
                Node::List(vec![Node::ident("<"), Node::ident("id2"), Node::from(200i64)]),
            ]),
        );

    Statement::new()
        .clause(
            "with",
            Node::List(vec![Node::List(vec![Node::ident("derived"), Node::Map(derived)])]),
        )
        .clause("select", Node::from(vec![Node::ident("*")]))
        .clause("from", Node::from(vec![Node::ident("table1")]))
        .clause(
            "left-join",
            Node::List(vec![Node::List(vec![
                Node::ident("derived"),
                Node::List(vec![Node::ident("using"), Node::ident("id")]),
            ])]),
        )
        .clause(
            "order-by",
            Node::from(vec![Node::List(vec![Node::ident("id"), Node::ident("desc")])]),
        )
        .clause("offset", Node::from(20i64))
        .clause("limit", Node::from(100i64))
}

fn large_statement() -> Statement {
    let mut cols = Vec::new();
    for i in 0..40 {
        cols.push(Node::ident(format!("col{i}")));
    }
    let mut conds = vec![Node::ident("and")];
    for i in 0..40 {
        conds.push(Node::List(vec![
            Node::ident("="),
            Node::ident(format!("col{i}")),
            Node::from(i as i64),
        ]));
    }

    Statement::new()
        .clause("select", Node::from(cols))
        .clause("from", Node::from(vec![Node::ident("big_table")]))
        .clause("where", Node::List(conds))
        .clause(
            "order-by",
            Node::from(vec![Node::ident("col0"), Node::ident("col1")]),
        )
        .clause("limit", Node::from(1000i64))
}

fn format_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");

    let small = small_statement();
    group.bench_function("small", |b| {
        b.iter(|| black_box(format(&small, &Opts::new()).unwrap()));
    });

    let medium = medium_statement();
    group.bench_function("medium", |b| {
        b.iter(|| black_box(format(&medium, &Opts::new()).unwrap()));
    });

    let large = large_statement();
    group.bench_function("large", |b| {
        b.iter(|| black_box(format(&large, &Opts::new()).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, format_bench);
criterion_main!(benches);
