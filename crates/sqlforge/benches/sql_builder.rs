use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlforge::{
    Expr, FromBuilder, InsertBuilder, JoinBuilder, LimitBuilder, Operand, OrderByBuilder, Select,
    Statement, WhereBuilder, insert_into, select,
};

/// SELECT with `n` columns and `n` WHERE conditions.
fn build_select(n: usize) -> Select {
    let mut q = select();
    q.columns((0..n).map(|i| format!("col{i}")))
        .from("t")
        .left_join_using("u", ["id"]);
    for i in 0..n {
        q.where_equal(format!("col{i}"), i as i64);
    }
    q.order_by_desc("col0").limit(10);
    q
}

fn bench_render_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/render_select");

    for n in [1, 5, 10, 50, 100] {
        let q = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &q, |b, q| {
            b.iter(|| black_box(q.sql()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(n).sql()));
        });
    }

    group.finish();
}

fn bench_where_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/where_in");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let mut q = select();
                q.from("t").where_in("id", values.iter().copied());
                black_box(q.sql())
            });
        });
    }

    group.finish();
}

fn bench_insert_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/insert_rows");

    for n in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut insert = insert_into("t");
                insert.columns(["a", "b"]);
                for i in 0..n {
                    insert.values([Operand::from(i as i64), Operand::from(format!("row {i}"))]);
                }
                black_box(insert.sql())
            });
        });
    }

    group.finish();
}

fn bench_subquery(c: &mut Criterion) {
    c.bench_function("sql_builder/subquery", |b| {
        b.iter(|| {
            let mut inner = select();
            inner.columns(["user_id"]).from("orders");
            let mut outer = select();
            outer.from("users").where_in("id", [Expr::subquery(inner)]);
            black_box(outer.sql())
        });
    });
}

criterion_group!(
    benches,
    bench_render_select,
    bench_build_and_render,
    bench_where_in,
    bench_insert_rows,
    bench_subquery
);
criterion_main!(benches);
