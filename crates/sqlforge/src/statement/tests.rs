//! Rendering tests for the statement builders.

use super::*;
use crate::clause::{
    FromBuilder, GroupByBuilder, HavingBuilder, JoinBuilder, LimitBuilder, Operand,
    OrderByBuilder, OptionsBuilder, WhereBuilder,
};
use crate::error::DbError;
use crate::expr::{AliasedReference, Expr};

#[test]
fn select_star_without_from() {
    let select = select();
    assert_eq!(select.sql().unwrap(), "SELECT *");
}

#[test]
fn select_full_pipeline() {
    let mut q = select();
    q.options(["sql_calc_found_rows", "distinct"])
        .columns(["id", "name"])
        .column(AliasedReference::alias("total", Expr::raw("COUNT(*)")))
        .from("users")
        .left_join_using("profiles", ["user_id"])
        .where_equal("status", "active")
        .group_by("id")
        .having_greater_than("total", 1)
        .order_by_desc("id")
        .limit_offset(10, 20);

    assert_eq!(
        q.sql().unwrap(),
        "SELECT DISTINCT SQL_CALC_FOUND_ROWS `id`, `name`, (COUNT(*)) AS `total` \
         FROM `users` LEFT JOIN `profiles` USING (`user_id`) WHERE `status` = 'active' \
         GROUP BY `id` HAVING `total` > 1 ORDER BY `id` DESC LIMIT 10 OFFSET 20"
    );
}

#[test]
fn select_renders_on_demand() {
    let mut q = select();
    q.from("t1");
    assert_eq!(q.sql().unwrap(), "SELECT * FROM `t1`");
    q.where_is_not_null("c1");
    assert_eq!(q.sql().unwrap(), "SELECT * FROM `t1` WHERE `c1` IS NOT NULL");
}

#[test]
fn select_where_requires_from() {
    let mut q = select();
    q.where_equal("id", 1);
    let err = q.sql().unwrap_err();
    assert!(matches!(err, DbError::Logic(_)));
    assert_eq!(err.to_string(), "Clause WHERE only works with FROM");

    let mut q = select();
    q.group_by("id");
    assert_eq!(q.sql().unwrap_err().to_string(), "Clause GROUP BY only works with FROM");
}

#[test]
fn select_as_subquery() {
    let mut inner = select();
    inner.columns(["user_id"]).from("orders").where_greater_than("total", 100);

    let mut outer = select();
    outer
        .from("users")
        .where_in("id", [Expr::subquery(inner.clone())]);
    assert_eq!(
        outer.sql().unwrap(),
        "SELECT * FROM `users` WHERE `id` IN \
         (SELECT `user_id` FROM `orders` WHERE `total` > 100)"
    );

    let mut from_sub = select();
    from_sub.from(AliasedReference::alias("o", Expr::subquery(inner)));
    assert_eq!(
        from_sub.sql().unwrap(),
        "SELECT * FROM (SELECT `user_id` FROM `orders` WHERE `total` > 100) AS `o`"
    );
}

#[test]
fn select_lock_suffix() {
    let mut q = select();
    q.from("t").where_equal("id", 1).lock_for_update();
    assert_eq!(q.sql().unwrap(), "SELECT * FROM `t` WHERE `id` = 1 FOR UPDATE");
}

#[test]
fn select_subquery_errors_propagate() {
    let mut bad = select();
    bad.from("t").join("u", "sideways", None, None);
    let mut q = select();
    q.from(AliasedReference::alias("x", Expr::subquery(bad)));
    assert_eq!(q.sql().unwrap_err().to_string(), "Invalid JOIN type: sideways");
}

#[test]
fn insert_values() {
    let mut insert = insert_into("t1");
    insert
        .option("ignore")
        .columns(["c1", "c2"])
        .values([Operand::from(1), Operand::from("a")])
        .values([Operand::from(2), Operand::from(None::<String>)]);
    assert_eq!(
        insert.sql().unwrap(),
        "INSERT IGNORE INTO `t1` (`c1`, `c2`) VALUES (1, 'a'), (2, NULL)"
    );
}

#[test]
fn insert_set_and_on_duplicate() {
    let mut insert = insert_into("counters");
    insert
        .set("id", 7)
        .set("hits", 1)
        .on_duplicate_key_update("hits", Expr::raw("hits + 1"));
    assert_eq!(
        insert.sql().unwrap(),
        "INSERT INTO `counters` SET `id` = 7, `hits` = 1 \
         ON DUPLICATE KEY UPDATE `hits` = (hits + 1)"
    );
}

#[test]
fn insert_select() {
    let mut source = select();
    source.columns(["a", "b"]).from("t2");
    let mut insert = insert_into("t1");
    insert.columns(["a", "b"]).select(Expr::subquery(source));
    assert_eq!(
        insert.sql().unwrap(),
        "INSERT INTO `t1` (`a`, `b`) SELECT `a`, `b` FROM `t2`"
    );
}

#[test]
fn insert_validation() {
    let insert = Insert::new();
    assert_eq!(insert.sql().unwrap_err().to_string(), "INTO table must be set");

    let insert = insert_into("t");
    assert_eq!(
        insert.sql().unwrap_err().to_string(),
        "INSERT must have VALUES, SET or SELECT"
    );

    let mut insert = insert_into("t");
    insert.values([1]).set("a", 1);
    assert!(insert.sql().unwrap_err().is_state());

    let mut insert = insert_into("t");
    insert.columns(["a", "b"]).values([1]);
    assert_eq!(
        insert.sql().unwrap_err().to_string(),
        "VALUES row 1 has 1 values, expected 2"
    );

    let mut insert = insert_into("t");
    insert.options(["DELAYED", "HIGH_PRIORITY"]);
    insert.values([1]);
    assert!(insert.sql().unwrap_err().is_validation());
}

#[test]
fn replace_values() {
    let mut replace = replace_into("t1");
    replace.option("low_priority").values([Operand::from(1), Operand::from(true)]);
    assert_eq!(
        replace.sql().unwrap(),
        "REPLACE LOW_PRIORITY INTO `t1` VALUES (1, TRUE)"
    );

    replace.option("ignore");
    assert_eq!(replace.sql().unwrap_err().to_string(), "Invalid option: ignore");
}

#[test]
fn update_statement() {
    let mut update = update("users");
    update
        .option("low_priority")
        .set("name", "bob")
        .set("updated_at", Expr::raw("NOW()"))
        .where_equal("id", 5)
        .order_by_asc("id")
        .limit(1);
    assert_eq!(
        update.sql().unwrap(),
        "UPDATE LOW_PRIORITY `users` SET `name` = 'bob', `updated_at` = (NOW()) \
         WHERE `id` = 5 ORDER BY `id` ASC LIMIT 1"
    );
}

#[test]
fn update_multi_table_with_join() {
    let mut update = Update::new();
    update
        .table("t1")
        .join_on("t2", Expr::raw("t1.id = t2.id"))
        .set("t1.c", 1);
    assert_eq!(
        update.sql().unwrap(),
        "UPDATE `t1` JOIN `t2` ON (t1.id = t2.id) SET `t1`.`c` = 1"
    );
}

#[test]
fn update_requires_table_and_set() {
    let update = Update::new();
    assert_eq!(update.sql().unwrap_err().to_string(), "Table references must be set");

    let update = super::update("t");
    assert_eq!(update.sql().unwrap_err().to_string(), "SET clause must be set");
}

#[test]
fn delete_statement() {
    let mut delete = delete_from("users");
    delete
        .options(["quick", "low_priority"])
        .where_less_than("id", 10)
        .order_by_asc("id")
        .limit(5);
    assert_eq!(
        delete.sql().unwrap(),
        "DELETE LOW_PRIORITY QUICK FROM `users` WHERE `id` < 10 ORDER BY `id` ASC LIMIT 5"
    );
}

#[test]
fn delete_multi_table() {
    let mut delete = Delete::new();
    delete
        .tables(["t1", "t2"])
        .from("t1")
        .inner_join_on("t2", Expr::raw("t1.id = t2.ref"));
    assert_eq!(
        delete.sql().unwrap(),
        "DELETE `t1`, `t2` FROM `t1` INNER JOIN `t2` ON (t1.id = t2.ref)"
    );
}

#[test]
fn delete_requires_from() {
    let delete = Delete::new();
    let err = delete.sql().unwrap_err();
    assert!(err.is_state());
    assert_eq!(err.to_string(), "FROM table references must be set");
}

#[test]
fn load_data_statement() {
    let mut load = load_data("/tmp/data.csv");
    load.options(["local", "concurrent"])
        .replace()
        .into_table("t1")
        .charset("utf8mb4")
        .columns_terminated_by(",")
        .columns_optionally_enclosed_by("\"")
        .columns_escaped_by("\\")
        .lines_terminated_by("\n")
        .ignore_lines(1);
    assert_eq!(
        load.sql().unwrap(),
        "LOAD DATA CONCURRENT LOCAL INFILE '/tmp/data.csv' REPLACE INTO TABLE `t1` \
         CHARACTER SET utf8mb4 COLUMNS TERMINATED BY ',' OPTIONALLY ENCLOSED BY '\\\"' \
         ESCAPED BY '\\\\' LINES TERMINATED BY '\\n' IGNORE 1 LINES"
    );
}

#[test]
fn load_data_validation() {
    let load = LoadData::new();
    assert_eq!(load.sql().unwrap_err().to_string(), "INFILE must be set");

    let load = load_data("x.csv");
    assert_eq!(load.sql().unwrap_err().to_string(), "INTO TABLE must be set");

    let mut load = load_data("x.csv");
    load.into_table("t").charset("utf8; DROP");
    assert_eq!(
        load.sql().unwrap_err().to_string(),
        "Invalid charset: utf8; DROP"
    );

    let mut load = load_data("x.csv");
    load.into_table("t").options(["LOW_PRIORITY", "CONCURRENT"]);
    assert!(load.sql().unwrap_err().is_validation());
}

#[test]
fn with_statement() {
    let mut recent = select();
    recent.from("orders").where_greater_than("id", 100);
    let mut final_query = select();
    final_query.from("recent");

    let mut with = with();
    with.option("recursive")
        .reference("recent", Expr::subquery(recent))
        .reference_with_columns("n", ["x"], Expr::raw("SELECT 1"))
        .select(Expr::subquery(final_query));
    assert_eq!(
        with.sql().unwrap(),
        "WITH RECURSIVE `recent` AS (SELECT * FROM `orders` WHERE `id` > 100), \
         `n` (`x`) AS (SELECT 1) SELECT * FROM `recent`"
    );
}

#[test]
fn with_validation() {
    let with = With::new();
    assert_eq!(with.sql().unwrap_err().to_string(), "WITH must have a reference");

    let mut with = With::new();
    with.reference("a", Expr::raw("SELECT 1"));
    assert_eq!(with.sql().unwrap_err().to_string(), "SELECT must be set");
}
