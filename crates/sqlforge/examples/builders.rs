//! Statement builders without a database.
//!
//! Run with: cargo run --example builders -p sqlforge

use sqlforge::prelude::*;
use sqlforge::AliasedReference;

fn main() -> DbResult<()> {
    let mut recent = select();
    recent
        .columns(["user_id"])
        .from("orders")
        .where_greater_than("total", 100)
        .where_in("status", ["paid", "shipped"]);

    let mut users = select();
    users
        .options(["distinct"])
        .columns(["u.id", "u.name"])
        .column(AliasedReference::alias("orders", Expr::raw("COUNT(o.id)")))
        .from(AliasedReference::alias("u", "users"))
        .left_join_on(
            AliasedReference::alias("o", "orders"),
            Expr::raw("o.user_id = u.id"),
        )
        .where_in("u.id", [Expr::subquery(recent)])
        .group_by("u.id")
        .having_greater_than("orders", 1)
        .order_by_desc("orders")
        .limit(10);
    println!("{}", users.sql()?);

    let mut upsert = insert_into("counters");
    upsert
        .set("name", "visits")
        .set("hits", 1)
        .on_duplicate_key_update("hits", Expr::raw("hits + 1"));
    println!("{}", upsert.sql()?);

    let mut cleanup = delete_from("sessions");
    cleanup
        .where_less_than("expires_at", Expr::raw("NOW()"))
        .limit(1000);
    println!("{}", cleanup.sql()?);

    // Validation happens at render time.
    let mut bad = select();
    bad.from("t").join("u", "innes", None, None);
    if let Err(err) = bad.sql() {
        println!("rejected: {err}");
    }

    Ok(())
}
