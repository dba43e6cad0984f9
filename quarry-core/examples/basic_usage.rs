use quarry_core::{delete_from, insert, op, select, update, BuilderConfig, LimitStyle, Query};

fn main() {
    // SELECT with grouped criteria
    let select_query = select(("id", "name", "email"))
        .from("users")
        .open_where()
        .where_(("age", op::GT, 18))
        .or_where(("role", "admin"))
        .close_where()
        .where_(("city", "LIKE", "%York%"))
        .order_by_desc("created_at")
        .limit_offset(10, 5);

    let stmt = select_query.to_statement().unwrap();
    println!("SELECT SQL: {}", stmt.sql);
    println!("Params: {:?}", stmt.params);
    println!("Inline: {}", select_query.to_inline_sql().unwrap());

    // JOINs with bare columns expand against the previous table
    let joined = select(("users.name", "SUM(items.price)"))
        .from("users")
        .inner_join("orders", "user_id")
        .left_join("items", "order_id")
        .group_by("users.name")
        .having(("SUM(items.price)", op::GT, 100));
    println!("JOIN SQL: {}", joined.to_sql().unwrap());

    // INSERT with ON DUPLICATE KEY UPDATE
    let insert_query = insert("stock")
        .set("sku", "A-1")
        .set("qty", 5)
        .on_duplicate_key(Query::new().set_quoted("qty", "qty + 5", false));
    println!("INSERT SQL: {}", insert_query.to_sql().unwrap());

    // UPDATE
    let update_query = update("users")
        .set("email", "newemail@example.com")
        .set_quoted("updated_at", "NOW()", false)
        .where_(("id", 123))
        .and_where(("active", true));
    println!("UPDATE SQL: {}", update_query.to_sql().unwrap());

    // DELETE
    let delete_query = delete_from("sessions")
        .where_(("expires_at", op::LT, "2024-01-01"))
        .or_where_null("user_id");
    println!("DELETE SQL: {}", delete_query.to_sql().unwrap());

    // Subqueries splice their params at the point of emission
    let paid = select("user_id").from("orders").where_(("status", "paid"));
    let customers = select("*").from("users").where_subquery_in("id", paid);
    let stmt = customers.to_statement().unwrap();
    println!("Subquery SQL: {} {:?}", stmt.sql, stmt.params);

    // Merging one builder into another
    let scope = select("id").from("posts").where_(("published", true));
    let merged = scope.merge_into(Query::new().where_(("author_id", 3)), true);
    println!("Merged SQL: {}", merged.to_sql().unwrap());

    // Legacy rendering: silent kind precedence and "offset, count" limits
    let legacy = Query::with_config(BuilderConfig::legacy().limit_style(LimitStyle::Legacy))
        .select("*")
        .from("posts")
        .limit_offset(10, 30);
    println!("Legacy SQL: {}", legacy.to_sql().unwrap());
}
