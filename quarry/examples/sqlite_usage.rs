use quarry::executor::sqlite::SqliteExecutor;
use quarry::{
    delete_from, op, select, update, ExecutableModification, ExecutableQuery, Executor, Value,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Product {
    id: i64,
    name: String,
    stock: i64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Quarry SQLite - Usage Example ===\n");

    let db = SqliteExecutor::in_memory().await?;
    db.execute(
        "CREATE TABLE products (id INTEGER PRIMARY KEY, name TEXT NOT NULL, stock INTEGER NOT NULL)",
        &[],
    )
    .await?;

    // SQLite has no INSERT ... SET, so rows go in through the executor directly
    for (name, stock) in [("bolt", 120), ("nut", 0), ("washer", 45)] {
        db.execute(
            "INSERT INTO products (name, stock) VALUES (?, ?)",
            &[Value::from(name), Value::from(stock)],
        )
        .await?;
    }

    let in_stock = select(("id", "name", "stock"))
        .from("products")
        .where_(("stock", op::GT, 0))
        .order_by_asc("name");
    println!("1. SELECT:");
    println!("   SQL: {}", in_stock.to_sql()?);
    let products: Vec<Product> = in_stock.fetch_all(&db).await?;
    for product in &products {
        println!("   {:?}", product);
    }
    println!();

    let restock = update("products").set("stock", 10).where_(("stock", 0));
    println!("2. UPDATE:");
    println!("   SQL: {}", restock.to_inline_sql()?);
    println!("   Rows affected: {}\n", restock.execute(&db).await?);

    let cleanup = delete_from("products").where_in("name", ["washer"]);
    println!("3. DELETE:");
    println!("   SQL: {}", cleanup.to_sql()?);
    println!("   Rows affected: {}\n", cleanup.execute(&db).await?);

    let nut: Option<Product> = select("*")
        .from("products")
        .where_(("name", "nut"))
        .fetch_optional(&db)
        .await?;
    println!("4. Restocked: {:?}", nut);

    Ok(())
}
