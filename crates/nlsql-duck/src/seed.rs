//! Demo database scaffolding: schema, sample rows and the human-curated
//! metadata the pipeline grounds its prompts on.

use duckdb::{Connection, Result as DuckResult};

/// Table/column descriptions seeded into `schema_metadata`. A `None`
/// column is the table-level description.
const METADATA: &[(&str, Option<&str>, &str)] = &[
    ("customers", None, "Stores information about customers who place orders"),
    ("products", None, "Stores information about products available for purchase"),
    ("orders", None, "Stores information about customer orders and their status"),
    ("customers", Some("customer_id"), "Unique identifier for each customer"),
    ("customers", Some("name"), "Full name of the customer"),
    ("customers", Some("email"), "Email address of the customer"),
    ("customers", Some("address"), "Physical address of the customer"),
    ("customers", Some("created_at"), "Timestamp when the customer record was created"),
    ("products", Some("product_id"), "Unique identifier for each product"),
    ("products", Some("name"), "Name of the product"),
    ("products", Some("description"), "Detailed description of the product"),
    ("products", Some("price"), "Price of the product in USD"),
    ("products", Some("category"), "Category the product belongs to"),
    ("products", Some("created_at"), "Timestamp when the product record was created"),
    ("orders", Some("order_id"), "Unique identifier for each order"),
    ("orders", Some("customer_id"), "Reference to the customer who placed the order"),
    ("orders", Some("product_id"), "Reference to the product being ordered"),
    ("orders", Some("quantity"), "Number of units ordered"),
    ("orders", Some("order_date"), "Date and time when the order was placed"),
    ("orders", Some("status"), "Current status of the order (e.g., Completed, Processing, Shipped)"),
];

/// Create the metadata store with its uniqueness invariant.
pub fn create_metadata_table(conn: &Connection) -> DuckResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_metadata (
             table_name VARCHAR NOT NULL,
             column_name VARCHAR,
             description VARCHAR NOT NULL,
             UNIQUE (table_name, column_name)
         )",
    )
}

/// Create the demo tables and (re)seed the metadata store.
pub fn init_schema(conn: &Connection) -> DuckResult<()> {
    create_metadata_table(conn)?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS customers (
             customer_id INTEGER PRIMARY KEY,
             name VARCHAR,
             email VARCHAR,
             address VARCHAR,
             created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
         );
         CREATE TABLE IF NOT EXISTS products (
             product_id INTEGER PRIMARY KEY,
             name VARCHAR,
             description VARCHAR,
             price DECIMAL(10, 2),
             category VARCHAR,
             created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
         );
         CREATE TABLE IF NOT EXISTS orders (
             order_id INTEGER PRIMARY KEY,
             customer_id INTEGER,
             product_id INTEGER,
             quantity INTEGER,
             order_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
             status VARCHAR
         );",
    )?;

    conn.execute("DELETE FROM schema_metadata", [])?;
    let mut insert = conn.prepare(
        "INSERT INTO schema_metadata (table_name, column_name, description) VALUES (?, ?, ?)",
    )?;
    for (table, column, description) in METADATA {
        insert.execute(duckdb::params![table, column, description])?;
    }

    tracing::info!(entries = METADATA.len(), "schema metadata seeded");
    Ok(())
}

/// Replace all demo rows with a small fixed sample set.
pub fn insert_sample_data(conn: &Connection) -> DuckResult<()> {
    conn.execute_batch(
        "DELETE FROM orders;
         DELETE FROM products;
         DELETE FROM customers;

         INSERT INTO customers (customer_id, name, email, address) VALUES
         (1, 'John Doe', 'john@example.com', '123 Main St'),
         (2, 'Jane Smith', 'jane@example.com', '456 Oak Ave'),
         (3, 'Bob Johnson', 'bob@example.com', '789 Pine St');

         INSERT INTO products (product_id, name, description, price, category) VALUES
         (1, 'Laptop', 'High-performance laptop with 16GB RAM and 512GB SSD', 999.99, 'Electronics'),
         (2, 'Smartphone', 'Latest smartphone model with 5G capability', 699.99, 'Electronics'),
         (3, 'Tablet', 'Portable tablet with 10-inch display and stylus support', 399.99, 'Electronics');

         INSERT INTO orders (order_id, customer_id, product_id, quantity, status) VALUES
         (1, 1, 1, 1, 'Completed'),
         (2, 2, 2, 2, 'Processing'),
         (3, 3, 3, 1, 'Shipped');",
    )?;

    tracing::info!("sample data inserted");
    Ok(())
}
