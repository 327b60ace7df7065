#![allow(dead_code)]

pub mod utils;

/// A small web shop, crawled in this order: customers, products, orders,
/// order_items, categories, order_totals. `orders` references `customers`,
/// `order_items` references `orders` and `products`, `categories` references
/// itself and `order_totals` is a view.
pub const SHOP_SNAPSHOT: &str = r#"{
    "crawlInfo": {
        "crawlerName": "catalog-crawler",
        "crawlerVersion": "1.4.0",
        "productName": "PostgreSQL",
        "productVersion": "16.2",
        "connectionUrl": "jdbc:postgresql://localhost:5432/shop"
    },
    "schemas": [ { "catalog": "shop", "name": "public" } ],
    "tables": [
        { "schema": "shop.public", "name": "customers", "columns": [
            { "name": "id", "ordinal": 1, "type": "int4", "partOfPrimaryKey": true },
            { "name": "email", "ordinal": 2, "type": "varchar", "nullable": false } ] },
        { "schema": "shop.public", "name": "products", "columns": [
            { "name": "id", "ordinal": 1, "type": "int4", "partOfPrimaryKey": true },
            { "name": "name", "ordinal": 2, "type": "varchar" } ] },
        { "schema": "shop.public", "name": "orders", "remarks": "One row per checkout", "columns": [
            { "name": "id", "ordinal": 1, "type": "int4", "partOfPrimaryKey": true },
            { "name": "customer_id", "ordinal": 2, "type": "int4", "nullable": false } ] },
        { "schema": "shop.public", "name": "order_items", "columns": [
            { "name": "order_id", "ordinal": 1, "type": "int4", "nullable": false },
            { "name": "product_id", "ordinal": 2, "type": "int4", "nullable": false },
            { "name": "price", "ordinal": 3, "type": "numeric" } ] },
        { "schema": "shop.public", "name": "categories", "columns": [
            { "name": "id", "ordinal": 1, "type": "int4", "partOfPrimaryKey": true },
            { "name": "parent_id", "ordinal": 2, "type": "int4" } ] },
        { "schema": "shop.public", "name": "order_totals", "type": "VIEW", "columns": [
            { "name": "order_id", "ordinal": 1, "type": "int4" },
            { "name": "total", "ordinal": 2, "type": "numeric" } ] }
    ],
    "relationships": [
        { "name": "orders_customer_fk", "parent": "shop.public.customers", "child": "shop.public.orders",
          "columns": [ { "parent": "id", "child": "customer_id" } ] },
        { "name": "items_order_fk", "parent": "shop.public.orders", "child": "shop.public.order_items",
          "columns": [ { "parent": "id", "child": "order_id" } ] },
        { "name": "items_product_fk", "parent": "shop.public.products", "child": "shop.public.order_items",
          "columns": [ { "parent": "id", "child": "product_id" } ] },
        { "name": "categories_parent_fk", "kind": "inferred", "parent": "shop.public.categories",
          "child": "shop.public.categories", "columns": [ { "parent": "id", "child": "parent_id" } ] }
    ]
}"#;
