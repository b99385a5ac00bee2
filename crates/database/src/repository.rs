use crate::DbError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{Brand, Product, Sale, SaleLineItem, SalesSnapshot, Store};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use std::collections::HashMap;

/// The data-access boundary the reports are computed from.
///
/// Given no parameters, an implementation returns every sale with its line
/// items, plus the stores, products and brands they reference. The
/// application depends on this trait so the source (database or in-memory)
/// can be swapped out.
#[async_trait]
pub trait SalesSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<SalesSnapshot, DbError>;
}

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

/// A row of the `sales` table, before its line items are attached.
#[derive(Debug, Clone, FromRow)]
pub struct DbSale {
    pub id: i64,
    pub store_id: i64,
    pub sale_date: DateTime<Utc>,
    pub total_amount: Decimal,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_stores(&self) -> Result<Vec<Store>, DbError> {
        let stores = sqlx::query_as::<_, Store>("SELECT id, name FROM stores ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(stores)
    }

    pub async fn get_brands(&self) -> Result<Vec<Brand>, DbError> {
        let brands = sqlx::query_as::<_, Brand>("SELECT id, name FROM brands ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(brands)
    }

    pub async fn get_products(&self) -> Result<Vec<Product>, DbError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, brand_id, unit_cost FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Fetches every sale header. The order defines "input order" for the
    /// reports' tie-breaks, so it must be deterministic.
    pub async fn get_sales(&self) -> Result<Vec<DbSale>, DbError> {
        let sales = sqlx::query_as::<_, DbSale>(
            "SELECT id, store_id, sale_date, total_amount FROM sales ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    pub async fn get_sale_line_items(&self) -> Result<Vec<SaleLineItem>, DbError> {
        let items = sqlx::query_as::<_, SaleLineItem>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_cost
            FROM sale_line_items
            ORDER BY sale_id ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }
}

#[async_trait]
impl SalesSource for DbRepository {
    /// Reads all five tables concurrently and assembles the validated snapshot.
    #[tracing::instrument(name = "fetch_sales_snapshot", skip(self))]
    async fn fetch_snapshot(&self) -> Result<SalesSnapshot, DbError> {
        let (stores, brands, products, sales, items) = tokio::join!(
            self.get_stores(),
            self.get_brands(),
            self.get_products(),
            self.get_sales(),
            self.get_sale_line_items()
        );

        let sales = nest_line_items(sales?, items?)?;
        let snapshot = SalesSnapshot::new(stores?, brands?, products?, sales)?;

        tracing::info!(
            sales = snapshot.sales().len(),
            line_items = snapshot.line_item_count(),
            "Loaded sales snapshot."
        );
        Ok(snapshot)
    }
}

/// Attaches each line item to its sale, keeping both lists in source order.
fn nest_line_items(sales: Vec<DbSale>, items: Vec<SaleLineItem>) -> Result<Vec<Sale>, DbError> {
    let mut nested: Vec<Sale> = sales
        .into_iter()
        .map(|s| Sale {
            id: s.id,
            store_id: s.store_id,
            date: s.sale_date,
            total_amount: s.total_amount,
            line_items: Vec::new(),
        })
        .collect();

    let index: HashMap<i64, usize> = nested.iter().enumerate().map(|(i, s)| (s.id, i)).collect();

    for item in items {
        let Some(&i) = index.get(&item.sale_id) else {
            return Err(DbError::InconsistentData(format!(
                "line item {} references missing sale {}",
                item.id, item.sale_id
            )));
        };
        nested[i].line_items.push(item);
    }

    Ok(nested)
}
