use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A physical store (a "local") where sales are recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Store {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Brand {
    pub id: i64,
    pub name: String,
}

/// A product in the catalog. Every product belongs to exactly one brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub brand_id: i64,
    /// The catalog unit cost. This is the cost used by the brand margin report.
    pub unit_cost: Decimal,
}

/// One product line within a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SaleLineItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    /// The unit cost recorded at the time of the sale.
    pub unit_cost: Decimal,
}

/// One completed transaction, together with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub store_id: i64,
    pub date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub line_items: Vec<SaleLineItem>,
}
