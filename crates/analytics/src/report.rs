use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number and total amount of the sales inside a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SalesTotals {
    pub count: usize,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighestSale {
    pub sale_id: i64,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
}

/// A product ranked by the number of line items it appears in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCount {
    pub product_id: i64,
    pub name: String,
    pub line_items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTotal {
    pub name: String,
    pub amount: Decimal,
}

/// A brand ranked by the sum of `quantity * unit_cost` over its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandMargin {
    pub brand_id: i64,
    pub name: String,
    pub margin: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuantity {
    pub name: String,
    pub quantity: i64,
}

/// The best-selling product of one store. `product` is `None` when the
/// store's sales carry no line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreBestSeller {
    pub store: String,
    pub product: Option<ProductQuantity>,
}

/// Every report for a single run, as produced by `SalesReportEngine::summarize`.
///
/// This struct is the data transfer object handed to the presentation layer,
/// whether it renders a table or serializes to JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub reference_date: DateTime<Utc>,
    pub window_days: u32,
    pub recent_sales: SalesTotals,
    pub highest_sale: Option<HighestSale>,
    pub best_selling_product: Option<ProductCount>,
    pub top_grossing_store: Option<StoreTotal>,
    pub highest_margin_brand: Option<BrandMargin>,
    pub best_sellers_by_store: Vec<StoreBestSeller>,
}
