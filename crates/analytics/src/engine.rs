use crate::error::AnalyticsError;
use crate::grouping::{group_stable, Tally};
use crate::report::{
    BrandMargin, HighestSale, ProductCount, ProductQuantity, SalesSummary, SalesTotals,
    StoreBestSeller, StoreTotal,
};
use chrono::{DateTime, Duration, Utc};
use core_types::{Product, Sale, SalesSnapshot};
use rust_decimal::Decimal;

/// A stateless calculator for deriving aggregate reports from a sales snapshot.
///
/// Every operation is a pure function of its inputs. Calling one twice on the
/// same snapshot yields identical results, and callers may share a snapshot
/// between concurrent report calls.
#[derive(Debug, Default)]
pub struct SalesReportEngine {}

impl SalesReportEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every report and collects the results.
    ///
    /// # Arguments
    ///
    /// * `snapshot` - The materialized sales for this run.
    /// * `window_days` - Size of the trailing window for the recent sales totals.
    /// * `reference_date` - The instant the window ends at (usually "now").
    ///
    /// # Returns
    ///
    /// A `Result` containing the `SalesSummary` or an `AnalyticsError`. Reports that
    /// need at least one record are recorded as `None` when the snapshot is empty.
    #[tracing::instrument(name = "sales_summary", skip(self, snapshot))]
    pub fn summarize(
        &self,
        snapshot: &SalesSnapshot,
        window_days: u32,
        reference_date: DateTime<Utc>,
    ) -> Result<SalesSummary, AnalyticsError> {
        let recent_sales = self.total_sales_last_n_days(snapshot, window_days, reference_date);

        let highest_sale = absent_if_empty(self.highest_single_sale(snapshot))?;
        let best_selling_product = absent_if_empty(self.best_selling_product_by_count(snapshot))?;

        Ok(SalesSummary {
            reference_date,
            window_days,
            recent_sales,
            highest_sale,
            best_selling_product,
            top_grossing_store: self.top_grossing_store(snapshot)?,
            highest_margin_brand: self.highest_margin_brand(snapshot)?,
            best_sellers_by_store: self.best_selling_product_per_store(snapshot)?,
        })
    }

    /// Counts and sums the sales dated on or after `reference_date - days`.
    pub fn total_sales_last_n_days(
        &self,
        snapshot: &SalesSnapshot,
        days: u32,
        reference_date: DateTime<Utc>,
    ) -> SalesTotals {
        // A window reaching past the earliest representable date covers every sale.
        let cutoff = reference_date
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let totals = snapshot
            .sales()
            .iter()
            .filter(|s| s.date >= cutoff)
            .fold(SalesTotals::default(), |acc, s| SalesTotals {
                count: acc.count + 1,
                amount: acc.amount + s.total_amount,
            });

        tracing::debug!(%cutoff, count = totals.count, amount = %totals.amount, "Recent sales totals.");
        totals
    }

    /// The sale with the largest total. The earliest sale in input order wins ties.
    pub fn highest_single_sale(
        &self,
        snapshot: &SalesSnapshot,
    ) -> Result<HighestSale, AnalyticsError> {
        let mut best: Option<&Sale> = None;
        for sale in snapshot.sales() {
            match best {
                Some(b) if sale.total_amount <= b.total_amount => {}
                _ => best = Some(sale),
            }
        }

        let sale = best.ok_or(AnalyticsError::EmptyInput("sales"))?;
        Ok(HighestSale {
            sale_id: sale.id,
            date: sale.date,
            amount: sale.total_amount,
        })
    }

    /// The product that appears in the most line items.
    ///
    /// Each line item counts once regardless of its quantity.
    pub fn best_selling_product_by_count(
        &self,
        snapshot: &SalesSnapshot,
    ) -> Result<ProductCount, AnalyticsError> {
        let mut tally: Tally<i64, usize> = Tally::new();
        for item in snapshot.sales().iter().flat_map(|s| &s.line_items) {
            tally.add(item.product_id, 1);
        }

        let &(product_id, line_items) = tally
            .leader()
            .ok_or(AnalyticsError::EmptyInput("line items"))?;
        let product = lookup_product(snapshot, product_id)?;

        tracing::debug!(product = %product.name, line_items, "Best-selling product by line items.");
        Ok(ProductCount {
            product_id,
            name: product.name.clone(),
            line_items,
        })
    }

    /// The store (grouped by name) with the highest summed sale totals.
    pub fn top_grossing_store(
        &self,
        snapshot: &SalesSnapshot,
    ) -> Result<Option<StoreTotal>, AnalyticsError> {
        let mut tally: Tally<&str, Decimal> = Tally::new();
        for sale in snapshot.sales() {
            tally.add(store_name(snapshot, sale)?, sale.total_amount);
        }

        Ok(tally.leader().map(|&(name, amount)| StoreTotal {
            name: name.to_string(),
            amount,
        }))
    }

    /// The brand with the highest sum of `quantity * unit_cost` over its line items.
    ///
    /// The unit cost is the catalog cost of the product, not the sale price, so
    /// this ranks brands by cost volume rather than by profit.
    pub fn highest_margin_brand(
        &self,
        snapshot: &SalesSnapshot,
    ) -> Result<Option<BrandMargin>, AnalyticsError> {
        let mut tally: Tally<i64, Decimal> = Tally::new();
        for item in snapshot.sales().iter().flat_map(|s| &s.line_items) {
            let product = lookup_product(snapshot, item.product_id)?;
            tally.add(product.brand_id, Decimal::from(item.quantity) * product.unit_cost);
        }

        let Some(&(brand_id, margin)) = tally.leader() else {
            return Ok(None);
        };
        let brand = snapshot
            .brand(brand_id)
            .ok_or_else(|| AnalyticsError::MissingReference(format!("brand {brand_id}")))?;

        tracing::debug!(brand = %brand.name, %margin, "Highest margin brand.");
        Ok(Some(BrandMargin {
            brand_id,
            name: brand.name.clone(),
            margin,
        }))
    }

    /// For each store (grouped by name, in first-seen order), the product
    /// (grouped by name) with the highest summed quantity.
    pub fn best_selling_product_per_store(
        &self,
        snapshot: &SalesSnapshot,
    ) -> Result<Vec<StoreBestSeller>, AnalyticsError> {
        let named: Vec<(&str, &Sale)> = snapshot
            .sales()
            .iter()
            .map(|sale| Ok((store_name(snapshot, sale)?, sale)))
            .collect::<Result<_, AnalyticsError>>()?;

        group_stable(&named, |&(name, _)| name)
            .into_iter()
            .map(|(store, sales)| {
                let mut tally: Tally<&str, i64> = Tally::new();
                for item in sales.iter().flat_map(|(_, sale)| &sale.line_items) {
                    let product = lookup_product(snapshot, item.product_id)?;
                    tally.add(product.name.as_str(), i64::from(item.quantity));
                }

                Ok::<_, AnalyticsError>(StoreBestSeller {
                    store: store.to_string(),
                    product: tally.leader().map(|&(name, quantity)| ProductQuantity {
                        name: name.to_string(),
                        quantity,
                    }),
                })
            })
            .collect()
    }
}

fn store_name<'a>(snapshot: &'a SalesSnapshot, sale: &Sale) -> Result<&'a str, AnalyticsError> {
    snapshot
        .store(sale.store_id)
        .map(|s| s.name.as_str())
        .ok_or_else(|| AnalyticsError::MissingReference(format!("store {}", sale.store_id)))
}

fn lookup_product(snapshot: &SalesSnapshot, id: i64) -> Result<&Product, AnalyticsError> {
    snapshot
        .product(id)
        .ok_or_else(|| AnalyticsError::MissingReference(format!("product {id}")))
}

/// Maps `EmptyInput` to `None` and passes every other error through.
fn absent_if_empty<T>(result: Result<T, AnalyticsError>) -> Result<Option<T>, AnalyticsError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(AnalyticsError::EmptyInput(what)) => {
            tracing::debug!("No {what} in the snapshot; report left empty.");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
