use analytics::SalesSummary;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

const NOT_AVAILABLE: &str = "n/a";

/// Renders the summary as two tables: one row per report, then one row per store.
pub fn render_table(summary: &SalesSummary) -> String {
    let mut reports = Table::new();
    reports.load_preset(UTF8_FULL).set_header(vec!["Report", "Result"]);

    reports.add_row(vec![
        format!("Sales in the last {} days", summary.window_days),
        format!(
            "{} sales, total amount {}",
            summary.recent_sales.count, summary.recent_sales.amount
        ),
    ]);
    reports.add_row(vec![
        "Highest single sale".to_string(),
        summary.highest_sale.as_ref().map_or_else(na, |s| {
            format!("{} on {}", s.amount, s.date.format("%Y-%m-%d %H:%M:%S"))
        }),
    ]);
    reports.add_row(vec![
        "Best-selling product (line items)".to_string(),
        summary
            .best_selling_product
            .as_ref()
            .map_or_else(na, |p| format!("{} ({} line items)", p.name, p.line_items)),
    ]);
    reports.add_row(vec![
        "Top-grossing store".to_string(),
        summary
            .top_grossing_store
            .as_ref()
            .map_or_else(na, |s| format!("{} ({})", s.name, s.amount)),
    ]);
    reports.add_row(vec![
        "Highest margin brand".to_string(),
        summary
            .highest_margin_brand
            .as_ref()
            .map_or_else(na, |b| format!("{} ({})", b.name, b.margin)),
    ]);

    let mut per_store = Table::new();
    per_store
        .load_preset(UTF8_FULL)
        .set_header(vec!["Store", "Best-selling product", "Units sold"]);
    for entry in &summary.best_sellers_by_store {
        let (product, units) = match &entry.product {
            Some(p) => (p.name.clone(), p.quantity.to_string()),
            None => (na(), na()),
        };
        per_store.add_row(vec![entry.store.clone(), product, units]);
    }

    format!("{reports}\n{per_store}")
}

pub fn render_json(summary: &SalesSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}

fn na() -> String {
    NOT_AVAILABLE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{ProductQuantity, SalesTotals, StoreBestSeller, StoreTotal};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn summary() -> SalesSummary {
        SalesSummary {
            reference_date: Utc.with_ymd_and_hms(2024, 2, 19, 0, 0, 0).unwrap(),
            window_days: 30,
            recent_sales: SalesTotals { count: 3, amount: dec!(180) },
            highest_sale: None,
            best_selling_product: None,
            top_grossing_store: Some(StoreTotal { name: "Centro".to_string(), amount: dec!(130) }),
            highest_margin_brand: None,
            best_sellers_by_store: vec![
                StoreBestSeller {
                    store: "Centro".to_string(),
                    product: Some(ProductQuantity { name: "Widget".to_string(), quantity: 9 }),
                },
                StoreBestSeller { store: "Norte".to_string(), product: None },
            ],
        }
    }

    #[test]
    fn table_lists_every_report_and_store() {
        let out = render_table(&summary());

        assert!(out.contains("Sales in the last 30 days"));
        assert!(out.contains("3 sales, total amount 180"));
        assert!(out.contains("Centro (130)"));
        assert!(out.contains("Widget"));
        assert!(out.contains("Norte"));
        assert!(out.contains(NOT_AVAILABLE));
    }

    #[test]
    fn json_output_round_trips() {
        let json = render_json(&summary()).unwrap();
        let parsed: SalesSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, summary());
    }
}
