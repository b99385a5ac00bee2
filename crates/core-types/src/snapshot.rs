use crate::error::CoreError;
use crate::structs::{Brand, Product, Sale, Store};
use std::collections::HashMap;

/// A read-only, fully materialized view of the sales data for one report run.
///
/// Sales keep the order in which they were loaded, which is what the
/// "first encountered" tie-break rules of the reports rely on. Stores,
/// products and brands are indexed by id so that every reference held by a
/// sale or line item is an explicit lookup.
///
/// Construction validates referential integrity, so once a snapshot exists
/// every lookup made on behalf of one of its sales succeeds.
#[derive(Debug, Clone, Default)]
pub struct SalesSnapshot {
    sales: Vec<Sale>,
    stores: HashMap<i64, Store>,
    products: HashMap<i64, Product>,
    brands: HashMap<i64, Brand>,
}

impl SalesSnapshot {
    /// Builds a snapshot, rejecting any dangling reference or duplicate id.
    ///
    /// Inputs are checked in the order given, so the first violation in
    /// source order is the one reported.
    pub fn new(
        stores: Vec<Store>,
        brands: Vec<Brand>,
        products: Vec<Product>,
        sales: Vec<Sale>,
    ) -> Result<Self, CoreError> {
        let brands = index_by_id(brands, "brand", |b| b.id)?;

        for product in &products {
            if !brands.contains_key(&product.brand_id) {
                return Err(CoreError::UnknownBrand {
                    product_id: product.id,
                    brand_id: product.brand_id,
                });
            }
        }

        let stores = index_by_id(stores, "store", |s| s.id)?;
        let products = index_by_id(products, "product", |p| p.id)?;

        for sale in &sales {
            if !stores.contains_key(&sale.store_id) {
                return Err(CoreError::UnknownStore {
                    sale_id: sale.id,
                    store_id: sale.store_id,
                });
            }

            for item in &sale.line_items {
                if item.sale_id != sale.id {
                    return Err(CoreError::ForeignLineItem {
                        sale_id: sale.id,
                        line_item_id: item.id,
                        line_item_sale_id: item.sale_id,
                    });
                }
                if !products.contains_key(&item.product_id) {
                    return Err(CoreError::UnknownProduct {
                        sale_id: sale.id,
                        product_id: item.product_id,
                    });
                }
            }
        }

        tracing::debug!(
            sales = sales.len(),
            stores = stores.len(),
            products = products.len(),
            brands = brands.len(),
            "Sales snapshot validated."
        );

        Ok(Self {
            sales,
            stores,
            products,
            brands,
        })
    }

    /// All sales, in source order.
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    /// Total number of line items across every sale.
    pub fn line_item_count(&self) -> usize {
        self.sales.iter().map(|s| s.line_items.len()).sum()
    }

    pub fn store(&self, id: i64) -> Option<&Store> {
        self.stores.get(&id)
    }

    pub fn product(&self, id: i64) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn brand(&self, id: i64) -> Option<&Brand> {
        self.brands.get(&id)
    }
}

fn index_by_id<T>(
    items: Vec<T>,
    kind: &'static str,
    id_of: impl Fn(&T) -> i64,
) -> Result<HashMap<i64, T>, CoreError> {
    let mut index = HashMap::with_capacity(items.len());
    for item in items {
        let id = id_of(&item);
        if index.insert(id, item).is_some() {
            return Err(CoreError::DuplicateId { kind, id });
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::SaleLineItem;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn catalog() -> (Vec<Store>, Vec<Brand>, Vec<Product>) {
        let stores = vec![Store { id: 1, name: "Centro".to_string() }];
        let brands = vec![Brand { id: 10, name: "Acme".to_string() }];
        let products = vec![Product {
            id: 100,
            name: "Widget".to_string(),
            brand_id: 10,
            unit_cost: dec!(4.50),
        }];
        (stores, brands, products)
    }

    fn sale(id: i64, store_id: i64, items: Vec<SaleLineItem>) -> Sale {
        Sale {
            id,
            store_id,
            date: Utc.with_ymd_and_hms(2024, 2, 16, 12, 0, 0).unwrap(),
            total_amount: dec!(9),
            line_items: items,
        }
    }

    fn item(id: i64, sale_id: i64, product_id: i64) -> SaleLineItem {
        SaleLineItem {
            id,
            sale_id,
            product_id,
            quantity: 2,
            unit_cost: dec!(4.50),
        }
    }

    #[test]
    fn builds_a_consistent_snapshot_and_resolves_references() {
        let (stores, brands, products) = catalog();
        let snapshot =
            SalesSnapshot::new(stores, brands, products, vec![sale(1, 1, vec![item(1, 1, 100)])])
                .unwrap();

        assert_eq!(snapshot.sales().len(), 1);
        assert_eq!(snapshot.line_item_count(), 1);
        assert_eq!(snapshot.store(1).unwrap().name, "Centro");
        assert_eq!(snapshot.product(100).unwrap().brand_id, 10);
        assert_eq!(snapshot.brand(10).unwrap().name, "Acme");
        assert!(snapshot.store(2).is_none());
    }

    #[test]
    fn empty_snapshot_is_valid() {
        let snapshot = SalesSnapshot::new(vec![], vec![], vec![], vec![]).unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.line_item_count(), 0);
    }

    #[test]
    fn rejects_sale_with_unknown_store() {
        let (stores, brands, products) = catalog();
        let err = SalesSnapshot::new(stores, brands, products, vec![sale(7, 99, vec![])])
            .unwrap_err();
        assert_eq!(err, CoreError::UnknownStore { sale_id: 7, store_id: 99 });
    }

    #[test]
    fn rejects_line_item_with_unknown_product() {
        let (stores, brands, products) = catalog();
        let err = SalesSnapshot::new(
            stores,
            brands,
            products,
            vec![sale(3, 1, vec![item(1, 3, 555)])],
        )
        .unwrap_err();
        assert_eq!(err, CoreError::UnknownProduct { sale_id: 3, product_id: 555 });
    }

    #[test]
    fn rejects_product_with_unknown_brand() {
        let (stores, brands, mut products) = catalog();
        products[0].brand_id = 42;
        let err = SalesSnapshot::new(stores, brands, products, vec![]).unwrap_err();
        assert_eq!(err, CoreError::UnknownBrand { product_id: 100, brand_id: 42 });
    }

    #[test]
    fn reports_the_first_product_with_an_unknown_brand() {
        let (stores, brands, _) = catalog();
        let products = (1..=20)
            .map(|id| Product {
                id,
                name: format!("Orphan {id}"),
                brand_id: 1000 + id,
                unit_cost: dec!(1),
            })
            .collect();

        let err = SalesSnapshot::new(stores, brands, products, vec![]).unwrap_err();
        assert_eq!(err, CoreError::UnknownBrand { product_id: 1, brand_id: 1001 });
    }

    #[test]
    fn rejects_duplicate_ids() {
        let (mut stores, brands, products) = catalog();
        stores.push(Store { id: 1, name: "Centro Bis".to_string() });
        let err = SalesSnapshot::new(stores, brands, products, vec![]).unwrap_err();
        assert_eq!(err, CoreError::DuplicateId { kind: "store", id: 1 });

        let (stores, mut brands, products) = catalog();
        brands.push(Brand { id: 10, name: "Acme Again".to_string() });
        let err = SalesSnapshot::new(stores, brands, products, vec![]).unwrap_err();
        assert_eq!(err, CoreError::DuplicateId { kind: "brand", id: 10 });

        let (stores, brands, mut products) = catalog();
        products.push(products[0].clone());
        let err = SalesSnapshot::new(stores, brands, products, vec![]).unwrap_err();
        assert_eq!(err, CoreError::DuplicateId { kind: "product", id: 100 });
    }

    #[test]
    fn rejects_line_item_attached_to_the_wrong_sale() {
        let (stores, brands, products) = catalog();
        let err = SalesSnapshot::new(
            stores,
            brands,
            products,
            vec![sale(1, 1, vec![item(5, 2, 100)])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CoreError::ForeignLineItem {
                sale_id: 1,
                line_item_id: 5,
                line_item_sale_id: 2
            }
        );
    }
}
