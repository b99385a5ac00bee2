use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Sale {sale_id} references unknown store {store_id}")]
    UnknownStore { sale_id: i64, store_id: i64 },

    #[error("Sale {sale_id} has a line item for unknown product {product_id}")]
    UnknownProduct { sale_id: i64, product_id: i64 },

    #[error("Product {product_id} references unknown brand {brand_id}")]
    UnknownBrand { product_id: i64, brand_id: i64 },

    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: i64 },

    #[error("Line item {line_item_id} belongs to sale {line_item_sale_id} but was attached to sale {sale_id}")]
    ForeignLineItem {
        sale_id: i64,
        line_item_id: i64,
        line_item_sale_id: i64,
    },
}
