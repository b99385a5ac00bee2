pub mod error;
pub mod snapshot;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use snapshot::SalesSnapshot;
pub use structs::{Brand, Product, Sale, SaleLineItem, Store};
