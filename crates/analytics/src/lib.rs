//! # Sales Analytics Engine
//!
//! This crate computes the aggregate sales reports: recent sales totals, the
//! highest single sale, the best-selling product, the top-grossing store, the
//! highest-margin brand and the best-selling product per store.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `SalesReportEngine` is a stateless calculator. It takes
//!   a materialized `SalesSnapshot` as input and produces report values as output.
//! - **Stable Grouping:** Every ranking keeps groups in first-seen order, so ties always
//!   resolve to the first key encountered in the input.
//!
//! ## Public API
//!
//! - `SalesReportEngine`: The main struct that contains the report operations.
//! - `SalesSummary`: The struct that holds every report for a single run.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
mod grouping;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::SalesReportEngine;
pub use error::AnalyticsError;
pub use report::{
    BrandMargin, HighestSale, ProductCount, ProductQuantity, SalesSummary, SalesTotals,
    StoreBestSeller, StoreTotal,
};
