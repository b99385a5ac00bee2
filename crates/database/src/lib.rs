//! # Sales Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL sales database. It is the read side that feeds the reporting engine.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate is an adapter that encapsulates all database-specific
//!   logic. It hands the rest of the application a fully validated `SalesSnapshot` and
//!   hides the underlying SQL.
//! - **Materialize Once:** Every table the reports need is read exactly once per run.
//!   Reports are then computed in memory, so the data source is never re-enumerated.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses a
//!   connection pool (`PgPool`); the five table reads run concurrently.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: A utility to apply database migrations, ensuring the schema is up-to-date.
//! - `SalesSource`: The data-access boundary the application depends on.
//! - `DbRepository`: The PostgreSQL implementation of `SalesSource`.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::{DbRepository, SalesSource};
