//! Recipe Types - Pure type definitions shared across the catalog
//!
//! This crate contains only serde data types with no async runtime
//! dependencies, so both the core and the server can depend on it.

pub mod recipe;

pub use recipe::*;
