//! # Crisk Panel Store
//!
//! This crate owns the loaded scenario panel and answers two kinds of request:
//!
//! - **Enumeration** (`store` module): which models, scenarios, regions and
//!   energy variables exist, with the deterministic length-ascending ordering
//!   convention used throughout the pipeline.
//! - **Resolution and filtering** (`query` module): expanding symbolic
//!   selectors (`"all"`, `"sample"`, comma-separated literals) into concrete
//!   dimension values and executing a conjunctive multi-dimensional filter.
//!
//! The store is read-only after construction, so it can be shared by reference
//! across callers without any locking.

pub mod error;
pub mod query;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use error::{QueryError, StoreError};
pub use query::{QueryResolver, Selector};
pub use store::PanelStore;
