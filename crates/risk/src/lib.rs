//! # Crisk Portfolio Risk Aggregator
//!
//! This crate summarizes per-loan shock tables into portfolio-level risk
//! statistics across a configured grid of models and reference scenarios:
//! extreme shocks, signed totals, the negative total relative to the portfolio
//! size, and a tail-quantile shock akin to Value-at-Risk.
//!
//! All values are carried unrounded; any rounding for display is the
//! renderer's concern.

pub mod aggregator;
pub mod error;

// Re-export the key components to create a clean, public-facing API.
pub use aggregator::{top_shocks, SummaryRow};
pub use error::RiskError;
