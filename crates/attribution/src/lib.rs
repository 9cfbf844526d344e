//! # Crisk Shock Attribution Engine
//!
//! This crate maps credit exposures onto market-share shocks. Given a loan
//! portfolio (region, sector, amount per loan) it derives, for a chosen model,
//! reference scenario and target year, the amount-scaled shock each loan is
//! exposed to:
//!
//! ```text
//! shock = amount × (1 − recovery_rate) × elasticity × market_share_shock
//! ```
//!
//! Raw shock ratios are clamped at 1.0 — a loan cannot lose more than its
//! full exposure.

pub mod engine;
pub mod error;
pub mod portfolio;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{evaluate_portfolio, single_shock};
pub use error::AttributionError;
pub use portfolio::{load_portfolio, parse_portfolio};
