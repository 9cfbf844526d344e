//! # Crisk Core Types
//!
//! This crate defines the shared data structures for the climate-risk pipeline.
//! It is the Layer 0 of the workspace: every other crate depends on it, and it
//! depends on nothing but `serde` and `thiserror`.
//!
//! The central type is the [`Panel`], an immutable, ordered collection of
//! scenario observations indexed by (model, scenario, region, variable, year).
//! Derived results (market shares, shocks) are [`DerivedSeries`] values whose
//! points carry `Option<f64>` so that an undefined division is a first-class
//! value rather than an IEEE NaN smuggled through the pipeline.

pub mod derived;
pub mod error;
pub mod loan;
pub mod panel;
pub mod variable;

// Re-export the core types to provide a clean public API.
pub use derived::{DerivedPoint, DerivedSeries};
pub use error::CoreError;
pub use loan::{AnnotatedLoan, Loan};
pub use panel::{Observation, Panel, PanelFilter};
pub use variable::base_sector;
