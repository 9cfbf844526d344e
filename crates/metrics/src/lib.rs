//! # Crisk Market Metrics Engine
//!
//! This crate derives market shares and market-share shocks from scenario
//! sub-panels. It is a pure logic crate in the spirit of a stateless
//! calculator: panels in, derived series out, no knowledge of where the data
//! came from or where the results go.
//!
//! ## Conventions
//!
//! - **Base sector**: of the two variable paths in a share computation, the
//!   longer path is the child (numerator) and the shorter its base sector
//!   (denominator).
//! - **Baseline scenario**: of the two scenarios in a shock computation, the
//!   shorter name is the baseline. Ties break lexicographically. This is the
//!   named length-ascending tie-break used across the workspace, not
//!   incidental behavior.
//! - **Undefined divisions**: a zero denominator yields a `None` point value
//!   rather than an error, so multi-row computations never abort midway.

pub mod engine;
pub mod error;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{market_share_shocks, market_shares};
pub use error::MetricsError;
