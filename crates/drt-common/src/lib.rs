//! Shared types, errors, and batch results for drtrend.

pub mod error;
pub mod types;

pub use error::{BatchError, BatchResult, BatchSummary, Error, ErrorCategory, Result};
pub use types::{CohortKey, Observation, SmoothedPoint, SmoothedSeries};
