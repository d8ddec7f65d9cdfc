//! Error types for drtrend.
//!
//! Structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for batch drivers
//!
//! Structural errors (bad intervals, too few time points) are surfaced
//! immediately; there is no retry logic anywhere because every failure in
//! this system is deterministic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for drtrend operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Smoother configuration errors.
    Config,
    /// Observation validation errors.
    Input,
    /// Model fitting and numerical errors.
    Fit,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Fit => write!(f, "fit"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for drtrend.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    // Input errors (20-29)
    #[error(
        "invalid interval at year {year}: lower={lower}, point={point}, upper={upper} \
         (expected lower <= point <= upper)"
    )]
    InvalidInterval {
        year: i32,
        lower: f64,
        point: f64,
        upper: f64,
    },

    #[error("observation at year {year} has non-finite values or values outside [0, 100]")]
    OutOfRange { year: i32 },

    #[error("observation at year {year} has a zero-width interval with an interior point estimate")]
    ZeroWidthInterval { year: i32 },

    // Fit errors (30-39)
    #[error(
        "insufficient data: {distinct_years} distinct time points, need at least 3 \
         for a quadratic fit"
    )]
    InsufficientData { distinct_years: usize },

    #[error("numerical instability detected: {0}")]
    NumericalInstability(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// Codes are grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Fit errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidInterval { .. } => 20,
            Error::OutOfRange { .. } => 21,
            Error::ZeroWidthInterval { .. } => 22,
            Error::InsufficientData { .. } => 30,
            Error::NumericalInstability(_) => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) => ErrorCategory::Config,
            Error::InvalidInterval { .. }
            | Error::OutOfRange { .. }
            | Error::ZeroWidthInterval { .. } => ErrorCategory::Input,
            Error::InsufficientData { .. } | Error::NumericalInstability(_) => ErrorCategory::Fit,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable.
    ///
    /// Fit and input errors are structural: retrying with the same data will
    /// fail the same way, so the caller must fix the input or skip the cohort.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) => true,
            Error::InvalidInterval { .. } => false,
            Error::OutOfRange { .. } => false,
            Error::ZeroWidthInterval { .. } => false,
            Error::InsufficientData { .. } => false,
            Error::NumericalInstability(_) => false,
            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }
}

/// A single failed item in a batch smoothing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchError {
    /// Identifier of the failed cohort (e.g. "AFG/new").
    pub item_id: String,
    /// Stable error code.
    pub code: u32,
    /// Error category.
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// Whether retrying could ever help.
    pub recoverable: bool,
}

/// Summary of batch operation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Total items attempted.
    pub total: usize,
    /// Number of successful items.
    pub succeeded: usize,
    /// Number of failed items.
    pub failed: usize,
    /// Whether all items succeeded.
    pub all_succeeded: bool,
    /// Whether any items succeeded.
    pub any_succeeded: bool,
}

/// Result of a batch operation that may have partial success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult<T> {
    /// Successfully completed items.
    pub succeeded: Vec<T>,
    /// Failed items with their errors.
    pub failed: Vec<BatchError>,
    /// Summary statistics.
    pub summary: BatchSummary,
}

impl<T> BatchResult<T> {
    /// Create a new batch result from succeeded and failed items.
    pub fn new(succeeded: Vec<T>, failed: Vec<BatchError>) -> Self {
        let total = succeeded.len() + failed.len();
        let succeeded_count = succeeded.len();
        let failed_count = failed.len();

        BatchResult {
            succeeded,
            failed,
            summary: BatchSummary {
                total,
                succeeded: succeeded_count,
                failed: failed_count,
                all_succeeded: failed_count == 0,
                any_succeeded: succeeded_count > 0,
            },
        }
    }

    /// Add a success to the batch result.
    pub fn add_success(&mut self, item: T) {
        self.succeeded.push(item);
        self.summary.succeeded += 1;
        self.summary.total += 1;
        self.summary.any_succeeded = true;
    }

    /// Add a failure to the batch result.
    pub fn add_failure(&mut self, item_id: impl Into<String>, error: &Error) {
        self.failed.push(BatchError {
            item_id: item_id.into(),
            code: error.code(),
            category: error.category(),
            message: error.to_string(),
            recoverable: error.is_recoverable(),
        });
        self.summary.failed += 1;
        self.summary.total += 1;
        self.summary.all_succeeded = false;
    }
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}
