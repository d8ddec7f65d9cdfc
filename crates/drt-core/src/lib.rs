//! drtrend core: Bayesian trend smoothing for sparse prevalence series.
//!
//! Given a short series of surveyed proportions with 95% intervals, the
//! smoother fits a quadratic regression in logit space by closed-form
//! conjugate updating and propagates posterior uncertainty to the percentage
//! scale by Monte Carlo sampling. Each (entity, patient-group) cohort is an
//! independent, single-shot computation with no shared state.

pub mod config;
pub mod smoother;

pub use config::SmootherConfig;
pub use smoother::{fit_group, predict, smooth_all, smooth_cohort, DesignPoint, Posterior};
