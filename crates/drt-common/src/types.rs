//! Core records for survey observations and smoothed output series.
//!
//! These are strongly-typed replacements for the loosely-typed survey tables
//! the smoother consumes: one `Observation` per surveyed (year, cohort) cell,
//! one `SmoothedPoint` per predicted year.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifies one independently modeled cohort: an entity (e.g. a country)
/// crossed with a patient group (e.g. "new" vs "previously-treated").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CohortKey {
    /// Entity the series belongs to (country, territory, site).
    pub entity: String,
    /// Patient group label; groups are modeled independently.
    pub patient_group: String,
}

impl CohortKey {
    pub fn new(entity: impl Into<String>, patient_group: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            patient_group: patient_group.into(),
        }
    }
}

impl std::fmt::Display for CohortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.entity, self.patient_group)
    }
}

/// One surveyed data point: a point estimate with a 95% interval, all on the
/// percentage scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar year of the survey.
    pub year: i32,
    /// Point estimate, a percentage in [0, 100].
    pub point_estimate: f64,
    /// Lower 95% bound, `lower_bound <= point_estimate`.
    pub lower_bound: f64,
    /// Upper 95% bound, `point_estimate <= upper_bound`.
    pub upper_bound: f64,
}

impl Observation {
    pub fn new(year: i32, point_estimate: f64, lower_bound: f64, upper_bound: f64) -> Self {
        Self {
            year,
            point_estimate,
            lower_bound,
            upper_bound,
        }
    }

    /// Check that all values are finite percentages and the interval brackets
    /// the point estimate.
    pub fn validate(&self) -> Result<()> {
        let values = [self.point_estimate, self.lower_bound, self.upper_bound];
        if values.iter().any(|v| !v.is_finite()) || values.iter().any(|v| !(0.0..=100.0).contains(v))
        {
            return Err(Error::OutOfRange { year: self.year });
        }
        if self.lower_bound > self.point_estimate || self.point_estimate > self.upper_bound {
            return Err(Error::InvalidInterval {
                year: self.year,
                lower: self.lower_bound,
                point: self.point_estimate,
                upper: self.upper_bound,
            });
        }
        Ok(())
    }
}

/// One smoothed estimate: posterior-predictive mean and 95% credible bounds
/// on the percentage scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedPoint {
    pub year: i32,
    /// Sample mean across Monte Carlo draws.
    pub mean: f64,
    /// Empirical 2.5th percentile.
    pub lower: f64,
    /// Empirical 97.5th percentile.
    pub upper: f64,
}

/// A dense smoothed series, one point per target year, in target-year order.
///
/// Produced by Monte Carlo sampling, so two runs only agree when the smoother
/// was given an explicit seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SmoothedSeries {
    pub points: Vec<SmoothedPoint>,
}

impl SmoothedSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Look up the point for a given year.
    pub fn get(&self, year: i32) -> Option<&SmoothedPoint> {
        self.points.iter().find(|p| p.year == year)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SmoothedPoint> {
        self.points.iter()
    }
}
