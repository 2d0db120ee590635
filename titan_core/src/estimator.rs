//! Calorie estimation from the MET energy-expenditure formula.
//!
//! `kcal = (MET × 3.5 × body_mass_kg) / 200 × duration_minutes`
//!
//! Strength work has no measured duration, so it is approximated as a fixed
//! number of minutes per set, stretched by a penalty factor for high-rep sets
//! (longer time under tension).

use crate::config::EstimatorConfig;
use crate::{Error, Result};

/// Oxygen uptake of one MET, in ml/kg/min
const ML_O2_PER_MET: f64 = 3.5;

/// Converts ml O2 × kg into kcal/min
const KCAL_DIVISOR: f64 = 200.0;

/// Calorie estimator bound to a formula configuration
#[derive(Clone, Debug, Default)]
pub struct CalorieEstimator {
    config: EstimatorConfig,
}

impl CalorieEstimator {
    /// Build an estimator, rejecting configurations that could produce
    /// negative or meaningless durations.
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Nominal duration of `sets` × `reps` in minutes, including the high-rep penalty
    pub fn duration_minutes(&self, sets: u32, reps: u32) -> f64 {
        let base = f64::from(sets) * self.config.minutes_per_set;
        if reps > self.config.high_rep_threshold {
            base * self.config.high_rep_factor
        } else {
            base
        }
    }

    /// Estimate kilocalories burned, rounded to one decimal place.
    pub fn estimate(&self, met: f64, body_mass_kg: f64, sets: u32, reps: u32) -> Result<f64> {
        if !(met.is_finite() && met > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "MET must be positive, got {}",
                met
            )));
        }
        if !(body_mass_kg.is_finite() && body_mass_kg > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "body mass must be positive, got {} kg",
                body_mass_kg
            )));
        }
        if sets == 0 {
            return Err(Error::InvalidParameter("sets must be at least 1".into()));
        }
        if reps == 0 {
            return Err(Error::InvalidParameter("reps must be at least 1".into()));
        }

        let kcal_per_minute = met * ML_O2_PER_MET * body_mass_kg / KCAL_DIVISOR;
        let kcal = kcal_per_minute * self.duration_minutes(sets, reps);
        if !kcal.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "estimate overflowed for MET {} at {} kg",
                met, body_mass_kg
            )));
        }

        tracing::trace!(met, body_mass_kg, sets, reps, kcal, "estimated burn");
        Ok(round_to_tenth(kcal))
    }
}

/// Estimate with the default formula configuration
pub fn estimate_calories(met: f64, body_mass_kg: f64, sets: u32, reps: u32) -> Result<f64> {
    CalorieEstimator::default().estimate(met, body_mass_kg, sets, reps)
}

/// Halves go to the even neighbour, so 26.25 becomes 26.2
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
