//! Body metrics shown next to the workout log.

use crate::{Error, Result};
use std::fmt;

/// Lower and upper bound of the BMI gauge
const GAUGE_MIN: f64 = 10.0;
const GAUGE_MAX: f64 = 40.0;

/// Body-mass index: weight (kg) / height (m)²
pub fn bmi(weight_kg: f64, height_m: f64) -> Result<f64> {
    if !(weight_kg.is_finite() && weight_kg > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "weight must be positive, got {} kg",
            weight_kg
        )));
    }
    if !(height_m.is_finite() && height_m > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "height must be positive, got {} m",
            height_m
        )));
    }
    Ok(weight_kg / (height_m * height_m))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Optimal,
    Overweight,
    Critical,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Optimal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Critical
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BmiCategory::Underweight => "UNDERWEIGHT",
            BmiCategory::Optimal => "OPTIMAL",
            BmiCategory::Overweight => "OVERWEIGHT",
            BmiCategory::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

/// Position of `bmi` on a 10–40 gauge, as a percentage clamped to 0–100
pub fn gauge_percent(bmi: f64) -> f64 {
    ((bmi - GAUGE_MIN) / (GAUGE_MAX - GAUGE_MIN) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi() {
        let value = bmi(75.0, 1.75).unwrap();
        assert!((value - 24.489).abs() < 0.001);
        assert_eq!(BmiCategory::from_bmi(value), BmiCategory::Optimal);
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Optimal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Critical);
        assert_eq!(BmiCategory::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn test_gauge_is_clamped() {
        assert_eq!(gauge_percent(10.0), 0.0);
        assert_eq!(gauge_percent(25.0), 50.0);
        assert_eq!(gauge_percent(40.0), 100.0);
        assert_eq!(gauge_percent(5.0), 0.0);
        assert_eq!(gauge_percent(55.0), 100.0);
    }

    #[test]
    fn test_rejects_non_positive_input() {
        assert!(matches!(bmi(0.0, 1.75), Err(Error::InvalidParameter(_))));
        assert!(matches!(bmi(75.0, -1.0), Err(Error::InvalidParameter(_))));
    }
}
