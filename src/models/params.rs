use serde::{Deserialize, Serialize};

use crate::error::StandError;

/// Height imputation method for trees without a measured height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightMethod {
    /// Fixed DBH-height model; needs stand age and basal area (or plot area).
    Parametric,
    /// Plot-local log-linear fit `ln(HT) = b0 + b1/DBH` over measured trees.
    Regression,
}

impl std::fmt::Display for HeightMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeightMethod::Parametric => write!(f, "parametric"),
            HeightMethod::Regression => write!(f, "regression"),
        }
    }
}

impl std::str::FromStr for HeightMethod {
    type Err = StandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parametric" | "model" | "1" => Ok(HeightMethod::Parametric),
            "regression" | "fit" | "2" => Ok(HeightMethod::Regression),
            _ => Err(StandError::ParseError(format!(
                "Unknown height method: '{s}'"
            ))),
        }
    }
}

/// A one-time thinning event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thinning {
    /// Stand age at which the thinning is applied (years)
    pub age: f64,
    /// Fraction of basal area removed, 0-1
    pub ba_fraction: f64,
}

impl Thinning {
    pub fn new(age: f64, ba_fraction: f64) -> Result<Self, StandError> {
        if !(0.0..=1.0).contains(&ba_fraction) {
            return Err(StandError::Validation(format!(
                "thinning intensity must be a fraction in 0.0..=1.0, got {ba_fraction}"
            )));
        }
        if age <= 0.0 {
            return Err(StandError::Validation(format!(
                "thinning age must be positive, got {age}"
            )));
        }
        Ok(Self { age, ba_fraction })
    }
}

/// Merchantability thresholds for the volume ratio model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MerchantableLimits {
    /// Minimum merchantable DBH (cm)
    pub min_dbh_cm: f64,
    /// Small-end top diameter limit (cm)
    pub top_diameter_cm: f64,
}

impl Default for MerchantableLimits {
    fn default() -> Self {
        Self {
            min_dbh_cm: 10.0,
            top_diameter_cm: 8.0,
        }
    }
}

/// Parameters driving a simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Final stand age, inclusive (years)
    pub final_age: f64,
    /// Optional one-time thinning event
    pub thinning: Option<Thinning>,
    /// Merchantability thresholds
    pub merchantable: MerchantableLimits,
    /// Height imputation method for tree-level input
    pub height_method: HeightMethod,
}
