use serde::{Deserialize, Serialize};

/// A single tree measurement record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Unique tree identifier within the plot
    pub id: u32,
    /// Diameter at breast height in centimeters
    pub dbh: f64,
    /// Total height in meters (missing heights may be imputed later)
    pub height: Option<f64>,
    /// Free-text field observation
    pub observation: Option<String>,
}

impl TreeRecord {
    /// Basal area of this stem in square meters.
    pub fn basal_area_m2(&self) -> f64 {
        std::f64::consts::FRAC_PI_4 * self.dbh.powi(2) * 1e-4
    }

    /// Validate tree measurements. Returns `StandError::Validation` on failure.
    pub fn validate(&self) -> Result<(), crate::error::StandError> {
        if self.dbh <= 0.0 {
            return Err(crate::error::StandError::Validation(format!(
                "Tree {}: DBH must be positive, got {}",
                self.id, self.dbh
            )));
        }
        if let Some(h) = self.height {
            if h <= 0.0 {
                return Err(crate::error::StandError::Validation(format!(
                    "Tree {}: height must be positive, got {}",
                    self.id, h
                )));
            }
        }
        Ok(())
    }
}

/// An inventory plot: an ordered collection of tree records sharing one
/// plot identity and one plot area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreePlot {
    /// Unique plot identifier
    pub plot_id: u32,
    /// Plot area in square meters
    pub area_m2: f64,
    /// Stand age in years, if known
    pub age: Option<f64>,
    /// Trees measured on this plot
    pub trees: Vec<TreeRecord>,
}

impl TreePlot {
    /// Expansion factor converting per-plot sums to per-hectare values.
    pub fn expansion_factor(&self) -> Result<f64, crate::error::StandError> {
        if self.area_m2 <= 0.0 {
            return Err(crate::error::StandError::DegenerateInput(format!(
                "Plot {}: area must be positive, got {}",
                self.plot_id, self.area_m2
            )));
        }
        Ok(10_000.0 / self.area_m2)
    }

    /// DBH vector in measurement order.
    pub fn dbh_values(&self) -> Vec<f64> {
        self.trees.iter().map(|t| t.dbh).collect()
    }

    /// Height vector in measurement order, `None` where unmeasured.
    pub fn height_values(&self) -> Vec<Option<f64>> {
        self.trees.iter().map(|t| t.height).collect()
    }

    /// Number of trees missing a height measurement.
    pub fn missing_heights(&self) -> usize {
        self.trees.iter().filter(|t| t.height.is_none()).count()
    }
}
