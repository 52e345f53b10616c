use serde::{Deserialize, Serialize};

use crate::error::StandError;
use crate::models::{HeightMethod, TreeRecord};
use crate::tree::aggregate::{aggregate_stand, dominant_height};
use crate::tree::height::{impute_heights, HeightFit, HeightModelSpec};

/// Minimum number of measured heights required before missing ones may be
/// imputed.
pub const MIN_MEASURED_HEIGHTS: usize = 10;

/// Plot-level state produced from raw tree vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotSummary {
    /// Basal area (m²/ha)
    pub ba: f64,
    /// Tree density (trees/ha)
    pub n: f64,
    /// Quadratic mean diameter (cm)
    pub qd: f64,
    /// Dominant height, top-quartile mean (m)
    pub hdom: f64,
    /// Completed tree table with every height populated
    pub trees: Vec<TreeRecord>,
    /// Regression fit, when the empirical height method was used
    pub height_fit: Option<HeightFit>,
}

/// Validate raw tree vectors, impute missing heights, and reduce the plot
/// to stand-level state.
pub fn prepare_tree_plot(
    ids: &[u32],
    dbh: &[f64],
    heights: &[Option<f64>],
    area_m2: f64,
    age: Option<f64>,
    method: HeightMethod,
) -> Result<PlotSummary, StandError> {
    if ids.len() != dbh.len() || dbh.len() != heights.len() {
        return Err(StandError::Validation(format!(
            "id, DBH and height vectors must have equal length, got {}, {}, {}",
            ids.len(),
            dbh.len(),
            heights.len()
        )));
    }
    if ids.is_empty() {
        return Err(StandError::Validation("empty tree table".to_string()));
    }

    let missing = heights.iter().filter(|h| h.is_none()).count();
    let completed = if missing > 0 {
        let measured = heights.len() - missing;
        if measured < MIN_MEASURED_HEIGHTS {
            return Err(StandError::InsufficientData(format!(
                "imputation needs at least {MIN_MEASURED_HEIGHTS} measured heights, got {measured}"
            )));
        }
        let spec = match method {
            HeightMethod::Parametric => HeightModelSpec::Parametric {
                age,
                basal_area: None,
                area_m2: Some(area_m2),
            },
            HeightMethod::Regression => HeightModelSpec::Regression,
        };
        impute_heights(dbh, heights, &spec)?
    } else {
        let full: Vec<f64> = heights.iter().map(|h| h.unwrap()).collect();
        crate::tree::height::ImputedHeights {
            heights: full,
            fit: None,
        }
    };

    let triple = aggregate_stand(dbh, area_m2)?;
    let hdom = dominant_height(&completed.heights)?;

    let trees = ids
        .iter()
        .zip(dbh)
        .zip(&completed.heights)
        .map(|((&id, &dbh), &height)| TreeRecord {
            id,
            dbh,
            height: Some(height),
            observation: None,
        })
        .collect();

    Ok(PlotSummary {
        ba: triple.ba,
        n: triple.n,
        qd: triple.qd,
        hdom,
        trees,
        height_fit: completed.fit,
    })
}
