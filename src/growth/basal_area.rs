use crate::error::StandError;
use crate::models::BasalAreaModel;

fn require_positive(name: &str, value: f64) -> Result<(), StandError> {
    if value <= 0.0 {
        return Err(StandError::Domain(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(())
}

/// Predict standing basal area (m²/ha) from density and dominant height.
///
/// `BA = exp(c1 + c2*ln(N) + c3*ln(HDOM))`
pub fn predict_basal_area(n: f64, hdom: f64) -> Result<f64, StandError> {
    predict_basal_area_with(n, hdom, &BasalAreaModel::default())
}

pub fn predict_basal_area_with(
    n: f64,
    hdom: f64,
    model: &BasalAreaModel,
) -> Result<f64, StandError> {
    require_positive("N", n)?;
    require_positive("HDOM", hdom)?;
    Ok((model.c1 + model.c2 * n.ln() + model.c3 * hdom.ln()).exp())
}

/// Project basal area from one stand state to the next.
///
/// Uses the first-order form
/// `BA1 = BA0 * (1 + c2*(N1-N0)/N0 + c3*(HDOM1-HDOM0)/HDOM0)`,
/// a linear approximation of the log model's derivative rather than the
/// exact exponential solution.
pub fn project_basal_area(
    ba0: f64,
    n0: f64,
    n1: f64,
    hdom0: f64,
    hdom1: f64,
) -> Result<f64, StandError> {
    project_basal_area_with(ba0, n0, n1, hdom0, hdom1, &BasalAreaModel::default())
}

pub fn project_basal_area_with(
    ba0: f64,
    n0: f64,
    n1: f64,
    hdom0: f64,
    hdom1: f64,
    model: &BasalAreaModel,
) -> Result<f64, StandError> {
    require_positive("BA0", ba0)?;
    require_positive("N0", n0)?;
    require_positive("N1", n1)?;
    require_positive("HDOM0", hdom0)?;
    require_positive("HDOM1", hdom1)?;
    Ok(ba0 * (1.0 + model.c2 * (n1 - n0) / n0 + model.c3 * (hdom1 - hdom0) / hdom0))
}
