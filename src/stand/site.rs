use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StandError;
use crate::models::SiteCurve;
use crate::stand::algebra::Var;

/// Which member of {HDOM, SI, AGE} a solve produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteVariable {
    DominantHeight,
    SiteIndex,
    Age,
}

/// A completed {HDOM, SI, AGE} triple.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SiteTriple {
    /// Dominant height (m)
    pub hdom: f64,
    /// Site index at the reference age (m)
    pub si: f64,
    /// Stand age (years)
    pub age: f64,
    /// The variable that was solved for; `None` when all three were given
    pub solved_for: Option<SiteVariable>,
}

const AGE_SCAN_MIN: f64 = 1.0;
const AGE_SCAN_MAX: f64 = 100.0;
const AGE_SCAN_STEP: f64 = 0.01;

/// Dominant height at `age` for a stand of site index `si`.
pub fn dominant_height_at(si: f64, age: f64, curve: &SiteCurve) -> f64 {
    let numer = 1.0 - (curve.a1 * age).exp();
    let denom = 1.0 - (curve.a1 * curve.reference_age).exp();
    si * (numer / denom).powf(curve.a2)
}

/// Site index implied by a dominant height observed at `age`.
pub fn site_index_at(hdom: f64, age: f64, curve: &SiteCurve) -> f64 {
    let numer = 1.0 - (curve.a1 * age).exp();
    let denom = 1.0 - (curve.a1 * curve.reference_age).exp();
    hdom / (numer / denom).powf(curve.a2)
}

/// Numeric inverse of the site curve for age. The curve has no closed form
/// in AGE, so scan [1, 100] years at 0.01 resolution and keep the age with
/// the smallest absolute height error. Ties go to the smallest age.
fn age_from_height(hdom: f64, si: f64, curve: &SiteCurve) -> f64 {
    let steps = ((AGE_SCAN_MAX - AGE_SCAN_MIN) / AGE_SCAN_STEP).round() as usize;
    let mut best_age = AGE_SCAN_MIN;
    let mut best_err = f64::INFINITY;
    for i in 0..=steps {
        let age = AGE_SCAN_MIN + i as f64 * AGE_SCAN_STEP;
        let err = (hdom - dominant_height_at(si, age, curve)).abs();
        if err < best_err {
            best_err = err;
            best_age = age;
        }
    }
    best_age
}

/// Complete the missing one of {HDOM, SI, AGE} with the default site curve.
pub fn solve_site_triple(hdom: Var, si: Var, age: Var) -> Result<SiteTriple, StandError> {
    solve_site_triple_with(hdom, si, age, &SiteCurve::default())
}

/// Complete the missing one of {HDOM, SI, AGE}.
///
/// HDOM and SI have closed forms; AGE falls back to a bounded grid scan.
/// Fewer than two knowns is an error; a fully known triple is returned
/// unchanged with an observable warning.
pub fn solve_site_triple_with(
    hdom: Var,
    si: Var,
    age: Var,
    curve: &SiteCurve,
) -> Result<SiteTriple, StandError> {
    let positive = |name: &str, v: f64| -> Result<f64, StandError> {
        if v <= 0.0 {
            return Err(StandError::Domain(format!(
                "{name} must be positive, got {v}"
            )));
        }
        Ok(v)
    };

    match (hdom, si, age) {
        (Var::Unknown, Var::Known(si), Var::Known(age)) => {
            positive("SI", si)?;
            positive("AGE", age)?;
            Ok(SiteTriple {
                hdom: dominant_height_at(si, age, curve),
                si,
                age,
                solved_for: Some(SiteVariable::DominantHeight),
            })
        }
        (Var::Known(hdom), Var::Unknown, Var::Known(age)) => {
            positive("HDOM", hdom)?;
            positive("AGE", age)?;
            Ok(SiteTriple {
                hdom,
                si: site_index_at(hdom, age, curve),
                age,
                solved_for: Some(SiteVariable::SiteIndex),
            })
        }
        (Var::Known(hdom), Var::Known(si), Var::Unknown) => {
            positive("HDOM", hdom)?;
            positive("SI", si)?;
            Ok(SiteTriple {
                hdom,
                si,
                age: age_from_height(hdom, si, curve),
                solved_for: Some(SiteVariable::Age),
            })
        }
        (Var::Known(hdom), Var::Known(si), Var::Known(age)) => {
            warn!(hdom, si, age, "HDOM, SI and AGE all given; nothing to solve");
            Ok(SiteTriple {
                hdom,
                si,
                age,
                solved_for: None,
            })
        }
        _ => Err(StandError::InsufficientInput(
            "need at least two of HDOM, SI, AGE to complete the site triple".to_string(),
        )),
    }
}
