use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::StandError;
use crate::models::ParametricHeightModel;
use crate::tree::aggregate::aggregate_stand;

/// Height model to apply when filling missing tree heights.
#[derive(Debug, Clone)]
pub enum HeightModelSpec {
    /// Fixed regional DBH-height model. Needs the stand age and either the
    /// plot basal area or the plot area to derive it from.
    Parametric {
        age: Option<f64>,
        basal_area: Option<f64>,
        area_m2: Option<f64>,
    },
    /// Plot-local log-linear fit `ln(HT) = b0 + b1/DBH` over measured trees.
    Regression,
}

/// Fitted coefficients of the local height regression.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeightFit {
    pub b0: f64,
    pub b1: f64,
    pub r_squared: f64,
}

/// Result of height imputation: the completed vector, plus the regression
/// fit when the empirical method was used.
#[derive(Debug, Clone)]
pub struct ImputedHeights {
    pub heights: Vec<f64>,
    pub fit: Option<HeightFit>,
}

/// Fill missing tree heights.
///
/// Measured heights are always retained; only `None` entries are replaced
/// by model estimates. DBH must be fully populated and positive.
pub fn impute_heights(
    dbh: &[f64],
    heights: &[Option<f64>],
    spec: &HeightModelSpec,
) -> Result<ImputedHeights, StandError> {
    if dbh.len() != heights.len() {
        return Err(StandError::Validation(format!(
            "DBH and height vectors differ in length ({} vs {})",
            dbh.len(),
            heights.len()
        )));
    }
    for (i, &d) in dbh.iter().enumerate() {
        if d <= 0.0 {
            return Err(StandError::Domain(format!(
                "DBH must be positive, tree index {i} has {d}"
            )));
        }
    }

    match spec {
        HeightModelSpec::Parametric {
            age,
            basal_area,
            area_m2,
        } => impute_parametric(dbh, heights, *age, *basal_area, *area_m2),
        HeightModelSpec::Regression => impute_regression(dbh, heights),
    }
}

fn impute_parametric(
    dbh: &[f64],
    heights: &[Option<f64>],
    age: Option<f64>,
    basal_area: Option<f64>,
    area_m2: Option<f64>,
) -> Result<ImputedHeights, StandError> {
    let age = age.ok_or_else(|| {
        StandError::InsufficientInput(
            "parametric height model needs the stand age".to_string(),
        )
    })?;
    let ba = match (basal_area, area_m2) {
        (Some(ba), _) => ba,
        (None, Some(area)) => aggregate_stand(dbh, area)?.ba,
        (None, None) => {
            return Err(StandError::InsufficientInput(
                "parametric height model needs basal area or plot area".to_string(),
            ))
        }
    };
    if age <= 0.0 || ba <= 0.0 {
        return Err(StandError::Domain(format!(
            "age and basal area must be positive, got age {age}, BA {ba}"
        )));
    }

    let model = ParametricHeightModel::default();
    let completed = dbh
        .iter()
        .zip(heights)
        .map(|(&d, &h)| {
            h.unwrap_or_else(|| {
                (model.a1 + model.a2 * d.powf(model.a3) + age.powf(model.a4) + ba.powf(model.a5))
                    .exp()
            })
        })
        .collect();

    Ok(ImputedHeights {
        heights: completed,
        fit: None,
    })
}

fn impute_regression(dbh: &[f64], heights: &[Option<f64>]) -> Result<ImputedHeights, StandError> {
    // Fit over measured trees only, on the transformed scale
    let (xs, ys): (Vec<f64>, Vec<f64>) = dbh
        .iter()
        .zip(heights)
        .filter_map(|(&d, &h)| h.map(|h| (1.0 / d, h.ln())))
        .unzip();

    if ys.len() < 2 {
        return Err(StandError::InsufficientData(format!(
            "height regression needs at least 2 measured heights, got {}",
            ys.len()
        )));
    }
    for (&x, &y) in xs.iter().zip(&ys) {
        if !x.is_finite() || !y.is_finite() {
            return Err(StandError::Domain(
                "measured heights must be positive and finite".to_string(),
            ));
        }
    }

    let x_mean = xs.iter().mean();
    let y_mean = ys.iter().mean();
    let sxx: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
    if sxx <= f64::EPSILON {
        return Err(StandError::Domain(
            "cannot fit height regression: all measured trees share one DBH".to_string(),
        ));
    }
    let sxy: f64 = xs
        .iter()
        .zip(&ys)
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();

    let b1 = sxy / sxx;
    let b0 = y_mean - b1 * x_mean;

    let sse: f64 = xs
        .iter()
        .zip(&ys)
        .map(|(x, y)| (y - (b0 + b1 * x)).powi(2))
        .sum();
    let sst: f64 = ys.iter().map(|y| (y - y_mean).powi(2)).sum();
    let r_squared = if sst <= f64::EPSILON {
        1.0
    } else {
        (1.0 - sse / sst).clamp(0.0, 1.0)
    };

    let fit = HeightFit { b0, b1, r_squared };
    let completed = dbh
        .iter()
        .zip(heights)
        .map(|(&d, &h)| h.unwrap_or_else(|| (b0 + b1 / d).exp()))
        .collect();

    Ok(ImputedHeights {
        heights: completed,
        fit: Some(fit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn parametric_spec() -> HeightModelSpec {
        HeightModelSpec::Parametric {
            age: Some(20.0),
            basal_area: Some(30.0),
            area_m2: None,
        }
    }

    #[test]
    fn test_length_mismatch_fails() {
        let err = impute_heights(&[10.0, 12.0], &[None], &parametric_spec()).unwrap_err();
        assert!(matches!(err, StandError::Validation(_)));
    }

    #[test]
    fn test_non_positive_dbh_fails() {
        let err = impute_heights(&[10.0, 0.0], &[None, None], &parametric_spec()).unwrap_err();
        assert!(matches!(err, StandError::Domain(_)));
    }

    #[test]
    fn test_parametric_fills_only_missing() {
        let dbh = vec![15.0, 20.0, 25.0];
        let heights = vec![Some(14.0), None, Some(19.5)];
        let result = impute_heights(&dbh, &heights, &parametric_spec()).unwrap();
        assert_eq!(result.heights.len(), 3);
        assert_approx_eq!(result.heights[0], 14.0, 1e-9);
        assert_approx_eq!(result.heights[2], 19.5, 1e-9);
        assert!(result.heights[1] > 0.0);
        assert!(result.fit.is_none());
    }

    #[test]
    fn test_parametric_estimate_matches_equation() {
        let model = ParametricHeightModel::default();
        let (d, age, ba) = (20.0f64, 20.0f64, 30.0f64);
        let expected = (model.a1
            + model.a2 * d.powf(model.a3)
            + age.powf(model.a4)
            + ba.powf(model.a5))
        .exp();
        let result = impute_heights(&[d], &[None], &parametric_spec()).unwrap();
        assert_approx_eq!(result.heights[0], expected, 1e-9);
    }

    #[test]
    fn test_parametric_taller_for_thicker_trees() {
        let result =
            impute_heights(&[10.0, 20.0, 30.0], &[None, None, None], &parametric_spec()).unwrap();
        assert!(result.heights[0] < result.heights[1]);
        assert!(result.heights[1] < result.heights[2]);
    }

    #[test]
    fn test_parametric_derives_ba_from_area() {
        let dbh = vec![18.0, 22.0, 26.0];
        let spec = HeightModelSpec::Parametric {
            age: Some(20.0),
            basal_area: None,
            area_m2: Some(500.0),
        };
        let result = impute_heights(&dbh, &[None, None, None], &spec).unwrap();
        assert!(result.heights.iter().all(|&h| h > 0.0));
    }

    #[test]
    fn test_parametric_missing_age_fails() {
        let spec = HeightModelSpec::Parametric {
            age: None,
            basal_area: Some(30.0),
            area_m2: None,
        };
        let err = impute_heights(&[20.0], &[None], &spec).unwrap_err();
        assert!(matches!(err, StandError::InsufficientInput(_)));
    }

    #[test]
    fn test_parametric_missing_ba_and_area_fails() {
        let spec = HeightModelSpec::Parametric {
            age: Some(20.0),
            basal_area: None,
            area_m2: None,
        };
        let err = impute_heights(&[20.0], &[None], &spec).unwrap_err();
        assert!(matches!(err, StandError::InsufficientInput(_)));
    }

    #[test]
    fn test_regression_recovers_exact_relationship() {
        // Heights generated from ln(HT) = 3.1 - 8.0/DBH must be recovered
        let dbh: Vec<f64> = (10..=21).map(|d| d as f64).collect();
        let heights: Vec<Option<f64>> = dbh
            .iter()
            .map(|&d| Some((3.1 - 8.0 / d).exp()))
            .collect();
        let result = impute_heights(&dbh, &heights, &HeightModelSpec::Regression).unwrap();
        let fit = result.fit.unwrap();
        assert_approx_eq!(fit.b0, 3.1, 1e-6);
        assert_approx_eq!(fit.b1, -8.0, 1e-6);
        assert_approx_eq!(fit.r_squared, 1.0, 1e-9);
    }

    #[test]
    fn test_regression_fills_missing_from_fit() {
        let mut dbh: Vec<f64> = (10..=21).map(|d| d as f64).collect();
        let mut heights: Vec<Option<f64>> = dbh
            .iter()
            .map(|&d| Some((3.1 - 8.0 / d).exp()))
            .collect();
        dbh.push(30.0);
        heights.push(None);
        let result = impute_heights(&dbh, &heights, &HeightModelSpec::Regression).unwrap();
        let expected = (3.1f64 - 8.0 / 30.0).exp();
        assert_approx_eq!(*result.heights.last().unwrap(), expected, 1e-6);
    }

    #[test]
    fn test_regression_r_squared_in_unit_interval() {
        // Noisy heights: r^2 must land in [0, 1]
        let dbh: Vec<f64> = (10..=25).map(|d| d as f64).collect();
        let heights: Vec<Option<f64>> = dbh
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                let noise = if i % 2 == 0 { 1.07 } else { 0.94 };
                Some((3.0 - 7.5 / d).exp() * noise)
            })
            .collect();
        let result = impute_heights(&dbh, &heights, &HeightModelSpec::Regression).unwrap();
        let fit = result.fit.unwrap();
        assert!((0.0..=1.0).contains(&fit.r_squared));
        assert!(fit.r_squared < 1.0);
    }

    #[test]
    fn test_regression_keeps_measured_heights() {
        let dbh: Vec<f64> = (10..=21).map(|d| d as f64).collect();
        let heights: Vec<Option<f64>> = dbh
            .iter()
            .map(|&d| Some((3.1 - 8.0 / d).exp() * 1.02))
            .collect();
        let result = impute_heights(&dbh, &heights, &HeightModelSpec::Regression).unwrap();
        for (completed, original) in result.heights.iter().zip(&heights) {
            assert_approx_eq!(*completed, original.unwrap(), 1e-12);
        }
    }

    #[test]
    fn test_regression_too_few_measured_fails() {
        let err = impute_heights(
            &[10.0, 12.0, 14.0],
            &[Some(11.0), None, None],
            &HeightModelSpec::Regression,
        )
        .unwrap_err();
        assert!(matches!(err, StandError::InsufficientData(_)));
    }

    #[test]
    fn test_regression_constant_dbh_fails() {
        let err = impute_heights(
            &[15.0, 15.0, 15.0],
            &[Some(12.0), Some(13.0), Some(12.5)],
            &HeightModelSpec::Regression,
        )
        .unwrap_err();
        assert!(matches!(err, StandError::Domain(_)));
    }
}
