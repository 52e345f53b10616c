use crate::error::StandError;
use crate::stand::{solve_stand_triple, StandTriple, Var};

/// Interpolated quantile of `sorted` (ascending), matching the common
/// linear estimator: h = (n-1)*p, result = x[floor(h)] + frac(h)*(x[floor(h)+1]-x[floor(h)]).
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Reduce a plot's DBH measurements to per-hectare basal area, density, and
/// quadratic mean diameter.
pub fn aggregate_stand(dbh: &[f64], area_m2: f64) -> Result<StandTriple, StandError> {
    if area_m2 <= 0.0 {
        return Err(StandError::DegenerateInput(format!(
            "plot area must be positive, got {area_m2}"
        )));
    }
    if dbh.is_empty() {
        return Err(StandError::InsufficientData(
            "no trees to aggregate".to_string(),
        ));
    }
    for (i, &d) in dbh.iter().enumerate() {
        if d <= 0.0 {
            return Err(StandError::Domain(format!(
                "DBH must be positive, tree index {i} has {d}"
            )));
        }
    }

    let ef = 10_000.0 / area_m2;
    let ba: f64 = dbh
        .iter()
        .map(|d| std::f64::consts::FRAC_PI_4 * d * d * 1e-4)
        .sum::<f64>()
        * ef;
    let n = dbh.len() as f64 * ef;
    solve_stand_triple(Var::Known(ba), Var::Known(n), Var::Unknown)
}

/// Dominant height as the mean of the top quartile of heights.
///
/// Heights at or above the interpolated 75th percentile contribute to the
/// mean. All heights must be present; impute missing ones first.
pub fn dominant_height(heights: &[f64]) -> Result<f64, StandError> {
    if heights.is_empty() {
        return Err(StandError::InsufficientData(
            "no heights for dominant height".to_string(),
        ));
    }
    for (i, &h) in heights.iter().enumerate() {
        if h <= 0.0 {
            return Err(StandError::Domain(format!(
                "height must be positive, tree index {i} has {h}"
            )));
        }
    }

    let mut sorted = heights.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let q75 = quantile_sorted(&sorted, 0.75);

    let top: Vec<f64> = sorted.iter().copied().filter(|&h| h >= q75).collect();
    Ok(top.iter().sum::<f64>() / top.len() as f64)
}

/// Dominant height over the 100 thickest stems per hectare.
///
/// Trees are taken in descending DBH order, each representing
/// `EF = 10000/area` stems, until the cumulative count reaches 100 stems/ha;
/// the last tree gets a fractional weight equal to the shortfall so the
/// weighted mean uses exactly 100 virtual stems. The standard top-100
/// definition, kept separate from the quartile version.
pub fn weighted_dominant_height(
    dbh: &[f64],
    heights: &[f64],
    area_m2: f64,
) -> Result<f64, StandError> {
    if dbh.len() != heights.len() {
        return Err(StandError::Validation(format!(
            "DBH and height vectors differ in length ({} vs {})",
            dbh.len(),
            heights.len()
        )));
    }
    if area_m2 <= 0.0 {
        return Err(StandError::DegenerateInput(format!(
            "plot area must be positive, got {area_m2}"
        )));
    }
    if dbh.is_empty() {
        return Err(StandError::InsufficientData(
            "no trees for dominant height".to_string(),
        ));
    }

    const TARGET_STEMS: f64 = 100.0;
    let ef = 10_000.0 / area_m2;

    let mut order: Vec<usize> = (0..dbh.len()).collect();
    order.sort_by(|&a, &b| dbh[b].partial_cmp(&dbh[a]).unwrap());

    let mut cumulative = 0.0;
    let mut weighted_sum = 0.0;
    for &i in &order {
        if cumulative >= TARGET_STEMS {
            break;
        }
        let weight = ef.min(TARGET_STEMS - cumulative);
        weighted_sum += heights[i] * weight;
        cumulative += weight;
    }
    // Fewer than 100 stems/ha on the plot: use what is there
    Ok(weighted_sum / cumulative)
}
