use crate::error::StandError;
use crate::models::MortalityModel;

/// Project surviving tree count from `age0` to `age1`.
///
/// `N1 = N0 * exp((c1*HDOM0/100 + c2*SDIR0/100) * (AGE1^c3 - AGE0^c3))`
/// with SDIR on the 0-100 percent scale.
pub fn project_tree_count(
    n0: f64,
    hdom0: f64,
    sdir0: f64,
    age0: f64,
    age1: f64,
) -> Result<f64, StandError> {
    project_tree_count_with(n0, hdom0, sdir0, age0, age1, &MortalityModel::default())
}

pub fn project_tree_count_with(
    n0: f64,
    hdom0: f64,
    sdir0: f64,
    age0: f64,
    age1: f64,
    model: &MortalityModel,
) -> Result<f64, StandError> {
    for (name, v) in [
        ("N0", n0),
        ("HDOM0", hdom0),
        ("SDIR0", sdir0),
        ("AGE0", age0),
        ("AGE1", age1),
    ] {
        if v <= 0.0 {
            return Err(StandError::Domain(format!(
                "{name} must be positive, got {v}"
            )));
        }
    }
    if age1 <= age0 {
        return Err(StandError::Domain(format!(
            "projection must move forward in time, got AGE0 {age0} to AGE1 {age1}"
        )));
    }

    let rate = model.c1 * hdom0 / 100.0 + model.c2 * sdir0 / 100.0;
    Ok(n0 * (rate * (age1.powf(model.c3) - age0.powf(model.c3))).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_documented_example() {
        // N0=2500, HDOM0=14, SDIR0=45, AGE0=24, AGE1=25
        let n1 = project_tree_count(2500.0, 14.0, 45.0, 24.0, 25.0).unwrap();
        assert_approx_eq!(n1, 2471.5, 1.0);
    }

    #[test]
    fn test_matches_closed_form() {
        let model = MortalityModel::default();
        let (n0, hdom0, sdir0, age0, age1) = (2500.0f64, 14.0f64, 45.0f64, 24.0f64, 25.0f64);
        let expected = n0
            * ((model.c1 * hdom0 / 100.0 + model.c2 * sdir0 / 100.0)
                * (age1.powf(model.c3) - age0.powf(model.c3)))
            .exp();
        assert_approx_eq!(
            project_tree_count(n0, hdom0, sdir0, age0, age1).unwrap(),
            expected,
            1e-12
        );
    }

    #[test]
    fn test_dense_stands_lose_more_trees() {
        let sparse = project_tree_count(2500.0, 14.0, 30.0, 24.0, 25.0).unwrap();
        let dense = project_tree_count(2500.0, 14.0, 80.0, 24.0, 25.0).unwrap();
        assert!(dense < sparse);
    }

    #[test]
    fn test_longer_interval_more_mortality() {
        let one_year = project_tree_count(2500.0, 14.0, 45.0, 24.0, 25.0).unwrap();
        let five_years = project_tree_count(2500.0, 14.0, 45.0, 24.0, 29.0).unwrap();
        assert!(five_years < one_year);
    }

    #[test]
    fn test_survival_stays_positive() {
        let n1 = project_tree_count(2500.0, 25.0, 95.0, 5.0, 60.0).unwrap();
        assert!(n1 > 0.0);
        assert!(n1 < 2500.0);
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        assert!(project_tree_count(0.0, 14.0, 45.0, 24.0, 25.0).is_err());
        assert!(project_tree_count(2500.0, 14.0, -45.0, 24.0, 25.0).is_err());
        assert!(project_tree_count(2500.0, 14.0, 45.0, 0.0, 25.0).is_err());
    }

    #[test]
    fn test_rejects_backwards_projection() {
        let err = project_tree_count(2500.0, 14.0, 45.0, 25.0, 24.0).unwrap_err();
        assert!(matches!(err, StandError::Domain(_)));
        assert!(project_tree_count(2500.0, 14.0, 45.0, 25.0, 25.0).is_err());
    }
}
