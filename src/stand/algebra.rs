use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StandError;
use crate::models::DensityIndexModel;

/// A stand variable that is either supplied by the caller or left for the
/// solver to determine. Solvers dispatch on the pattern of knowns, so the
/// arity contract is checked in one place instead of via sentinel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Var {
    Known(f64),
    Unknown,
}

impl Var {
    pub fn value(self) -> Option<f64> {
        match self {
            Var::Known(v) => Some(v),
            Var::Unknown => None,
        }
    }
}

impl From<Option<f64>> for Var {
    fn from(v: Option<f64>) -> Self {
        match v {
            Some(x) => Var::Known(x),
            None => Var::Unknown,
        }
    }
}

/// Which member of {BA, N, QD} a solve produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandVariable {
    BasalArea,
    TreeCount,
    QuadDiameter,
}

/// A completed {BA, N, QD} triple.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StandTriple {
    /// Basal area (m²/ha)
    pub ba: f64,
    /// Tree density (trees/ha)
    pub n: f64,
    /// Quadratic mean diameter (cm)
    pub qd: f64,
    /// The variable that was solved for; `None` when all three were given
    /// and nothing was computed
    pub solved_for: Option<StandVariable>,
}

fn require_positive(name: &str, value: f64) -> Result<f64, StandError> {
    if value <= 0.0 {
        return Err(StandError::Domain(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(value)
}

/// Complete the missing one of {BA, N, QD}.
///
/// The three are linked by `QD(cm) = sqrt((4/pi) * BA / N) * 100` with BA in
/// m²/ha and N in trees/ha. Exactly one variable may be `Unknown`; fewer
/// than two knowns is an error, and a fully known triple is returned
/// unchanged with an observable warning.
pub fn solve_stand_triple(ba: Var, n: Var, qd: Var) -> Result<StandTriple, StandError> {
    match (ba, n, qd) {
        (Var::Known(ba), Var::Known(n), Var::Unknown) => {
            require_positive("BA", ba)?;
            require_positive("N", n)?;
            let qd = (4.0 / std::f64::consts::PI * ba / n).sqrt() * 100.0;
            Ok(StandTriple {
                ba,
                n,
                qd,
                solved_for: Some(StandVariable::QuadDiameter),
            })
        }
        (Var::Known(ba), Var::Unknown, Var::Known(qd)) => {
            require_positive("BA", ba)?;
            require_positive("QD", qd)?;
            let n = ba / (std::f64::consts::FRAC_PI_4 * (qd / 100.0).powi(2));
            Ok(StandTriple {
                ba,
                n,
                qd,
                solved_for: Some(StandVariable::TreeCount),
            })
        }
        (Var::Unknown, Var::Known(n), Var::Known(qd)) => {
            require_positive("N", n)?;
            require_positive("QD", qd)?;
            let ba = std::f64::consts::FRAC_PI_4 * (qd / 100.0).powi(2) * n;
            Ok(StandTriple {
                ba,
                n,
                qd,
                solved_for: Some(StandVariable::BasalArea),
            })
        }
        (Var::Known(ba), Var::Known(n), Var::Known(qd)) => {
            warn!(ba, n, qd, "BA, N and QD all given; nothing to solve");
            Ok(StandTriple {
                ba,
                n,
                qd,
                solved_for: None,
            })
        }
        _ => Err(StandError::InsufficientInput(
            "need at least two of BA, N, QD to complete the stand triple".to_string(),
        )),
    }
}

/// Reineke relative stand density index as a percent of the species maximum.
///
/// `SDIR(%) = 100 * N * (QD / 25.4)^1.605 / SDImax`
pub fn relative_density_index(n: f64, qd: f64) -> Result<f64, StandError> {
    relative_density_index_with(n, qd, &DensityIndexModel::default())
}

/// Relative density index with explicit coefficients.
pub fn relative_density_index_with(
    n: f64,
    qd: f64,
    model: &DensityIndexModel,
) -> Result<f64, StandError> {
    require_positive("N", n)?;
    require_positive("QD", qd)?;
    let sdi = n * (qd / 25.4).powf(model.exponent);
    Ok(100.0 * sdi / model.sdi_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use proptest::prelude::*;

    #[test]
    fn test_solve_qd_from_ba_and_n() {
        let triple =
            solve_stand_triple(Var::Known(42.0), Var::Known(1660.0), Var::Unknown).unwrap();
        // QD = sqrt((4/pi) * 42/1660) * 100
        assert_approx_eq!(triple.qd, 17.948, 0.01);
        assert_eq!(triple.solved_for, Some(StandVariable::QuadDiameter));
    }

    #[test]
    fn test_solve_ba_from_n_and_qd() {
        let triple =
            solve_stand_triple(Var::Unknown, Var::Known(1000.0), Var::Known(20.0)).unwrap();
        // BA = pi/4 * 0.2^2 * 1000 = 31.416
        assert_approx_eq!(triple.ba, 31.4159, 0.001);
        assert_eq!(triple.solved_for, Some(StandVariable::BasalArea));
    }

    #[test]
    fn test_solve_n_from_ba_and_qd() {
        let triple =
            solve_stand_triple(Var::Known(31.4159265), Var::Unknown, Var::Known(20.0)).unwrap();
        assert_approx_eq!(triple.n, 1000.0, 0.01);
        assert_eq!(triple.solved_for, Some(StandVariable::TreeCount));
    }

    #[test]
    fn test_all_known_is_a_noop_not_an_error() {
        let triple =
            solve_stand_triple(Var::Known(42.0), Var::Known(1660.0), Var::Known(18.5)).unwrap();
        assert_eq!(triple.solved_for, None);
        // Values pass through untouched, even if inconsistent
        assert_approx_eq!(triple.qd, 18.5, 1e-9);
    }

    #[test]
    fn test_fewer_than_two_knowns_fails() {
        let err = solve_stand_triple(Var::Known(42.0), Var::Unknown, Var::Unknown).unwrap_err();
        assert!(matches!(err, StandError::InsufficientInput(_)));
        let err = solve_stand_triple(Var::Unknown, Var::Unknown, Var::Unknown).unwrap_err();
        assert!(matches!(err, StandError::InsufficientInput(_)));
    }

    #[test]
    fn test_non_positive_inputs_fail() {
        let err = solve_stand_triple(Var::Known(0.0), Var::Known(1000.0), Var::Unknown)
            .unwrap_err();
        assert!(matches!(err, StandError::Domain(_)));
        let err = solve_stand_triple(Var::Known(42.0), Var::Known(-5.0), Var::Unknown)
            .unwrap_err();
        assert!(matches!(err, StandError::Domain(_)));
    }

    #[test]
    fn test_relative_density_index() {
        // SDIR = 100 * 1000 * (20/25.4)^1.605 / 1200
        let sdir = relative_density_index(1000.0, 20.0).unwrap();
        let expected = 100.0 * 1000.0 * (20.0f64 / 25.4).powf(1.605) / 1200.0;
        assert_approx_eq!(sdir, expected, 1e-9);
        assert!(sdir > 0.0 && sdir < 100.0);
    }

    #[test]
    fn test_relative_density_index_rejects_non_positive() {
        assert!(relative_density_index(0.0, 20.0).is_err());
        assert!(relative_density_index(1000.0, -1.0).is_err());
    }

    #[test]
    fn test_relative_density_index_custom_model() {
        let model = DensityIndexModel {
            exponent: 1.605,
            sdi_max: 600.0,
        };
        let half_max = relative_density_index(1000.0, 20.0).unwrap();
        let custom = relative_density_index_with(1000.0, 20.0, &model).unwrap();
        assert_approx_eq!(custom, half_max * 2.0, 1e-9);
    }

    #[test]
    fn test_var_from_option() {
        assert_eq!(Var::from(Some(3.0)), Var::Known(3.0));
        assert_eq!(Var::from(None), Var::Unknown);
        assert_eq!(Var::Known(3.0).value(), Some(3.0));
        assert_eq!(Var::Unknown.value(), None);
    }

    proptest! {
        // Completing QD from (BA, N), then masking either original value,
        // must reproduce it from the other two.
        #[test]
        fn prop_stand_triple_round_trip(ba in 0.1f64..200.0, n in 10.0f64..5000.0) {
            let triple = solve_stand_triple(Var::Known(ba), Var::Known(n), Var::Unknown).unwrap();
            let back_n = solve_stand_triple(
                Var::Known(ba), Var::Unknown, Var::Known(triple.qd),
            ).unwrap();
            let back_ba = solve_stand_triple(
                Var::Unknown, Var::Known(n), Var::Known(triple.qd),
            ).unwrap();
            prop_assert!((back_n.n - n).abs() / n < 1e-9);
            prop_assert!((back_ba.ba - ba).abs() / ba < 1e-9);
        }
    }
}
