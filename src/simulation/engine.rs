use tracing::{debug, warn};

use crate::error::StandError;
use crate::growth::{project_basal_area, project_tree_count};
use crate::models::{SimulationParams, SiteCurve, StandState};
use crate::simulation::input::complete_state;
use crate::stand::dominant_height_at;

/// Simulate stand development year by year from the initial state to the
/// final age, inclusive.
///
/// The trajectory is a pure fold: each yearly state is derived from its
/// predecessor and the fixed model coefficients. Dominant height advances
/// along the site curve at constant SI; tree count through the mortality
/// model; basal area through the projection model; QD, SDIR and volumes are
/// recomputed from the fresh {BA, N} each year. An enabled thinning removes
/// its basal-area fraction once, at the first simulated age reaching the
/// configured thinning age, before derived variables are recomputed for
/// that year. Tree count is not reduced by thinning.
pub fn simulate(
    initial: &StandState,
    params: &SimulationParams,
) -> Result<Vec<StandState>, StandError> {
    if params.final_age < initial.age {
        return Err(StandError::Validation(format!(
            "final age {} precedes initial age {}",
            params.final_age, initial.age
        )));
    }
    if let Some(thin) = params.thinning {
        if thin.age <= initial.age || thin.age > params.final_age {
            warn!(
                thinning_age = thin.age,
                initial_age = initial.age,
                final_age = params.final_age,
                "thinning age outside the simulated interval; thinning will not be applied"
            );
        }
    }

    let curve = SiteCurve::default();
    let years = (params.final_age - initial.age).floor() as usize;
    let mut trajectory = Vec::with_capacity(years + 1);
    trajectory.push(initial.clone());

    let mut thinning_pending = params
        .thinning
        .filter(|t| t.age > initial.age && t.age <= params.final_age);

    let mut current = initial.clone();
    for _ in 0..years {
        let age1 = current.age + 1.0;
        let hdom1 = dominant_height_at(current.si, age1, &curve);
        let n1 = project_tree_count(current.n, current.hdom, current.sdir, current.age, age1)?;
        let mut ba1 = project_basal_area(current.ba, current.n, n1, current.hdom, hdom1)?;

        let mut thinned = false;
        if let Some(thin) = thinning_pending {
            if thin.age <= age1 {
                debug!(age = age1, fraction = thin.ba_fraction, "applying thinning");
                ba1 *= 1.0 - thin.ba_fraction;
                thinned = true;
                thinning_pending = None;
            }
        }

        let mut next = complete_state(n1, ba1, hdom1, current.si, age1, params)?;
        next.thinned = thinned;
        trajectory.push(next.clone());
        current = next;
    }

    Ok(trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HeightMethod, MerchantableLimits, Thinning};
    use crate::simulation::input::{normalize_initial_state, InitialInventory};
    use assert_approx_eq::assert_approx_eq;

    fn params(final_age: f64, thinning: Option<Thinning>) -> SimulationParams {
        SimulationParams {
            final_age,
            thinning,
            merchantable: MerchantableLimits::default(),
            height_method: HeightMethod::Regression,
        }
    }

    fn initial_state(p: &SimulationParams) -> StandState {
        let inv = InitialInventory::StandLevel {
            n: 1600.0,
            ba: Some(28.0),
            hdom: None,
            si: Some(22.0),
            age: Some(15.0),
        };
        normalize_initial_state(&inv, p).unwrap()
    }

    #[test]
    fn test_trajectory_length_and_ages() {
        let p = params(30.0, None);
        let initial = initial_state(&p);
        let traj = simulate(&initial, &p).unwrap();
        assert_eq!(traj.len(), 16);
        assert_approx_eq!(traj[0].age, 15.0, 1e-9);
        assert_approx_eq!(traj.last().unwrap().age, 30.0, 1e-9);
        for pair in traj.windows(2) {
            assert_approx_eq!(pair[1].age - pair[0].age, 1.0, 1e-9);
        }
    }

    #[test]
    fn test_final_age_equal_initial_is_single_state() {
        let p = params(15.0, None);
        let initial = initial_state(&p);
        let traj = simulate(&initial, &p).unwrap();
        assert_eq!(traj.len(), 1);
    }

    #[test]
    fn test_final_age_before_initial_fails() {
        let p = params(10.0, None);
        let initial = initial_state(&params(30.0, None));
        let err = simulate(&initial, &p).unwrap_err();
        assert!(matches!(err, StandError::Validation(_)));
    }

    #[test]
    fn test_hdom_monotone_and_si_constant() {
        let p = params(35.0, None);
        let initial = initial_state(&p);
        let traj = simulate(&initial, &p).unwrap();
        for pair in traj.windows(2) {
            assert!(pair[1].hdom > pair[0].hdom);
            assert_approx_eq!(pair[1].si, pair[0].si, 1e-12);
        }
    }

    #[test]
    fn test_tree_count_never_increases() {
        let p = params(40.0, None);
        let initial = initial_state(&p);
        let traj = simulate(&initial, &p).unwrap();
        for pair in traj.windows(2) {
            assert!(pair[1].n <= pair[0].n);
            assert!(pair[1].n > 0.0);
        }
    }

    #[test]
    fn test_qd_consistent_with_ba_and_n_each_year() {
        let p = params(30.0, None);
        let initial = initial_state(&p);
        let traj = simulate(&initial, &p).unwrap();
        for state in &traj {
            let expected = (4.0 / std::f64::consts::PI * state.ba / state.n).sqrt() * 100.0;
            assert_approx_eq!(state.qd, expected, 1e-9);
        }
    }

    #[test]
    fn test_volumes_present_every_year() {
        let p = params(30.0, None);
        let initial = initial_state(&p);
        let traj = simulate(&initial, &p).unwrap();
        for state in &traj {
            assert!(state.volume.outside_bark > 0.0);
            assert!(state.volume.inside_bark > 0.0);
            assert!(state.merchantable.outside_bark.unwrap() > 0.0);
            assert!(state.merchantable.inside_bark.unwrap() > 0.0);
        }
    }

    #[test]
    fn test_thinning_drops_ba_at_configured_age() {
        let thin = Thinning::new(20.0, 0.3).unwrap();
        let p = params(30.0, Some(thin));
        let initial = initial_state(&p);
        let traj = simulate(&initial, &p).unwrap();

        let unthinned = simulate(&initial, &params(30.0, None)).unwrap();
        let idx = traj.iter().position(|s| s.thinned).unwrap();
        assert_approx_eq!(traj[idx].age, 20.0, 1e-9);
        // BA at the thinning year equals the unthinned projection scaled down
        assert_approx_eq!(traj[idx].ba, unthinned[idx].ba * 0.7, 1e-9);
        assert!(traj[idx].ba < traj[idx - 1].ba);
    }

    #[test]
    fn test_thinning_applied_exactly_once() {
        let thin = Thinning::new(20.0, 0.3).unwrap();
        let p = params(30.0, Some(thin));
        let initial = initial_state(&p);
        let traj = simulate(&initial, &p).unwrap();
        assert_eq!(traj.iter().filter(|s| s.thinned).count(), 1);
    }

    #[test]
    fn test_thinning_does_not_touch_tree_count() {
        let thin = Thinning::new(20.0, 0.3).unwrap();
        let p = params(30.0, Some(thin));
        let initial = initial_state(&p);
        let thinned = simulate(&initial, &p).unwrap();
        let unthinned = simulate(&initial, &params(30.0, None)).unwrap();
        let idx = thinned.iter().position(|s| s.thinned).unwrap();
        assert_approx_eq!(thinned[idx].n, unthinned[idx].n, 1e-9);
    }

    #[test]
    fn test_thinning_outside_interval_is_skipped() {
        let thin = Thinning::new(50.0, 0.3).unwrap();
        let p = params(30.0, Some(thin));
        let initial = initial_state(&p);
        let traj = simulate(&initial, &p).unwrap();
        assert!(traj.iter().all(|s| !s.thinned));
    }

    #[test]
    fn test_thinned_stand_keeps_growing_afterwards() {
        let thin = Thinning::new(20.0, 0.3).unwrap();
        let p = params(30.0, Some(thin));
        let initial = initial_state(&p);
        let traj = simulate(&initial, &p).unwrap();
        let idx = traj.iter().position(|s| s.thinned).unwrap();
        assert!(traj[idx + 1].ba > traj[idx].ba);
    }

    #[test]
    fn test_trajectory_is_deterministic() {
        let p = params(30.0, None);
        let initial = initial_state(&p);
        let a = simulate(&initial, &p).unwrap();
        let b = simulate(&initial, &p).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_approx_eq!(x.ba, y.ba, 1e-15);
            assert_approx_eq!(x.n, y.n, 1e-15);
        }
    }
}
