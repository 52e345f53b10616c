use crate::error::StandError;
use crate::growth::{merchantable_volume, predict_basal_area, total_volume};
use crate::models::{HeightMethod, MerchantablePair, SimulationParams, StandState};
use crate::stand::{relative_density_index, solve_site_triple, solve_stand_triple, Var};
use crate::tree::prepare_tree_plot;

/// Initial conditions, at either of the two supported resolutions.
#[derive(Debug, Clone)]
pub enum InitialInventory {
    /// Raw per-tree vectors for one plot.
    TreeLevel {
        ids: Vec<u32>,
        dbh: Vec<f64>,
        heights: Vec<Option<f64>>,
        area_m2: f64,
        /// Stand age (years); site index is derived from it if absent
        age: Option<f64>,
        /// Site index (m); age is derived from it if absent
        si: Option<f64>,
    },
    /// Stand-level summary variables.
    StandLevel {
        n: f64,
        ba: Option<f64>,
        hdom: Option<f64>,
        si: Option<f64>,
        age: Option<f64>,
    },
}

/// Complete every derived state variable for the starting age and package
/// it as the age-0 stand state of a simulation.
///
/// Tree-level input runs the tree data preparer first; stand-level input
/// completes {HDOM, SI, AGE} through the site solver and predicts BA when
/// it was not measured.
pub fn normalize_initial_state(
    inventory: &InitialInventory,
    params: &SimulationParams,
) -> Result<StandState, StandError> {
    let (n, ba, hdom, si, age) = match inventory {
        InitialInventory::TreeLevel {
            ids,
            dbh,
            heights,
            area_m2,
            age,
            si,
        } => {
            let summary =
                prepare_tree_plot(ids, dbh, heights, *area_m2, *age, params.height_method)?;
            let site = solve_site_triple(
                Var::Known(summary.hdom),
                Var::from(*si),
                Var::from(*age),
            )?;
            (summary.n, summary.ba, site.hdom, site.si, site.age)
        }
        InitialInventory::StandLevel {
            n,
            ba,
            hdom,
            si,
            age,
        } => {
            let site = solve_site_triple(Var::from(*hdom), Var::from(*si), Var::from(*age))?;
            let ba = match ba {
                Some(ba) => *ba,
                None => predict_basal_area(*n, site.hdom)?,
            };
            (*n, ba, site.hdom, site.si, site.age)
        }
    };

    complete_state(n, ba, hdom, si, age, params)
}

/// Derive QD, SDIR, and volumes for a state whose {N, BA, HDOM, SI, AGE}
/// are already known.
pub(crate) fn complete_state(
    n: f64,
    ba: f64,
    hdom: f64,
    si: f64,
    age: f64,
    params: &SimulationParams,
) -> Result<StandState, StandError> {
    let triple = solve_stand_triple(Var::Known(ba), Var::Known(n), Var::Unknown)?;
    let sdir = relative_density_index(n, triple.qd)?;
    let volume = total_volume(n, ba, age, si)?;
    let merchantable: MerchantablePair = merchantable_volume(
        n,
        triple.qd,
        &params.merchantable,
        Some(volume.outside_bark),
        Some(volume.inside_bark),
    )?;

    Ok(StandState {
        age,
        n,
        ba,
        qd: triple.qd,
        hdom,
        si,
        sdir,
        volume,
        merchantable,
        thinned: false,
    })
}
