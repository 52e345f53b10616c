use serde::{Deserialize, Serialize};

/// Chapman-Richards site curve referenced to age 50.
///
/// `HDOM = SI * ((1 - exp(a1 * AGE)) / (1 - exp(a1 * 50)))^a2`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteCurve {
    pub a1: f64,
    pub a2: f64,
    /// Reference age at which HDOM equals SI (years)
    pub reference_age: f64,
}

impl Default for SiteCurve {
    fn default() -> Self {
        Self {
            a1: -0.0369815,
            a2: 1.2928702,
            reference_age: 50.0,
        }
    }
}

/// Reineke relative density index.
///
/// `SDIR(%) = 100 * N * (QD / 25.4)^exponent / sdi_max`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DensityIndexModel {
    pub exponent: f64,
    /// Species maximum stand density index (trees/ha)
    pub sdi_max: f64,
}

impl Default for DensityIndexModel {
    fn default() -> Self {
        Self {
            exponent: 1.605,
            sdi_max: 1200.0,
        }
    }
}

/// Basal area prediction model.
///
/// Prediction: `BA = exp(c1 + c2*ln(N) + c3*ln(HDOM))`.
/// Projection uses the first-order form
/// `BA1 = BA0 * (1 + c2*(N1-N0)/N0 + c3*(HDOM1-HDOM0)/HDOM0)`,
/// a linear approximation of the log model rather than its exact
/// exponential solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasalAreaModel {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
}

impl Default for BasalAreaModel {
    fn default() -> Self {
        Self {
            c1: -4.6484039,
            c2: 0.4452486,
            c3: 1.6526307,
        }
    }
}

/// Tree count (mortality) projection model.
///
/// `N1 = N0 * exp((c1*HDOM0/100 + c2*SDIR0/100) * (AGE1^c3 - AGE0^c3))`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortalityModel {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
}

impl Default for MortalityModel {
    fn default() -> Self {
        Self {
            c1: 0.0087247,
            c2: -0.0117265,
            c3: 1.2543404,
        }
    }
}

/// Fixed DBH-height model used for height imputation.
///
/// `HT = exp(a1 + a2*DBH^a3 + AGE^a4 + BA^a5)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParametricHeightModel {
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub a4: f64,
    pub a5: f64,
}

impl Default for ParametricHeightModel {
    fn default() -> Self {
        Self {
            a1: 0.059425,
            a2: -10.803775,
            a3: -1.127503,
            a4: 0.150532,
            a5: 0.121239,
        }
    }
}

/// Coefficients of the total stand volume model for one bark type.
///
/// `ln(VOL) = d1 + d2*ln(N) + d3*ln(BA) + d4*ln(BA)/AGE + d5*ln(SI)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeCoefficients {
    pub d1: f64,
    pub d2: f64,
    pub d3: f64,
    pub d4: f64,
    pub d5: f64,
}

/// Total volume model, outside- and inside-bark calibrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeModel {
    pub outside_bark: VolumeCoefficients,
    pub inside_bark: VolumeCoefficients,
}

impl Default for VolumeModel {
    fn default() -> Self {
        Self {
            outside_bark: VolumeCoefficients {
                d1: -0.5225,
                d2: 0.0417,
                d3: 1.0915,
                d4: -3.8453,
                d5: 0.9182,
            },
            inside_bark: VolumeCoefficients {
                d1: -0.7153,
                d2: 0.0438,
                d3: 1.0823,
                d4: -3.9102,
                d5: 0.9631,
            },
        }
    }
}

/// Coefficients of the merchantable volume ratio for one bark type.
///
/// `VOLm = VOL * exp(m1*(t/QD)^m2 + m3*N^m4*(d/QD)^m5)` where `t` is the
/// top-diameter limit and `d` the minimum merchantable DBH.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantableCoefficients {
    pub m1: f64,
    pub m2: f64,
    pub m3: f64,
    pub m4: f64,
    pub m5: f64,
}

/// Merchantable volume ratio model, outside- and inside-bark calibrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantableModel {
    pub outside_bark: MerchantableCoefficients,
    pub inside_bark: MerchantableCoefficients,
}

impl Default for MerchantableModel {
    fn default() -> Self {
        Self {
            outside_bark: MerchantableCoefficients {
                m1: -0.6424,
                m2: 3.2181,
                m3: -0.0172,
                m4: 0.4503,
                m5: 4.1554,
            },
            inside_bark: MerchantableCoefficients {
                m1: -0.5817,
                m2: 3.1096,
                m3: -0.0189,
                m4: 0.4421,
                m5: 4.0779,
            },
        }
    }
}

/// Full species calibration: every fixed-coefficient equation the simulator
/// uses, bundled so a recalibrated set can be swapped in from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesModel {
    pub site: SiteCurve,
    pub density_index: DensityIndexModel,
    pub basal_area: BasalAreaModel,
    pub mortality: MortalityModel,
    pub height: ParametricHeightModel,
    pub volume: VolumeModel,
    pub merchantable: MerchantableModel,
}
