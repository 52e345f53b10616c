use serde::{Deserialize, Serialize};

/// Total stand volume, both bark conventions (m³/ha).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumePair {
    pub outside_bark: f64,
    pub inside_bark: f64,
}

/// Merchantable stand volume (m³/ha). Either side may be absent when only
/// one total volume was supplied to the ratio model.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MerchantablePair {
    pub outside_bark: Option<f64>,
    pub inside_bark: Option<f64>,
}

/// A snapshot of the stand at one age. Immutable once derived: each
/// simulated year produces a fresh state from its predecessor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandState {
    /// Stand age in years
    pub age: f64,
    /// Tree density (trees/ha)
    pub n: f64,
    /// Basal area (m²/ha)
    pub ba: f64,
    /// Quadratic mean diameter (cm)
    pub qd: f64,
    /// Dominant height (m)
    pub hdom: f64,
    /// Site index at reference age 50 (m), constant over the stand's life
    pub si: f64,
    /// Relative stand density index (percent, 0-100 scale)
    pub sdir: f64,
    /// Total volume (m³/ha)
    pub volume: VolumePair,
    /// Merchantable volume (m³/ha)
    pub merchantable: MerchantablePair,
    /// Whether a thinning was applied at this age
    pub thinned: bool,
}
